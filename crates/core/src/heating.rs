//! Heating energy rules.
//!
//! A [`HeatingRule`] turns a temperature reading and a heated area into an
//! energy figure. Rules are stateless and pure, so a single instance can be
//! shared between controllers and swapped in and out freely.
//!
//! The three built-in rules are [`GasHeating`], [`ElectricHeating`] and
//! [`SolarHeating`]. [`HeatingKind`] names them for configuration. Any other
//! type implementing [`HeatingRule`] plugs into the controller the same way.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Celsius, KilowattHours, SquareMeters};

/// Gas heating coefficient per degree and square meter.
const GAS_FACTOR: f64 = 0.2;

/// Electric heating coefficient per degree and square meter.
const ELECTRIC_FACTOR: f64 = 0.15;

/// Solar coefficient below [`SOLAR_CUTOVER`].
const SOLAR_COLD_FACTOR: f64 = 0.1;

/// Solar coefficient at or above [`SOLAR_CUTOVER`].
const SOLAR_MILD_FACTOR: f64 = 0.05;

/// Readings strictly below this use [`SOLAR_COLD_FACTOR`].
const SOLAR_CUTOVER: Celsius = 10.0;

// ---------------------------------------------------------------------------
// HeatingRule
// ---------------------------------------------------------------------------

/// Energy calculation strategy used by the heating controller.
pub trait HeatingRule {
    /// Identity shown in reports, e.g. `"GasHeating"`.
    fn name(&self) -> &str;

    /// Energy needed for `area` at the given `temperature`.
    ///
    /// Must be total: any finite input yields a value, negative results
    /// included.
    fn energy(&self, temperature: Celsius, area: SquareMeters) -> KilowattHours;
}

/// Flat rate of 0.2 per degree and square meter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GasHeating;

impl HeatingRule for GasHeating {
    fn name(&self) -> &str {
        "GasHeating"
    }

    fn energy(&self, temperature: Celsius, area: SquareMeters) -> KilowattHours {
        GAS_FACTOR * temperature * area
    }
}

/// Flat rate of 0.15 per degree and square meter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElectricHeating;

impl HeatingRule for ElectricHeating {
    fn name(&self) -> &str {
        "ElectricHeating"
    }

    fn energy(&self, temperature: Celsius, area: SquareMeters) -> KilowattHours {
        ELECTRIC_FACTOR * temperature * area
    }
}

/// Piecewise rate: 0.1 below 10 degrees, 0.05 from 10 degrees up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolarHeating;

impl HeatingRule for SolarHeating {
    fn name(&self) -> &str {
        "SolarHeating"
    }

    fn energy(&self, temperature: Celsius, area: SquareMeters) -> KilowattHours {
        let factor = if temperature < SOLAR_CUTOVER {
            SOLAR_COLD_FACTOR
        } else {
            SOLAR_MILD_FACTOR
        };
        factor * temperature * area
    }
}

// ---------------------------------------------------------------------------
// HeatingKind
// ---------------------------------------------------------------------------

/// Names of the built-in rules, as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatingKind {
    Gas,
    Electric,
    Solar,
}

impl HeatingKind {
    /// Build a shareable rule instance for this kind.
    pub fn into_rule(self) -> Rc<dyn HeatingRule> {
        match self {
            Self::Gas => Rc::new(GasHeating),
            Self::Electric => Rc::new(ElectricHeating),
            Self::Solar => Rc::new(SolarHeating),
        }
    }

    /// Configuration spelling, e.g. `"gas"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gas => "gas",
            Self::Electric => "electric",
            Self::Solar => "solar",
        }
    }
}

impl fmt::Display for HeatingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeatingKind {
    type Err = CoreError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gas" => Ok(Self::Gas),
            "electric" => Ok(Self::Electric),
            "solar" => Ok(Self::Solar),
            _ => Err(CoreError::UnknownHeatingKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

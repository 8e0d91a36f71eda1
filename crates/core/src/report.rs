//! Energy report emitted by the heating controller for each notification.

use std::fmt;

use chrono::Utc;
use serde::Serialize;

use crate::types::{Celsius, KilowattHours, SquareMeters, Timestamp};

/// Outcome of one heating activation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyReport {
    /// Identity of the rule that produced `energy_kwh`.
    pub rule: String,
    pub temperature: Celsius,
    pub area: SquareMeters,
    pub energy_kwh: KilowattHours,
    pub recorded_at: Timestamp,
}

impl EnergyReport {
    /// Create a report stamped with the current time.
    pub fn new(
        rule: impl Into<String>,
        temperature: Celsius,
        area: SquareMeters,
        energy_kwh: KilowattHours,
    ) -> Self {
        Self {
            rule: rule.into(),
            temperature,
            area,
            energy_kwh,
            recorded_at: Utc::now(),
        }
    }
}

/// Human-readable single line, e.g.
/// `Heating activated with GasHeating. Energy consumed: 170 kWh.`
impl fmt::Display for EnergyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Heating activated with {}. Energy consumed: {} kWh.",
            self.rule, self.energy_kwh
        )
    }
}

use heatwatch_core::error::CoreError;
use heatwatch_core::heating::HeatingKind;
use heatwatch_core::types::{Celsius, SquareMeters};

use crate::sink::ReportFormat;

/// Driver configuration loaded from environment variables.
///
/// All fields have defaults that reproduce the reference scenario
/// (threshold 18, area 50, gas then electric).
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    /// Readings strictly below this notify the controller.
    pub threshold: Celsius,
    /// Heated area passed to every rule.
    pub area: SquareMeters,
    /// Rule active when the controller starts.
    pub initial_rule: HeatingKind,
    /// Rule swapped in part-way through the scripted readings.
    pub switch_rule: HeatingKind,
    pub report_format: ReportFormat,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            threshold: 18.0,
            area: 50.0,
            initial_rule: HeatingKind::Gas,
            switch_rule: HeatingKind::Electric,
            report_format: ReportFormat::Text,
        }
    }
}

impl DriverConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                   | Default    |
    /// |---------------------------|------------|
    /// | `HEATWATCH_THRESHOLD`     | `18`       |
    /// | `HEATWATCH_AREA`          | `50`       |
    /// | `HEATWATCH_INITIAL_RULE`  | `gas`      |
    /// | `HEATWATCH_SWITCH_RULE`   | `electric` |
    /// | `HEATWATCH_REPORT_FORMAT` | `text`     |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let threshold = match lookup("HEATWATCH_THRESHOLD") {
            Some(raw) => parse_number("HEATWATCH_THRESHOLD", &raw)?,
            None => defaults.threshold,
        };

        let area = match lookup("HEATWATCH_AREA") {
            Some(raw) => parse_number("HEATWATCH_AREA", &raw)?,
            None => defaults.area,
        };

        let initial_rule = match lookup("HEATWATCH_INITIAL_RULE") {
            Some(raw) => raw.parse::<HeatingKind>()?,
            None => defaults.initial_rule,
        };

        let switch_rule = match lookup("HEATWATCH_SWITCH_RULE") {
            Some(raw) => raw.parse::<HeatingKind>()?,
            None => defaults.switch_rule,
        };

        let report_format = match lookup("HEATWATCH_REPORT_FORMAT") {
            Some(raw) => raw.parse::<ReportFormat>()?,
            None => defaults.report_format,
        };

        Ok(Self {
            threshold,
            area,
            initial_rule,
            switch_rule,
            report_format,
        })
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, CoreError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CoreError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

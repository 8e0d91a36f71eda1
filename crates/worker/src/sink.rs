//! Output channels for [`EnergyReport`]s.
//!
//! [`StdoutSink`] is what the binary uses; [`MemorySink`] keeps reports in
//! memory so callers (and tests) can inspect them afterwards.

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use heatwatch_core::error::CoreError;
use heatwatch_core::report::EnergyReport;
use serde::{Deserialize, Serialize};

/// Receives one report per heating activation.
pub trait ReportSink {
    fn emit(&self, report: &EnergyReport);
}

// ---------------------------------------------------------------------------
// ReportFormat
// ---------------------------------------------------------------------------

/// Line format used by [`StdoutSink`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `Heating activated with GasHeating. Energy consumed: 170 kWh.`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(CoreError::Validation(format!(
                "report format must be text or json, got {other:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// StdoutSink
// ---------------------------------------------------------------------------

/// Prints each report as a single line on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink {
    format: ReportFormat,
}

impl StdoutSink {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Render `report` the way [`emit`](ReportSink::emit) would print it.
    pub fn render(&self, report: &EnergyReport) -> Option<String> {
        match self.format {
            ReportFormat::Text => Some(report.to_string()),
            ReportFormat::Json => match serde_json::to_string(report) {
                Ok(line) => Some(line),
                Err(e) => {
                    tracing::error!(error = %e, rule = %report.rule, "Failed to serialize report");
                    None
                }
            },
        }
    }
}

impl ReportSink for StdoutSink {
    fn emit(&self, report: &EnergyReport) {
        if let Some(line) = self.render(report) {
            println!("{line}");
        }
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// Collects reports in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: RefCell<Vec<EnergyReport>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything emitted so far.
    pub fn reports(&self) -> Vec<EnergyReport> {
        self.reports.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.reports.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.borrow().is_empty()
    }
}

impl ReportSink for MemorySink {
    fn emit(&self, report: &EnergyReport) {
        self.reports.borrow_mut().push(report.clone());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn text_render_uses_display() {
        let report = EnergyReport::new("GasHeating", 15.0, 50.0, 150.0);
        let line = StdoutSink::new(ReportFormat::Text).render(&report);
        assert_eq!(
            line.as_deref(),
            Some("Heating activated with GasHeating. Energy consumed: 150 kWh.")
        );
    }

    #[test]
    fn json_render_is_single_line_object() {
        let report = EnergyReport::new("ElectricHeating", 16.0, 50.0, 120.0);
        let line = StdoutSink::new(ReportFormat::Json)
            .render(&report)
            .expect("json rendering should succeed");

        assert!(!line.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(parsed["rule"], "ElectricHeating");
        assert_eq!(parsed["energy_kwh"], 120.0);
    }

    #[test]
    fn memory_sink_keeps_emission_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.emit(&EnergyReport::new("GasHeating", 17.0, 50.0, 170.0));
        sink.emit(&EnergyReport::new("GasHeating", 15.0, 50.0, 150.0));

        let energies: Vec<_> = sink.reports().iter().map(|r| r.energy_kwh).collect();
        assert_eq!(energies, vec![170.0, 150.0]);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn report_format_parses_known_values() {
        assert_eq!("TEXT".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_matches!("yaml".parse::<ReportFormat>(), Err(CoreError::Validation(_)));
    }
}

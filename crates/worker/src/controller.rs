//! Heating controller that reacts to low-temperature notifications.
//!
//! [`HeatingSystem`] subscribes to a
//! [`TemperatureSensor`](heatwatch_events::TemperatureSensor) through the
//! [`TemperatureObserver`] trait. Each notification is turned into an
//! [`EnergyReport`] by the active [`HeatingRule`] and handed to a
//! [`ReportSink`]. The rule can be swapped at any time with
//! [`change_rule`](HeatingSystem::change_rule).

use std::cell::RefCell;
use std::rc::Rc;

use heatwatch_core::heating::HeatingRule;
use heatwatch_core::report::EnergyReport;
use heatwatch_core::types::{Celsius, SquareMeters};
use heatwatch_events::TemperatureObserver;

use crate::sink::{ReportSink, StdoutSink};

pub struct HeatingSystem {
    /// Always exactly one active rule.
    rule: RefCell<Rc<dyn HeatingRule>>,
    area: SquareMeters,
    sink: Rc<dyn ReportSink>,
}

impl HeatingSystem {
    /// Controller that prints text reports to stdout.
    pub fn new(rule: Rc<dyn HeatingRule>, area: SquareMeters) -> Self {
        Self::with_sink(rule, area, Rc::new(StdoutSink::default()))
    }

    pub fn with_sink(
        rule: Rc<dyn HeatingRule>,
        area: SquareMeters,
        sink: Rc<dyn ReportSink>,
    ) -> Self {
        Self {
            rule: RefCell::new(rule),
            area,
            sink,
        }
    }

    pub fn area(&self) -> SquareMeters {
        self.area
    }

    /// Handle to the currently active rule.
    pub fn rule(&self) -> Rc<dyn HeatingRule> {
        Rc::clone(&*self.rule.borrow())
    }

    /// Replace the active rule. Only later activations see the change.
    pub fn change_rule(&self, rule: Rc<dyn HeatingRule>) {
        tracing::info!(
            from = self.rule.borrow().name(),
            to = rule.name(),
            "Heating rule changed"
        );
        *self.rule.borrow_mut() = rule;
    }

    /// Compute and emit the energy report for `temperature`.
    ///
    /// The rule is captured before computing, so a sink that calls
    /// [`change_rule`](Self::change_rule) does not affect this report.
    pub fn activate(&self, temperature: Celsius) -> EnergyReport {
        let rule = self.rule();
        let energy = rule.energy(temperature, self.area);
        let report = EnergyReport::new(rule.name(), temperature, self.area, energy);

        tracing::info!(
            rule = rule.name(),
            temperature,
            area = self.area,
            energy_kwh = energy,
            "Heating activated"
        );

        self.sink.emit(&report);
        report
    }
}

impl TemperatureObserver for HeatingSystem {
    fn on_temperature(&self, temperature: Celsius) {
        self.activate(temperature);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

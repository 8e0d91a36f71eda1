//! Scripted demonstration run used by the `heatwatch` binary.
//!
//! Wires one sensor to one controller, feeds [`READINGS_BEFORE_SWITCH`],
//! swaps the rule, then feeds [`READINGS_AFTER_SWITCH`].

use std::rc::Rc;

use heatwatch_core::types::Celsius;
use heatwatch_events::TemperatureSensor;

use crate::config::DriverConfig;
use crate::controller::HeatingSystem;
use crate::sink::ReportSink;

/// Readings fed while the initial rule is active.
pub const READINGS_BEFORE_SWITCH: [Celsius; 3] = [20.0, 17.0, 15.0];

/// Readings fed after the rule swap.
pub const READINGS_AFTER_SWITCH: [Celsius; 1] = [16.0];

/// Run the scripted sequence and return how many notifications were
/// delivered.
pub fn run(config: &DriverConfig, sink: Rc<dyn ReportSink>) -> usize {
    let sensor = TemperatureSensor::new(config.threshold);
    let heating = Rc::new(HeatingSystem::with_sink(
        config.initial_rule.into_rule(),
        config.area,
        sink,
    ));
    sensor.attach(&heating);

    tracing::info!(
        threshold = config.threshold,
        area = config.area,
        rule = %config.initial_rule,
        "Heating controller attached to sensor"
    );

    let mut delivered = feed(&sensor, &READINGS_BEFORE_SWITCH);
    heating.change_rule(config.switch_rule.into_rule());
    delivered += feed(&sensor, &READINGS_AFTER_SWITCH);

    delivered
}

fn feed(sensor: &TemperatureSensor, readings: &[Celsius]) -> usize {
    readings
        .iter()
        .map(|&reading| sensor.update_temperature(reading))
        .sum()
}

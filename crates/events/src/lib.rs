//! Threshold-gated temperature notifications.
//!
//! - [`TemperatureSensor`] holds a threshold and a list of weakly-referenced
//!   subscribers; readings below the threshold fan out to every subscriber.
//! - [`TemperatureObserver`] is the capability a subscriber implements.

pub mod sensor;

pub use sensor::{TemperatureObserver, TemperatureSensor};

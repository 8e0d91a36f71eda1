//! `heatwatch` -- scripted temperature/heating demonstration.
//!
//! Builds one sensor and one heating controller, replays a fixed sequence
//! of readings with one rule swap in the middle, and prints an energy
//! report for every reading below the threshold.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default    | Description                          |
//! |---------------------------|----------|------------|--------------------------------------|
//! | `HEATWATCH_THRESHOLD`     | no       | `18`       | Readings below this trigger heating  |
//! | `HEATWATCH_AREA`          | no       | `50`       | Heated area                          |
//! | `HEATWATCH_INITIAL_RULE`  | no       | `gas`      | `gas`, `electric` or `solar`         |
//! | `HEATWATCH_SWITCH_RULE`   | no       | `electric` | Rule swapped in before the last reading |
//! | `HEATWATCH_REPORT_FORMAT` | no       | `text`     | `text` or `json`                     |

use std::rc::Rc;

use heatwatch_worker::config::DriverConfig;
use heatwatch_worker::scenario;
use heatwatch_worker::sink::StdoutSink;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heatwatch_worker=info,heatwatch_events=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = DriverConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        threshold = config.threshold,
        area = config.area,
        initial_rule = %config.initial_rule,
        switch_rule = %config.switch_rule,
        format = %config.report_format,
        "Starting heatwatch",
    );

    let sink = Rc::new(StdoutSink::new(config.report_format));
    let delivered = scenario::run(&config, sink);

    tracing::info!(delivered, "Scripted run complete");
}

//! `heatwatch-worker` library crate.
//!
//! Re-exports internal modules for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod config;
pub mod controller;
pub mod scenario;
pub mod sink;

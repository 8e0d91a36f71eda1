//! Domain types for the heatwatch temperature/heating chain.
//!
//! Everything in this crate is pure: no I/O, no logging, no global state.
//! The notifier lives in `heatwatch-events` and the heating controller in
//! `heatwatch-worker`; both depend on the types defined here.

pub mod error;
pub mod heating;
pub mod report;
pub mod types;

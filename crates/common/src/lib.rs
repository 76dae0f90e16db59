//! Common utilities and configuration shared across orabridge crates.
//!
//! - **Configuration**: Strongly typed settings for the dialect, driver and logging (`config`).
//! - **Telemetry**: `tracing` subscriber setup (`telemetry`).
pub mod config;
pub mod telemetry;

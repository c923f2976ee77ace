//! drivesafe: Driver-assistance telemetry monitor
//!
//! This library provides the application layer for drivesafe, including:
//! - Configuration management
//! - Session wiring of a telemetry source to the state store
//! - Console presentation of the latest state and alerts

pub mod config;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use config::AppConfig;
pub use core::Session;
pub use drivesafe_core::{StateStore, TelemetryView};

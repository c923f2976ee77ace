//! Source configuration types for the telemetry sources.

pub mod serial;
pub mod synthetic;

use serde::{Deserialize, Serialize};

pub use serial::SerialSourceConfig;
pub use synthetic::SyntheticSourceConfig;

/// Which telemetry source drives the state store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Synthetic generator, no hardware needed
    #[default]
    Demo,
    /// Microcontroller on a serial port
    Serial,
}

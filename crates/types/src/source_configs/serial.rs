//! Serial link source configuration types.

use serde::{Deserialize, Serialize};

fn default_baud_rate() -> u32 {
    9600
}

/// Serial link configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialSourceConfig {
    /// Device path (e.g. `/dev/ttyACM0`). `None` picks the first available port.
    #[serde(default)]
    pub port: Option<String>,
    /// Symbol rate the firmware transmits at
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

impl Default for SerialSourceConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: default_baud_rate(),
        }
    }
}

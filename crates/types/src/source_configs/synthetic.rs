//! Synthetic (demo) source configuration types.

use serde::{Deserialize, Serialize};

fn default_interval_ms() -> u64 {
    800
}

fn default_cruise_speed() -> u32 {
    180
}

fn default_ir_probability() -> f64 {
    0.10
}

fn default_tilt_probability() -> f64 {
    0.05
}

/// Synthetic generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSourceConfig {
    /// Sampling period in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Motor PWM reported while safe
    #[serde(default = "default_cruise_speed")]
    pub cruise_speed: u32,
    /// Chance per sample that the IR sensor reports an obstacle
    #[serde(default = "default_ir_probability")]
    pub ir_probability: f64,
    /// Chance per sample that the tilt switch is closed
    #[serde(default = "default_tilt_probability")]
    pub tilt_probability: f64,
}

impl Default for SyntheticSourceConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            cruise_speed: default_cruise_speed(),
            ir_probability: default_ir_probability(),
            tilt_probability: default_tilt_probability(),
        }
    }
}

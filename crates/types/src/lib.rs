//! drivesafe-types: Shared data types for the drivesafe telemetry monitor.
//!
//! This crate contains pure data types (snapshots, alerts, source configs)
//! shared across all drivesafe crates. It has no runtime or I/O
//! dependencies, making it suitable as a foundation layer.

pub mod alert;
pub mod snapshot;
pub mod source_configs;

// Re-export commonly used types at the crate root for convenience
pub use alert::AlertEntry;
pub use snapshot::{
    Indicators, SensorSnapshot, SensorStatus, ALCOHOL_ALERT_THRESHOLD, NO_OBJECT_DISTANCE,
    OBSTACLE_DISTANCE_CM,
};
pub use source_configs::{SerialSourceConfig, SourceMode, SyntheticSourceConfig};

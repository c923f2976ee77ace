//! drivesafe-core: Telemetry decoding, classification and state.
//!
//! This crate contains the frame decoder, the status classifier, the
//! bounded alert log, the shared state store and the traits sources and
//! ports implement.

pub mod alert_log;
pub mod classifier;
pub mod constants;
mod data_source;
pub mod decoder;
pub mod framing;
pub mod port;
mod state_store;

pub use alert_log::{alert_message, AlertLog};
pub use classifier::{
    derive_status, fail_safe_motor_speed, LocalPrecedence, StatusPolicy, UpstreamStatus,
};
pub use constants::{ALERT_LOG_CAPACITY, DEFAULT_BAUD_RATE, SUPPORTED_BAUD_RATES};
pub use data_source::{BoxedDataSource, DataSource, SourceError, SourceMetadata};
pub use decoder::{decode_frame, decode_frame_at, FrameFields};
pub use framing::LineFramer;
pub use port::{check_baud_rate, Port, PortError, PortProvider, PortStream};
pub use state_store::{StateStore, TelemetryView};

// Re-export types used in trait signatures for convenience
pub use drivesafe_types::{AlertEntry, SensorSnapshot, SensorStatus};

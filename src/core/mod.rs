//! Application wiring around the telemetry core

mod session;

pub use session::Session;

//! Presentation of telemetry state

pub mod console;

pub use console::{render, ConsolePresenter};

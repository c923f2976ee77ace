//! Shared constants for the telemetry pipeline

/// Maximum number of entries kept in the alert log
pub const ALERT_LOG_CAPACITY: usize = 50;

/// Symbol rate the firmware transmits at
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Rates a serial port may be opened at
pub const SUPPORTED_BAUD_RATES: &[u32] = &[
    300, 1200, 2400, 4800, 9600, 14400, 19200, 38400, 57600, 115200,
];

/// Read chunk size for the serial read loop
pub const READ_CHUNK_SIZE: usize = 256;

/// Unterminated bytes kept before a runaway fragment is discarded.
/// A full frame is well under 64 bytes.
pub const MAX_PENDING_BYTES: usize = 4096;

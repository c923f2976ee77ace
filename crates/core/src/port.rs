//! Port access contract for hardware-linked sources

use crate::constants::SUPPORTED_BAUD_RATES;
use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Readable byte stream of an open port. Dropping it closes the port.
pub type PortStream = Box<dyn AsyncRead + Send + Unpin>;

/// Errors raised while acquiring or opening a port
#[derive(Debug, Error)]
pub enum PortError {
    #[error("no serial port available")]
    NoPortAvailable,
    #[error("access to {0} was denied")]
    AccessDenied(String),
    #[error("unsupported baud rate {0}")]
    UnsupportedRate(u32),
    #[error("failed to open {port}: {reason}")]
    Open { port: String, reason: String },
    #[error("port I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A port the user has been granted access to, not yet open
#[async_trait]
pub trait Port: Send {
    /// Device name for logging
    fn name(&self) -> &str;

    /// Open the port at a fixed symbol rate
    async fn open(self: Box<Self>, baud_rate: u32) -> Result<PortStream, PortError>;
}

/// Grants access to a physical port
#[async_trait]
pub trait PortProvider: Send + Sync {
    async fn request_access(&self) -> Result<Box<dyn Port>, PortError>;
}

/// Reject rates outside [`SUPPORTED_BAUD_RATES`]
pub fn check_baud_rate(baud_rate: u32) -> Result<(), PortError> {
    if SUPPORTED_BAUD_RATES.contains(&baud_rate) {
        Ok(())
    } else {
        Err(PortError::UnsupportedRate(baud_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_baud_rate() {
        assert!(check_baud_rate(9600).is_ok());
        assert!(check_baud_rate(115200).is_ok());
        assert!(matches!(
            check_baud_rate(9601),
            Err(PortError::UnsupportedRate(9601))
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = PortError::Open {
            port: "/dev/ttyACM0".to_string(),
            reason: "Device or resource busy".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to open /dev/ttyACM0: Device or resource busy"
        );
    }
}

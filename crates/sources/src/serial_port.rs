//! System serial ports via tokio-serial

use async_trait::async_trait;
use drivesafe_core::{check_baud_rate, Port, PortError, PortProvider, PortStream};
use log::debug;
use tokio_serial::SerialPortBuilderExt;

/// Names of the serial ports present on this machine
pub fn list_ports() -> Result<Vec<String>, PortError> {
    let ports = tokio_serial::available_ports().map_err(|e| PortError::Open {
        port: "<enumerate>".to_string(),
        reason: e.to_string(),
    })?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

/// Grants access to a configured device, or the first one found
#[derive(Debug, Clone, Default)]
pub struct SystemPortProvider {
    path: Option<String>,
}

impl SystemPortProvider {
    pub fn new(path: Option<String>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl PortProvider for SystemPortProvider {
    async fn request_access(&self) -> Result<Box<dyn Port>, PortError> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => {
                let first = list_ports()?
                    .into_iter()
                    .next()
                    .ok_or(PortError::NoPortAvailable)?;
                debug!("No port configured, using {}", first);
                first
            }
        };
        Ok(Box::new(SystemPort { path }))
    }
}

/// A device path that has not been opened yet
struct SystemPort {
    path: String,
}

#[async_trait]
impl Port for SystemPort {
    fn name(&self) -> &str {
        &self.path
    }

    async fn open(self: Box<Self>, baud_rate: u32) -> Result<PortStream, PortError> {
        check_baud_rate(baud_rate)?;

        let stream = tokio_serial::new(&self.path, baud_rate)
            .open_native_async()
            .map_err(|e| open_error(&self.path, e))?;
        Ok(Box::new(stream))
    }
}

fn open_error(path: &str, error: tokio_serial::Error) -> PortError {
    match error.kind() {
        tokio_serial::ErrorKind::NoDevice => PortError::NoPortAvailable,
        tokio_serial::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
            PortError::AccessDenied(path.to_string())
        }
        _ => PortError::Open {
            port: path.to_string(),
            reason: error.to_string(),
        },
    }
}

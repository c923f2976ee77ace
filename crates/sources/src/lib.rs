//! drivesafe-sources: Telemetry source implementations for drivesafe.

mod serial;
mod serial_port;
mod synthetic;

pub use serial::{LinkState, ReadOutcome, SerialLink};
pub use serial_port::{list_ports, SystemPortProvider};
pub use synthetic::{SyntheticGenerator, SyntheticSource, SyntheticSourceConfig};

use drivesafe_core::{BoxedDataSource, StateStore};
use drivesafe_types::{SerialSourceConfig, SourceMode};
use std::sync::Arc;

/// Build the source selected by `mode`, publishing into `store`
pub fn create_source(
    mode: SourceMode,
    serial: &SerialSourceConfig,
    synthetic: &SyntheticSourceConfig,
    store: Arc<StateStore>,
) -> BoxedDataSource {
    match mode {
        SourceMode::Demo => Box::new(SyntheticSource::new(synthetic.clone(), store)),
        SourceMode::Serial => {
            let provider = Arc::new(SystemPortProvider::new(serial.port.clone()));
            Box::new(SerialLink::with_baud_rate(provider, store, serial.baud_rate))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_source_by_mode() {
        let store = Arc::new(StateStore::new());
        let serial = SerialSourceConfig::default();
        let synthetic = SyntheticSourceConfig::default();

        let demo = create_source(SourceMode::Demo, &serial, &synthetic, Arc::clone(&store));
        assert_eq!(demo.metadata().id, "synthetic");
        assert!(demo.metadata().description.contains("without hardware"));
        assert_eq!(
            demo.metadata().default_interval,
            Some(std::time::Duration::from_millis(800))
        );

        let link = create_source(SourceMode::Serial, &serial, &synthetic, store);
        assert_eq!(link.metadata().id, "serial");
        assert!(link.metadata().description.contains("serial link"));
        assert!(!link.is_active());
    }

    #[test]
    fn test_default_rate_matches_firmware() {
        assert_eq!(
            SerialSourceConfig::default().baud_rate,
            drivesafe_core::DEFAULT_BAUD_RATE
        );
    }
}

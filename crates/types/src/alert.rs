//! Alert log entries

use crate::snapshot::SensorStatus;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A logged occurrence of a non-safe status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEntry {
    /// Human-readable description of the alert
    pub message: String,
    /// Local wall-clock time of capture (`HH:MM:SS`)
    pub time: String,
    /// Status that raised the alert, never `Safe`
    #[serde(rename = "type")]
    pub kind: SensorStatus,
}

impl AlertEntry {
    pub fn new(message: impl Into<String>, kind: SensorStatus, at: DateTime<Local>) -> Self {
        Self {
            message: message.into(),
            time: at.format("%H:%M:%S").to_string(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_alert_time_format() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 7, 4, 9).unwrap();
        let entry = AlertEntry::new("TILT DETECTED", SensorStatus::Tilt, at);
        assert_eq!(entry.time, "07:04:09");
        assert_eq!(entry.kind, SensorStatus::Tilt);
    }

    #[test]
    fn test_alert_serialization_uses_type_key() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let entry = AlertEntry::new("LEFT OBSTACLE", SensorStatus::Ir, at);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"type\":\"ir\""));
    }
}

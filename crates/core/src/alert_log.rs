//! Bounded, newest-first alert history

use crate::constants::ALERT_LOG_CAPACITY;
use drivesafe_types::{AlertEntry, SensorSnapshot, SensorStatus};
use std::collections::VecDeque;

/// Message shown for an alert of the given status
pub fn alert_message(status: SensorStatus) -> &'static str {
    match status {
        SensorStatus::Alcohol => "ALCOHOL DETECTED",
        SensorStatus::Tilt => "TILT DETECTED",
        SensorStatus::Ir => "LEFT OBSTACLE",
        SensorStatus::Obstacle => "OBJECT TOO CLOSE",
        _ => "ALERT",
    }
}

/// Alert history, front is newest
///
/// Every non-safe snapshot is recorded, including repeats of the previous
/// status. Past the capacity the oldest entries are dropped.
#[derive(Debug, Clone)]
pub struct AlertLog {
    entries: VecDeque<AlertEntry>,
    capacity: usize,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::with_capacity(ALERT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an alert for `snapshot` if its status is not safe
    pub fn record_if_alert(&mut self, snapshot: &SensorSnapshot) -> Option<AlertEntry> {
        if !snapshot.status.is_alert() {
            return None;
        }

        let entry = AlertEntry::new(
            alert_message(snapshot.status),
            snapshot.status,
            snapshot.timestamp,
        );
        self.entries.push_front(entry.clone());
        self.entries.truncate(self.capacity);
        Some(entry)
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &AlertEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<AlertEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new()
    }
}

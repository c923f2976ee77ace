//! Latest-state store shared between sources and presentation
//!
//! Sources publish whole snapshots; readers take a consistent
//! [`TelemetryView`] of the latest snapshot, the alert history and the
//! connectivity flag.

use crate::alert_log::AlertLog;
use crate::decoder::decode_frame;
use arc_swap::ArcSwap;
use drivesafe_types::{AlertEntry, SensorSnapshot};
use log::{debug, trace};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Read-only copy of the store for presentation layers
#[derive(Debug, Clone)]
pub struct TelemetryView {
    pub connected: bool,
    pub snapshot: Arc<SensorSnapshot>,
    /// Newest first
    pub alerts: Vec<AlertEntry>,
    /// Snapshots accepted since the store was created
    pub updates: u64,
}

/// Latest snapshot, alert log and connectivity flag
pub struct StateStore {
    snapshot: ArcSwap<SensorSnapshot>,
    alerts: Mutex<AlertLog>,
    connected: AtomicBool,
    updates: AtomicU64,
}

impl StateStore {
    pub fn new() -> Self {
        Self::with_alert_log(AlertLog::new())
    }

    pub fn with_alert_log(alerts: AlertLog) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(SensorSnapshot::default()),
            alerts: Mutex::new(alerts),
            connected: AtomicBool::new(false),
            updates: AtomicU64::new(0),
        }
    }

    /// Use poisoned data rather than losing the alert history
    fn lock_alerts(&self) -> MutexGuard<'_, AlertLog> {
        self.alerts.lock().unwrap_or_else(|poisoned| {
            log::warn!("Alert log mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Replace the latest snapshot and record an alert if it is not safe
    pub fn publish(&self, snapshot: SensorSnapshot) -> Option<AlertEntry> {
        let mut alerts = self.lock_alerts();
        let alert = alerts.record_if_alert(&snapshot);
        self.snapshot.store(Arc::new(snapshot));
        self.updates.fetch_add(1, Ordering::Relaxed);
        drop(alerts);

        if let Some(ref entry) = alert {
            debug!("Alert recorded: {} at {}", entry.message, entry.time);
        }
        alert
    }

    /// Decode a frame and publish it. Blank lines are dropped.
    ///
    /// Returns whether a snapshot was published.
    pub fn ingest_line(&self, line: &str) -> bool {
        match decode_frame(line) {
            Some(snapshot) => {
                self.publish(snapshot);
                true
            }
            None => {
                trace!("Dropped blank frame: {:?}", line);
                false
            }
        }
    }

    pub fn snapshot(&self) -> Arc<SensorSnapshot> {
        self.snapshot.load_full()
    }

    /// Alert history, newest first
    pub fn alerts(&self) -> Vec<AlertEntry> {
        self.lock_alerts().to_vec()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    pub fn update_count(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }

    /// Consistent copy of everything a presentation layer needs
    pub fn view(&self) -> TelemetryView {
        let alerts = self.lock_alerts();
        TelemetryView {
            connected: self.is_connected(),
            snapshot: self.snapshot.load_full(),
            alerts: alerts.to_vec(),
            updates: self.update_count(),
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

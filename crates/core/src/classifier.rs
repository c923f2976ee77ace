//! Status classification
//!
//! Frames from the firmware already carry an authoritative `ST` token, so the
//! decoder path passes it through. Synthetic samples have no upstream author
//! and derive their status locally from the readings.

use drivesafe_types::{SensorSnapshot, SensorStatus, ALCOHOL_ALERT_THRESHOLD, OBSTACLE_DISTANCE_CM};

/// Decides the status of a snapshot
pub trait StatusPolicy {
    fn status(&self, snapshot: &SensorSnapshot) -> SensorStatus;
}

/// Trusts the status reported by the source
#[derive(Debug, Clone, Copy, Default)]
pub struct UpstreamStatus;

impl StatusPolicy for UpstreamStatus {
    fn status(&self, snapshot: &SensorSnapshot) -> SensorStatus {
        snapshot.status
    }
}

/// Derives the status from the readings with fixed precedence
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPrecedence;

impl StatusPolicy for LocalPrecedence {
    fn status(&self, snapshot: &SensorSnapshot) -> SensorStatus {
        derive_status(
            snapshot.alcohol,
            snapshot.distance,
            snapshot.ir_obstacle,
            snapshot.tilt,
        )
    }
}

/// Alcohol, then tilt, then IR, then distance; safe otherwise
pub fn derive_status(alcohol: u32, distance: u32, ir_obstacle: bool, tilt: bool) -> SensorStatus {
    if alcohol > ALCOHOL_ALERT_THRESHOLD {
        SensorStatus::Alcohol
    } else if tilt {
        SensorStatus::Tilt
    } else if ir_obstacle {
        SensorStatus::Ir
    } else if distance <= OBSTACLE_DISTANCE_CM {
        SensorStatus::Obstacle
    } else {
        SensorStatus::Safe
    }
}

/// Any non-safe status cuts propulsion
pub fn fail_safe_motor_speed(status: SensorStatus, cruise_speed: u32) -> u32 {
    if status.is_alert() {
        0
    } else {
        cruise_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(alcohol: u32, distance: u32, ir: bool, tilt: bool) -> SensorSnapshot {
        SensorSnapshot {
            alcohol,
            distance,
            ir_obstacle: ir,
            tilt,
            ..SensorSnapshot::default()
        }
    }

    #[test]
    fn test_precedence_order() {
        assert_eq!(derive_status(450, 10, true, true), SensorStatus::Alcohol);
        assert_eq!(derive_status(400, 10, true, true), SensorStatus::Tilt);
        assert_eq!(derive_status(0, 10, true, false), SensorStatus::Ir);
        assert_eq!(derive_status(0, 15, false, false), SensorStatus::Obstacle);
        assert_eq!(derive_status(0, 16, false, false), SensorStatus::Safe);
    }

    #[test]
    fn test_alcohol_beats_tilt() {
        let s = snapshot(450, 100, false, true);
        assert_eq!(LocalPrecedence.status(&s), SensorStatus::Alcohol);
    }

    #[test]
    fn test_upstream_status_is_not_rederived() {
        let mut s = snapshot(450, 5, true, true);
        s.status = SensorStatus::Safe;
        assert_eq!(UpstreamStatus.status(&s), SensorStatus::Safe);
        assert_eq!(LocalPrecedence.status(&s), SensorStatus::Alcohol);
    }

    #[test]
    fn test_fail_safe_motor_speed() {
        assert_eq!(fail_safe_motor_speed(SensorStatus::Safe, 180), 180);
        for status in SensorStatus::ALL.into_iter().filter(|s| s.is_alert()) {
            assert_eq!(fail_safe_motor_speed(status, 180), 0);
        }
    }
}

//! Sensor snapshot and status taxonomy

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance reported when no object is in range
pub const NO_OBJECT_DISTANCE: u32 = 999;

/// Alcohol readings strictly above this are unsafe
pub const ALCOHOL_ALERT_THRESHOLD: u32 = 400;

/// Objects at or closer than this distance (cm) are unsafe
pub const OBSTACLE_DISTANCE_CM: u32 = 15;

/// Discrete vehicle status, a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    #[default]
    Safe,
    Alcohol,
    Tilt,
    Ir,
    Obstacle,
}

impl SensorStatus {
    /// All statuses in classifier precedence order (after `Safe`)
    pub const ALL: [SensorStatus; 5] = [
        SensorStatus::Safe,
        SensorStatus::Alcohol,
        SensorStatus::Tilt,
        SensorStatus::Ir,
        SensorStatus::Obstacle,
    ];

    /// Parse a wire token. Matching is exact (case-sensitive).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "safe" => Some(Self::Safe),
            "alcohol" => Some(Self::Alcohol),
            "tilt" => Some(Self::Tilt),
            "ir" => Some(Self::Ir),
            "obstacle" => Some(Self::Obstacle),
            _ => None,
        }
    }

    /// Wire token for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Alcohol => "alcohol",
            Self::Tilt => "tilt",
            Self::Ir => "ir",
            Self::Obstacle => "obstacle",
        }
    }

    /// Short banner label shown by dashboards
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "ALL CLEAR",
            Self::Alcohol => "ALCOHOL!",
            Self::Tilt => "TILT!",
            Self::Ir => "IR OBSTACLE!",
            Self::Obstacle => "TOO CLOSE!",
        }
    }

    pub fn is_alert(&self) -> bool {
        *self != Self::Safe
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of the vehicle outputs implied by a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicators {
    pub red_led: bool,
    pub green_led: bool,
    pub buzzer: bool,
}

/// One complete reading of every sensor
///
/// Snapshots are never merged: each decode or sample replaces the previous
/// one entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// MQ-3 raw reading (nominally 0-1023)
    pub alcohol: u32,
    /// Ultrasonic distance in cm, [`NO_OBJECT_DISTANCE`] when nothing is in range
    pub distance: u32,
    /// Left IR sensor sees an obstacle
    pub ir_obstacle: bool,
    /// Tilt switch closed
    pub tilt: bool,
    /// Motor PWM duty (0-255)
    pub motor_speed: u32,
    pub status: SensorStatus,
    /// Time the snapshot was received, not reported by the source
    pub timestamp: DateTime<Local>,
}

impl SensorSnapshot {
    /// Default snapshot stamped with the given time
    pub fn idle_at(timestamp: DateTime<Local>) -> Self {
        Self {
            alcohol: 0,
            distance: NO_OBJECT_DISTANCE,
            ir_obstacle: false,
            tilt: false,
            motor_speed: 0,
            status: SensorStatus::Safe,
            timestamp,
        }
    }

    pub fn alcohol_alert(&self) -> bool {
        self.alcohol > ALCOHOL_ALERT_THRESHOLD
    }

    pub fn distance_alert(&self) -> bool {
        self.distance <= OBSTACLE_DISTANCE_CM
    }

    /// 100 when safe, 0 otherwise
    pub fn safety_score(&self) -> u8 {
        if self.status.is_alert() {
            0
        } else {
            100
        }
    }

    pub fn indicators(&self) -> Indicators {
        let alert = self.status.is_alert();
        Indicators {
            red_led: alert,
            green_led: !alert,
            buzzer: alert,
        }
    }

    /// True if every reading (ignoring the timestamp) matches `other`
    pub fn same_readings(&self, other: &SensorSnapshot) -> bool {
        self.alcohol == other.alcohol
            && self.distance == other.distance
            && self.ir_obstacle == other.ir_obstacle
            && self.tilt == other.tilt
            && self.motor_speed == other.motor_speed
            && self.status == other.status
    }
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self::idle_at(Local::now())
    }
}

/// Renders the snapshot as the firmware's wire frame (without newline)
///
/// IR is written active-low, so an obstacle is `IR:0`.
impl fmt::Display for SensorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A:{} D:{} IR:{} TILT:{} SPD:{} ST:{}",
            self.alcohol,
            self.distance,
            if self.ir_obstacle { 0 } else { 1 },
            if self.tilt { 1 } else { 0 },
            self.motor_speed,
            self.status
        )
    }
}

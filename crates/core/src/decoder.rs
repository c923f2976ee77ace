//! Frame decoder
//!
//! Turns one text frame from the firmware into a [`SensorSnapshot`]:
//!
//! ```text
//! A:350 D:45 IR:1 TILT:0 SPD:180 ST:safe
//! ```
//!
//! Tokens are space-separated `KEY:VALUE` pairs in any order. Each key falls
//! back to its own default when absent, and a bad token never aborts the
//! rest of the line.

use chrono::{DateTime, Local};
use drivesafe_types::{SensorSnapshot, SensorStatus, NO_OBJECT_DISTANCE};

/// Raw values of the known keys in one frame, last occurrence wins
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameFields<'a> {
    pub alcohol: Option<&'a str>,
    pub distance: Option<&'a str>,
    pub ir: Option<&'a str>,
    pub tilt: Option<&'a str>,
    pub speed: Option<&'a str>,
    pub status: Option<&'a str>,
}

impl<'a> FrameFields<'a> {
    /// Collect the known keys from a frame
    ///
    /// Tokens that are not exactly `KEY:VALUE`, have an empty side, or use an
    /// unknown key are skipped.
    pub fn scan(line: &'a str) -> Self {
        let mut fields = Self::default();

        for token in line.split(' ') {
            let mut parts = token.split(':');
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                continue;
            }

            let slot = match key {
                "A" => &mut fields.alcohol,
                "D" => &mut fields.distance,
                "IR" => &mut fields.ir,
                "TILT" => &mut fields.tilt,
                "SPD" => &mut fields.speed,
                "ST" => &mut fields.status,
                _ => continue,
            };
            *slot = Some(value);
        }

        fields
    }

    /// Build a snapshot, applying per-key defaults
    ///
    /// `D` defaults to [`NO_OBJECT_DISTANCE`] when missing but to 0 when
    /// present and unparseable, matching what deployed dashboards show.
    pub fn to_snapshot(&self, received_at: DateTime<Local>) -> SensorSnapshot {
        SensorSnapshot {
            alcohol: self.alcohol.map_or(0, parse_count_or_zero),
            distance: self
                .distance
                .map_or(NO_OBJECT_DISTANCE, parse_count_or_zero),
            // Active-low: the IR module pulls its output to 0 on detection
            ir_obstacle: self.ir == Some("0"),
            tilt: self.tilt == Some("1"),
            motor_speed: self.speed.map_or(0, parse_count_or_zero),
            status: self
                .status
                .and_then(SensorStatus::from_token)
                .unwrap_or(SensorStatus::Safe),
            timestamp: received_at,
        }
    }
}

/// Parse the leading decimal digits of a value (`"45cm"` is 45)
///
/// An optional `+` sign is accepted. Returns `None` when there is no leading
/// digit or the number does not fit.
pub fn parse_count(value: &str) -> Option<u32> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

fn parse_count_or_zero(value: &str) -> u32 {
    parse_count(value).unwrap_or(0)
}

/// Decode a frame received at `received_at`
///
/// Returns `None` only for a blank line. Any other line yields a snapshot,
/// with every key it lacks set to its default.
pub fn decode_frame_at(line: &str, received_at: DateTime<Local>) -> Option<SensorSnapshot> {
    if line.trim().is_empty() {
        return None;
    }
    Some(FrameFields::scan(line).to_snapshot(received_at))
}

/// Decode a frame stamped with the current time
pub fn decode_frame(line: &str) -> Option<SensorSnapshot> {
    decode_frame_at(line, Local::now())
}

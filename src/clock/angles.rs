//! Conversions between clock times and hand angles.
//!
//! Angles are degrees with 12 o'clock at 0 and increasing clockwise.

use super::ClockTime;
use crate::difficulty::Difficulty;

/// The hour hand always moves between whole-hour notches while dragged
pub const HOUR_HAND_SNAP: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
}

pub fn time_to_angles(time: ClockTime) -> HandAngles {
    // (h / 12) * 360 + (m / 60) * 30 and (m / 60) * 360, kept exact
    let h = (time.hours % 12) as f64;
    let m = time.minutes as f64;
    HandAngles {
        hour: h * 30.0 + m * 0.5,
        minute: m * 6.0,
    }
}

/// Inverse of [`time_to_angles`].
///
/// The hour is rounded from the hour angle alone, so a hand that sits past
/// the half hour reads as the following hour unless it was snapped first.
pub fn angles_to_time(hour_angle: f64, minute_angle: f64) -> ClockTime {
    let mut minutes = (minute_angle / 6.0).round() as i64 % 60;
    if minutes < 0 {
        minutes += 60;
    }

    let mut hours = (hour_angle / 30.0).round() as i64 % 12;
    if hours <= 0 {
        hours += 12;
    }

    ClockTime {
        hours: hours as u8,
        minutes: minutes as u8,
    }
}

/// Snap to the nearest multiple of `snap_degrees`, normalised into `[0, 360)`.
///
/// Crossing detection compares consecutive snapped angles and relies on a
/// full turn coming back as 0, never 360.
pub fn snap_angle(angle: f64, snap_degrees: f64) -> f64 {
    if snap_degrees <= 0.0 {
        return normalize(angle);
    }
    let snapped = (angle / snap_degrees).round() * snap_degrees;
    normalize(snapped)
}

fn normalize(angle: f64) -> f64 {
    let n = angle.rem_euclid(360.0);
    if n >= 360.0 {
        0.0
    } else {
        // folds -0.0 into 0.0
        n + 0.0
    }
}

/// Angle of a pointer around a centre, in screen coordinates (y grows down)
pub fn pointer_to_angle(cx: f64, cy: f64, px: f64, py: f64) -> f64 {
    let dx = px - cx;
    let dy = py - cy;
    let mut angle = dx.atan2(-dy).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    angle
}

/// Minute-hand snapping granularity for a difficulty
pub fn snap_degrees_for(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Hour => 30.0,
        Difficulty::Half => 15.0,
        Difficulty::Quarter => 90.0,
        Difficulty::FiveMin => 30.0,
        Difficulty::OneMin | Difficulty::Interval => 6.0,
    }
}

pub mod angles;
pub mod formatting;

pub use angles::{
    angles_to_time, pointer_to_angle, snap_angle, snap_degrees_for, time_to_angles, HandAngles,
    HOUR_HAND_SNAP,
};
pub use formatting::{pick_weighted_format, FormatMix, TimeFormat};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A time as read off an analog face: hours 1..=12, minutes 0..=59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    pub hours: u8,
    pub minutes: u8,
}

impl ClockTime {
    /// Builds a time, wrapping out-of-range input onto the dial
    /// (hour 0 is 12, minute 60 is 0).
    pub fn new(hours: u32, minutes: u32) -> Self {
        let h = (hours % 12) as u8;
        Self {
            hours: if h == 0 { 12 } else { h },
            minutes: (minutes % 60) as u8,
        }
    }

    pub fn next_hour(self) -> u8 {
        wrap_hour(self.hours as i32 + 1)
    }

    pub fn previous_hour(self) -> u8 {
        wrap_hour(self.hours as i32 - 1)
    }

    pub fn with_hours(self, hours: u8) -> Self {
        Self::new(hours as u32, self.minutes as u32)
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self {
            hours: 12,
            minutes: 0,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", formatting::format_digital(*self))
    }
}

/// Wrap any integer hour onto 1..=12
pub fn wrap_hour(h: i32) -> u8 {
    let w = h.rem_euclid(12) as u8;
    if w == 0 {
        12
    } else {
        w
    }
}

/// Wrap any integer minute onto 0..=59
pub fn wrap_minute(m: i32) -> u8 {
    m.rem_euclid(60) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
pub enum Meridiem {
    #[serde(rename = "AM")]
    #[strum(serialize = "AM")]
    Am,
    #[serde(rename = "PM")]
    #[strum(serialize = "PM")]
    Pm,
}

/// Set-the-clock answers allow two minutes of slack either way.
/// The difference is not circular: 12:59 does not match a 1:00 target.
pub const SET_TOLERANCE_MINUTES: u8 = 2;

pub fn is_set_correct(player: ClockTime, target: ClockTime) -> bool {
    player.hours == target.hours
        && player.minutes.abs_diff(target.minutes) <= SET_TOLERANCE_MINUTES
}

//! Drag-to-set state machine for the interactive clock.
//!
//! A gesture starts with [`DragSession::pointer_down`] on one hand, feeds
//! pointer positions through [`DragSession::pointer_move`] and ends with
//! [`DragSession::pointer_up`]. The minute hand carries the hour along when
//! it passes 12.

use crate::clock::{
    angles_to_time, pointer_to_angle, snap_angle, snap_degrees_for, time_to_angles, wrap_hour,
    ClockTime, HOUR_HAND_SNAP,
};
use crate::difficulty::Difficulty;
use crate::sound::Sound;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Hour,
    Minute,
}

/// `previous` is the last snapped angle seen for the hand being dragged
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingHour { previous: f64 },
    DraggingMinute { previous: f64 },
}

impl DragState {
    pub fn hand(&self) -> Option<Hand> {
        match self {
            DragState::Idle => None,
            DragState::DraggingHour { .. } => Some(Hand::Hour),
            DragState::DraggingMinute { .. } => Some(Hand::Minute),
        }
    }
}

/// Hour after the minute hand moved from `previous` to `current` (both snapped).
///
/// A jump of more than half a turn means the hand went through 12: backwards
/// in angle is clockwise past 12, forwards in angle is counter-clockwise.
pub fn crossing_adjustment(previous: f64, current: f64, hours: u8) -> u8 {
    let delta = current - previous;
    if delta < -180.0 {
        wrap_hour(hours as i32 + 1)
    } else if delta > 180.0 {
        wrap_hour(hours as i32 - 1)
    } else {
        hours
    }
}

#[derive(Debug, Clone)]
pub struct DragSession {
    time: ClockTime,
    minute_snap: f64,
    state: DragState,
}

impl DragSession {
    pub fn new(time: ClockTime, difficulty: Difficulty) -> Self {
        Self {
            time,
            minute_snap: snap_degrees_for(difficulty),
            state: DragState::Idle,
        }
    }

    pub fn time(&self) -> ClockTime {
        self.time
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state != DragState::Idle
    }

    /// Replace the displayed time, e.g. when the next question starts
    pub fn reset(&mut self, time: ClockTime) {
        self.time = time;
        self.state = DragState::Idle;
    }

    pub fn pointer_down(&mut self, hand: Hand) {
        let angles = time_to_angles(self.time);
        self.state = match hand {
            Hand::Hour => DragState::DraggingHour {
                previous: snap_angle(angles.hour, HOUR_HAND_SNAP),
            },
            Hand::Minute => DragState::DraggingMinute {
                previous: snap_angle(angles.minute, self.minute_snap),
            },
        };
    }

    /// Pointer at (`px`, `py`) around a clock centred on (`cx`, `cy`)
    pub fn pointer_move(&mut self, cx: f64, cy: f64, px: f64, py: f64) -> Option<Sound> {
        self.pointer_move_to(pointer_to_angle(cx, cy, px, py))
    }

    /// Feed a raw (unsnapped) pointer angle. Returns the notch sound to play,
    /// if the dragged hand landed on a different notch.
    pub fn pointer_move_to(&mut self, raw_angle: f64) -> Option<Sound> {
        let angles = time_to_angles(self.time);
        match self.state {
            DragState::Idle => None,
            DragState::DraggingMinute { previous } => {
                let angle = snap_angle(raw_angle, self.minute_snap);
                let minutes = angles_to_time(angles.hour, angle).minutes;
                let hours = crossing_adjustment(previous, angle, self.time.hours);
                self.time = ClockTime { hours, minutes };
                self.state = DragState::DraggingMinute { previous: angle };
                (angle != previous).then_some(Sound::Tick)
            }
            DragState::DraggingHour { previous } => {
                let angle = snap_angle(raw_angle, HOUR_HAND_SNAP);
                let hours = angles_to_time(angle, angles.minute).hours;
                self.time = self.time.with_hours(hours);
                self.state = DragState::DraggingHour { previous: angle };
                (angle != previous).then_some(Sound::Tock)
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }

    /// Keyboard stepping for terminals without mouse support: one notch of
    /// the given hand per call, with the same rollover as dragging.
    pub fn nudge(&mut self, hand: Hand, clockwise: bool) -> Sound {
        let angles = time_to_angles(self.time);
        let (start, step) = match hand {
            // from the hour itself; the hand drifts towards the next hour after :30
            Hand::Hour => ((self.time.hours % 12) as f64 * HOUR_HAND_SNAP, HOUR_HAND_SNAP),
            Hand::Minute => (snap_angle(angles.minute, self.minute_snap), self.minute_snap),
        };
        let target = if clockwise { start + step } else { start - step };

        let saved = self.state;
        self.pointer_down(hand);
        let sound = self.pointer_move_to(target);
        self.state = saved;
        sound.unwrap_or(match hand {
            Hand::Hour => Sound::Tock,
            Hand::Minute => Sound::Tick,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> ClockTime {
        ClockTime::new(h, m)
    }

    #[test]
    fn crossing_cases() {
        assert_eq!(crossing_adjustment(354.0, 0.0, 3), 4);
        assert_eq!(crossing_adjustment(6.0, 354.0, 5), 4);
        assert_eq!(crossing_adjustment(354.0, 0.0, 12), 1);
        assert_eq!(crossing_adjustment(6.0, 354.0, 1), 12);
        assert_eq!(crossing_adjustment(348.0, 6.0, 7), 8);
        assert_eq!(crossing_adjustment(90.0, 270.0, 7), 7);
        assert_eq!(crossing_adjustment(270.0, 90.0, 7), 7);
        assert_eq!(crossing_adjustment(0.0, 180.0, 7), 7);
    }

    #[test]
    fn minute_hand_past_twelve_advances_hour() {
        let mut drag = DragSession::new(t(3, 45), Difficulty::OneMin);
        drag.pointer_down(Hand::Minute);
        assert_eq!(drag.state(), DragState::DraggingMinute { previous: 270.0 });

        assert_eq!(drag.pointer_move_to(330.0), Some(Sound::Tick));
        assert_eq!(drag.time(), t(3, 55));
        assert_eq!(drag.pointer_move_to(0.0), Some(Sound::Tick));
        assert_eq!(drag.time(), t(4, 0));
        assert_eq!(drag.pointer_move_to(30.0), Some(Sound::Tick));
        assert_eq!(drag.time(), t(4, 5));

        drag.pointer_up();
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn minute_hand_back_past_twelve_rewinds_hour() {
        let mut drag = DragSession::new(t(1, 1), Difficulty::OneMin);
        drag.pointer_down(Hand::Minute);
        drag.pointer_move_to(0.0);
        assert_eq!(drag.time(), t(1, 0));
        drag.pointer_move_to(354.0);
        assert_eq!(drag.time(), t(12, 59));
    }

    #[test]
    fn raw_angles_near_twelve_snap_to_zero() {
        let mut drag = DragSession::new(t(3, 55), Difficulty::OneMin);
        drag.pointer_down(Hand::Minute);
        drag.pointer_move_to(354.0);
        // 358 snaps to 0, not 360, so the crossing is seen
        drag.pointer_move_to(358.0);
        assert_eq!(drag.time(), t(4, 0));
    }

    #[test]
    fn same_notch_is_quiet() {
        let mut drag = DragSession::new(t(6, 30), Difficulty::OneMin);
        drag.pointer_down(Hand::Minute);
        assert_eq!(drag.pointer_move_to(181.0), None);
        assert_eq!(drag.time(), t(6, 30));
        assert_eq!(drag.pointer_move_to(187.0), Some(Sound::Tick));
        assert_eq!(drag.time(), t(6, 31));
    }

    #[test]
    fn quarter_difficulty_snaps_to_quarters() {
        let mut drag = DragSession::new(t(2, 0), Difficulty::Quarter);
        drag.pointer_down(Hand::Minute);
        drag.pointer_move_to(100.0);
        assert_eq!(drag.time(), t(2, 15));
        drag.pointer_move_to(200.0);
        assert_eq!(drag.time(), t(2, 30));
    }

    #[test]
    fn hour_hand_keeps_minutes() {
        let mut drag = DragSession::new(t(3, 20), Difficulty::FiveMin);
        drag.pointer_down(Hand::Hour);
        assert_eq!(drag.pointer_move_to(182.0), Some(Sound::Tock));
        assert_eq!(drag.time(), t(6, 20));
        assert_eq!(drag.pointer_move_to(185.0), None);
        assert_eq!(drag.pointer_move_to(5.0), Some(Sound::Tock));
        assert_eq!(drag.time(), t(12, 20));
    }

    #[test]
    fn hour_hand_does_not_cross() {
        let mut drag = DragSession::new(t(11, 0), Difficulty::Hour);
        drag.pointer_down(Hand::Hour);
        drag.pointer_move_to(0.0);
        assert_eq!(drag.time(), t(12, 0));
        drag.pointer_move_to(30.0);
        assert_eq!(drag.time(), t(1, 0));
    }

    #[test]
    fn moves_after_release_are_ignored() {
        let mut drag = DragSession::new(t(3, 0), Difficulty::FiveMin);
        drag.pointer_down(Hand::Minute);
        drag.pointer_move_to(90.0);
        assert_eq!(drag.time(), t(3, 15));

        drag.pointer_up();
        assert_eq!(drag.pointer_move_to(330.0), None);
        assert_eq!(drag.pointer_move_to(10.0), None);
        assert_eq!(drag.time(), t(3, 15));
    }

    #[test]
    fn idle_moves_are_ignored() {
        let mut drag = DragSession::new(t(9, 15), Difficulty::OneMin);
        assert_eq!(drag.pointer_move_to(200.0), None);
        assert_eq!(drag.time(), t(9, 15));
    }

    #[test]
    fn pointer_coordinates() {
        let mut drag = DragSession::new(t(12, 0), Difficulty::FiveMin);
        drag.pointer_down(Hand::Minute);
        // straight right of centre in screen space is 3 o'clock
        assert_eq!(drag.pointer_move(100.0, 100.0, 180.0, 100.0), Some(Sound::Tick));
        assert_eq!(drag.time(), t(12, 15));
    }

    #[test]
    fn nudging_steps_one_notch() {
        let mut drag = DragSession::new(t(12, 55), Difficulty::FiveMin);
        assert_eq!(drag.nudge(Hand::Minute, true), Sound::Tick);
        assert_eq!(drag.time(), t(1, 0));
        drag.nudge(Hand::Minute, false);
        assert_eq!(drag.time(), t(12, 55));
        assert_eq!(drag.nudge(Hand::Hour, true), Sound::Tock);
        assert_eq!(drag.time(), t(1, 55));
        assert!(!drag.is_dragging());
    }
}

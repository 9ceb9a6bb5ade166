//! Analog clock face on a ratatui canvas.
//!
//! The canvas is a logical square from -100 to 100 on both axes with the
//! centre at the origin and y pointing up. Everything here that maps terminal
//! cells onto that square is pure so mouse handling can be tested headless.

use crate::clock::{time_to_angles, ClockTime};
use crate::drag::Hand;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Widget,
    },
};

pub const FACE_RADIUS: f64 = 95.0;
pub const HOUR_HAND_LENGTH: f64 = 45.0;
pub const MINUTE_HAND_LENGTH: f64 = 65.0;
const NUMBER_RADIUS: f64 = 75.0;
/// How far from a hand (in logical units) a click still grabs it
pub const HAND_GRAB_DISTANCE: f64 = 18.0;

/// Largest area inside `area` that shows the face as a circle, assuming
/// terminal cells twice as tall as they are wide
pub fn square_area(area: Rect) -> Rect {
    let height = area.height.min(area.width / 2);
    let width = height * 2;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Logical canvas point at the centre of terminal cell (`column`, `row`),
/// or `None` if the cell is outside `area`
pub fn cell_to_point(area: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
        return None;
    }
    let fx = ((column - area.x) as f64 + 0.5) / area.width as f64;
    let fy = ((row - area.y) as f64 + 0.5) / area.height as f64;
    Some((fx * 200.0 - 100.0, 100.0 - fy * 200.0))
}

/// Tip of a hand at `angle` degrees (clockwise from 12)
pub fn hand_tip(angle: f64, length: f64) -> (f64, f64) {
    let rad = angle.to_radians();
    (length * rad.sin(), length * rad.cos())
}

fn distance_to_segment(point: (f64, f64), tip: (f64, f64)) -> f64 {
    let (px, py) = point;
    let (tx, ty) = tip;
    let len_sq = tx * tx + ty * ty;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        ((px * tx + py * ty) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (tx * t, ty * t);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Which hand a click at `point` grabs. The closer hand wins; ties go to
/// the minute hand since it sits on top.
pub fn hit_hand(time: ClockTime, point: (f64, f64)) -> Option<Hand> {
    let angles = time_to_angles(time);
    let to_minute = distance_to_segment(point, hand_tip(angles.minute, MINUTE_HAND_LENGTH));
    let to_hour = distance_to_segment(point, hand_tip(angles.hour, HOUR_HAND_LENGTH));

    match (to_minute <= HAND_GRAB_DISTANCE, to_hour <= HAND_GRAB_DISTANCE) {
        (true, true) if to_hour < to_minute => Some(Hand::Hour),
        (true, _) => Some(Hand::Minute),
        (false, true) => Some(Hand::Hour),
        (false, false) => None,
    }
}

pub struct ClockFace {
    pub time: ClockTime,
    /// Hand currently being dragged, drawn highlighted
    pub active: Option<Hand>,
}

impl ClockFace {
    pub fn new(time: ClockTime) -> Self {
        Self { time, active: None }
    }

    pub fn active(mut self, hand: Option<Hand>) -> Self {
        self.active = hand;
        self
    }

    fn hand_color(&self, hand: Hand, idle: Color) -> Color {
        if self.active == Some(hand) {
            Color::LightBlue
        } else {
            idle
        }
    }
}

impl Widget for ClockFace {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let angles = time_to_angles(self.time);
        let minute_tip = hand_tip(angles.minute, MINUTE_HAND_LENGTH);
        let hour_tip = hand_tip(angles.hour, HOUR_HAND_LENGTH);
        let minute_color = self.hand_color(Hand::Minute, Color::Yellow);
        let hour_color = self.hand_color(Hand::Hour, Color::White);

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-100.0, 100.0])
            .y_bounds([-100.0, 100.0])
            .paint(|ctx| {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: FACE_RADIUS,
                    color: Color::DarkGray,
                });
                for minute in (0..60).step_by(5) {
                    let (x1, y1) = hand_tip(minute as f64 * 6.0, 85.0);
                    let (x2, y2) = hand_tip(minute as f64 * 6.0, 92.0);
                    ctx.draw(&CanvasLine::new(x1, y1, x2, y2, Color::Gray));
                }
                ctx.draw(&CanvasLine::new(0.0, 0.0, minute_tip.0, minute_tip.1, minute_color));
                ctx.draw(&CanvasLine::new(0.0, 0.0, hour_tip.0, hour_tip.1, hour_color));
                ctx.layer();

                for number in 1..=12u8 {
                    let (x, y) = hand_tip(number as f64 * 30.0, NUMBER_RADIUS);
                    // nudge left so two-digit labels stay centred
                    let x = if number >= 10 { x - 4.0 } else { x - 2.0 };
                    ctx.print(
                        x,
                        y,
                        Span::styled(
                            number.to_string(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    );
                }
            })
            .render(square_area(area), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn square_area_keeps_aspect() {
        let sq = square_area(Rect::new(0, 0, 100, 20));
        assert_eq!(sq, Rect::new(30, 0, 40, 20));
        let tall = square_area(Rect::new(0, 0, 40, 50));
        assert_eq!(tall, Rect::new(0, 15, 40, 20));
    }

    #[test]
    fn cells_map_onto_the_logical_square() {
        let area = Rect::new(10, 5, 40, 20);
        let top_left = cell_to_point(area, 10, 5).unwrap();
        assert!(close(top_left, (-97.5, 95.0)));
        let centre = cell_to_point(area, 30, 15).unwrap();
        assert!(close(centre, (2.5, -5.0)));
        assert_eq!(cell_to_point(area, 9, 5), None);
        assert_eq!(cell_to_point(area, 50, 5), None);
        assert_eq!(cell_to_point(area, 10, 25), None);
    }

    #[test]
    fn hand_tips() {
        assert!(close(hand_tip(0.0, 65.0), (0.0, 65.0)));
        let (x, y) = hand_tip(90.0, 45.0);
        assert!((x - 45.0).abs() < 1e-9 && y.abs() < 1e-9);
    }

    #[test]
    fn clicks_grab_the_nearest_hand() {
        // 3:00: hour hand points right, minute hand points up
        let time = ClockTime::new(3, 0);
        assert_eq!(hit_hand(time, (0.0, 60.0)), Some(Hand::Minute));
        assert_eq!(hit_hand(time, (40.0, 2.0)), Some(Hand::Hour));
        assert_eq!(hit_hand(time, (-60.0, -60.0)), None);
        // past the hour hand's tip but still near it
        assert_eq!(hit_hand(time, (55.0, 0.0)), Some(Hand::Hour));
        assert_eq!(hit_hand(time, (80.0, 0.0)), None);
    }

    #[test]
    fn overlapping_hands_prefer_minute() {
        let time = ClockTime::new(12, 0);
        assert_eq!(hit_hand(time, (0.0, 30.0)), Some(Hand::Minute));
    }

    #[test]
    fn renders_without_panicking() {
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        ClockFace::new(ClockTime::new(10, 10))
            .active(Some(Hand::Minute))
            .render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("12"));
    }
}

use crate::clock::ClockTime;
use crate::difficulty::Difficulty;
use crate::random::RandomSource;

/// Resampling budget before falling back to a deterministic neighbour
pub const MAX_EXCLUSION_ATTEMPTS: usize = 20;

fn draw_time<R: RandomSource + ?Sized>(difficulty: Difficulty, rng: &mut R) -> ClockTime {
    let hours = rng.below(12) as u32 + 1;
    let minutes = difficulty.sample_minutes(rng) as u32;
    ClockTime::new(hours, minutes)
}

/// Random time in the difficulty's domain, optionally different from `excluding`.
///
/// After [`MAX_EXCLUSION_ATTEMPTS`] collisions the hour following `excluding`
/// is used with the same minutes, so this never loops forever.
pub fn generate_time<R: RandomSource + ?Sized>(
    difficulty: Difficulty,
    excluding: Option<ClockTime>,
    rng: &mut R,
) -> ClockTime {
    let Some(excluded) = excluding else {
        return draw_time(difficulty, rng);
    };

    for _ in 0..MAX_EXCLUSION_ATTEMPTS {
        let candidate = draw_time(difficulty, rng);
        if candidate != excluded {
            return candidate;
        }
    }

    log::debug!("time resampling exhausted for {difficulty} around {excluded}, shifting hour");
    excluded.with_hours(excluded.next_hour())
}

/// Starting position for a set-the-clock question; never equal to `target`
pub fn generate_start_time<R: RandomSource + ?Sized>(
    difficulty: Difficulty,
    target: ClockTime,
    rng: &mut R,
) -> ClockTime {
    generate_time(difficulty, Some(target), rng)
}

/// A nudge describing where one of the two hands sits
pub fn generate_hint<R: RandomSource + ?Sized>(time: ClockTime, rng: &mut R) -> String {
    if rng.coin() {
        hour_hand_hint(time)
    } else {
        minute_hand_hint(time)
    }
}

fn hour_hand_hint(time: ClockTime) -> String {
    match time.minutes {
        0 => format!("The short hour hand points to {}.", time.hours),
        m if m <= 30 => format!("The short hour hand is just past {}.", time.hours),
        _ => format!("The short hour hand is almost at {}.", time.next_hour()),
    }
}

fn minute_hand_hint(time: ClockTime) -> String {
    let marker = |n: u8| if n % 12 == 0 { 12 } else { n % 12 };
    match time.minutes {
        0 => "The long minute hand points straight up to 12.".to_string(),
        m if m % 5 == 0 => format!("The long minute hand points to {}.", marker(m / 5)),
        m => {
            let nearest = (m as f64 / 5.0).round() as u8;
            format!("The long minute hand is near {}.", marker(nearest))
        }
    }
}

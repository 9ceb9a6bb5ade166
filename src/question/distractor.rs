use crate::clock::{wrap_hour, wrap_minute, ClockTime, Meridiem, TimeFormat};
use crate::difficulty::Difficulty;
use crate::random::{shuffle, RandomSource};

/// Upper bound on random distractor draws for one choice set
const MAX_DISTRACTOR_DRAWS: usize = 200;

/// A way of producing a plausible wrong answer from the right one
pub trait DistractorStrategy {
    fn distract(
        &self,
        correct: ClockTime,
        difficulty: Difficulty,
        rng: &mut dyn RandomSource,
    ) -> ClockTime;
}

/// Off by one hour, minutes untouched
pub struct WrongHour;

impl DistractorStrategy for WrongHour {
    fn distract(
        &self,
        correct: ClockTime,
        _difficulty: Difficulty,
        rng: &mut dyn RandomSource,
    ) -> ClockTime {
        ClockTime {
            hours: wrap_hour(correct.hours as i32 + rng.sign()),
            minutes: correct.minutes,
        }
    }
}

/// Reads the minute hand as the hour and the hour hand as the minutes
pub struct SwappedHands;

impl DistractorStrategy for SwappedHands {
    fn distract(
        &self,
        correct: ClockTime,
        _difficulty: Difficulty,
        _rng: &mut dyn RandomSource,
    ) -> ClockTime {
        let hour = (correct.minutes as f64 / 5.0).round() as u8;
        let hours = if hour == 0 { 12 } else { hour.clamp(1, 12) };
        ClockTime {
            hours,
            minutes: (correct.hours * 5) % 60,
        }
    }
}

/// Minutes nudged by a difficulty-sized step
pub struct NearbyMinutes;

impl DistractorStrategy for NearbyMinutes {
    fn distract(
        &self,
        correct: ClockTime,
        difficulty: Difficulty,
        rng: &mut dyn RandomSource,
    ) -> ClockTime {
        ClockTime {
            hours: correct.hours,
            minutes: wrap_minute(correct.minutes as i32 + difficulty.nearby_offset(rng)),
        }
    }
}

const STRATEGIES: [&(dyn DistractorStrategy + Sync); 3] = [&WrongHour, &SwappedHands, &NearbyMinutes];

/// Multiple-choice options: the formatted correct answer plus `count - 1`
/// unique distractors, in uniformly random order.
///
/// Draws that format to a string already collected (including the correct
/// answer) are thrown away. If the random strategies cannot fill the set within
/// the draw budget, the remaining slots step the minutes forward from the
/// correct time.
pub fn generate_choices(
    correct: ClockTime,
    difficulty: Difficulty,
    count: usize,
    format: TimeFormat,
    meridiem: Meridiem,
    rng: &mut dyn RandomSource,
) -> Vec<String> {
    let render = |t: ClockTime| format.render(t, meridiem);
    let mut choices = vec![render(correct)];

    let mut draws = 0;
    while choices.len() < count && draws < MAX_DISTRACTOR_DRAWS {
        draws += 1;
        let strategy = STRATEGIES[rng.below(STRATEGIES.len())];
        let candidate = render(strategy.distract(correct, difficulty, rng));
        if !choices.contains(&candidate) {
            choices.push(candidate);
        }
    }

    if choices.len() < count {
        log::debug!("distractor draws exhausted for {correct}, filling by minute steps");
        let mut step = 1;
        while choices.len() < count && step < 12 * 60 {
            let total = correct.hours as i32 * 60 + correct.minutes as i32 + step;
            let candidate = render(ClockTime {
                hours: wrap_hour(total / 60),
                minutes: wrap_minute(total),
            });
            if !choices.contains(&candidate) {
                choices.push(candidate);
            }
            step += 1;
        }
    }

    shuffle(rng, &mut choices);
    choices
}

pub mod distractor;
pub mod generator;

pub use distractor::{generate_choices, DistractorStrategy, NearbyMinutes, SwappedHands, WrongHour};
pub use generator::{generate_hint, generate_start_time, generate_time};

use crate::clock::{ClockTime, Meridiem, TimeFormat};
use crate::difficulty::Difficulty;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

/// Number of options shown for a read-the-clock question
pub const CHOICE_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestionMode {
    /// Show a clock face, pick the matching text
    Read,
    /// Show the text, drag the hands to match
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadQuestion {
    pub time: ClockTime,
    pub format: TimeFormat,
    pub meridiem: Meridiem,
    pub correct_answer: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetQuestion {
    pub target: ClockTime,
    pub format: TimeFormat,
    pub meridiem: Meridiem,
    pub display: String,
    /// Where the hands start; never equal to `target`
    pub start: ClockTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Question {
    Read(ReadQuestion),
    Set(SetQuestion),
}

impl Question {
    pub fn read(
        time: ClockTime,
        difficulty: Difficulty,
        format: TimeFormat,
        meridiem: Meridiem,
        rng: &mut dyn RandomSource,
    ) -> Self {
        Question::Read(ReadQuestion {
            time,
            format,
            meridiem,
            correct_answer: format.render(time, meridiem),
            choices: generate_choices(time, difficulty, CHOICE_COUNT, format, meridiem, rng),
        })
    }

    pub fn set(
        target: ClockTime,
        difficulty: Difficulty,
        format: TimeFormat,
        meridiem: Meridiem,
        rng: &mut dyn RandomSource,
    ) -> Self {
        Question::Set(SetQuestion {
            target,
            format,
            meridiem,
            display: format.render(target, meridiem),
            start: generate_start_time(difficulty, target, rng),
        })
    }

    pub fn build(
        mode: QuestionMode,
        time: ClockTime,
        difficulty: Difficulty,
        format: TimeFormat,
        meridiem: Meridiem,
        rng: &mut dyn RandomSource,
    ) -> Self {
        match mode {
            QuestionMode::Read => Self::read(time, difficulty, format, meridiem, rng),
            QuestionMode::Set => Self::set(time, difficulty, format, meridiem, rng),
        }
    }

    pub fn mode(&self) -> QuestionMode {
        match self {
            Question::Read(_) => QuestionMode::Read,
            Question::Set(_) => QuestionMode::Set,
        }
    }

    /// The time being asked about
    pub fn time(&self) -> ClockTime {
        match self {
            Question::Read(q) => q.time,
            Question::Set(q) => q.target,
        }
    }

    /// The correct answer rendered in the question's format
    pub fn answer_text(&self) -> &str {
        match self {
            Question::Read(q) => &q.correct_answer,
            Question::Set(q) => &q.display,
        }
    }
}

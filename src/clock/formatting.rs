use super::{ClockTime, Meridiem};
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ways a time can be written out for the player
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimeFormat {
    /// "3:05"
    Digital,
    /// "3:05 PM"
    #[serde(rename = "digital_ampm")]
    #[strum(serialize = "digital_ampm")]
    DigitalAmPm,
    /// "5 past 3"
    WordsPastTo,
    /// "five past three"
    FullWords,
}

/// Relative weight per format; weights need not sum to 1
pub type FormatMix = BTreeMap<TimeFormat, f64>;

impl TimeFormat {
    /// Render a time. `meridiem` only shows up in [`TimeFormat::DigitalAmPm`],
    /// but callers pass the same value for every rendering of one question so
    /// the prompt and its choices agree.
    pub fn render(self, time: ClockTime, meridiem: Meridiem) -> String {
        match self {
            TimeFormat::Digital => format_digital(time),
            TimeFormat::DigitalAmPm => format_digital_ampm(time, meridiem),
            TimeFormat::WordsPastTo => format_past_to(time),
            TimeFormat::FullWords => format_full_words(time),
        }
    }
}

const NUMBER_WORDS: [&str; 31] = [
    "",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
    "twenty",
    "twenty-one",
    "twenty-two",
    "twenty-three",
    "twenty-four",
    "twenty-five",
    "twenty-six",
    "twenty-seven",
    "twenty-eight",
    "twenty-nine",
    "thirty",
];

/// English word for 1..=30, digits otherwise
fn number_word(n: u8) -> String {
    match NUMBER_WORDS.get(n as usize) {
        Some(w) if !w.is_empty() => (*w).to_string(),
        _ => n.to_string(),
    }
}

pub fn format_digital(time: ClockTime) -> String {
    format!("{}:{:02}", time.hours, time.minutes)
}

pub fn format_digital_ampm(time: ClockTime, meridiem: Meridiem) -> String {
    format!("{} {}", format_digital(time), meridiem)
}

pub fn format_past_to(time: ClockTime) -> String {
    past_to(time, |n| n.to_string())
}

pub fn format_full_words(time: ClockTime) -> String {
    past_to(time, number_word)
}

fn past_to(time: ClockTime, word: impl Fn(u8) -> String) -> String {
    let h = word(time.hours);
    let next = word(time.next_hour());
    match time.minutes {
        0 => format!("{h} o'clock"),
        15 => format!("quarter past {h}"),
        30 => format!("half past {h}"),
        45 => format!("quarter to {next}"),
        m if m < 30 => format!("{} past {h}", word(m)),
        m => format!("{} to {next}", word(60 - m)),
    }
}

/// Weighted draw of a format plus an independent AM/PM coin flip.
///
/// Non-positive weights never win. An empty or all-zero mix yields `Digital`.
pub fn pick_weighted_format<R: RandomSource + ?Sized>(
    weights: &FormatMix,
    rng: &mut R,
) -> (TimeFormat, Meridiem) {
    let total: f64 = weights.values().filter(|w| **w > 0.0).sum();

    let format = if total > 0.0 {
        let mut r = rng.next_f64() * total;
        let mut picked = None;
        for (format, weight) in weights.iter().filter(|(_, w)| **w > 0.0) {
            if r < *weight {
                picked = Some(*format);
                break;
            }
            r -= weight;
        }
        // float residue can run off the end; the last positive entry owns it
        picked.or_else(|| {
            weights
                .iter()
                .filter(|(_, w)| **w > 0.0)
                .map(|(f, _)| *f)
                .last()
        })
    } else {
        None
    };

    let meridiem = if rng.coin() { Meridiem::Am } else { Meridiem::Pm };
    (format.unwrap_or(TimeFormat::Digital), meridiem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn t(h: u32, m: u32) -> ClockTime {
        ClockTime::new(h, m)
    }

    #[test]
    fn digital() {
        assert_eq!(format_digital(t(6, 30)), "6:30");
        assert_eq!(format_digital(t(12, 5)), "12:05");
        assert_eq!(format_digital_ampm(t(9, 0), Meridiem::Pm), "9:00 PM");
    }

    #[test]
    fn past_to_phrases() {
        assert_eq!(format_past_to(t(5, 0)), "5 o'clock");
        assert_eq!(format_past_to(t(3, 15)), "quarter past 3");
        assert_eq!(format_past_to(t(6, 30)), "half past 6");
        assert_eq!(format_past_to(t(1, 45)), "quarter to 2");
        assert_eq!(format_past_to(t(12, 45)), "quarter to 1");
        assert_eq!(format_past_to(t(3, 10)), "10 past 3");
        assert_eq!(format_past_to(t(7, 40)), "20 to 8");
        assert_eq!(format_past_to(t(12, 59)), "1 to 1");
    }

    #[test]
    fn full_word_phrases() {
        assert_eq!(format_full_words(t(6, 30)), "half past six");
        assert_eq!(format_full_words(t(5, 0)), "five o'clock");
        assert_eq!(format_full_words(t(7, 40)), "twenty to eight");
        assert_eq!(format_full_words(t(11, 45)), "quarter to twelve");
        assert_eq!(format_full_words(t(12, 23)), "twenty-three past twelve");
        assert_eq!(format_full_words(t(2, 31)), "twenty-nine to three");
    }

    #[test]
    fn number_words_fall_back_to_digits() {
        assert_eq!(number_word(30), "thirty");
        assert_eq!(number_word(31), "31");
        assert_eq!(number_word(0), "0");
    }

    #[test]
    fn render_dispatches() {
        let time = t(6, 30);
        assert_eq!(TimeFormat::Digital.render(time, Meridiem::Am), "6:30");
        assert_eq!(TimeFormat::DigitalAmPm.render(time, Meridiem::Am), "6:30 AM");
        assert_eq!(TimeFormat::WordsPastTo.render(time, Meridiem::Am), "half past 6");
        assert_eq!(TimeFormat::FullWords.render(time, Meridiem::Am), "half past six");
    }

    #[test]
    fn weighted_pick_follows_cumulative_weights() {
        let mix: FormatMix = [(TimeFormat::Digital, 0.7), (TimeFormat::DigitalAmPm, 0.3)]
            .into_iter()
            .collect();
        let mut low = ScriptedRandom::new(vec![0.5, 0.2]);
        assert_eq!(pick_weighted_format(&mix, &mut low), (TimeFormat::Digital, Meridiem::Am));
        let mut high = ScriptedRandom::new(vec![0.8, 0.7]);
        assert_eq!(
            pick_weighted_format(&mix, &mut high),
            (TimeFormat::DigitalAmPm, Meridiem::Pm)
        );
    }

    #[test]
    fn weights_need_not_be_normalised() {
        let mix: FormatMix = [(TimeFormat::WordsPastTo, 3.0), (TimeFormat::FullWords, 1.0)]
            .into_iter()
            .collect();
        let mut rng = ScriptedRandom::new(vec![0.76, 0.0]);
        assert_eq!(pick_weighted_format(&mix, &mut rng).0, TimeFormat::FullWords);
    }

    #[test]
    fn zero_weights_never_win() {
        let mix: FormatMix = [(TimeFormat::Digital, 0.0), (TimeFormat::FullWords, 1.0)]
            .into_iter()
            .collect();
        let mut rng = ScriptedRandom::new(vec![0.0, 0.0]);
        assert_eq!(pick_weighted_format(&mix, &mut rng).0, TimeFormat::FullWords);
    }

    #[test]
    fn empty_mix_defaults_to_digital() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let (format, _) = pick_weighted_format(&FormatMix::new(), &mut rng);
            assert_eq!(format, TimeFormat::Digital);
        }
        let zeros: FormatMix = [(TimeFormat::FullWords, 0.0)].into_iter().collect();
        assert_eq!(pick_weighted_format(&zeros, &mut rng).0, TimeFormat::Digital);
    }

    #[test]
    fn format_names() {
        assert_eq!(
            serde_json::to_string(&TimeFormat::DigitalAmPm).unwrap(),
            "\"digital_ampm\""
        );
        assert_eq!(TimeFormat::WordsPastTo.to_string(), "words_past_to");
    }
}

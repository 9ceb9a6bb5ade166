use crate::random::RandomSource;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How fine-grained the minutes of a generated time may be.
///
/// Variant order matters: it is the tie-break order for mixes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Difficulty {
    Hour,
    Half,
    Quarter,
    FiveMin,
    OneMin,
    /// Any minute, like `OneMin`; elapsed-time scoring happens server side
    Interval,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Hour,
        Difficulty::Half,
        Difficulty::Quarter,
        Difficulty::FiveMin,
        Difficulty::OneMin,
        Difficulty::Interval,
    ];

    /// Draw a minute value from this difficulty's domain
    pub fn sample_minutes<R: RandomSource + ?Sized>(self, rng: &mut R) -> u8 {
        match self {
            Difficulty::Hour => 0,
            Difficulty::Half => {
                if rng.coin() {
                    0
                } else {
                    30
                }
            }
            Difficulty::Quarter => [0, 15, 30, 45][rng.below(4)],
            Difficulty::FiveMin => rng.below(12) as u8 * 5,
            Difficulty::OneMin | Difficulty::Interval => rng.below(60) as u8,
        }
    }

    /// Signed minute offset for a "close but wrong" distractor
    pub fn nearby_offset<R: RandomSource + ?Sized>(self, rng: &mut R) -> i32 {
        let sign = rng.sign();
        match self {
            Difficulty::Hour => sign * 30,
            Difficulty::Half | Difficulty::Quarter => sign * 15,
            Difficulty::FiveMin => sign * 5,
            // interval uses one_min's 1..=5 offsets, not a fixed 5
            Difficulty::OneMin | Difficulty::Interval => sign * (rng.below(5) as i32 + 1),
        }
    }

    /// Map a trial difficulty name onto a question difficulty.
    /// `mixed` trials draw from the full minute range.
    pub fn from_trial(name: &str) -> Difficulty {
        match name {
            "hour" => Difficulty::Hour,
            "half" => Difficulty::Half,
            "quarter" => Difficulty::Quarter,
            "five_min" => Difficulty::FiveMin,
            "one_min" => Difficulty::OneMin,
            "interval" => Difficulty::Interval,
            "mixed" => Difficulty::OneMin,
            other => {
                log::warn!("unknown trial difficulty {other:?}, using one_min");
                Difficulty::OneMin
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    #[test]
    fn minute_domains() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            assert_eq!(Difficulty::Hour.sample_minutes(&mut rng), 0);
            assert!([0, 30].contains(&Difficulty::Half.sample_minutes(&mut rng)));
            assert!([0, 15, 30, 45].contains(&Difficulty::Quarter.sample_minutes(&mut rng)));
            let m = Difficulty::FiveMin.sample_minutes(&mut rng);
            assert!(m % 5 == 0 && m <= 55);
            assert!(Difficulty::OneMin.sample_minutes(&mut rng) < 60);
            assert!(Difficulty::Interval.sample_minutes(&mut rng) < 60);
        }
    }

    #[test]
    fn nearby_offsets_scale_with_difficulty() {
        let mut up = ScriptedRandom::constant(0.1);
        assert_eq!(Difficulty::Hour.nearby_offset(&mut up), 30);
        assert_eq!(Difficulty::Quarter.nearby_offset(&mut up), 15);
        assert_eq!(Difficulty::FiveMin.nearby_offset(&mut up), 5);
        assert_eq!(Difficulty::OneMin.nearby_offset(&mut up), 1);

        let mut down = ScriptedRandom::new(vec![0.9, 0.99]);
        assert_eq!(Difficulty::OneMin.nearby_offset(&mut down), -5);

        let mut interval = ScriptedRandom::new(vec![0.1, 0.7]);
        assert_eq!(Difficulty::Interval.nearby_offset(&mut interval), 4);
    }

    #[test]
    fn trial_names() {
        assert_eq!(Difficulty::from_trial("mixed"), Difficulty::OneMin);
        assert_eq!(Difficulty::from_trial("quarter"), Difficulty::Quarter);
        assert_eq!(Difficulty::from_trial("bogus"), Difficulty::OneMin);
    }

    #[test]
    fn names_are_snake_case() {
        assert_eq!(Difficulty::FiveMin.to_string(), "five_min");
        assert_eq!(
            serde_json::to_string(&Difficulty::OneMin).unwrap(),
            "\"one_min\""
        );
    }
}

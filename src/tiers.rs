//! Tier table: per-tier question mixes, trial gates and set-the-clock hint
//! rules. The table is plain data handed to whoever needs it; a JSON file can
//! replace the built-in one.

use crate::clock::{FormatMix, TimeFormat};
use crate::difficulty::Difficulty;
use crate::quest::DifficultyMix;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Gate a player must pass to unlock a tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Difficulty name; `mixed` is allowed here on top of the question difficulties
    pub difficulty: String,
    pub questions: usize,
    pub min_correct: usize,
    pub max_hints: usize,
    pub speed_gate: bool,
}

impl TrialConfig {
    pub fn question_difficulty(&self) -> Difficulty {
        Difficulty::from_trial(&self.difficulty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDefinition {
    pub index: usize,
    pub name: String,
    pub min_power: u32,
    pub max_power: u32,
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub trial: Option<TrialConfig>,
    pub quest_run_mix: DifficultyMix,
    pub time_format_mix: FormatMix,
    /// Percent through the tier from which set-the-clock hints cost points
    #[serde(default = "default_hint_threshold")]
    pub set_clock_advanced_hint_progress_threshold: u8,
    #[serde(default = "default_hint_penalty")]
    pub set_clock_advanced_hint_penalty: u32,
}

fn default_hint_threshold() -> u8 {
    50
}

fn default_hint_penalty() -> u32 {
    2
}

impl TierDefinition {
    /// Whether set-the-clock hints are in advanced mode at this progress
    pub fn advanced_set_hints(&self, progress_pct: u8) -> bool {
        progress_pct >= self.set_clock_advanced_hint_progress_threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    pub tiers: Vec<TierDefinition>,
}

impl TierConfig {
    /// Read a tier table from JSON. Anything unusable falls back to the
    /// built-in table.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("cannot read tier file {}: {e}, using built-in tiers", path.display());
                return Self::default();
            }
        };
        match serde_json::from_slice::<TierConfig>(&bytes) {
            Ok(cfg) if !cfg.tiers.is_empty() => cfg,
            Ok(_) => {
                log::warn!("tier file {} has no tiers, using built-in tiers", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("malformed tier file {}: {e}, using built-in tiers", path.display());
                Self::default()
            }
        }
    }

    /// Rows in use: this table, or the built-in one when this table is empty
    fn rows(&self) -> &[TierDefinition] {
        static BUILT_IN: OnceLock<TierConfig> = OnceLock::new();
        if self.tiers.is_empty() {
            &BUILT_IN.get_or_init(TierConfig::default).tiers
        } else {
            &self.tiers
        }
    }

    pub fn max_tier(&self) -> usize {
        self.rows().len().saturating_sub(1)
    }

    /// Tier by index, clamped into the table
    pub fn tier(&self, index: usize) -> &TierDefinition {
        &self.rows()[index.min(self.max_tier())]
    }

    /// Skills earned up to and including `tier`
    pub fn mastered_skills(&self, tier: usize) -> Vec<&str> {
        self.rows()
            .iter()
            .filter(|t| t.index <= tier)
            .filter_map(|t| t.skill.as_deref())
            .collect()
    }
}

struct TierRow {
    name: &'static str,
    skill: Option<&'static str>,
    trial: Option<(&'static str, usize, usize, usize, bool)>,
    mix: &'static [(Difficulty, f64)],
    formats: &'static [(TimeFormat, f64)],
    hint_threshold: u8,
    hint_penalty: u32,
}

use Difficulty::*;
use TimeFormat::*;

const DEFAULT_TIERS: [TierRow; 11] = [
    TierRow {
        name: "Wood",
        skill: None,
        trial: None,
        mix: &[(Hour, 1.0)],
        formats: &[(Digital, 0.7), (DigitalAmPm, 0.3)],
        hint_threshold: 100,
        hint_penalty: 0,
    },
    TierRow {
        name: "Stone",
        skill: Some("Reads hours on the clock"),
        trial: Some(("hour", 10, 9, 3, false)),
        mix: &[(Hour, 0.3), (Half, 0.7)],
        formats: &[(Digital, 0.4), (DigitalAmPm, 0.3), (WordsPastTo, 0.3)],
        hint_threshold: 50,
        hint_penalty: 1,
    },
    TierRow {
        name: "Coal",
        skill: Some("Reads half past / half to"),
        trial: Some(("half", 10, 9, 3, false)),
        mix: &[(Half, 0.2), (Quarter, 0.8)],
        formats: &[(Digital, 0.3), (DigitalAmPm, 0.2), (WordsPastTo, 0.5)],
        hint_threshold: 50,
        hint_penalty: 2,
    },
    TierRow {
        name: "Iron",
        skill: Some("Reads quarter past / quarter to"),
        trial: Some(("quarter", 12, 10, 2, false)),
        mix: &[(Quarter, 0.5), (FiveMin, 0.5)],
        formats: &[(Digital, 0.1), (DigitalAmPm, 0.2), (WordsPastTo, 0.7)],
        hint_threshold: 50,
        hint_penalty: 2,
    },
    TierRow {
        name: "Gold",
        skill: Some("Reads 5-minute intervals"),
        trial: Some(("five_min", 12, 10, 2, false)),
        mix: &[(Quarter, 0.2), (FiveMin, 0.8)],
        formats: &[(Digital, 0.2), (DigitalAmPm, 0.2), (WordsPastTo, 0.6)],
        hint_threshold: 50,
        hint_penalty: 2,
    },
    TierRow {
        name: "Redstone",
        skill: Some("Reads 5-minute intervals quickly"),
        trial: Some(("five_min", 15, 13, 1, true)),
        mix: &[(FiveMin, 0.5), (OneMin, 0.5)],
        formats: &[(Digital, 0.2), (WordsPastTo, 0.5), (FullWords, 0.3)],
        hint_threshold: 0,
        hint_penalty: 2,
    },
    TierRow {
        name: "Lapis",
        skill: Some("Reads any minute precisely"),
        trial: Some(("one_min", 15, 13, 1, true)),
        mix: &[(FiveMin, 0.2), (OneMin, 0.8)],
        formats: &[(Digital, 0.1), (WordsPastTo, 0.4), (FullWords, 0.5)],
        hint_threshold: 50,
        hint_penalty: 2,
    },
    TierRow {
        name: "Diamond",
        skill: Some("Masters mixed clock reading"),
        trial: Some(("mixed", 18, 16, 1, true)),
        mix: &[(FiveMin, 0.1), (OneMin, 0.9)],
        formats: &[(WordsPastTo, 0.3), (FullWords, 0.7)],
        hint_threshold: 0,
        hint_penalty: 2,
    },
    TierRow {
        name: "Netherite",
        skill: Some("Calculates time intervals"),
        trial: Some(("interval", 15, 13, 0, true)),
        mix: &[(OneMin, 0.7), (Interval, 0.3)],
        formats: &[(WordsPastTo, 0.2), (FullWords, 0.8)],
        hint_threshold: 50,
        hint_penalty: 2,
    },
    TierRow {
        name: "Beacon",
        skill: Some("Advanced time reasoning"),
        trial: Some(("mixed", 20, 18, 0, true)),
        mix: &[(OneMin, 0.5), (Interval, 0.5)],
        formats: &[(DigitalAmPm, 0.1), (FullWords, 0.9)],
        hint_threshold: 50,
        hint_penalty: 2,
    },
    TierRow {
        name: "Clock Master",
        skill: Some("Clock Master: full mastery!"),
        trial: Some(("mixed", 25, 23, 0, true)),
        mix: &[(OneMin, 0.3), (Interval, 0.7)],
        formats: &[(FullWords, 1.0)],
        hint_threshold: 50,
        hint_penalty: 2,
    },
];

impl Default for TierConfig {
    fn default() -> Self {
        let tiers = DEFAULT_TIERS
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let min_power = index as u32 * 100;
                TierDefinition {
                    index,
                    name: row.name.to_string(),
                    min_power,
                    max_power: if index == DEFAULT_TIERS.len() - 1 {
                        min_power
                    } else {
                        min_power + 99
                    },
                    skill: row.skill.map(str::to_string),
                    trial: row.trial.map(
                        |(difficulty, questions, min_correct, max_hints, speed_gate)| TrialConfig {
                            difficulty: difficulty.to_string(),
                            questions,
                            min_correct,
                            max_hints,
                            speed_gate,
                        },
                    ),
                    quest_run_mix: row.mix.iter().copied().collect(),
                    time_format_mix: row.formats.iter().copied().collect(),
                    set_clock_advanced_hint_progress_threshold: row.hint_threshold,
                    set_clock_advanced_hint_penalty: row.hint_penalty,
                }
            })
            .collect();
        Self { tiers }
    }
}

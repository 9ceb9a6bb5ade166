use crate::clock::{pick_weighted_format, ClockTime, FormatMix, Meridiem, TimeFormat};
use crate::difficulty::Difficulty;
use crate::question::{generate_time, Question, QuestionMode};
use crate::random::{shuffle, RandomSource};
use crate::tiers::TierDefinition;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Proportion per difficulty in a quest run
pub type DifficultyMix = BTreeMap<Difficulty, f64>;

/// Split `total` questions across the mix by largest remainder.
///
/// Weights are normalised by their sum, floors are taken, and the leftover
/// slots go to the largest fractional remainders (enumeration order breaks
/// ties). Non-positive weights never receive a slot. A mix with nothing
/// positive in it puts every question on `Hour`.
pub fn allocate_counts(mix: &DifficultyMix, total: usize) -> Vec<(Difficulty, usize)> {
    let positive: Vec<(Difficulty, f64)> = mix
        .iter()
        .filter(|(_, w)| w.is_finite() && **w > 0.0)
        .map(|(d, w)| (*d, *w))
        .collect();
    let weight_sum: f64 = positive.iter().map(|(_, w)| w).sum();

    if positive.is_empty() || weight_sum <= 0.0 {
        return if total > 0 {
            vec![(Difficulty::Hour, total)]
        } else {
            Vec::new()
        };
    }

    let mut slots: Vec<(Difficulty, usize, f64)> = positive
        .iter()
        .map(|(d, w)| {
            let raw = w / weight_sum * total as f64;
            let floored = raw.floor();
            (*d, floored as usize, raw - floored)
        })
        .collect();

    let mut allocated: usize = slots.iter().map(|(_, c, _)| c).sum();
    // float noise can push a floor one over
    while allocated > total {
        if let Some(slot) = slots.iter_mut().filter(|(_, c, _)| *c > 0).min_by(|a, b| {
            a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal)
        }) {
            slot.1 -= 1;
            allocated -= 1;
        }
    }

    // stable: equal remainders keep enumeration order
    let by_remainder = (0..slots.len())
        .sorted_by(|a, b| {
            slots[*b]
                .2
                .partial_cmp(&slots[*a].2)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .collect_vec();
    for idx in by_remainder.iter().cycle() {
        if allocated >= total {
            break;
        }
        slots[*idx].1 += 1;
        allocated += 1;
    }

    slots
        .into_iter()
        .filter(|(_, count, _)| *count > 0)
        .map(|(d, count, _)| (d, count))
        .collect()
}

/// The difficulty with the strictly greatest weight; earlier variants win ties
pub fn primary_difficulty(mix: &DifficultyMix) -> Difficulty {
    let mut best = Difficulty::Hour;
    let mut best_weight = 0.0;
    for (difficulty, weight) in mix {
        if *weight > best_weight {
            best_weight = *weight;
            best = *difficulty;
        }
    }
    best
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedQuestion {
    pub difficulty: Difficulty,
    #[serde(flatten)]
    pub question: Question,
}

/// Ordered questions for one run.
///
/// No two neighbours share the same time, and plans of two or more questions
/// built by [`build_question_plan`] mix both modes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionPlan {
    questions: Vec<PlannedQuestion>,
}

impl QuestionPlan {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&PlannedQuestion> {
        self.questions.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlannedQuestion> {
        self.questions.iter()
    }

    pub fn count_mode(&self, mode: QuestionMode) -> usize {
        self.questions
            .iter()
            .filter(|q| q.question.mode() == mode)
            .count()
    }
}

impl<'a> IntoIterator for &'a QuestionPlan {
    type Item = &'a PlannedQuestion;
    type IntoIter = std::slice::Iter<'a, PlannedQuestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// Everything about a slot except the mode-specific fields, which are only
/// generated once the time is final
struct Slot {
    difficulty: Difficulty,
    mode: QuestionMode,
    time: ClockTime,
    format: TimeFormat,
    meridiem: Meridiem,
}

impl Slot {
    fn into_question(self, rng: &mut dyn RandomSource) -> PlannedQuestion {
        PlannedQuestion {
            difficulty: self.difficulty,
            question: Question::build(
                self.mode,
                self.time,
                self.difficulty,
                self.format,
                self.meridiem,
                rng,
            ),
        }
    }
}

/// Re-draw any slot whose time matches the slot before it
fn separate_neighbours(slots: &mut [Slot], rng: &mut dyn RandomSource) {
    for i in 1..slots.len() {
        let previous = slots[i - 1].time;
        if slots[i].time == previous {
            slots[i].time = generate_time(slots[i].difficulty, Some(previous), rng);
        }
    }
}

/// Mixed read/set plan for a quest run
pub fn build_question_plan(
    mix: &DifficultyMix,
    total: usize,
    formats: &FormatMix,
    rng: &mut dyn RandomSource,
) -> QuestionPlan {
    let mut slots = Vec::with_capacity(total);
    for (difficulty, count) in allocate_counts(mix, total) {
        for _ in 0..count {
            let mode = if rng.coin() {
                QuestionMode::Read
            } else {
                QuestionMode::Set
            };
            let time = generate_time(difficulty, None, rng);
            let (format, meridiem) = pick_weighted_format(formats, rng);
            slots.push(Slot {
                difficulty,
                mode,
                time,
                format,
                meridiem,
            });
        }
    }

    if total >= 2 && !slots.is_empty() {
        if !slots.iter().any(|s| s.mode == QuestionMode::Read) {
            slots[0].mode = QuestionMode::Read;
        }
        if !slots.iter().any(|s| s.mode == QuestionMode::Set) {
            let last = slots.len() - 1;
            slots[last].mode = QuestionMode::Set;
        }
    }

    shuffle(rng, &mut slots);
    separate_neighbours(&mut slots, rng);

    QuestionPlan {
        questions: slots.into_iter().map(|s| s.into_question(rng)).collect(),
    }
}

/// Plan where every question has the same difficulty and mode, as used by
/// the single-mode practice screens and by trials
pub fn build_single_mode_plan(
    difficulty: Difficulty,
    mode: QuestionMode,
    total: usize,
    formats: &FormatMix,
    rng: &mut dyn RandomSource,
) -> QuestionPlan {
    let mut slots: Vec<Slot> = (0..total)
        .map(|_| {
            let time = generate_time(difficulty, None, rng);
            let (format, meridiem) = pick_weighted_format(formats, rng);
            Slot {
                difficulty,
                mode,
                time,
                format,
                meridiem,
            }
        })
        .collect();
    separate_neighbours(&mut slots, rng);

    QuestionPlan {
        questions: slots.into_iter().map(|s| s.into_question(rng)).collect(),
    }
}

/// Builds plans from one tier's configuration
#[derive(Debug, Clone)]
pub struct QuestPlanner {
    mix: DifficultyMix,
    formats: FormatMix,
}

impl QuestPlanner {
    pub fn new(mix: DifficultyMix, formats: FormatMix) -> Self {
        Self { mix, formats }
    }

    pub fn for_tier(tier: &TierDefinition) -> Self {
        Self::new(tier.quest_run_mix.clone(), tier.time_format_mix.clone())
    }

    pub fn build(&self, total: usize, rng: &mut dyn RandomSource) -> QuestionPlan {
        build_question_plan(&self.mix, total, &self.formats, rng)
    }

    pub fn primary_difficulty(&self) -> Difficulty {
        primary_difficulty(&self.mix)
    }

    pub fn formats(&self) -> &FormatMix {
        &self.formats
    }
}

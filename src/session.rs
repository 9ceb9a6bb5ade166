//! Run state for the game modes and the summaries they report.

use crate::clock::{is_set_correct, ClockTime, Meridiem, TimeFormat};
use crate::difficulty::Difficulty;
use crate::quest::{PlannedQuestion, QuestionPlan};
use crate::question::{generate_hint, generate_time, Question};
use crate::random::RandomSource;
use crate::sound::{Sound, SoundSink};
use crate::util::{elapsed_ms, mean_ms};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameMode {
    /// Pick the written time matching the clock
    Read,
    /// Drag the hands to the written time
    Set,
    /// As many read questions as possible in a minute
    Speedrun,
    /// Mixed read/set run built from the tier's mix
    Quest,
    /// Read-only gate for the next tier
    Trial,
}

/// What a finished run reports to the scoring service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub questions: usize,
    pub correct: usize,
    pub hints_used: usize,
    pub max_streak: usize,
    pub avg_response_ms: Option<u64>,
    pub speedrun_score: Option<usize>,
}

/// Trial result as handed to the trial service, which decides pass/fail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSubmission {
    pub tier: usize,
    pub questions: usize,
    pub correct: usize,
    pub hints_used: usize,
    pub time_ms: u64,
}

/// How hints behave in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HintPolicy {
    /// Set questions reveal the target text and cost points
    pub advanced_set_hints: bool,
    pub penalty: u32,
    /// Upper bound on hints for the whole run (trials)
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub correct: bool,
    /// Answer text the player gave
    pub given: String,
}

/// Correct/incorrect bookkeeping shared by every mode
#[derive(Debug, Clone, Default)]
struct Tally {
    correct: usize,
    streak: usize,
    max_streak: usize,
    response_ms: Vec<u64>,
}

impl Tally {
    fn record(&mut self, correct: bool, response_ms: u64, sound: &mut dyn SoundSink) {
        self.response_ms.push(response_ms);
        if correct {
            self.correct += 1;
            self.streak += 1;
            self.max_streak = self.max_streak.max(self.streak);
            sound.play(Sound::Correct);
        } else {
            self.streak = 0;
            sound.play(Sound::Incorrect);
        }
    }

    fn avg_response_ms(&self) -> Option<u64> {
        mean_ms(&self.response_ms)
    }
}

/// A fixed list of questions answered one after another: read, set, quest
/// and trial runs.
#[derive(Debug, Clone)]
pub struct PracticeRun {
    mode: GameMode,
    difficulty: Difficulty,
    plan: QuestionPlan,
    index: usize,
    outcome: Option<Outcome>,
    tally: Tally,
    hints: HintPolicy,
    hints_used: usize,
    hint_penalty: u32,
    hint: Option<String>,
    started: Instant,
    question_started: Instant,
    finished: bool,
}

impl PracticeRun {
    pub fn new(
        mode: GameMode,
        difficulty: Difficulty,
        plan: QuestionPlan,
        hints: HintPolicy,
        now: Instant,
    ) -> Self {
        let finished = plan.is_empty();
        Self {
            mode,
            difficulty,
            plan,
            index: 0,
            outcome: None,
            tally: Tally::default(),
            hints,
            hints_used: 0,
            hint_penalty: 0,
            hint: None,
            started: now,
            question_started: now,
            finished,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn current(&self) -> Option<&PlannedQuestion> {
        if self.finished {
            None
        } else {
            self.plan.get(self.index)
        }
    }

    /// Zero-based position of the current question
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.plan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn correct(&self) -> usize {
        self.tally.correct
    }

    /// Correct answers minus hint penalties, never below zero
    pub fn effective_correct(&self) -> usize {
        self.tally.correct.saturating_sub(self.hint_penalty as usize)
    }

    pub fn hints_used(&self) -> usize {
        self.hints_used
    }

    pub fn hints_left(&self) -> Option<usize> {
        self.hints.limit.map(|l| l.saturating_sub(self.hints_used))
    }

    pub fn streak(&self) -> usize {
        self.tally.streak
    }

    pub fn max_streak(&self) -> usize {
        self.tally.max_streak
    }

    pub fn avg_response_ms(&self) -> Option<u64> {
        self.tally.avg_response_ms()
    }

    fn record(&mut self, correct: bool, given: String, now: Instant, sound: &mut dyn SoundSink) {
        self.tally
            .record(correct, elapsed_ms(self.question_started, now), sound);
        self.outcome = Some(Outcome { correct, given });
    }

    /// Answer the current read question with option `choice`.
    /// `None` when there is nothing to answer.
    pub fn answer_choice(
        &mut self,
        choice: usize,
        now: Instant,
        sound: &mut dyn SoundSink,
    ) -> Option<bool> {
        if self.outcome.is_some() {
            return None;
        }
        let Question::Read(q) = &self.current()?.question else {
            return None;
        };
        let given = q.choices.get(choice)?.clone();
        let correct = given == q.correct_answer;
        self.record(correct, given, now, sound);
        Some(correct)
    }

    /// Check the hands of the current set question
    pub fn submit_set(
        &mut self,
        player: ClockTime,
        now: Instant,
        sound: &mut dyn SoundSink,
    ) -> Option<bool> {
        if self.outcome.is_some() {
            return None;
        }
        let Question::Set(q) = &self.current()?.question else {
            return None;
        };
        let correct = is_set_correct(player, q.target);
        self.record(correct, player.to_string(), now, sound);
        Some(correct)
    }

    /// Show a hint for the current question. Refused while one is already
    /// showing, after answering, or when the run's hint budget is spent.
    pub fn use_hint<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<&str> {
        if self.outcome.is_some() || self.hint.is_some() || self.hints_left() == Some(0) {
            return None;
        }
        let (revealed, time) = match &self.current()?.question {
            Question::Set(q) if self.hints.advanced_set_hints => (Some(q.display.clone()), q.target),
            question => (None, question.time()),
        };
        let text = match revealed {
            Some(display) => {
                self.hint_penalty += self.hints.penalty;
                display
            }
            None => generate_hint(time, rng),
        };
        self.hints_used += 1;
        self.hint = Some(text);
        self.hint.as_deref()
    }

    /// The player moved a hand. An advanced set hint disappears so it cannot
    /// be traced.
    pub fn on_hands_moved(&mut self) {
        if self.hints.advanced_set_hints && self.outcome.is_none() {
            self.hint = None;
        }
    }

    /// Move past an answered question. Returns true once the run is over.
    pub fn advance(&mut self, now: Instant, sound: &mut dyn SoundSink) -> bool {
        if self.finished {
            return true;
        }
        if self.outcome.is_none() {
            return false;
        }
        self.outcome = None;
        self.hint = None;
        if self.index + 1 >= self.plan.len() {
            self.finished = true;
            sound.play(Sound::Tada);
            log::debug!(
                "{} run finished: {}/{} correct",
                self.mode,
                self.tally.correct,
                self.plan.len()
            );
        } else {
            self.index += 1;
            self.question_started = now;
        }
        self.finished
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            mode: self.mode,
            difficulty: self.difficulty,
            questions: self.plan.len(),
            correct: self.effective_correct(),
            hints_used: self.hints_used,
            max_streak: self.tally.max_streak,
            avg_response_ms: self.avg_response_ms(),
            speedrun_score: None,
        }
    }

    pub fn trial_submission(&self, tier: usize, now: Instant) -> TrialSubmission {
        TrialSubmission {
            tier,
            questions: self.plan.len(),
            correct: self.effective_correct(),
            hints_used: self.hints_used,
            time_ms: elapsed_ms(self.started, now),
        }
    }
}

pub const SPEEDRUN_DURATION: Duration = Duration::from_secs(60);

/// Timed read-the-clock run in digital format; questions keep coming until
/// the time is up
#[derive(Debug, Clone)]
pub struct SpeedRun {
    difficulty: Difficulty,
    question: Question,
    remaining: Duration,
    answered: usize,
    tally: Tally,
    last: Option<Outcome>,
    question_started: Instant,
    finished: bool,
}

impl SpeedRun {
    pub fn new<R: RandomSource>(
        difficulty: Difficulty,
        duration: Duration,
        rng: &mut R,
        now: Instant,
    ) -> Self {
        Self {
            difficulty,
            question: Self::next_question(difficulty, None, rng),
            remaining: duration,
            answered: 0,
            tally: Tally::default(),
            last: None,
            question_started: now,
            finished: duration.is_zero(),
        }
    }

    fn next_question<R: RandomSource>(
        difficulty: Difficulty,
        previous: Option<ClockTime>,
        rng: &mut R,
    ) -> Question {
        let time = generate_time(difficulty, previous, rng);
        Question::read(time, difficulty, TimeFormat::Digital, Meridiem::Am, rng)
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn answered(&self) -> usize {
        self.answered
    }

    pub fn correct(&self) -> usize {
        self.tally.correct
    }

    /// Result of the previous answer, for feedback while the next one shows
    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last.as_ref()
    }

    /// Count down; returns true once time has run out
    pub fn on_tick(&mut self, dt: Duration, sound: &mut dyn SoundSink) -> bool {
        if self.finished {
            return true;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.finished = true;
            sound.play(Sound::Tada);
            log::debug!(
                "speedrun over: {}/{} correct",
                self.tally.correct,
                self.answered
            );
        }
        self.finished
    }

    /// Answer with option `choice`, then move straight on to a new question
    pub fn answer<R: RandomSource>(
        &mut self,
        choice: usize,
        now: Instant,
        rng: &mut R,
        sound: &mut dyn SoundSink,
    ) -> Option<bool> {
        if self.finished {
            return None;
        }
        let Question::Read(q) = &self.question else {
            return None;
        };
        let given = q.choices.get(choice)?.clone();
        let correct = given == q.correct_answer;

        self.answered += 1;
        self.tally
            .record(correct, elapsed_ms(self.question_started, now), sound);
        self.last = Some(Outcome { correct, given });

        let previous = self.question.time();
        self.question = Self::next_question(self.difficulty, Some(previous), rng);
        self.question_started = now;
        Some(correct)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            mode: GameMode::Speedrun,
            difficulty: self.difficulty,
            questions: self.answered,
            correct: self.tally.correct,
            hints_used: 0,
            max_streak: self.tally.max_streak,
            avg_response_ms: self.tally.avg_response_ms(),
            speedrun_score: Some(self.tally.correct),
        }
    }
}

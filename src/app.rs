//! Terminal game state: one run at a time, fed by key, mouse and tick events.

use crate::clock::{ClockTime, FormatMix, TimeFormat};
use crate::difficulty::Difficulty;
use crate::drag::{DragSession, Hand};
use crate::quest::{build_single_mode_plan, QuestPlanner, QuestionPlan};
use crate::question::{Question, QuestionMode, CHOICE_COUNT};
use crate::random::RandomSource;
use crate::session::{
    GameMode, HintPolicy, PracticeRun, SessionSummary, SpeedRun, TrialSubmission, SPEEDRUN_DURATION,
};
use crate::sound::SoundSink;
use crate::tiers::TierConfig;
use crate::ui::clock_face::{cell_to_point, hit_hand};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use rand::rngs::StdRng;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

/// What the player asked for on the command line / in the config
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub mode: GameMode,
    /// Overrides the tier's primary difficulty for read/set/speedrun runs
    pub difficulty: Option<Difficulty>,
    pub questions: usize,
    pub tier: usize,
    pub tier_progress_pct: u8,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::Quest,
            difficulty: None,
            questions: 10,
            tier: 0,
            tier_progress_pct: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Playing,
    Results,
}

#[derive(Debug, Clone)]
pub enum Run {
    Practice(PracticeRun),
    Speed(SpeedRun),
}

/// Result of a finished run, ready to hand to the scoring service
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Session(SessionSummary),
    Trial(TrialSubmission),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Questions and rules for a run, decided up front
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Mode the run reports as; a trial with no gate degrades to read
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub plan: QuestionPlan,
    pub hints: HintPolicy,
    /// Tier whose trial is being attempted
    pub trial_tier: Option<usize>,
}

impl RunPlan {
    /// Speedruns draw questions as they go; here they preview as a read
    /// run of digital times.
    pub fn new(settings: &RunSettings, tiers: &TierConfig, rng: &mut dyn RandomSource) -> Self {
        let tier = tiers.tier(settings.tier);
        let planner = QuestPlanner::for_tier(tier);
        let difficulty = settings
            .difficulty
            .unwrap_or_else(|| planner.primary_difficulty());
        let digital: FormatMix = [(TimeFormat::Digital, 1.0)].into_iter().collect();

        let read_run = |mode: GameMode, formats: &FormatMix, rng: &mut dyn RandomSource| Self {
            mode,
            difficulty,
            plan: build_single_mode_plan(
                difficulty,
                QuestionMode::Read,
                settings.questions,
                formats,
                rng,
            ),
            hints: HintPolicy::default(),
            trial_tier: None,
        };

        match settings.mode {
            GameMode::Quest => Self {
                mode: GameMode::Quest,
                difficulty: planner.primary_difficulty(),
                plan: planner.build(settings.questions, rng),
                hints: HintPolicy {
                    advanced_set_hints: tier.advanced_set_hints(settings.tier_progress_pct),
                    penalty: tier.set_clock_advanced_hint_penalty,
                    limit: None,
                },
                trial_tier: None,
            },
            GameMode::Read => read_run(GameMode::Read, planner.formats(), rng),
            GameMode::Speedrun => read_run(GameMode::Speedrun, &digital, rng),
            GameMode::Set => Self {
                mode: GameMode::Set,
                difficulty,
                plan: build_single_mode_plan(
                    difficulty,
                    QuestionMode::Set,
                    settings.questions,
                    planner.formats(),
                    rng,
                ),
                hints: HintPolicy::default(),
                trial_tier: None,
            },
            GameMode::Trial => {
                let target = (settings.tier + 1).min(tiers.max_tier());
                let Some(trial) = tiers.tier(target).trial.as_ref() else {
                    log::warn!("tier {target} has no trial, running a read practice instead");
                    return read_run(GameMode::Read, planner.formats(), rng);
                };
                let difficulty = trial.question_difficulty();
                Self {
                    mode: GameMode::Trial,
                    difficulty,
                    plan: build_single_mode_plan(
                        difficulty,
                        QuestionMode::Read,
                        trial.questions,
                        &digital,
                        rng,
                    ),
                    hints: HintPolicy {
                        limit: Some(trial.max_hints),
                        ..HintPolicy::default()
                    },
                    trial_tier: Some(target),
                }
            }
        }
    }
}

pub struct App {
    pub settings: RunSettings,
    pub tiers: TierConfig,
    pub state: AppState,
    pub run: Run,
    /// Hands shown for set questions
    pub drag: DragSession,
    /// Highlighted choice for read questions
    pub selected: usize,
    report: Option<Report>,
    /// Tier whose trial is being attempted
    trial_tier: Option<usize>,
    sound: Box<dyn SoundSink>,
    rng: StdRng,
}

impl App {
    pub fn new(
        settings: RunSettings,
        tiers: TierConfig,
        sound: Box<dyn SoundSink>,
        mut rng: StdRng,
        now: Instant,
    ) -> Self {
        let (run, trial_tier) = Self::start_run(&settings, &tiers, &mut rng, now);
        let mut app = Self {
            settings,
            tiers,
            state: AppState::Playing,
            run,
            drag: DragSession::new(ClockTime::default(), Difficulty::OneMin),
            selected: 0,
            report: None,
            trial_tier,
            sound,
            rng,
        };
        app.sync_drag();
        app.check_finished(now);
        app
    }

    fn start_run(
        settings: &RunSettings,
        tiers: &TierConfig,
        rng: &mut StdRng,
        now: Instant,
    ) -> (Run, Option<usize>) {
        let tier = tiers.tier(settings.tier);
        log::info!(
            "starting {} run at tier {} ({})",
            settings.mode,
            tier.index,
            tier.name
        );
        if settings.mode == GameMode::Speedrun {
            let difficulty = settings
                .difficulty
                .unwrap_or_else(|| QuestPlanner::for_tier(tier).primary_difficulty());
            let run = SpeedRun::new(difficulty, SPEEDRUN_DURATION, rng, now);
            return (Run::Speed(run), None);
        }
        let RunPlan {
            mode,
            difficulty,
            plan,
            hints,
            trial_tier,
        } = RunPlan::new(settings, tiers, rng);
        let run = PracticeRun::new(mode, difficulty, plan, hints, now);
        (Run::Practice(run), trial_tier)
    }

    /// Throw the current run away and start a fresh one with the same settings
    pub fn restart(&mut self, now: Instant) {
        let (run, trial_tier) = Self::start_run(&self.settings, &self.tiers, &mut self.rng, now);
        self.run = run;
        self.trial_tier = trial_tier;
        self.state = AppState::Playing;
        self.report = None;
        self.selected = 0;
        self.sync_drag();
        self.check_finished(now);
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// The question on screen, if any
    pub fn question(&self) -> Option<&Question> {
        match &self.run {
            Run::Practice(run) => run.current().map(|q| &q.question),
            Run::Speed(run) if !run.is_finished() => Some(run.question()),
            Run::Speed(_) => None,
        }
    }

    /// Whether the question on screen has been answered and awaits `advance`
    pub fn awaiting_next(&self) -> bool {
        matches!(&self.run, Run::Practice(run) if run.outcome().is_some())
    }

    /// Time shown on the clock face
    pub fn clock_time(&self) -> ClockTime {
        match self.question() {
            Some(Question::Set(_)) => self.drag.time(),
            Some(q) => q.time(),
            None => self.drag.time(),
        }
    }

    fn sync_drag(&mut self) {
        if let Run::Practice(run) = &self.run {
            if let Some(planned) = run.current() {
                if let Question::Set(q) = &planned.question {
                    self.drag = DragSession::new(q.start, planned.difficulty);
                }
            }
        }
    }

    fn check_finished(&mut self, now: Instant) {
        if self.state == AppState::Results {
            return;
        }
        let report = match &self.run {
            Run::Practice(run) if run.is_finished() => match self.trial_tier {
                Some(tier) => Report::Trial(run.trial_submission(tier, now)),
                None => Report::Session(run.summary()),
            },
            Run::Speed(run) if run.is_finished() => Report::Session(run.summary()),
            _ => return,
        };
        log::info!("run finished: {report:?}");
        self.report = Some(report);
        self.state = AppState::Results;
    }

    fn answer(&mut self, choice: usize, now: Instant) {
        match &mut self.run {
            Run::Practice(run) => {
                run.answer_choice(choice, now, self.sound.as_mut());
            }
            Run::Speed(run) => {
                run.answer(choice, now, &mut self.rng, self.sound.as_mut());
                self.selected = 0;
            }
        }
    }

    fn submit_set(&mut self, now: Instant) {
        if let Run::Practice(run) = &mut self.run {
            self.drag.pointer_up();
            run.submit_set(self.drag.time(), now, self.sound.as_mut());
        }
    }

    fn advance(&mut self, now: Instant) {
        if let Run::Practice(run) = &mut self.run {
            run.advance(now, self.sound.as_mut());
            self.selected = 0;
            self.sync_drag();
            self.check_finished(now);
        }
    }

    fn use_hint(&mut self) {
        if let Run::Practice(run) = &mut self.run {
            run.use_hint(&mut self.rng);
        }
    }

    fn nudge(&mut self, hand: Hand, clockwise: bool) {
        if self.awaiting_next() {
            return;
        }
        let sound = self.drag.nudge(hand, clockwise);
        self.sound.play(sound);
        if let Run::Practice(run) = &mut self.run {
            run.on_hands_moved();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Action::Quit;
        }

        match self.state {
            AppState::Results => match key.code {
                KeyCode::Char('q') => return Action::Quit,
                KeyCode::Char('r') | KeyCode::Enter => self.restart(now),
                _ => {}
            },
            AppState::Playing => {
                if self.awaiting_next() {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n')) {
                        self.advance(now);
                    }
                    return Action::Continue;
                }
                if key.code == KeyCode::Char('?') {
                    self.use_hint();
                    return Action::Continue;
                }
                match self.question().map(Question::mode) {
                    Some(QuestionMode::Read) => match key.code {
                        KeyCode::Char(c @ '1'..='9') => {
                            let choice = c as usize - '1' as usize;
                            if choice < CHOICE_COUNT {
                                self.answer(choice, now);
                            }
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            self.selected = self.selected.saturating_sub(1);
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            self.selected = (self.selected + 1).min(CHOICE_COUNT - 1);
                        }
                        KeyCode::Enter => self.answer(self.selected, now),
                        _ => {}
                    },
                    Some(QuestionMode::Set) => match key.code {
                        KeyCode::Right | KeyCode::Char('m') => self.nudge(Hand::Minute, true),
                        KeyCode::Left | KeyCode::Char('M') => self.nudge(Hand::Minute, false),
                        KeyCode::Up | KeyCode::Char('h') => self.nudge(Hand::Hour, true),
                        KeyCode::Down | KeyCode::Char('H') => self.nudge(Hand::Hour, false),
                        KeyCode::Enter => self.submit_set(now),
                        _ => {}
                    },
                    None => {}
                }
            }
        }
        Action::Continue
    }

    /// Mouse input over the clock drawn in `clock_area`
    pub fn on_mouse(&mut self, event: MouseEvent, clock_area: Rect) {
        if self.state != AppState::Playing || self.awaiting_next() {
            return;
        }
        if !matches!(self.question(), Some(Question::Set(_))) {
            return;
        }
        let point = cell_to_point(clock_area, event.column, event.row);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(hand) = point.and_then(|p| hit_hand(self.drag.time(), p)) {
                    self.drag.pointer_down(hand);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                // leaving the face ends the gesture
                let Some((x, y)) = point else {
                    self.drag.pointer_up();
                    return;
                };
                // canvas y points up, pointer maths wants screen space
                if let Some(sound) = self.drag.pointer_move(0.0, 0.0, x, -y) {
                    self.sound.play(sound);
                    if let Run::Practice(run) = &mut self.run {
                        run.on_hands_moved();
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag.pointer_up(),
            _ => {}
        }
    }

    pub fn on_tick(&mut self, dt: Duration, now: Instant) {
        if self.state != AppState::Playing {
            return;
        }
        if let Run::Speed(run) = &mut self.run {
            run.on_tick(dt, self.sound.as_mut());
        }
        self.check_finished(now);
    }
}

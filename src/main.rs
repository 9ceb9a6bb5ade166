use clap::{error::ErrorKind, CommandFactory, Parser};
use clockquest::{
    app::{Action, App, AppState, Report, RunPlan, RunSettings},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    difficulty::Difficulty,
    history::SessionHistory,
    logging,
    runtime::{ClockEvent, CrosstermEventSource, FixedTicker, Runner},
    session::GameMode,
    sound::{Silent, SoundSink, TerminalBell},
    tiers::TierConfig,
    ui::clock_area,
};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 100;

/// learn to read and set an analog clock, one tier at a time
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice reading an analog clock (pick the matching time) and setting one (drag the hands). Quests mix both at your tier's difficulty; trials gate the next tier."
)]
pub struct Cli {
    /// what to play
    #[clap(short = 'm', long, value_enum, default_value_t = GameMode::Quest)]
    mode: GameMode,

    /// minute granularity for read/set/speedrun runs (default: the tier's main difficulty)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// number of questions per run
    #[clap(short = 'q', long)]
    questions: Option<usize>,

    /// tier to play at
    #[clap(short = 't', long)]
    tier: Option<usize>,

    /// seed the question generator for a repeatable run
    #[clap(long)]
    seed: Option<u64>,

    /// print the generated question plan as JSON and exit
    #[clap(long)]
    print_plan: bool,

    /// never ring the terminal bell
    #[clap(long)]
    no_sound: bool,

    /// JSON tier table to use instead of the built-in one
    #[clap(long)]
    tiers_file: Option<PathBuf>,
}

impl Cli {
    /// Command line flags win over the stored config
    fn to_settings(&self, config: &Config) -> RunSettings {
        RunSettings {
            mode: self.mode,
            difficulty: self.difficulty,
            questions: self.questions.unwrap_or(config.questions),
            tier: self.tier.unwrap_or(config.tier),
            tier_progress_pct: config.tier_progress_pct,
        }
    }

    fn tiers(&self, config: &Config) -> TierConfig {
        match self.tiers_file.as_ref().or(config.tiers_file.as_ref()) {
            Some(path) => TierConfig::load(path),
            None => TierConfig::default(),
        }
    }

    fn wants_sound(&self, config: &Config) -> bool {
        !self.no_sound && config.sound
    }

    fn sound(&self, config: &Config) -> Box<dyn SoundSink> {
        if self.wants_sound(config) {
            Box::new(TerminalBell)
        } else {
            Box::new(Silent)
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        // a read-only state dir only costs us the log
        let _ = logging::init(path, logging::LOGGING_LEVEL);
    }

    let config = FileConfigStore::new().load();
    let tiers = cli.tiers(&config);
    let settings = cli.to_settings(&config);
    let mut rng = cli.rng();

    if cli.print_plan {
        let plan = RunPlan::new(&settings, &tiers, &mut rng);
        println!("{}", serde_json::to_string_pretty(&plan.plan)?);
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let history = AppDirs::history_path().map(SessionHistory::new);
    let mut app = App::new(settings, tiers, cli.sound(&config), rng, Instant::now());
    let result = start_tui(&mut terminal, &mut app, history.as_ref());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    result?;

    match app.report() {
        Some(Report::Session(summary)) => println!("{}", serde_json::to_string_pretty(summary)?),
        Some(Report::Trial(trial)) => println!("{}", serde_json::to_string_pretty(trial)?),
        None => {}
    }

    Ok(())
}

fn record(report: Option<&Report>, history: Option<&SessionHistory>) {
    let (Some(Report::Session(summary)), Some(history)) = (report, history) else {
        return;
    };
    if let Err(e) = history.append(summary) {
        log::warn!("could not write {}: {e}", history.path().display());
    }
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    history: Option<&SessionHistory>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let mut last_step = Instant::now();
    let mut recorded = false;

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let event = runner.step();
        let now = Instant::now();
        app.on_tick(now.saturating_duration_since(last_step), now);
        last_step = now;

        match event {
            ClockEvent::Key(key) if key.kind != KeyEventKind::Release => {
                if app.on_key(key, now) == Action::Quit {
                    break;
                }
            }
            ClockEvent::Mouse(mouse) => {
                let size = terminal.size()?;
                app.on_mouse(mouse, clock_area(Rect::new(0, 0, size.width, size.height)));
            }
            ClockEvent::Key(_) | ClockEvent::Resize | ClockEvent::Tick => {}
        }

        match app.state {
            AppState::Results if !recorded => {
                record(app.report(), history);
                recorded = true;
            }
            AppState::Playing => recorded = false,
            AppState::Results => {}
        }
    }

    Ok(())
}

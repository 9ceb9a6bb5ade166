pub mod clock_face;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use crate::app::{App, AppState, Report, Run};
use crate::question::Question;
use clock_face::{square_area, ClockFace};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

struct Areas {
    header: Rect,
    clock: Rect,
    panel: Rect,
    footer: Rect,
}

fn split(area: Rect) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);
    Areas {
        header: rows[0],
        clock: body[0],
        panel: body[1],
        footer: rows[2],
    }
}

/// Cells the clock face occupies for a frame of size `area`; mouse events
/// are mapped against this
pub fn clock_area(area: Rect) -> Rect {
    square_area(split(area).clock)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Playing => render_playing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let tier = app.tiers.tier(app.settings.tier);
    let (progress, status) = match &app.run {
        Run::Practice(run) => {
            let shown = (run.index() + usize::from(run.outcome().is_some())).min(run.len());
            let ratio = if run.is_empty() {
                1.0
            } else {
                shown as f64 / run.len() as f64
            };
            let status = format!(
                "question {}/{}   {} correct   streak {}",
                (run.index() + 1).min(run.len()),
                run.len(),
                run.correct(),
                run.streak()
            );
            (ratio, status)
        }
        Run::Speed(run) => {
            let total = crate::session::SPEEDRUN_DURATION.as_secs_f64();
            let left = run.remaining().as_secs_f64();
            let status = format!("{:.0}s left   {} correct", left.ceil(), run.correct());
            ((total - left) / total, status)
        }
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", app.settings.mode), bold()),
        Span::styled(format!("· {} tier   ", tier.name), dim()),
        Span::raw(status),
    ]))
    .render(rows[0], buf);

    Gauge::default()
        .gauge_style(Style::default().fg(Color::Yellow))
        .ratio(progress.clamp(0.0, 1.0))
        .label("")
        .render(rows[1], buf);
}

fn render_playing(app: &App, area: Rect, buf: &mut Buffer) {
    let areas = split(area);
    render_header(app, areas.header, buf);

    ClockFace::new(app.clock_time())
        .active(app.drag.state().hand())
        .render(areas.clock, buf);

    let green = bold().fg(Color::Green);
    let red = bold().fg(Color::Red);
    let amber = bold().fg(Color::Yellow);

    let mut lines: Vec<Line> = Vec::new();
    let (outcome, hint) = match &app.run {
        Run::Practice(run) => (run.outcome(), run.hint()),
        Run::Speed(run) => (run.last_outcome(), None),
    };

    match app.question() {
        Some(Question::Read(q)) => {
            lines.push(Line::from(Span::styled("What time is it?", bold())));
            lines.push(Line::default());
            let answered = app.awaiting_next();
            for (idx, choice) in q.choices.iter().enumerate() {
                let style = if answered && *choice == q.correct_answer {
                    green
                } else if answered && outcome.is_some_and(|o| o.given == *choice) {
                    red
                } else if !answered && idx == app.selected {
                    amber.add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(format!(" {}) {}", idx + 1, choice), style)));
            }
        }
        Some(Question::Set(q)) => {
            lines.push(Line::from(Span::styled("Set the clock to:", bold())));
            lines.push(Line::from(Span::styled(q.display.clone(), amber)));
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("your clock: ", dim()),
                Span::styled(app.drag.time().to_string(), bold()),
            ]));
        }
        None => {}
    }

    lines.push(Line::default());
    if let Some(outcome) = outcome {
        if outcome.correct {
            lines.push(Line::from(Span::styled("Correct!", green)));
        } else if let Some(q) = app.question().filter(|_| app.awaiting_next()) {
            lines.push(Line::from(Span::styled(
                format!("Not quite! The answer was {}", q.answer_text()),
                red,
            )));
        } else {
            lines.push(Line::from(Span::styled("Not quite!", red)));
        }
    }
    if let Some(hint) = hint {
        lines.push(Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )));
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::LEFT).border_style(dim()))
        .render(areas.panel, buf);

    let legend = if app.awaiting_next() {
        "(enter) next   (esc) quit"
    } else {
        match app.question() {
            Some(Question::Set(_)) => {
                "drag the hands   (←/→) minutes   (↑/↓) hours   (?) hint   (enter) check   (esc) quit"
            }
            _ => "(1-4) answer   (↑/↓ enter) select   (?) hint   (esc) quit",
        }
    };
    Paragraph::new(Span::styled(legend, dim().add_modifier(Modifier::ITALIC)))
        .alignment(Alignment::Center)
        .render(areas.footer, buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let mut lines = vec![Line::default()];
    match app.report() {
        Some(Report::Session(summary)) => {
            lines.push(Line::from(Span::styled(
                format!("{} run complete", summary.mode),
                bold(),
            )));
            lines.push(Line::default());
            lines.push(Line::from(format!(
                "{} / {} correct at {}",
                summary.correct, summary.questions, summary.difficulty
            )));
            if let Some(score) = summary.speedrun_score {
                lines.push(Line::from(format!("speedrun score {score}")));
            }
            lines.push(Line::from(format!(
                "best streak {}   hints {}",
                summary.max_streak, summary.hints_used
            )));
            if let Some(ms) = summary.avg_response_ms {
                lines.push(Line::from(format!(
                    "{:.1}s per answer",
                    ms as f64 / 1000.0
                )));
            }
            let skills = app.tiers.mastered_skills(app.settings.tier);
            if !skills.is_empty() {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled("skills mastered", dim())));
                lines.extend(skills.into_iter().map(Line::from));
            }
        }
        Some(Report::Trial(trial)) => {
            let tier = app.tiers.tier(trial.tier);
            lines.push(Line::from(Span::styled(
                format!("{} trial complete", tier.name),
                bold(),
            )));
            lines.push(Line::default());
            lines.push(Line::from(format!(
                "{} / {} correct   hints {}",
                trial.correct, trial.questions, trial.hints_used
            )));
            if let Some(gate) = &tier.trial {
                lines.push(Line::from(Span::styled(
                    format!(
                        "needs {} correct with at most {} hints",
                        gate.min_correct, gate.max_hints
                    ),
                    dim(),
                )));
            }
            lines.push(Line::from(format!(
                "{:.1}s total",
                trial.time_ms as f64 / 1000.0
            )));
        }
        None => {}
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        "(r)etry   (q)uit",
        dim().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::RunSettings;
    use crate::session::GameMode;
    use crate::sound::Silent;
    use crate::tiers::TierConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Instant;

    fn app(mode: GameMode) -> App {
        App::new(
            RunSettings {
                mode,
                questions: 1,
                ..RunSettings::default()
            },
            TierConfig::default(),
            Box::new(Silent),
            StdRng::seed_from_u64(12),
            Instant::now(),
        )
    }

    fn rendered(app: &App) -> String {
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn read_screen_lists_choices() {
        let app = app(GameMode::Read);
        let text = rendered(&app);
        assert!(text.contains("What time is it?"));
        assert!(text.contains("1)"));
        assert!(text.contains("4)"));
    }

    #[test]
    fn set_screen_shows_target() {
        let app = app(GameMode::Set);
        let text = rendered(&app);
        assert!(text.contains("Set the clock to:"));
        assert!(text.contains("your clock:"));
    }

    #[test]
    fn results_screen() {
        let mut app = app(GameMode::Read);
        let now = Instant::now();
        app.on_key(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE), now);
        app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), now);
        let text = rendered(&app);
        assert!(text.contains("read run complete"));
        assert!(text.contains("(r)etry"));
    }

    #[test]
    fn results_list_mastered_skills() {
        let mut app = App::new(
            RunSettings {
                mode: GameMode::Read,
                questions: 1,
                tier: 2,
                ..RunSettings::default()
            },
            TierConfig::default(),
            Box::new(Silent),
            StdRng::seed_from_u64(12),
            Instant::now(),
        );
        let now = Instant::now();
        app.on_key(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE), now);
        app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), now);
        let text = rendered(&app);
        assert!(text.contains("skills mastered"));
        assert!(text.contains("Reads hours on the clock"));
        assert!(text.contains("Reads half past / half to"));
    }

    #[test]
    fn first_tier_has_no_skills_yet() {
        let mut app = app(GameMode::Read);
        let now = Instant::now();
        app.on_key(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE), now);
        app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), now);
        assert!(!rendered(&app).contains("skills mastered"));
    }

    #[test]
    fn clock_area_sits_inside_the_frame() {
        let frame = Rect::new(0, 0, 100, 30);
        let clock = clock_area(frame);
        assert!(clock.width > 0 && clock.height > 0);
        assert_eq!(clock.width, clock.height * 2);
        assert!(clock.right() <= frame.right() && clock.bottom() <= frame.bottom());
    }
}

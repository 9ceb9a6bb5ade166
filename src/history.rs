use crate::difficulty::Difficulty;
use crate::session::{GameMode, SessionSummary};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// One line of `history.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub date: String,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub questions: usize,
    pub correct: usize,
    pub hints_used: usize,
    pub max_streak: usize,
    pub avg_response_ms: Option<u64>,
    pub speedrun_score: Option<usize>,
}

impl HistoryRow {
    pub fn new(summary: &SessionSummary, at: DateTime<Local>) -> Self {
        Self {
            date: at.format("%Y-%m-%d %H:%M:%S").to_string(),
            mode: summary.mode,
            difficulty: summary.difficulty,
            questions: summary.questions,
            correct: summary.correct,
            hints_used: summary.hints_used,
            max_streak: summary.max_streak,
            avg_response_ms: summary.avg_response_ms,
            speedrun_score: summary.speedrun_score,
        }
    }
}

/// Append-only log of finished runs
#[derive(Debug, Clone)]
pub struct SessionHistory {
    path: PathBuf,
}

impl SessionHistory {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, summary: &SessionSummary) -> io::Result<()> {
        self.append_at(summary, Local::now())
    }

    pub fn append_at(&self, summary: &SessionSummary, at: DateTime<Local>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // header only for a fresh file
        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(HistoryRow::new(summary, at))?;
        writer.flush()
    }

    /// Every row recorded so far; a missing file is an empty history
    pub fn load(&self) -> io::Result<Vec<HistoryRow>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let rows = reader.deserialize().collect::<Result<Vec<HistoryRow>, _>>()?;
        Ok(rows)
    }
}

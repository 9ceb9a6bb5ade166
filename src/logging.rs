//! File logger for the `log` facade. The terminal belongs to the TUI, so
//! records go to `clockquest.log` in the state directory instead of stderr.

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

pub const LOGGING_LEVEL: LevelFilter = LevelFilter::Info;

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

pub struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl FileLogger {
    pub fn open<P: AsRef<Path>>(path: P, level: LevelFilter) -> io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(mut file) = self.file.lock() else {
            return;
        };
        let _ = writeln!(
            file,
            "{} {:<5} {}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Route `log` records to `path`. Only the first call installs a logger;
/// later calls are no-ops.
pub fn init<P: AsRef<Path>>(path: P, level: LevelFilter) -> io::Result<()> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = FileLogger::open(path, level)?;
    if LOGGER.set(logger).is_err() {
        return Ok(());
    }
    if let Some(logger) = LOGGER.get() {
        log::set_logger(logger).map_err(|e| io::Error::other(e.to_string()))?;
        log::set_max_level(level);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use tempfile::tempdir;

    #[test]
    fn writes_records_at_or_above_the_level() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("clockquest.log");
        let logger = FileLogger::open(&path, LevelFilter::Info).unwrap();

        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .target("clockquest::tiers")
                .args(format_args!("falling back to default tiers"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("too chatty"))
                .build(),
        );
        logger.flush();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("WARN  clockquest::tiers: falling back to default tiers"));
        assert!(!text.contains("too chatty"));
    }
}

use log::{LevelFilter, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const LOG_FILE: &str = "log.txt";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Could not create log directory: {0}")]
    Directory(#[from] io::Error),

    #[error("Logger already set")]
    AlreadySet,
}

#[derive(Debug)]
struct SimpleLogger {
    log_file: PathBuf,
    level: LevelFilter,
}

static LOGGER: OnceCell<SimpleLogger> = OnceCell::new();

pub fn format_entry(timestamp: &str, record: &Record) -> String {
    format!("{} {} - {}\n", timestamp, record.level(), record.args())
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
            let log_entry = format_entry(&timestamp, record);

            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.log_file) {
                let _ = file.write_all(log_entry.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

pub fn level_for(debug_mode: bool) -> LevelFilter {
    if debug_mode { LevelFilter::Debug } else { LevelFilter::Info }
}

/// Appends every record to `dir/log.txt`. Can only succeed once per process.
pub fn init(dir: &Path, debug_mode: bool) -> Result<(), LoggingError> {
    create_dir_all(dir)?;

    let level = level_for(debug_mode);
    let logger = SimpleLogger {
        log_file: dir.join(LOG_FILE),
        level,
    };
    LOGGER.set(logger).map_err(|_| LoggingError::AlreadySet)?;
    let logger = LOGGER.get().ok_or(LoggingError::AlreadySet)?;

    log::set_logger(logger).map_err(|_| LoggingError::AlreadySet)?;
    log::set_max_level(level);
    Ok(())
}

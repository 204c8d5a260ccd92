use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

pub static LOG: Mutex<Option<Arc<Mutex<dyn Repository>>>> = Mutex::new(None);

static CONSOLE_LEVEL: Mutex<LevelFilter> = Mutex::new(LevelFilter::Warn);

/// Records of this level or more severe are persisted.
const PERSISTED_LEVEL: LevelFilter = LevelFilter::Info;

/// Number of persisted entries which are kept.
pub const CAPACITY: usize = 100;

#[allow(clippy::missing_errors_doc)]
pub trait Service {
    fn get_log_entries(&self) -> Result<VecDeque<Entry>, Error>;
    fn add_log_entry(&self, entry: Entry) -> Result<(), Error>;
}

#[allow(clippy::missing_errors_doc)]
pub trait Repository: Send + Sync + 'static {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error>;
    fn write_entry(&self, entry: Entry) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelDef")]
    pub level: Level,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
pub enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

static LOGGER: Logger = Logger;

/// Install the logger.
///
/// Records up to `console_level` are written to stderr. Records of level info
/// or more severe are also added to the repository.
///
/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(
    repository: Arc<Mutex<dyn Repository>>,
    console_level: LevelFilter,
) -> Result<(), SetLoggerError> {
    if let Ok(mut log) = LOG.lock() {
        *log = Some(repository);
    }
    if let Ok(mut level) = CONSOLE_LEVEL.lock() {
        *level = console_level;
    }
    log::set_logger(&LOGGER).map(|()| log::set_max_level(console_level.max(PERSISTED_LEVEL)))
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let console_level = CONSOLE_LEVEL
            .lock()
            .map_or(LevelFilter::Warn, |level| *level);
        metadata.level() <= console_level.max(PERSISTED_LEVEL)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();

        if CONSOLE_LEVEL
            .lock()
            .is_ok_and(|level| record.level() <= *level)
        {
            eprintln!("{}: {message}", record.level().as_str().to_lowercase());
        }

        if record.level() > PERSISTED_LEVEL {
            return;
        }

        if let Ok(log) = LOG.lock() {
            if let Some(ref repository) = *log {
                if let Ok(repository) = repository.lock() {
                    let _ = repository.write_entry(Entry {
                        time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                        level: record.level(),
                        message,
                    });
                }
            }
        }
    }

    fn flush(&self) {}
}

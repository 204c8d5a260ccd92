use std::collections::BTreeMap;

use chrono::NaiveDate;
use derive_more::Deref;
use uuid::Uuid;

use crate::{DeleteError, Name, ReadError, SetRecord, Slot, UpdateError, notes};

pub trait HistoryRepository {
    /// Static history shipped with the application.
    fn read_seed(&self) -> Result<Vec<LogEntry>, ReadError>;
    /// Entries appended by the user.
    fn read_log(&self) -> Result<Vec<LogEntry>, ReadError>;
    /// Entries of a session already in the log replace the stored ones.
    fn append_log(&self, entries: Vec<LogEntry>) -> Result<(), UpdateError>;
    /// Remove the entries of a session, returning how many were removed.
    ///
    /// Stored entries which cannot be interpreted are kept.
    fn delete_log_entries(&self, date: NaiveDate, slot: Slot) -> Result<usize, UpdateError>;
}

pub trait HistoryService {
    fn get_history(&self) -> Result<History, ReadError>;
    fn get_sessions(&self) -> Result<Vec<HistorySession>, ReadError>;
    fn delete_session(&self, date: NaiveDate, slot: Slot) -> Result<usize, DeleteError>;
}

#[derive(Deref, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionID(Uuid);

impl SessionID {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionID {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SessionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for SessionID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// One exercise performed in one session.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub session_id: Option<SessionID>,
    pub date: NaiveDate,
    pub slot: Slot,
    pub exercise: Name,
    pub sets: Vec<SetRecord>,
    pub notes: String,
}

impl LogEntry {
    /// Structured sets if available, otherwise the sets recovered from the notes.
    #[must_use]
    pub fn performance(&self) -> Vec<SetRecord> {
        if self.sets.is_empty() {
            notes::parse(&self.notes)
        } else {
            self.sets.clone()
        }
    }
}

/// Previous performance of an exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    pub date: NaiveDate,
    pub sets: Vec<SetRecord>,
    pub notes: String,
}

/// All entries in chronological order.
///
/// Entries of the same date keep the order in which they were logged.
#[derive(Deref, Debug, Default, Clone, PartialEq)]
pub struct History(Vec<LogEntry>);

impl History {
    #[must_use]
    pub fn new(seed: Vec<LogEntry>, log: Vec<LogEntry>) -> Self {
        let mut entries = seed;
        entries.extend(log);
        entries.sort_by_key(|e| e.date);
        Self(entries)
    }

    /// Entries grouped by date and slot, newest first.
    #[must_use]
    pub fn sessions(&self) -> Vec<HistorySession> {
        let mut sessions: BTreeMap<(NaiveDate, Slot), Vec<LogEntry>> = BTreeMap::new();
        for entry in &self.0 {
            sessions
                .entry((entry.date, entry.slot))
                .or_default()
                .push(entry.clone());
        }
        sessions
            .into_iter()
            .rev()
            .map(|((date, slot), entries)| HistorySession {
                date,
                slot,
                entries,
            })
            .collect()
    }

    #[must_use]
    pub fn entries_of(&self, exercise: &Name) -> Vec<&LogEntry> {
        self.0.iter().filter(|e| e.exercise.is(exercise)).collect()
    }

    /// Most recent performance of an exercise with recoverable sets.
    ///
    /// If the exercise was logged multiple times on that date, the sets of all
    /// entries are combined.
    #[must_use]
    pub fn last_performance(&self, exercise: &Name) -> Option<Performance> {
        let entries = self.entries_of(exercise);
        let date = entries
            .iter()
            .rev()
            .find(|e| !e.performance().is_empty())?
            .date;
        let entries = entries
            .into_iter()
            .filter(|e| e.date == date)
            .collect::<Vec<_>>();
        Some(Performance {
            date,
            sets: entries.iter().flat_map(|e| e.performance()).collect(),
            notes: entries
                .iter()
                .map(|e| e.notes.trim())
                .filter(|n| !n.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        })
    }

    /// Distinct exercise names, sorted, keeping the first spelling encountered.
    #[must_use]
    pub fn exercise_names(&self) -> Vec<Name> {
        let mut names: BTreeMap<String, Name> = BTreeMap::new();
        for entry in &self.0 {
            names
                .entry(entry.exercise.key())
                .or_insert_with(|| entry.exercise.clone());
        }
        names.into_values().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistorySession {
    pub date: NaiveDate,
    pub slot: Slot,
    pub entries: Vec<LogEntry>,
}

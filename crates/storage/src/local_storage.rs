use std::collections::VecDeque;

use ::log::debug;
use chrono::NaiveDate;
use repcycle_app::{Settings, SettingsRepository, log};
use repcycle_domain as domain;
use serde::{Serialize, de::DeserializeOwned};
use strum::Display;
use uuid::Uuid;

use crate::{KeyValueStore, seed};

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    #[strum(serialize = "history")]
    History,
    #[strum(serialize = "rotation")]
    Rotation,
    #[strum(serialize = "ongoing workout")]
    OngoingWorkout,
    #[strum(serialize = "settings")]
    Settings,
    #[strum(serialize = "log")]
    Log,
}

/// Repositories on top of a key-value store.
pub struct LocalStorage<S> {
    store: S,
    seed: Option<Vec<domain::LogEntry>>,
}

impl<S: KeyValueStore> LocalStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store, seed: None }
    }

    /// Use the given entries instead of the embedded seed history.
    #[must_use]
    pub fn with_seed(mut self, entries: Vec<domain::LogEntry>) -> Self {
        self.seed = Some(entries);
        self
    }

    fn read<T: DeserializeOwned>(&self, key: Key) -> Result<Option<T>, domain::StorageError> {
        let Some(json) = self.store.get(&key.to_string())? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|err| domain::StorageError::Corrupted(format!("{key}: {err}")))
    }

    fn write<T: Serialize>(&self, key: Key, value: &T) -> Result<(), domain::StorageError> {
        let json = serde_json::to_string(value)
            .map_err(|err| domain::StorageError::Other(Box::new(err)))?;
        Ok(self.store.set(&key.to_string(), &json)?)
    }

    fn remove(&self, key: Key) -> Result<(), domain::StorageError> {
        Ok(self.store.remove(&key.to_string())?)
    }

    /// Stored log entries as written, including those which cannot be interpreted.
    fn read_log_values(&self) -> Result<Vec<serde_json::Value>, domain::StorageError> {
        Ok(self.read(Key::History)?.unwrap_or_default())
    }
}

impl<S: KeyValueStore> domain::HistoryRepository for LocalStorage<S> {
    fn read_seed(&self) -> Result<Vec<domain::LogEntry>, domain::ReadError> {
        Ok(self.seed.clone().unwrap_or_else(seed::seed_entries))
    }

    fn read_log(&self) -> Result<Vec<domain::LogEntry>, domain::ReadError> {
        Ok(from_values(self.read_log_values()?))
    }

    fn append_log(&self, entries: Vec<domain::LogEntry>) -> Result<(), domain::UpdateError> {
        let mut values = self.read_log_values()?;
        values.retain(|value| {
            !interpret(value.clone()).is_ok_and(|stored| {
                stored
                    .session_id
                    .is_some_and(|id| entries.iter().any(|e| e.session_id == Some(id)))
            })
        });
        for entry in &entries {
            values.push(
                serde_json::to_value(LogEntry::from(entry))
                    .map_err(|err| domain::StorageError::Other(Box::new(err)))?,
            );
        }
        Ok(self.write(Key::History, &values)?)
    }

    fn delete_log_entries(
        &self,
        date: NaiveDate,
        slot: domain::Slot,
    ) -> Result<usize, domain::UpdateError> {
        let mut values = self.read_log_values()?;
        let count = values.len();
        values.retain(|value| {
            !interpret(value.clone()).is_ok_and(|stored| stored.date == date && stored.slot == slot)
        });
        let removed = count - values.len();
        if removed > 0 {
            self.write(Key::History, &values)?;
        }
        Ok(removed)
    }
}

impl<S: KeyValueStore> domain::RotationRepository for LocalStorage<S> {
    fn read_rotation(&self) -> Result<domain::Rotation, domain::ReadError> {
        Ok(self
            .read::<u64>(Key::Rotation)?
            .map(domain::Rotation::new)
            .unwrap_or_default())
    }

    fn write_rotation(&self, rotation: domain::Rotation) -> Result<(), domain::UpdateError> {
        Ok(self.write(Key::Rotation, &rotation.completed())?)
    }
}

impl<S: KeyValueStore> domain::WorkoutSessionRepository for LocalStorage<S> {
    fn read_workout_session(&self) -> Result<Option<domain::WorkoutSession>, domain::ReadError> {
        let Some(workout_session) = self.read::<WorkoutSession>(Key::OngoingWorkout)? else {
            return Ok(None);
        };
        domain::WorkoutSession::try_from(workout_session)
            .map(Some)
            .map_err(|err| {
                domain::StorageError::Corrupted(format!("{}: {err}", Key::OngoingWorkout)).into()
            })
    }

    fn write_workout_session(
        &self,
        workout_session: Option<domain::WorkoutSession>,
    ) -> Result<(), domain::UpdateError> {
        match workout_session {
            Some(workout_session) => Ok(self.write(
                Key::OngoingWorkout,
                &WorkoutSession::from(&workout_session),
            )?),
            None => Ok(self.remove(Key::OngoingWorkout)?),
        }
    }
}

impl<S: KeyValueStore> SettingsRepository for LocalStorage<S> {
    fn read_settings(&self) -> Result<Settings, String> {
        self.read(Key::Settings)
            .map(Option::unwrap_or_default)
            .map_err(|err| err.to_string())
    }

    fn write_settings(&self, settings: Settings) -> Result<(), String> {
        self.write(Key::Settings, &settings)
            .map_err(|err| err.to_string())
    }
}

// Must not emit log records, the logger holds its lock while writing.
impl<S: KeyValueStore> log::Repository for LocalStorage<S> {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        self.read(Key::Log)
            .map(Option::unwrap_or_default)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(log::CAPACITY);
        self.write(Key::Log, &entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}

/// Convert stored entries, skipping those which cannot be interpreted.
///
/// Skipped entries stay in the store, so they are reported on every read.
pub(crate) fn from_values(values: Vec<serde_json::Value>) -> Vec<domain::LogEntry> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match interpret(value) {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("skipped log entry {}: {err}", i + 1);
                None
            }
        })
        .collect()
}

fn interpret(value: serde_json::Value) -> Result<domain::LogEntry, ConversionError> {
    serde_json::from_value::<LogEntry>(value)
        .map_err(|err| ConversionError::Format(err.to_string()))
        .and_then(domain::LogEntry::try_from)
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConversionError {
    #[error("{0}")]
    Format(String),
    #[error("invalid date \"{0}\"")]
    Date(String),
    #[error(transparent)]
    Slot(#[from] domain::SlotError),
    #[error(transparent)]
    Name(#[from] domain::NameError),
    #[error(transparent)]
    Reps(#[from] domain::RepsError),
    #[error(transparent)]
    Weight(#[from] domain::WeightError),
    #[error("no sets or notes")]
    Empty,
}

/// A log entry as written by hand or by older versions.
///
/// Most fields are optional and some have alternative names.
#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct LogEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Uuid>,
    pub date: String,
    #[serde(alias = "type")]
    pub workout: String,
    #[serde(alias = "template")]
    pub variation: String,
    #[serde(alias = "name")]
    pub exercise: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sets: Vec<Set>,
    #[serde(alias = "note", skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
}

impl From<&domain::LogEntry> for LogEntry {
    fn from(value: &domain::LogEntry) -> Self {
        Self {
            session: value.session_id.map(|id| *id),
            date: value.date.format("%Y-%m-%d").to_string(),
            workout: value.slot.workout_type.to_string(),
            variation: value.slot.variation.to_string(),
            exercise: value.exercise.to_string(),
            sets: value.sets.iter().map(Set::from).collect(),
            notes: value.notes.clone(),
            weight: None,
            reps: None,
        }
    }
}

impl TryFrom<LogEntry> for domain::LogEntry {
    type Error = ConversionError;

    fn try_from(value: LogEntry) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(value.date.trim(), "%Y-%m-%d")
            .map_err(|_| ConversionError::Date(value.date.clone()))?;
        let variation = if value.variation.trim().is_empty() {
            domain::Variation::A.to_string()
        } else {
            value.variation
        };
        let slot = format!("{} {variation}", value.workout).parse::<domain::Slot>()?;
        let exercise = domain::Name::new(&value.exercise)?;
        let mut sets = value
            .sets
            .into_iter()
            .map(domain::SetRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        if sets.is_empty()
            && let Some(reps) = value.reps
        {
            sets.push(domain::SetRecord::try_from(Set {
                weight: value.weight,
                reps,
            })?);
        }
        let notes = value.notes.trim().to_string();
        if sets.is_empty() && notes.is_empty() {
            return Err(ConversionError::Empty);
        }
        Ok(Self {
            session_id: value.session.map(domain::SessionID::from),
            date,
            slot,
            exercise,
            sets,
            notes,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Set {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
    pub reps: u32,
}

impl From<&domain::SetRecord> for Set {
    fn from(value: &domain::SetRecord) -> Self {
        Self {
            weight: value.weight.map(f32::from),
            reps: value.reps.into(),
        }
    }
}

impl TryFrom<Set> for domain::SetRecord {
    type Error = ConversionError;

    fn try_from(value: Set) -> Result<Self, Self::Error> {
        Ok(Self {
            weight: value.weight.map(domain::Weight::new).transpose()?,
            reps: domain::Reps::new(value.reps)?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub date: NaiveDate,
    pub workout: String,
    pub variation: String,
    pub day: u64,
    pub exercises: Vec<SessionExercise>,
}

impl From<&domain::WorkoutSession> for WorkoutSession {
    fn from(value: &domain::WorkoutSession) -> Self {
        Self {
            id: *value.id,
            date: value.date,
            workout: value.slot.workout_type.to_string(),
            variation: value.slot.variation.to_string(),
            day: value.day,
            exercises: value.exercises.iter().map(SessionExercise::from).collect(),
        }
    }
}

impl TryFrom<WorkoutSession> for domain::WorkoutSession {
    type Error = ConversionError;

    fn try_from(value: WorkoutSession) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            date: value.date,
            slot: format!("{} {}", value.workout, value.variation).parse()?,
            day: value.day,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::SessionExercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SessionExercise {
    pub name: String,
    #[serde(default)]
    pub previous: Option<Performance>,
    pub sets: Vec<SessionSet>,
    #[serde(default)]
    pub notes: String,
}

impl From<&domain::SessionExercise> for SessionExercise {
    fn from(value: &domain::SessionExercise) -> Self {
        Self {
            name: value.name.to_string(),
            previous: value.previous.as_ref().map(Performance::from),
            sets: value.sets.iter().map(SessionSet::from).collect(),
            notes: value.notes.clone(),
        }
    }
}

impl TryFrom<SessionExercise> for domain::SessionExercise {
    type Error = ConversionError;

    fn try_from(value: SessionExercise) -> Result<Self, Self::Error> {
        Ok(Self {
            name: domain::Name::new(&value.name)?,
            previous: value
                .previous
                .map(domain::Performance::try_from)
                .transpose()?,
            sets: value
                .sets
                .into_iter()
                .map(domain::SessionSet::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            notes: value.notes,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Performance {
    pub date: NaiveDate,
    pub sets: Vec<Set>,
    #[serde(default)]
    pub notes: String,
}

impl From<&domain::Performance> for Performance {
    fn from(value: &domain::Performance) -> Self {
        Self {
            date: value.date,
            sets: value.sets.iter().map(Set::from).collect(),
            notes: value.notes.clone(),
        }
    }
}

impl TryFrom<Performance> for domain::Performance {
    type Error = ConversionError;

    fn try_from(value: Performance) -> Result<Self, Self::Error> {
        Ok(Self {
            date: value.date,
            sets: value
                .sets
                .into_iter()
                .map(domain::SetRecord::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            notes: value.notes,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct SessionSet {
    #[serde(default)]
    pub target: Option<Set>,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub bodyweight: bool,
    #[serde(default)]
    pub completed: bool,
}

impl From<&domain::SessionSet> for SessionSet {
    fn from(value: &domain::SessionSet) -> Self {
        Self {
            target: value.target.as_ref().map(Set::from),
            weight: value.weight.map(f32::from),
            reps: value.reps.map(u32::from),
            bodyweight: value.bodyweight,
            completed: value.completed,
        }
    }
}

impl TryFrom<SessionSet> for domain::SessionSet {
    type Error = ConversionError;

    fn try_from(value: SessionSet) -> Result<Self, Self::Error> {
        Ok(Self {
            target: value.target.map(domain::SetRecord::try_from).transpose()?,
            weight: value.weight.map(domain::Weight::new).transpose()?,
            reps: value.reps.map(domain::Reps::new).transpose()?,
            bodyweight: value.bodyweight,
            completed: value.completed,
        })
    }
}

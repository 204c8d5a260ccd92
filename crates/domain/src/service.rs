use chrono::NaiveDate;
use log::{debug, error, info};

use crate::{
    CompletedWorkout, DeleteError, History, HistoryRepository, HistoryService, HistorySession,
    Interval, Name, Performance, ProgressPoint, ProgressService, ReadError, Rotation,
    RotationRepository, RotationService, Slot, UpdateError, WorkoutError, WorkoutPlan,
    WorkoutService, WorkoutSession, WorkoutSessionRepository, progress, template,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R: HistoryRepository> Service<R> {
    fn read_history(&self) -> Result<History, ReadError> {
        Ok(History::new(
            self.repository.read_seed()?,
            self.repository.read_log()?,
        ))
    }
}

macro_rules! log_on_error {
    ($func: expr, $action: literal, $entity: literal) => {{
        let result = $func;
        if let Err(ref err) = result {
            error!("failed to {} {}: {err}", $action, $entity);
        }
        result
    }};
}

impl<R: HistoryRepository> HistoryService for Service<R> {
    fn get_history(&self) -> Result<History, ReadError> {
        log_on_error!(self.read_history(), "get", "history")
    }

    fn get_sessions(&self) -> Result<Vec<HistorySession>, ReadError> {
        log_on_error!(
            self.read_history().map(|h| h.sessions()),
            "get",
            "sessions"
        )
    }

    fn delete_session(&self, date: NaiveDate, slot: Slot) -> Result<usize, DeleteError> {
        log_on_error!(
            (|| -> Result<usize, DeleteError> {
                let removed = self.repository.delete_log_entries(date, slot)?;
                if removed == 0 {
                    return Err(DeleteError::NotFound);
                }
                info!("deleted {removed} entries of {slot} on {date}");
                Ok(removed)
            })(),
            "delete",
            "session"
        )
    }
}

impl<R: RotationRepository> RotationService for Service<R> {
    fn get_rotation(&self) -> Result<Rotation, ReadError> {
        log_on_error!(self.repository.read_rotation(), "get", "rotation")
    }

    fn skip_slot(&self) -> Result<Rotation, UpdateError> {
        log_on_error!(
            (|| -> Result<Rotation, UpdateError> {
                let rotation = self.repository.read_rotation()?.advance();
                self.repository.write_rotation(rotation)?;
                Ok(rotation)
            })(),
            "skip",
            "slot"
        )
    }

    fn jump_to_slot(&self, slot: Slot) -> Result<Rotation, UpdateError> {
        log_on_error!(
            (|| -> Result<Rotation, UpdateError> {
                let rotation = self.repository.read_rotation()?.jump_to(slot);
                self.repository.write_rotation(rotation)?;
                Ok(rotation)
            })(),
            "jump to",
            "slot"
        )
    }
}

impl<R> WorkoutService for Service<R>
where
    R: HistoryRepository + RotationRepository + WorkoutSessionRepository,
{
    fn plan_workout(&self) -> Result<WorkoutPlan, ReadError> {
        log_on_error!(
            (|| -> Result<WorkoutPlan, ReadError> {
                let rotation = self.repository.read_rotation()?;
                let history = self.read_history()?;
                Ok(template::resolve(&history, rotation.slot(), rotation.day()))
            })(),
            "plan",
            "workout"
        )
    }

    fn start_workout(
        &self,
        date: NaiveDate,
        default_sets: usize,
    ) -> Result<WorkoutSession, WorkoutError> {
        log_on_error!(
            (|| -> Result<WorkoutSession, WorkoutError> {
                if let Some(workout_session) = self.repository.read_workout_session()? {
                    debug!("resuming workout of {}", workout_session.date);
                    return Ok(workout_session);
                }
                let plan = self.plan_workout()?;
                let workout_session = WorkoutSession::new(date, &plan, default_sets);
                self.repository
                    .write_workout_session(Some(workout_session.clone()))?;
                info!(
                    "started {} with {} exercises",
                    workout_session.slot,
                    workout_session.exercises.len()
                );
                Ok(workout_session)
            })(),
            "start",
            "workout"
        )
    }

    fn get_workout(&self) -> Result<Option<WorkoutSession>, ReadError> {
        log_on_error!(self.repository.read_workout_session(), "get", "workout")
    }

    fn save_workout(&self, workout_session: WorkoutSession) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.write_workout_session(Some(workout_session)),
            "save",
            "workout"
        )
    }

    fn discard_workout(&self) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.write_workout_session(None),
            "discard",
            "workout"
        )
    }

    fn complete_workout(&self) -> Result<CompletedWorkout, WorkoutError> {
        log_on_error!(
            (|| -> Result<CompletedWorkout, WorkoutError> {
                let workout_session = self
                    .repository
                    .read_workout_session()?
                    .ok_or(WorkoutError::NoWorkout)?;
                let entries = workout_session.finish()?;
                let rotation = self.repository.read_rotation()?.advance();
                self.repository.append_log(entries.clone())?;
                self.repository.write_rotation(rotation)?;
                self.repository.write_workout_session(None)?;
                info!(
                    "completed {} with {} exercises",
                    workout_session.slot,
                    entries.len()
                );
                Ok(CompletedWorkout {
                    entries,
                    next: rotation.slot(),
                })
            })(),
            "complete",
            "workout"
        )
    }

    fn get_previous_performance(&self, exercise: &Name) -> Result<Option<Performance>, ReadError> {
        log_on_error!(
            self.read_history().map(|h| h.last_performance(exercise)),
            "get",
            "previous performance"
        )
    }
}

impl<R: HistoryRepository> ProgressService for Service<R> {
    fn get_exercise_names(&self) -> Result<Vec<Name>, ReadError> {
        log_on_error!(
            self.read_history().map(|h| h.exercise_names()),
            "get",
            "exercise names"
        )
    }

    fn get_progress(
        &self,
        exercise: &Name,
        interval: Option<Interval>,
    ) -> Result<Vec<ProgressPoint>, ReadError> {
        log_on_error!(
            self.read_history()
                .map(|h| progress::progress(&h, exercise, interval.as_ref())),
            "get",
            "progress"
        )
    }
}

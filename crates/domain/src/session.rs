use chrono::NaiveDate;

use crate::{
    LogEntry, Name, Performance, ReadError, Reps, SessionID, SetRecord, Slot, UpdateError,
    Weight, WorkoutPlan,
};

pub trait WorkoutService {
    fn plan_workout(&self) -> Result<WorkoutPlan, ReadError>;
    /// Start the workout of the current slot, or resume the ongoing one.
    fn start_workout(
        &self,
        date: NaiveDate,
        default_sets: usize,
    ) -> Result<WorkoutSession, WorkoutError>;
    fn get_workout(&self) -> Result<Option<WorkoutSession>, ReadError>;
    fn save_workout(&self, workout_session: WorkoutSession) -> Result<(), UpdateError>;
    fn discard_workout(&self) -> Result<(), UpdateError>;
    /// Append the completed sets to the log and move the rotation forward.
    fn complete_workout(&self) -> Result<CompletedWorkout, WorkoutError>;
    fn get_previous_performance(&self, exercise: &Name) -> Result<Option<Performance>, ReadError>;
}

pub trait WorkoutSessionRepository {
    fn read_workout_session(&self) -> Result<Option<WorkoutSession>, ReadError>;
    fn write_workout_session(
        &self,
        workout_session: Option<WorkoutSession>,
    ) -> Result<(), UpdateError>;
}

/// The workout of today while it is being performed.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub id: SessionID,
    pub date: NaiveDate,
    pub slot: Slot,
    pub day: u64,
    pub exercises: Vec<SessionExercise>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionExercise {
    pub name: Name,
    pub previous: Option<Performance>,
    pub sets: Vec<SessionSet>,
    pub notes: String,
}

/// A set of the ongoing workout.
///
/// The target is the corresponding set of the previous performance. Values
/// entered by the user override the target.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionSet {
    pub target: Option<SetRecord>,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
    /// Performed without weight, regardless of the target.
    pub bodyweight: bool,
    pub completed: bool,
}

impl SessionSet {
    #[must_use]
    pub fn weight(&self) -> Option<Weight> {
        if self.bodyweight {
            return None;
        }
        self.weight.or(self.target.and_then(|t| t.weight))
    }

    #[must_use]
    pub fn reps(&self) -> Option<Reps> {
        self.reps.or(self.target.map(|t| t.reps))
    }

    #[must_use]
    pub fn is_overridden(&self) -> bool {
        let target_weight = self.target.and_then(|t| t.weight);
        let target_reps = self.target.map(|t| t.reps);
        (self.bodyweight && target_weight.is_some())
            || self.weight.is_some_and(|w| Some(w) != target_weight)
            || self.reps.is_some_and(|r| Some(r) != target_reps)
    }

    #[must_use]
    pub fn record(&self) -> Option<SetRecord> {
        Some(SetRecord {
            weight: self.weight(),
            reps: self.reps()?,
        })
    }
}

impl WorkoutSession {
    #[must_use]
    pub fn new(date: NaiveDate, plan: &WorkoutPlan, default_sets: usize) -> Self {
        Self {
            id: SessionID::new(),
            date,
            slot: plan.slot,
            day: plan.day,
            exercises: plan
                .exercises
                .iter()
                .map(|e| SessionExercise::new(e.name.clone(), e.previous.clone(), default_sets))
                .collect(),
        }
    }

    pub fn exercise(&self, exercise_idx: usize) -> Result<&SessionExercise, SessionError> {
        self.exercises
            .get(exercise_idx)
            .ok_or(SessionError::NoSuchExercise(exercise_idx))
    }

    fn exercise_mut(&mut self, exercise_idx: usize) -> Result<&mut SessionExercise, SessionError> {
        self.exercises
            .get_mut(exercise_idx)
            .ok_or(SessionError::NoSuchExercise(exercise_idx))
    }

    fn set_mut(
        &mut self,
        exercise_idx: usize,
        set_idx: usize,
    ) -> Result<&mut SessionSet, SessionError> {
        self.exercise_mut(exercise_idx)?
            .sets
            .get_mut(set_idx)
            .ok_or(SessionError::NoSuchSet {
                exercise_idx,
                set_idx,
            })
    }

    pub fn set_weight(
        &mut self,
        exercise_idx: usize,
        set_idx: usize,
        weight: Option<Weight>,
    ) -> Result<(), SessionError> {
        let set = self.set_mut(exercise_idx, set_idx)?;
        set.weight = weight;
        set.bodyweight = false;
        Ok(())
    }

    pub fn set_bodyweight(&mut self, exercise_idx: usize, set_idx: usize) -> Result<(), SessionError> {
        let set = self.set_mut(exercise_idx, set_idx)?;
        set.weight = None;
        set.bodyweight = true;
        Ok(())
    }

    pub fn set_reps(
        &mut self,
        exercise_idx: usize,
        set_idx: usize,
        reps: Option<Reps>,
    ) -> Result<(), SessionError> {
        let set = self.set_mut(exercise_idx, set_idx)?;
        if set.completed && reps.is_none() && set.target.is_none() {
            return Err(SessionError::MissingReps {
                exercise_idx,
                set_idx,
            });
        }
        set.reps = reps;
        Ok(())
    }

    pub fn clear_override(&mut self, exercise_idx: usize, set_idx: usize) -> Result<(), SessionError> {
        let set = self.set_mut(exercise_idx, set_idx)?;
        if set.completed && set.target.is_none() {
            return Err(SessionError::MissingReps {
                exercise_idx,
                set_idx,
            });
        }
        set.weight = None;
        set.reps = None;
        set.bodyweight = false;
        Ok(())
    }

    /// Mark a set as completed or revert it. Returns the new completion state.
    pub fn toggle_completed(
        &mut self,
        exercise_idx: usize,
        set_idx: usize,
    ) -> Result<bool, SessionError> {
        let set = self.set_mut(exercise_idx, set_idx)?;
        if !set.completed && set.reps().is_none() {
            return Err(SessionError::MissingReps {
                exercise_idx,
                set_idx,
            });
        }
        set.completed = !set.completed;
        Ok(set.completed)
    }

    /// Append a set which repeats the values of the last set.
    pub fn add_set(&mut self, exercise_idx: usize) -> Result<usize, SessionError> {
        let exercise = self.exercise_mut(exercise_idx)?;
        let set = exercise
            .sets
            .last()
            .map(|s| SessionSet {
                target: None,
                weight: s.weight(),
                reps: s.reps(),
                bodyweight: false,
                completed: false,
            })
            .unwrap_or_default();
        exercise.sets.push(set);
        Ok(exercise.sets.len() - 1)
    }

    pub fn remove_set(&mut self, exercise_idx: usize, set_idx: usize) -> Result<(), SessionError> {
        let exercise = self.exercise_mut(exercise_idx)?;
        if set_idx >= exercise.sets.len() {
            return Err(SessionError::NoSuchSet {
                exercise_idx,
                set_idx,
            });
        }
        exercise.sets.remove(set_idx);
        Ok(())
    }

    pub fn add_exercise(
        &mut self,
        name: Name,
        previous: Option<Performance>,
        default_sets: usize,
    ) -> usize {
        self.exercises
            .push(SessionExercise::new(name, previous, default_sets));
        self.exercises.len() - 1
    }

    pub fn remove_exercise(&mut self, exercise_idx: usize) -> Result<SessionExercise, SessionError> {
        if exercise_idx >= self.exercises.len() {
            return Err(SessionError::NoSuchExercise(exercise_idx));
        }
        Ok(self.exercises.remove(exercise_idx))
    }

    /// Replace the exercise while keeping the entered values.
    pub fn rename_exercise(
        &mut self,
        exercise_idx: usize,
        name: Name,
        previous: Option<Performance>,
    ) -> Result<(), SessionError> {
        let exercise = self.exercise_mut(exercise_idx)?;
        let targets = targets(previous.as_ref());
        for (i, set) in exercise.sets.iter_mut().enumerate() {
            let (weight, reps) = (set.weight(), set.reps());
            set.target = targets.get(i).copied();
            set.weight = weight;
            set.reps = reps;
        }
        exercise.name = name;
        exercise.previous = previous;
        Ok(())
    }

    pub fn set_notes(&mut self, exercise_idx: usize, notes: &str) -> Result<(), SessionError> {
        notes.trim().clone_into(&mut self.exercise_mut(exercise_idx)?.notes);
        Ok(())
    }

    /// Number of completed sets and number of all sets.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        self.exercises.iter().fold((0, 0), |(completed, total), e| {
            (
                completed + e.sets.iter().filter(|s| s.completed).count(),
                total + e.sets.len(),
            )
        })
    }

    /// Fold the completed sets into log entries.
    pub fn finish(&self) -> Result<Vec<LogEntry>, SessionError> {
        let entries = self
            .exercises
            .iter()
            .filter_map(|e| {
                let sets = e
                    .sets
                    .iter()
                    .filter(|s| s.completed)
                    .filter_map(SessionSet::record)
                    .collect::<Vec<_>>();
                if sets.is_empty() {
                    None
                } else {
                    Some(LogEntry {
                        session_id: Some(self.id),
                        date: self.date,
                        slot: self.slot,
                        exercise: e.name.clone(),
                        sets,
                        notes: e.notes.clone(),
                    })
                }
            })
            .collect::<Vec<_>>();

        if entries.is_empty() {
            return Err(SessionError::NothingCompleted);
        }

        Ok(entries)
    }
}

impl SessionExercise {
    fn new(name: Name, previous: Option<Performance>, default_sets: usize) -> Self {
        let targets = targets(previous.as_ref());
        let sets = if targets.is_empty() {
            vec![SessionSet::default(); default_sets]
        } else {
            targets
                .into_iter()
                .map(|t| SessionSet {
                    target: Some(t),
                    ..SessionSet::default()
                })
                .collect()
        };
        Self {
            name,
            previous,
            sets,
            notes: String::new(),
        }
    }
}

fn targets(previous: Option<&Performance>) -> Vec<SetRecord> {
    previous.map(|p| p.sets.clone()).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedWorkout {
    pub entries: Vec<LogEntry>,
    pub next: Slot,
}

#[derive(thiserror::Error, Debug)]
pub enum WorkoutError {
    #[error("No workout in progress")]
    NoWorkout,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Update(#[from] UpdateError),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("No exercise {}", .0 + 1)]
    NoSuchExercise(usize),
    #[error("No set {} in exercise {}", .set_idx + 1, .exercise_idx + 1)]
    NoSuchSet { exercise_idx: usize, set_idx: usize },
    #[error("Set {} of exercise {} has no reps", .set_idx + 1, .exercise_idx + 1)]
    MissingReps { exercise_idx: usize, set_idx: usize },
    #[error("No set has been completed")]
    NothingCompleted,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{PlannedExercise, Variation, WorkoutType};

    use super::*;

    const PUSH_A: Slot = Slot::new(WorkoutType::Push, Variation::A);

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
    }

    fn set(weight: Option<f32>, reps: u32) -> SetRecord {
        SetRecord {
            weight: weight.map(|w| Weight::new(w).unwrap()),
            reps: Reps::new(reps).unwrap(),
        }
    }

    fn plan() -> WorkoutPlan {
        WorkoutPlan {
            slot: PUSH_A,
            day: 2,
            source_date: Some(date(1)),
            exercises: vec![
                PlannedExercise {
                    name: Name::new("Bench Press").unwrap(),
                    previous: Some(Performance {
                        date: date(1),
                        sets: vec![set(Some(80.0), 8), set(Some(80.0), 7)],
                        notes: String::new(),
                    }),
                },
                PlannedExercise {
                    name: Name::new("Dips").unwrap(),
                    previous: None,
                },
            ],
        }
    }

    fn session() -> WorkoutSession {
        WorkoutSession::new(date(8), &plan(), 3)
    }

    #[test]
    fn test_new() {
        let session = session();
        assert_eq!(session.date, date(8));
        assert_eq!(session.slot, PUSH_A);
        assert_eq!(session.day, 2);
        assert_eq!(
            session.exercises[0].sets,
            vec![
                SessionSet {
                    target: Some(set(Some(80.0), 8)),
                    ..SessionSet::default()
                },
                SessionSet {
                    target: Some(set(Some(80.0), 7)),
                    ..SessionSet::default()
                },
            ]
        );
        assert_eq!(session.exercises[1].sets, vec![SessionSet::default(); 3]);
        assert_eq!(session.progress(), (0, 5));
    }

    #[test]
    fn test_override() {
        let mut session = session();
        let weight = Some(Weight::new(82.5).unwrap());

        session.set_weight(0, 0, weight).unwrap();
        let s = session.exercises[0].sets[0];
        assert_eq!(s.weight(), weight);
        assert_eq!(s.reps(), Some(Reps::new(8).unwrap()));
        assert!(s.is_overridden());

        session.clear_override(0, 0).unwrap();
        let s = session.exercises[0].sets[0];
        assert_eq!(s.weight(), Some(Weight::new(80.0).unwrap()));
        assert!(!s.is_overridden());
    }

    #[test]
    fn test_bodyweight_override() {
        let mut session = session();

        session.set_bodyweight(0, 0).unwrap();
        let s = session.exercises[0].sets[0];
        assert_eq!(s.weight(), None);
        assert!(s.is_overridden());
        assert_eq!(
            s.record(),
            Some(SetRecord {
                weight: None,
                reps: Reps::new(8).unwrap()
            })
        );

        session
            .set_weight(0, 0, Some(Weight::new(60.0).unwrap()))
            .unwrap();
        assert_eq!(
            session.exercises[0].sets[0].weight(),
            Some(Weight::new(60.0).unwrap())
        );

        session.set_bodyweight(0, 0).unwrap();
        session.set_weight(0, 0, None).unwrap();
        assert_eq!(
            session.exercises[0].sets[0].weight(),
            Some(Weight::new(80.0).unwrap())
        );

        session.set_bodyweight(1, 0).unwrap();
        assert!(!session.exercises[1].sets[0].is_overridden());
    }

    #[test]
    fn test_clear_single_override() {
        let mut session = session();
        session
            .set_weight(0, 0, Some(Weight::new(85.0).unwrap()))
            .unwrap();
        session.set_reps(0, 0, Some(Reps::new(5).unwrap())).unwrap();

        session.set_reps(0, 0, None).unwrap();
        assert_eq!(
            session.exercises[0].sets[0].record(),
            Some(set(Some(85.0), 8))
        );

        session.set_reps(0, 0, Some(Reps::new(5).unwrap())).unwrap();
        session.set_weight(0, 0, None).unwrap();
        assert_eq!(
            session.exercises[0].sets[0].record(),
            Some(set(Some(80.0), 5))
        );
    }

    #[test]
    fn test_override_with_target_value_is_no_override() {
        let mut session = session();
        session
            .set_weight(0, 1, Some(Weight::new(80.0).unwrap()))
            .unwrap();
        session.set_reps(0, 1, Some(Reps::new(7).unwrap())).unwrap();
        assert!(!session.exercises[0].sets[1].is_overridden());
    }

    #[test]
    fn test_edits_keep_completion() {
        let mut session = session();
        assert_eq!(session.toggle_completed(0, 0), Ok(true));
        session.set_reps(0, 0, Some(Reps::new(10).unwrap())).unwrap();
        assert!(session.exercises[0].sets[0].completed);
        assert_eq!(
            session.exercises[0].sets[0].record(),
            Some(set(Some(80.0), 10))
        );
        assert_eq!(session.toggle_completed(0, 0), Ok(false));
    }

    #[test]
    fn test_toggle_completed_requires_reps() {
        let mut session = session();
        assert_eq!(
            session.toggle_completed(1, 0),
            Err(SessionError::MissingReps {
                exercise_idx: 1,
                set_idx: 0
            })
        );
        session.set_reps(1, 0, Some(Reps::new(12).unwrap())).unwrap();
        assert_eq!(session.toggle_completed(1, 0), Ok(true));
        assert_eq!(
            session.set_reps(1, 0, None),
            Err(SessionError::MissingReps {
                exercise_idx: 1,
                set_idx: 0
            })
        );
        assert_eq!(
            session.clear_override(1, 0),
            Err(SessionError::MissingReps {
                exercise_idx: 1,
                set_idx: 0
            })
        );
    }

    #[test]
    fn test_invalid_indices() {
        let mut session = session();
        assert_eq!(
            session.set_weight(2, 0, None),
            Err(SessionError::NoSuchExercise(2))
        );
        assert_eq!(
            session.toggle_completed(0, 2),
            Err(SessionError::NoSuchSet {
                exercise_idx: 0,
                set_idx: 2
            })
        );
        assert_eq!(
            session.remove_set(1, 3),
            Err(SessionError::NoSuchSet {
                exercise_idx: 1,
                set_idx: 3
            })
        );
        assert_eq!(
            session.remove_exercise(5).map(|e| e.name),
            Err(SessionError::NoSuchExercise(5))
        );
        assert_eq!(
            SessionError::NoSuchSet {
                exercise_idx: 0,
                set_idx: 2
            }
            .to_string(),
            "No set 3 in exercise 1"
        );
    }

    #[test]
    fn test_add_and_remove_sets() {
        let mut session = session();
        session
            .set_weight(0, 1, Some(Weight::new(85.0).unwrap()))
            .unwrap();
        assert_eq!(session.add_set(0), Ok(2));
        assert_eq!(
            session.exercises[0].sets[2],
            SessionSet {
                target: None,
                weight: Some(Weight::new(85.0).unwrap()),
                reps: Some(Reps::new(7).unwrap()),
                bodyweight: false,
                completed: false,
            }
        );
        session.remove_set(0, 0).unwrap();
        assert_eq!(session.exercises[0].sets.len(), 2);
        assert_eq!(
            session.exercises[0].sets[0].weight(),
            Some(Weight::new(85.0).unwrap())
        );
    }

    #[test]
    fn test_add_remove_and_rename_exercises() {
        let mut session = session();
        let idx = session.add_exercise(Name::new("Lateral Raise").unwrap(), None, 2);
        assert_eq!(idx, 2);
        assert_eq!(session.exercises[2].sets.len(), 2);

        session
            .set_weight(2, 0, Some(Weight::new(10.0).unwrap()))
            .unwrap();
        session
            .rename_exercise(
                2,
                Name::new("Cable Lateral Raise").unwrap(),
                Some(Performance {
                    date: date(1),
                    sets: vec![set(Some(7.5), 15)],
                    notes: String::new(),
                }),
            )
            .unwrap();
        let exercise = &session.exercises[2];
        assert_eq!(exercise.name.to_string(), "Cable Lateral Raise");
        assert_eq!(exercise.sets[0].weight(), Some(Weight::new(10.0).unwrap()));
        assert_eq!(exercise.sets[0].reps(), Some(Reps::new(15).unwrap()));
        assert_eq!(exercise.sets[1].target, None);

        let removed = session.remove_exercise(0).unwrap();
        assert_eq!(removed.name.to_string(), "Bench Press");
        assert_eq!(session.exercises.len(), 2);
    }

    #[test]
    fn test_finish() {
        let mut session = session();
        assert_eq!(session.finish(), Err(SessionError::NothingCompleted));

        session.toggle_completed(0, 0).unwrap();
        session.set_reps(0, 1, Some(Reps::new(6).unwrap())).unwrap();
        session.toggle_completed(0, 1).unwrap();
        session.set_notes(0, "  felt strong ").unwrap();
        session.set_reps(1, 0, Some(Reps::new(12).unwrap())).unwrap();

        assert_eq!(session.progress(), (2, 5));
        assert_eq!(
            session.finish(),
            Ok(vec![LogEntry {
                session_id: Some(session.id),
                date: date(8),
                slot: PUSH_A,
                exercise: Name::new("Bench Press").unwrap(),
                sets: vec![set(Some(80.0), 8), set(Some(80.0), 6)],
                notes: "felt strong".to_string(),
            }])
        );
    }
}

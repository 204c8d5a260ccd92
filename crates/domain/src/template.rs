use chrono::NaiveDate;

use crate::{History, Name, Performance, Slot};

/// The ordered exercises logged for a slot on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub exercises: Vec<Name>,
    pub last_used: NaiveDate,
}

impl Signature {
    fn matches(&self, exercises: &[Name]) -> bool {
        self.exercises.len() == exercises.len()
            && self.exercises.iter().zip(exercises).all(|(a, b)| a.is(b))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutPlan {
    pub slot: Slot,
    pub day: u64,
    pub source_date: Option<NaiveDate>,
    pub exercises: Vec<PlannedExercise>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedExercise {
    pub name: Name,
    pub previous: Option<Performance>,
}

/// Distinct signatures of a slot in order of first appearance.
#[must_use]
pub fn signatures(history: &History, slot: Slot) -> Vec<Signature> {
    let mut per_date: Vec<(NaiveDate, Vec<Name>)> = vec![];

    for entry in history.iter().filter(|e| e.slot == slot) {
        match per_date.last_mut() {
            Some((date, exercises)) if *date == entry.date => {
                if !exercises.iter().any(|e| e.is(&entry.exercise)) {
                    exercises.push(entry.exercise.clone());
                }
            }
            _ => per_date.push((entry.date, vec![entry.exercise.clone()])),
        }
    }

    let mut result: Vec<Signature> = vec![];

    for (date, exercises) in per_date {
        if let Some(signature) = result.iter_mut().find(|s| s.matches(&exercises)) {
            signature.last_used = date;
        } else {
            result.push(Signature {
                exercises,
                last_used: date,
            });
        }
    }

    result
}

/// Reconstruct the exercises of a slot for the given rotation day.
///
/// The signatures of a slot are used in turn, one per rotation day. Each
/// exercise carries its most recent performance, regardless of the slot it was
/// performed in.
#[must_use]
pub fn resolve(history: &History, slot: Slot, day: u64) -> WorkoutPlan {
    let signatures = signatures(history, slot);

    if signatures.is_empty() {
        return WorkoutPlan {
            slot,
            day,
            source_date: None,
            exercises: vec![],
        };
    }

    #[allow(clippy::cast_possible_truncation)]
    let signature = &signatures[(day % signatures.len() as u64) as usize];

    WorkoutPlan {
        slot,
        day,
        source_date: Some(signature.last_used),
        exercises: signature
            .exercises
            .iter()
            .map(|name| PlannedExercise {
                name: name.clone(),
                previous: history.last_performance(name),
            })
            .collect(),
    }
}

use std::{fmt, str::FromStr};

use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Display, EnumString, EnumIter, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[strum(ascii_case_insensitive)]
pub enum WorkoutType {
    Push,
    Pull,
    Legs,
}

#[derive(Debug, Display, EnumString, EnumIter, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[strum(ascii_case_insensitive)]
pub enum Variation {
    A,
    B,
    C,
}

/// One position of the rotation: a workout type in one of its variations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub workout_type: WorkoutType,
    pub variation: Variation,
}

impl Slot {
    #[must_use]
    pub const fn new(workout_type: WorkoutType, variation: Variation) -> Self {
        Self {
            workout_type,
            variation,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.workout_type, self.variation)
    }
}

impl FromStr for Slot {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>();

        if compact.len() < 2 || !compact.is_ascii() {
            return Err(SlotError::Invalid(s.to_string()));
        }

        let (workout_type, variation) = compact.split_at(compact.len() - 1);

        Ok(Slot {
            workout_type: WorkoutType::from_str(workout_type)
                .map_err(|_| SlotError::UnknownWorkoutType(workout_type.to_string()))?,
            variation: Variation::from_str(variation)
                .map_err(|_| SlotError::UnknownVariation(variation.to_string()))?,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SlotError {
    #[error("Invalid workout \"{0}\" (expected e.g. \"Push A\")")]
    Invalid(String),
    #[error("Unknown workout type \"{0}\" (expected Push, Pull or Legs)")]
    UnknownWorkoutType(String),
    #[error("Unknown variation \"{0}\" (expected A, B or C)")]
    UnknownVariation(String),
}

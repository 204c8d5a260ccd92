use crate::{
    ReadError, Slot, UpdateError,
    Variation::{A, B, C},
    WorkoutType::{Legs, Pull, Push},
};

pub trait RotationRepository {
    fn read_rotation(&self) -> Result<Rotation, ReadError>;
    fn write_rotation(&self, rotation: Rotation) -> Result<(), UpdateError>;
}

pub trait RotationService {
    fn get_rotation(&self) -> Result<Rotation, ReadError>;
    fn skip_slot(&self) -> Result<Rotation, UpdateError>;
    fn jump_to_slot(&self, slot: Slot) -> Result<Rotation, UpdateError>;
}

pub const SEQUENCE: [Slot; 9] = [
    Slot::new(Push, A),
    Slot::new(Pull, A),
    Slot::new(Legs, A),
    Slot::new(Push, B),
    Slot::new(Pull, B),
    Slot::new(Legs, B),
    Slot::new(Push, C),
    Slot::new(Pull, C),
    Slot::new(Legs, C),
];

const LEN: u64 = SEQUENCE.len() as u64;

/// Position in the fixed rotation.
///
/// The whole state is the number of sessions that moved the rotation forward,
/// which keeps the persisted form a single integer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    completed: u64,
}

impl Rotation {
    #[must_use]
    pub fn new(completed: u64) -> Self {
        Self { completed }
    }

    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn position(&self) -> usize {
        (self.completed % LEN) as usize
    }

    /// Number of full cycles through the sequence.
    #[must_use]
    pub fn day(&self) -> u64 {
        self.completed / LEN
    }

    #[must_use]
    pub fn slot(&self) -> Slot {
        SEQUENCE[self.position()]
    }

    #[must_use]
    pub fn advance(self) -> Self {
        Self {
            completed: self.completed.saturating_add(1),
        }
    }

    #[must_use]
    pub fn jump_to(self, slot: Slot) -> Self {
        let index = SEQUENCE
            .iter()
            .position(|s| *s == slot)
            .map_or(0, |i| i as u64);
        Self {
            completed: self.day() * LEN + index,
        }
    }

    #[must_use]
    pub fn upcoming(&self, n: usize) -> Vec<Slot> {
        SEQUENCE
            .iter()
            .cycle()
            .skip(self.position())
            .take(n)
            .copied()
            .collect()
    }
}

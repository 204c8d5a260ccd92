#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod history;
mod name;
pub mod notes;
pub mod progress;
mod rotation;
mod service;
mod session;
mod set;
mod statistics;
pub mod template;
mod workout;

pub use error::*;
pub use history::*;
pub use name::*;
pub use progress::{ProgressPoint, ProgressService};
pub use rotation::*;
pub use service::*;
pub use session::*;
pub use set::*;
pub use statistics::*;
pub use template::{PlannedExercise, Signature, WorkoutPlan};
pub use workout::*;

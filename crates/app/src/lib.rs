#![warn(clippy::pedantic)]

pub mod log;
pub mod service;
mod settings;

pub use settings::*;

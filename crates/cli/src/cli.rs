use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::LevelFilter;

/// repcycle - Push/Pull/Legs training log
///
/// Plans the next workout of the rotation from your own history, records it
/// set by set and shows how each exercise progresses.
#[derive(Debug, Parser)]
#[command(name = "repcycle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the log, the rotation and the ongoing workout
    #[arg(
        long,
        global = true,
        env = "REPCYCLE_DATA_DIR",
        default_value = "repcycle-data",
        value_name = "DIR"
    )]
    pub data_dir: PathBuf,

    /// JSON file replacing the built-in seed history
    #[arg(long, global = true, env = "REPCYCLE_SEED", value_name = "FILE")]
    pub seed: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    #[must_use]
    pub fn console_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

/// Exercises and sets are numbered from 1 as shown by `show`.
#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Show the planned workout of the current slot
    Today,

    /// Start the planned workout, or resume the ongoing one
    Start,

    /// Show the ongoing workout
    Show,

    /// Enter weight or reps of a set
    Set {
        exercise: usize,
        set: usize,
        /// Weight, or "bw" for body weight
        #[arg(short, long)]
        weight: Option<String>,
        #[arg(short, long)]
        reps: Option<String>,
        /// Use the weight of the target again
        #[arg(long, conflicts_with = "weight")]
        clear_weight: bool,
        /// Use the reps of the target again
        #[arg(long, conflicts_with = "reps")]
        clear_reps: bool,
    },

    /// Mark a set as done, or undo it
    Done { exercise: usize, set: usize },

    /// Drop the entered values of a set and use the target again
    Reset { exercise: usize, set: usize },

    /// Append a set to an exercise
    AddSet { exercise: usize },

    /// Remove a set from an exercise
    RemoveSet { exercise: usize, set: usize },

    /// Append an exercise to the ongoing workout
    AddExercise { name: String },

    /// Remove an exercise from the ongoing workout
    RemoveExercise { exercise: usize },

    /// Replace an exercise, keeping the entered values
    RenameExercise { exercise: usize, name: String },

    /// Set the notes of an exercise
    Note { exercise: usize, text: String },

    /// Log the completed sets and advance the rotation
    Finish,

    /// Advance the rotation without logging anything
    Skip,

    /// Throw the ongoing workout away
    Discard,

    /// Show or change the position in the rotation
    Rotation {
        /// Move to this slot of the current cycle, e.g. "pull b"
        #[arg(long, value_name = "SLOT")]
        jump: Option<String>,
        /// Number of upcoming slots to list
        #[arg(long, default_value_t = 3, value_name = "N")]
        upcoming: usize,
    },

    /// Show the latest sessions
    History {
        #[arg(long, default_value_t = 5, value_name = "N")]
        limit: usize,
    },

    /// Delete a logged session
    Delete { date: NaiveDate, slot: String },

    /// List all logged exercises
    Exercises,

    /// Show the progress of an exercise
    Progress {
        exercise: String,
        /// all, 1y, 6m, 3m or 1m
        #[arg(long)]
        interval: Option<String>,
    },

    /// Show or change the settings
    Settings {
        /// kg or lb
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        default_sets: Option<String>,
        #[arg(long)]
        smoothing_radius: Option<String>,
        /// all, 1y, 6m, 3m or 1m
        #[arg(long)]
        default_interval: Option<String>,
    },

    /// Show the recorded events
    Events,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["repcycle", "today"], Command::Today)]
    #[case(
        &["repcycle", "set", "1", "2", "--weight", "82.5", "-r", "8"],
        Command::Set {
            exercise: 1,
            set: 2,
            weight: Some("82.5".to_string()),
            reps: Some("8".to_string()),
            clear_weight: false,
            clear_reps: false,
        }
    )]
    #[case(
        &["repcycle", "set", "2", "1", "-w", "bw", "--clear-reps"],
        Command::Set {
            exercise: 2,
            set: 1,
            weight: Some("bw".to_string()),
            reps: None,
            clear_weight: false,
            clear_reps: true,
        }
    )]
    #[case(&["repcycle", "done", "2", "3"], Command::Done { exercise: 2, set: 3 })]
    #[case(
        &["repcycle", "rename-exercise", "3", "Cable Fly"],
        Command::RenameExercise { exercise: 3, name: "Cable Fly".to_string() }
    )]
    #[case(
        &["repcycle", "rotation", "--jump", "pull b"],
        Command::Rotation { jump: Some("pull b".to_string()), upcoming: 3 }
    )]
    #[case(&["repcycle", "history"], Command::History { limit: 5 })]
    #[case(
        &["repcycle", "delete", "2025-02-14", "Legs C"],
        Command::Delete { date: NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(), slot: "Legs C".to_string() }
    )]
    #[case(
        &["repcycle", "progress", "Bench Press", "--interval", "1y"],
        Command::Progress { exercise: "Bench Press".to_string(), interval: Some("1y".to_string()) }
    )]
    fn test_parse(#[case] args: &[&str], #[case] expected: Command) {
        assert_eq!(Cli::try_parse_from(args).unwrap().command, expected);
    }

    #[rstest]
    #[case(&["repcycle", "today"], LevelFilter::Warn)]
    #[case(&["repcycle", "-v", "today"], LevelFilter::Info)]
    #[case(&["repcycle", "today", "-vvv"], LevelFilter::Debug)]
    fn test_console_level(#[case] args: &[&str], #[case] expected: LevelFilter) {
        assert_eq!(Cli::try_parse_from(args).unwrap().console_level(), expected);
    }

    #[test]
    fn test_set_conflicting_weight_arguments() {
        assert!(
            Cli::try_parse_from(["repcycle", "set", "1", "1", "-w", "80", "--clear-weight"])
                .is_err()
        );
    }

    #[test]
    fn test_data_dir() {
        let cli = Cli::try_parse_from(["repcycle", "--data-dir", "/tmp/log", "show"]).unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/log"));
    }
}

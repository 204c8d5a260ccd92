use ::log::error;
use repcycle_domain::LogEntry;

use crate::local_storage;

const SEED: &str = include_str!("seed.json");

/// History shipped with the application.
#[must_use]
pub fn seed_entries() -> Vec<LogEntry> {
    parse_log(SEED).unwrap_or_else(|err| {
        error!("failed to parse seed history: {err}");
        vec![]
    })
}

/// Parse a JSON array of log entries.
///
/// Entries which cannot be interpreted are skipped.
///
/// # Errors
///
/// Returns an error if the document is not a JSON array.
pub fn parse_log(json: &str) -> Result<Vec<LogEntry>, serde_json::Error> {
    Ok(local_storage::from_values(serde_json::from_str(json)?))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use repcycle_domain::{
        History, Name, Slot,
        Variation::{A, B},
        WorkoutType::{Pull, Push},
        template,
    };

    use super::*;

    #[test]
    fn test_seed_entries() {
        let entries = seed_entries();

        assert_eq!(entries.len(), 71);
        assert!(entries.iter().all(|e| !e.performance().is_empty()));
    }

    #[test]
    fn test_seed_templates() {
        let history = History::new(seed_entries(), vec![]);

        let push_a = template::signatures(&history, Slot::new(Push, A));
        assert_eq!(push_a.len(), 2);
        assert_eq!(
            push_a[1].exercises,
            ["Bench Press", "Overhead Press", "Dips", "Triceps Pushdown"]
                .into_iter()
                .map(|n| Name::new(n).unwrap())
                .collect::<Vec<_>>()
        );

        assert_eq!(template::signatures(&history, Slot::new(Pull, B)).len(), 2);
    }

    #[test]
    fn test_seed_previous_performance() {
        let history = History::new(seed_entries(), vec![]);
        let performance = history
            .last_performance(&Name::new("bench press").unwrap())
            .unwrap();

        assert_eq!(performance.date, NaiveDate::from_ymd_opt(2025, 1, 27).unwrap());
        assert_eq!(performance.sets.len(), 3);
    }

    #[test]
    fn test_parse_log() {
        assert_eq!(
            parse_log(r#"[{"date": "2025-01-06", "type": "push", "name": "Dips", "note": "bw x 10"}]"#)
                .unwrap()
                .len(),
            1
        );
        assert!(parse_log(r#"{"date": "2025-01-06"}"#).is_err());
    }
}

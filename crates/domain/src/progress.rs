use chrono::NaiveDate;

use crate::{History, Interval, Name, ReadError, centered_moving_average};

pub trait ProgressService {
    fn get_exercise_names(&self) -> Result<Vec<Name>, ReadError>;
    fn get_progress(
        &self,
        exercise: &Name,
        interval: Option<Interval>,
    ) -> Result<Vec<ProgressPoint>, ReadError>;
}

/// Performance of an exercise on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub sets: usize,
    pub total_reps: u32,
    pub max_weight: Option<f32>,
    pub volume: f32,
    pub estimated_one_rep_max: Option<f32>,
}

/// Chart data of an exercise, one point per date with recoverable sets.
#[must_use]
pub fn progress(
    history: &History,
    exercise: &Name,
    interval: Option<&Interval>,
) -> Vec<ProgressPoint> {
    let mut points: Vec<ProgressPoint> = vec![];

    for entry in history.entries_of(exercise) {
        if interval.is_some_and(|i| !i.contains(entry.date)) {
            continue;
        }

        let sets = entry.performance();

        if sets.is_empty() {
            continue;
        }

        if points.last().is_none_or(|p| p.date != entry.date) {
            points.push(ProgressPoint {
                date: entry.date,
                sets: 0,
                total_reps: 0,
                max_weight: None,
                volume: 0.0,
                estimated_one_rep_max: None,
            });
        }

        let Some(point) = points.last_mut() else {
            continue;
        };

        for set in &sets {
            point.sets += 1;
            point.total_reps += u32::from(set.reps);
            point.volume += set.volume();
            point.max_weight = max(point.max_weight, set.weight.map(f32::from));
            point.estimated_one_rep_max =
                max(point.estimated_one_rep_max, set.estimated_one_rep_max());
        }
    }

    points
}

/// Smoothed series of the estimated one-rep max.
#[must_use]
pub fn trend(points: &[ProgressPoint], radius: usize) -> Vec<(NaiveDate, f32)> {
    let data = points
        .iter()
        .filter_map(|p| Some((p.date, p.estimated_one_rep_max?)))
        .collect::<Vec<_>>();
    centered_moving_average(&data, radius)
}

fn max(a: Option<f32>, b: Option<f32>) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

use chrono::NaiveDate;
use repcycle_app::{Settings, Unit, log};
use repcycle_domain::{
    self as domain, HistorySession, ProgressPoint, SessionSet, WorkoutPlan, WorkoutSession,
    format_sets,
};

pub fn plan(plan: &WorkoutPlan) -> String {
    let mut lines = vec![format!("{} (day {})", plan.slot, plan.day)];
    if plan.exercises.is_empty() {
        lines.push(format!("No exercises logged for {} yet", plan.slot));
    }
    for (i, exercise) in plan.exercises.iter().enumerate() {
        lines.push(match &exercise.previous {
            Some(previous) => format!(
                "{} {}, last {}: {}",
                i + 1,
                exercise.name,
                previous.date,
                format_sets(&previous.sets)
            ),
            None => format!("{} {}", i + 1, exercise.name),
        });
    }
    lines.join("\n")
}

pub fn workout(workout: &WorkoutSession, unit: Unit) -> String {
    let (completed, total) = workout.progress();
    let mut lines = vec![format!(
        "{} (day {}), {}, {completed}/{total} sets done",
        workout.slot, workout.day, workout.date
    )];
    for (i, exercise) in workout.exercises.iter().enumerate() {
        lines.push(match &exercise.previous {
            Some(previous) => format!(
                "{} {}, last {}: {}",
                i + 1,
                exercise.name,
                previous.date,
                format_sets(&previous.sets)
            ),
            None => format!("{} {}", i + 1, exercise.name),
        });
        for (j, set) in exercise.sets.iter().enumerate() {
            lines.push(format!(
                "  {}.{} [{}] {}{}",
                i + 1,
                j + 1,
                if set.completed { "x" } else { " " },
                set_values(set, unit),
                if set.is_overridden() { " *" } else { "" }
            ));
        }
        if !exercise.notes.is_empty() {
            lines.push(format!("  notes: {}", exercise.notes));
        }
    }
    lines.join("\n")
}

fn set_values(set: &SessionSet, unit: Unit) -> String {
    let weight = match set.weight() {
        Some(weight) => format!("{weight} {unit}"),
        None if set.reps().is_some() => "BW".to_string(),
        None => "-".to_string(),
    };
    let reps = set.reps().map_or_else(|| "-".to_string(), |r| r.to_string());
    format!("{weight} x {reps}")
}

pub fn sessions(sessions: &[HistorySession]) -> String {
    sessions
        .iter()
        .map(|session| {
            let mut lines = vec![format!("{} {}", session.date, session.slot)];
            lines.extend(session.entries.iter().map(entry));
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn entry(entry: &domain::LogEntry) -> String {
    let sets = entry.performance();
    if sets.is_empty() {
        format!("  {}: {}", entry.exercise, entry.notes.replace('\n', " / "))
    } else {
        format!("  {}: {}", entry.exercise, format_sets(&sets))
    }
}

pub fn progress(
    exercise: &domain::Name,
    points: &[ProgressPoint],
    trend: &[(NaiveDate, f32)],
    unit: Unit,
) -> String {
    let mut lines = vec![
        format!("{exercise} ({unit})"),
        format!(
            "{:<10}  {:>4}  {:>4}  {:>6}  {:>8}  {:>6}  {:>6}",
            "date", "sets", "reps", "max", "volume", "e1rm", "trend"
        ),
    ];
    for point in points {
        let smoothed = trend
            .iter()
            .find(|(date, _)| *date == point.date)
            .map(|(_, value)| *value);
        lines.push(format!(
            "{:<10}  {:>4}  {:>4}  {:>6}  {:>8.1}  {:>6}  {:>6}",
            point.date.to_string(),
            point.sets,
            point.total_reps,
            optional(point.max_weight),
            point.volume,
            optional(point.estimated_one_rep_max),
            optional(smoothed),
        ));
    }
    lines.join("\n")
}

fn optional(value: Option<f32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

pub fn settings(settings: &Settings) -> String {
    [
        format!("unit              {}", settings.unit),
        format!("default sets      {}", settings.default_sets),
        format!("smoothing radius  {}", settings.smoothing_radius),
        format!("default interval  {}", settings.default_interval),
    ]
    .join("\n")
}

pub fn events(entries: &[log::Entry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} {:<5} {}", e.time, e.level, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

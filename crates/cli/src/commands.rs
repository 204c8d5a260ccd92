use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use log::{debug, info};
use repcycle_app::{
    Settings, SettingsService, Unit, log::Service as _, service::Service as AppService,
};
use repcycle_domain::{
    self as domain, DefaultInterval, HistoryService, ProgressService, RotationService, Slot,
    WorkoutService, WorkoutSession, progress,
};
use repcycle_storage::{KeyValueStore, LocalStorage};

use crate::{cli::Command, render};

pub struct App<S> {
    service: domain::Service<LocalStorage<S>>,
    app_service: AppService<LocalStorage<S>>,
    today: NaiveDate,
}

impl<S: KeyValueStore + Clone> App<S> {
    pub fn new(store: S, seed: Option<Vec<domain::LogEntry>>, today: NaiveDate) -> Self {
        let storage = LocalStorage::new(store.clone());
        let storage = match seed {
            Some(entries) => storage.with_seed(entries),
            None => storage,
        };
        Self {
            service: domain::Service::new(storage),
            app_service: AppService::new(LocalStorage::new(store)),
            today,
        }
    }

    pub fn run(&self, command: Command, out: &mut impl Write) -> Result<()> {
        debug!("running {command:?}");
        match command {
            Command::Today => self.today(out),
            Command::Start => {
                let settings = self.settings()?;
                let workout = self
                    .service
                    .start_workout(self.today, settings.default_sets())?;
                writeln!(out, "{}", render::workout(&workout, settings.unit))?;
                Ok(())
            }
            Command::Show => {
                let workout = self.workout()?;
                writeln!(out, "{}", render::workout(&workout, self.settings()?.unit))?;
                Ok(())
            }
            Command::Set {
                exercise,
                set,
                weight,
                reps,
                clear_weight,
                clear_reps,
            } => {
                let weight = weight.as_deref().map(parse_weight).transpose()?;
                let reps = reps
                    .map(|r| domain::Reps::try_from(r.as_str()))
                    .transpose()?;
                if weight.is_none() && reps.is_none() && !clear_weight && !clear_reps {
                    bail!("Nothing to set, pass --weight, --reps, --clear-weight or --clear-reps");
                }
                let (exercise_idx, set_idx) = (index(exercise)?, index(set)?);
                let (workout, ()) = self.edit(|w| {
                    match weight {
                        Some(Some(weight)) => w.set_weight(exercise_idx, set_idx, Some(weight))?,
                        Some(None) => w.set_bodyweight(exercise_idx, set_idx)?,
                        None if clear_weight => w.set_weight(exercise_idx, set_idx, None)?,
                        None => {}
                    }
                    if reps.is_some() || clear_reps {
                        w.set_reps(exercise_idx, set_idx, reps)?;
                    }
                    Ok(())
                })?;
                self.show(&workout, out)
            }
            Command::Done { exercise, set } => {
                let (exercise_idx, set_idx) = (index(exercise)?, index(set)?);
                let (workout, completed) =
                    self.edit(|w| w.toggle_completed(exercise_idx, set_idx))?;
                info!(
                    "{} set {set} of {}",
                    if completed { "completed" } else { "reverted" },
                    workout.exercises[exercise_idx].name
                );
                self.show(&workout, out)
            }
            Command::Reset { exercise, set } => {
                let (exercise_idx, set_idx) = (index(exercise)?, index(set)?);
                let (workout, ()) = self.edit(|w| w.clear_override(exercise_idx, set_idx))?;
                self.show(&workout, out)
            }
            Command::AddSet { exercise } => {
                let exercise_idx = index(exercise)?;
                let (workout, _) = self.edit(|w| w.add_set(exercise_idx))?;
                self.show(&workout, out)
            }
            Command::RemoveSet { exercise, set } => {
                let (exercise_idx, set_idx) = (index(exercise)?, index(set)?);
                let (workout, ()) = self.edit(|w| w.remove_set(exercise_idx, set_idx))?;
                self.show(&workout, out)
            }
            Command::AddExercise { name } => {
                let name = domain::Name::new(&name)?;
                let previous = self.service.get_previous_performance(&name)?;
                let default_sets = self.settings()?.default_sets();
                let (workout, _) =
                    self.edit(|w| Ok(w.add_exercise(name, previous, default_sets)))?;
                self.show(&workout, out)
            }
            Command::RemoveExercise { exercise } => {
                let exercise_idx = index(exercise)?;
                let (workout, removed) = self.edit(|w| w.remove_exercise(exercise_idx))?;
                info!("removed {} from the workout", removed.name);
                self.show(&workout, out)
            }
            Command::RenameExercise { exercise, name } => {
                let exercise_idx = index(exercise)?;
                let name = domain::Name::new(&name)?;
                let previous = self.service.get_previous_performance(&name)?;
                let (workout, ()) =
                    self.edit(|w| w.rename_exercise(exercise_idx, name, previous))?;
                self.show(&workout, out)
            }
            Command::Note { exercise, text } => {
                let exercise_idx = index(exercise)?;
                let (workout, ()) = self.edit(|w| w.set_notes(exercise_idx, &text))?;
                self.show(&workout, out)
            }
            Command::Finish => {
                let completed = self.service.complete_workout()?;
                writeln!(
                    out,
                    "Logged {} exercises. Next: {}",
                    completed.entries.len(),
                    completed.next
                )?;
                Ok(())
            }
            Command::Skip => {
                self.ensure_no_workout()?;
                let skipped = self.service.get_rotation()?.slot();
                let rotation = self.service.skip_slot()?;
                writeln!(out, "Skipped {skipped}. Next: {}", rotation.slot())?;
                Ok(())
            }
            Command::Discard => {
                self.workout()?;
                self.service.discard_workout()?;
                writeln!(out, "Discarded the ongoing workout")?;
                Ok(())
            }
            Command::Rotation { jump, upcoming } => {
                let rotation = match jump {
                    Some(slot) => {
                        self.ensure_no_workout()?;
                        self.service.jump_to_slot(slot.parse::<Slot>()?)?
                    }
                    None => self.service.get_rotation()?,
                };
                writeln!(
                    out,
                    "Current: {} (day {}, {} sessions completed)",
                    rotation.slot(),
                    rotation.day(),
                    rotation.completed()
                )?;
                if upcoming > 0 {
                    writeln!(
                        out,
                        "Next: {}",
                        rotation
                            .advance()
                            .upcoming(upcoming)
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(", ")
                    )?;
                }
                Ok(())
            }
            Command::History { limit } => {
                let sessions = self.service.get_sessions()?;
                let sessions = &sessions[..limit.min(sessions.len())];
                if sessions.is_empty() {
                    writeln!(out, "No sessions logged yet")?;
                } else {
                    writeln!(out, "{}", render::sessions(sessions))?;
                }
                Ok(())
            }
            Command::Delete { date, slot } => {
                let slot = slot.parse::<Slot>()?;
                match self.service.delete_session(date, slot) {
                    Ok(count) => {
                        writeln!(out, "Deleted {count} entries of {slot} on {date}")?;
                        Ok(())
                    }
                    Err(domain::DeleteError::NotFound) => {
                        bail!("No logged {slot} session on {date}")
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Command::Exercises => {
                for name in self.service.get_exercise_names()? {
                    writeln!(out, "{name}")?;
                }
                Ok(())
            }
            Command::Progress { exercise, interval } => {
                self.progress(&exercise, interval.as_deref(), out)
            }
            Command::Settings {
                unit,
                default_sets,
                smoothing_radius,
                default_interval,
            } => {
                let mut settings = self.settings()?;
                let changed = unit.is_some()
                    || default_sets.is_some()
                    || smoothing_radius.is_some()
                    || default_interval.is_some();
                if let Some(unit) = unit {
                    settings.unit = unit
                        .parse::<Unit>()
                        .map_err(|_| anyhow!("Invalid unit \"{unit}\" (kg or lb)"))?;
                }
                if let Some(value) = default_sets {
                    settings.default_sets = Settings::validate_default_sets(&value)?;
                }
                if let Some(value) = smoothing_radius {
                    settings.smoothing_radius = Settings::validate_smoothing_radius(&value)?;
                }
                if let Some(value) = default_interval {
                    settings.default_interval = parse_interval(&value)?;
                }
                if changed {
                    self.app_service
                        .set_settings(settings)
                        .map_err(anyhow::Error::msg)?;
                    info!("changed settings");
                }
                writeln!(out, "{}", render::settings(&settings))?;
                Ok(())
            }
            Command::Events => {
                let entries = self.app_service.get_log_entries()?;
                if !entries.is_empty() {
                    writeln!(
                        out,
                        "{}",
                        render::events(&entries.into_iter().collect::<Vec<_>>())
                    )?;
                }
                Ok(())
            }
        }
    }

    fn today(&self, out: &mut impl Write) -> Result<()> {
        let plan = self.service.plan_workout()?;
        writeln!(out, "{}", render::plan(&plan))?;
        if let Some(workout) = self.service.get_workout()? {
            writeln!(
                out,
                "A {} workout of {} is in progress",
                workout.slot, workout.date
            )?;
        }
        Ok(())
    }

    fn progress(&self, exercise: &str, interval: Option<&str>, out: &mut impl Write) -> Result<()> {
        let settings = self.settings()?;
        let name = domain::Name::new(exercise)?;
        let default_interval = match interval {
            Some(value) => parse_interval(value)?,
            None => settings.default_interval,
        };
        let points = self.service.get_progress(&name, None)?;
        if points.is_empty() {
            bail!("No sets of {name} logged");
        }
        let dates = points.iter().map(|p| p.date).collect::<Vec<_>>();
        let interval = domain::init_interval(&dates, default_interval, self.today);
        let points = points
            .into_iter()
            .filter(|p| interval.contains(p.date))
            .collect::<Vec<_>>();
        let trend = progress::trend(&points, settings.smoothing_radius as usize);
        writeln!(
            out,
            "{}",
            render::progress(&name, &points, &trend, settings.unit)
        )?;
        Ok(())
    }

    fn settings(&self) -> Result<Settings> {
        self.app_service
            .get_settings()
            .map_err(anyhow::Error::msg)
            .context("failed to read settings")
    }

    fn workout(&self) -> Result<WorkoutSession> {
        self.service
            .get_workout()?
            .ok_or_else(|| anyhow!("No workout in progress, run `repcycle start`"))
    }

    fn ensure_no_workout(&self) -> Result<()> {
        if let Some(workout) = self.service.get_workout()? {
            bail!(
                "A {} workout is in progress, finish or discard it first",
                workout.slot
            );
        }
        Ok(())
    }

    fn edit<T>(
        &self,
        f: impl FnOnce(&mut WorkoutSession) -> Result<T, domain::SessionError>,
    ) -> Result<(WorkoutSession, T)> {
        let mut workout = self.workout()?;
        let result = f(&mut workout)?;
        self.service.save_workout(workout.clone())?;
        Ok((workout, result))
    }

    fn show(&self, workout: &WorkoutSession, out: &mut impl Write) -> Result<()> {
        writeln!(out, "{}", render::workout(workout, self.settings()?.unit))?;
        Ok(())
    }
}

fn index(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| anyhow!("Exercises and sets are numbered from 1"))
}

/// `None` stands for body weight.
fn parse_weight(value: &str) -> Result<Option<domain::Weight>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("bw") || value.eq_ignore_ascii_case("bodyweight") {
        return Ok(None);
    }
    Ok(Some(domain::Weight::try_from(value)?))
}

fn parse_interval(value: &str) -> Result<DefaultInterval> {
    value
        .parse::<DefaultInterval>()
        .map_err(|_| anyhow!("Invalid interval \"{value}\" (all, 1y, 6m, 3m or 1m)"))
}

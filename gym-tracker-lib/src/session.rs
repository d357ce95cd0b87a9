// src/session.rs
//! The live workout: which exercise is current, what has been logged so far,
//! and how a session is started, resumed, finished or thrown away.
//!
//! Every mutation writes the full session snapshot to the store before it
//! returns, so a restart resumes from the last completed action.
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cascade::{resolve_initial_set, WeightFallbacks};
use crate::catalog::{Catalog, Exercise, WorkoutDay};
use crate::defaults::DefaultsCache;
use crate::history::HistoryLedger;
use crate::model::{ExerciseLog, SetEntry, SetField, WorkoutLog};
use crate::store::{save_json, KeyValueStore, StoreError, SESSION_KEY};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No workout session is in progress.")]
    NotActive,
    #[error("A session for '{0}' is already in progress. Finish or cancel it first.")]
    AlreadyActive(String),
    #[error("Workout day not found: {0}")]
    UnknownDay(String),
    #[error("Workout day '{0}' has no exercises.")]
    EmptyDay(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Snapshot of an in-progress session, exactly as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub day_id: String,
    pub current_exercise_index: usize,
    /// Logs in the order the exercises were first visited; stored as an
    /// object keyed by exercise id.
    #[serde(with = "ordered_logs")]
    pub logs: Vec<ExerciseLog>,
}

impl SessionState {
    pub fn new(day_id: &str) -> Self {
        Self {
            day_id: day_id.to_string(),
            current_exercise_index: 0,
            logs: Vec::new(),
        }
    }

    pub fn log_for(&self, exercise_id: &str) -> Option<&ExerciseLog> {
        self.logs.iter().find(|l| l.exercise_id == exercise_id)
    }

    fn log_for_mut(&mut self, exercise_id: &str) -> Option<&mut ExerciseLog> {
        self.logs.iter_mut().find(|l| l.exercise_id == exercise_id)
    }

    fn set_mut(&mut self, exercise_id: &str, set_index: usize) -> Option<&mut SetEntry> {
        self.log_for_mut(exercise_id)
            .and_then(|log| log.sets.get_mut(set_index))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Idle,
    InProgress(SessionState),
}

/// Result of moving past the current exercise.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved on; holds the new exercise index.
    Next(usize),
    /// That was the last exercise. The workout is now in the history.
    Finished(WorkoutLog),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 0-based index of the current exercise.
    pub index: usize,
    pub total: usize,
}

impl Progress {
    /// Share of exercises already left behind, 0–100.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.index as f64 / self.total as f64 * 100.0
    }

    pub const fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }
}

pub struct SessionMachine {
    store: Rc<dyn KeyValueStore>,
    catalog: Catalog,
    history: HistoryLedger,
    defaults: DefaultsCache,
    fallbacks: WeightFallbacks,
    status: SessionStatus,
}

impl SessionMachine {
    /// Loads history and defaults from `store` and resumes the stored
    /// session when it still matches the catalog.
    pub fn open(
        store: Rc<dyn KeyValueStore>,
        catalog: Catalog,
        fallbacks: WeightFallbacks,
    ) -> Result<Self, SessionError> {
        let history = HistoryLedger::load(Rc::clone(&store))?;
        let defaults = DefaultsCache::load(Rc::clone(&store))?;
        let status = resume(&*store, &catalog)?;
        let mut machine = Self {
            store,
            catalog,
            history,
            defaults,
            fallbacks,
            status,
        };
        if machine.is_active() {
            machine.ensure_exercise_initialized()?;
        }
        Ok(machine)
    }

    pub const fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub const fn active(&self) -> Option<&SessionState> {
        match &self.status {
            SessionStatus::InProgress(state) => Some(state),
            SessionStatus::Idle => None,
        }
    }

    pub const fn is_active(&self) -> bool {
        matches!(self.status, SessionStatus::InProgress(_))
    }

    pub fn active_day(&self) -> Option<&WorkoutDay> {
        self.active()
            .and_then(|state| self.catalog.day_by_id(&state.day_id))
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        let state = self.active()?;
        self.active_day()?
            .exercises
            .get(state.current_exercise_index)
    }

    pub fn current_log(&self) -> Option<&ExerciseLog> {
        let exercise = self.current_exercise()?;
        self.active()?.log_for(&exercise.id)
    }

    pub fn progress(&self) -> Option<Progress> {
        let state = self.active()?;
        Some(Progress {
            index: state.current_exercise_index,
            total: self.active_day()?.exercises.len(),
        })
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub const fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub const fn defaults(&self) -> &DefaultsCache {
        &self.defaults
    }

    pub fn set_fallbacks(&mut self, fallbacks: WeightFallbacks) {
        self.fallbacks = fallbacks;
    }

    /// Begins a session on `day_id`. Refuses while another session is active.
    pub fn start(&mut self, day_id: &str) -> Result<(), SessionError> {
        if let Some(state) = self.active() {
            return Err(SessionError::AlreadyActive(state.day_id.clone()));
        }
        let day = self
            .catalog
            .day_by_id(day_id)
            .ok_or_else(|| SessionError::UnknownDay(day_id.to_string()))?;
        if day.exercises.is_empty() {
            return Err(SessionError::EmptyDay(day_id.to_string()));
        }

        let state = SessionState::new(day_id);
        save_json(self.store.as_ref(), SESSION_KEY, &state)?;
        self.status = SessionStatus::InProgress(state);
        info!(day_id, "session started");
        self.ensure_exercise_initialized()?;
        Ok(())
    }

    /// Discards any active session, then starts a new one on `day_id`.
    pub fn restart(&mut self, day_id: &str) -> Result<(), SessionError> {
        let day = self
            .catalog
            .day_by_id(day_id)
            .ok_or_else(|| SessionError::UnknownDay(day_id.to_string()))?;
        if day.exercises.is_empty() {
            return Err(SessionError::EmptyDay(day_id.to_string()));
        }
        self.cancel()?;
        self.start(day_id)
    }

    /// Creates the set list for the current exercise if it has none yet.
    /// Returns whether a new log was created.
    pub fn ensure_exercise_initialized(&mut self) -> Result<bool, SessionError> {
        let SessionStatus::InProgress(state) = &mut self.status else {
            return Err(SessionError::NotActive);
        };
        let exercise = self
            .catalog
            .day_by_id(&state.day_id)
            .and_then(|day| day.exercises.get(state.current_exercise_index))
            .ok_or_else(|| SessionError::UnknownDay(state.day_id.clone()))?;
        if state.log_for(&exercise.id).is_some() {
            return Ok(false);
        }

        let sets = (0..exercise.sets)
            .map(|i| {
                let (value, source) =
                    resolve_initial_set(&self.defaults, &self.history, exercise, i, self.fallbacks);
                debug!(exercise_id = %exercise.id, set = i, ?source, "initialized set");
                SetEntry::new(value.weight, value.reps)
            })
            .collect();
        state.logs.push(ExerciseLog {
            exercise_id: exercise.id.clone(),
            sets,
        });
        save_json(self.store.as_ref(), SESSION_KEY, &*state)?;
        Ok(true)
    }

    /// Adds `delta` to one field of a set of the current exercise, keeping
    /// the result within `0..=f64::MAX`, and remembers it as that set's
    /// default. Returns `None` when the set does not exist or `delta` is not
    /// a finite number.
    pub fn adjust_set(
        &mut self,
        set_index: usize,
        field: SetField,
        delta: f64,
    ) -> Result<Option<SetEntry>, SessionError> {
        self.ensure_exercise_initialized()?;
        if !delta.is_finite() {
            warn!(delta, "ignoring non-finite adjustment");
            return Ok(None);
        }
        let exercise_id = self.current_exercise_id()?;
        let SessionStatus::InProgress(state) = &mut self.status else {
            return Err(SessionError::NotActive);
        };
        let Some(set) = state.set_mut(&exercise_id, set_index) else {
            return Ok(None);
        };
        match field {
            SetField::Weight => set.weight = (set.weight + delta).clamp(0.0, f64::MAX),
            SetField::Reps => set.reps = (set.reps + delta).clamp(0.0, f64::MAX),
        }
        let updated = *set;

        self.defaults
            .set(&exercise_id, set_index, updated.weight, updated.reps)?;
        save_json(self.store.as_ref(), SESSION_KEY, &*state)?;
        debug!(%exercise_id, set_index, ?field, delta, "adjusted set");
        Ok(Some(updated))
    }

    /// Flips the completed flag of a set of the current exercise.
    /// Returns the new flag, or `None` when the set does not exist.
    pub fn toggle_completed(&mut self, set_index: usize) -> Result<Option<bool>, SessionError> {
        self.ensure_exercise_initialized()?;
        let exercise_id = self.current_exercise_id()?;
        let SessionStatus::InProgress(state) = &mut self.status else {
            return Err(SessionError::NotActive);
        };
        let Some(set) = state.set_mut(&exercise_id, set_index) else {
            return Ok(None);
        };
        set.completed = !set.completed;
        let completed = set.completed;

        save_json(self.store.as_ref(), SESSION_KEY, &*state)?;
        debug!(%exercise_id, set_index, completed, "toggled set");
        Ok(Some(completed))
    }

    /// Moves to the next exercise, or finishes the workout when the current
    /// exercise is the last one.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        self.ensure_exercise_initialized()?;
        let total = self
            .progress()
            .map(|p| p.total)
            .ok_or(SessionError::NotActive)?;
        let SessionStatus::InProgress(state) = &mut self.status else {
            return Err(SessionError::NotActive);
        };

        if state.current_exercise_index + 1 < total {
            state.current_exercise_index += 1;
            let index = state.current_exercise_index;
            save_json(self.store.as_ref(), SESSION_KEY, &*state)?;
            self.ensure_exercise_initialized()?;
            debug!(index, total, "advanced to next exercise");
            return Ok(Advance::Next(index));
        }

        let log = WorkoutLog {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            program_id: state.day_id.clone(),
            exercises: state.logs.clone(),
        };
        self.history.append(log.clone())?;
        self.store.remove(SESSION_KEY)?;
        self.status = SessionStatus::Idle;
        info!(id = %log.id, day_id = %log.program_id, "session finished");
        Ok(Advance::Finished(log))
    }

    /// Drops the active session without recording it. Set defaults written
    /// during the session are kept. Returns whether a session was active.
    pub fn cancel(&mut self) -> Result<bool, SessionError> {
        self.store.remove(SESSION_KEY)?;
        let was_active = self.is_active();
        self.status = SessionStatus::Idle;
        if was_active {
            info!("session cancelled");
        }
        Ok(was_active)
    }

    fn current_exercise_id(&self) -> Result<String, SessionError> {
        self.current_exercise()
            .map(|e| e.id.clone())
            .ok_or(SessionError::NotActive)
    }
}

/// Reads the stored snapshot. Snapshots that fail to decode, point at an
/// unknown day or hold an out-of-range cursor are removed.
fn resume(store: &dyn KeyValueStore, catalog: &Catalog) -> Result<SessionStatus, StoreError> {
    let Some(raw) = store.get(SESSION_KEY)? else {
        return Ok(SessionStatus::Idle);
    };
    let state: SessionState = match serde_json::from_slice(&raw) {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "discarding malformed session snapshot");
            store.remove(SESSION_KEY)?;
            return Ok(SessionStatus::Idle);
        }
    };
    let Some(day) = catalog.day_by_id(&state.day_id) else {
        warn!(day_id = %state.day_id, "stored session refers to an unknown day");
        store.remove(SESSION_KEY)?;
        return Ok(SessionStatus::Idle);
    };
    if state.current_exercise_index >= day.exercises.len() {
        warn!(
            day_id = %state.day_id,
            index = state.current_exercise_index,
            "stored session cursor is out of range"
        );
        store.remove(SESSION_KEY)?;
        return Ok(SessionStatus::Idle);
    }
    info!(day_id = %state.day_id, index = state.current_exercise_index, "resumed session");
    Ok(SessionStatus::InProgress(state))
}

/// Serializes the logs as a JSON object while keeping visit order.
mod ordered_logs {
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    use crate::model::{ExerciseLog, SetEntry};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(
        logs: &Vec<ExerciseLog>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(logs.len()))?;
        for log in logs {
            map.serialize_entry(&log.exercise_id, &log.sets)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<ExerciseLog>, D::Error> {
        struct LogsVisitor;

        impl<'de> Visitor<'de> for LogsVisitor {
            type Value = Vec<ExerciseLog>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from exercise id to sets")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut logs: Vec<ExerciseLog> = Vec::new();
                while let Some((exercise_id, sets)) =
                    access.next_entry::<String, Vec<SetEntry>>()?
                {
                    // A repeated key replaces the earlier entry in place.
                    match logs.iter_mut().find(|l| l.exercise_id == exercise_id) {
                        Some(existing) => existing.sets = sets,
                        None => logs.push(ExerciseLog { exercise_id, sets }),
                    }
                }
                Ok(logs)
            }
        }

        deserializer.deserialize_map(LogsVisitor)
    }
}

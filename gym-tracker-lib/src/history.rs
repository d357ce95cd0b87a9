// src/history.rs
use std::rc::Rc;
use tracing::debug;

use crate::model::{ExerciseLog, WorkoutLog};
use crate::store::{load_json, save_json, KeyValueStore, StoreError, HISTORY_KEY};

/// Completed workouts, newest first.
pub struct HistoryLedger {
    store: Rc<dyn KeyValueStore>,
    logs: Vec<WorkoutLog>,
}

impl HistoryLedger {
    /// Reads the stored history. A malformed record yields an empty ledger.
    pub fn load(store: Rc<dyn KeyValueStore>) -> Result<Self, StoreError> {
        let logs: Vec<WorkoutLog> = load_json(store.as_ref(), HISTORY_KEY)?.unwrap_or_default();
        debug!(count = logs.len(), "loaded workout history");
        Ok(Self { store, logs })
    }

    /// Prepends `log` and writes the whole history back.
    pub fn append(&mut self, log: WorkoutLog) -> Result<(), StoreError> {
        self.logs.insert(0, log);
        save_json(self.store.as_ref(), HISTORY_KEY, &self.logs)
    }

    /// The newest logged entry for `exercise_id` across all workouts.
    pub fn most_recent_for(&self, exercise_id: &str) -> Option<&ExerciseLog> {
        self.logs.iter().find_map(|log| log.exercise(exercise_id))
    }

    pub fn logs(&self) -> &[WorkoutLog] {
        &self.logs
    }

    pub fn recent(&self, limit: usize) -> &[WorkoutLog] {
        &self.logs[..limit.min(self.logs.len())]
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

// src/defaults.rs
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

use crate::model::SetDefault;
use crate::store::{load_json, save_json, KeyValueStore, StoreError, DEFAULTS_KEY};

/// Per-set positions of one exercise. `None` marks a position that was never
/// written because a later set was adjusted first; it is stored as `null`.
pub type SetDefaults = Vec<Option<SetDefault>>;

/// Last-used values per exercise and set position.
pub struct DefaultsCache {
    store: Rc<dyn KeyValueStore>,
    entries: BTreeMap<String, SetDefaults>,
}

impl DefaultsCache {
    pub fn load(store: Rc<dyn KeyValueStore>) -> Result<Self, StoreError> {
        let entries: BTreeMap<String, SetDefaults> =
            load_json(store.as_ref(), DEFAULTS_KEY)?.unwrap_or_default();
        debug!(exercises = entries.len(), "loaded exercise defaults");
        Ok(Self { store, entries })
    }

    pub fn get(&self, exercise_id: &str) -> Option<&[Option<SetDefault>]> {
        self.entries.get(exercise_id).map(Vec::as_slice)
    }

    /// The remembered value for a single set position, if one was written.
    pub fn get_set(&self, exercise_id: &str, set_index: usize) -> Option<SetDefault> {
        self.entries
            .get(exercise_id)
            .and_then(|sets| sets.get(set_index).copied().flatten())
    }

    /// Records the values for one set position and persists the whole mapping.
    pub fn set(
        &mut self,
        exercise_id: &str,
        set_index: usize,
        weight: f64,
        reps: f64,
    ) -> Result<(), StoreError> {
        let sets = self.entries.entry(exercise_id.to_string()).or_default();
        if sets.len() <= set_index {
            sets.resize(set_index + 1, None);
        }
        sets[set_index] = Some(SetDefault { weight, reps });
        debug!(exercise_id, set_index, weight, reps, "saved set default");
        save_json(self.store.as_ref(), DEFAULTS_KEY, &self.entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<SetDefault>])> {
        self.entries
            .iter()
            .map(|(id, sets)| (id.as_str(), sets.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

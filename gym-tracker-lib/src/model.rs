// src/model.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded set: the values the user lifted and whether it is done.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub weight: f64,
    pub reps: f64,
    pub completed: bool,
}

impl SetEntry {
    pub const fn new(weight: f64, reps: f64) -> Self {
        Self {
            weight,
            reps,
            completed: false,
        }
    }

    pub const fn values(&self) -> SetDefault {
        SetDefault {
            weight: self.weight,
            reps: self.reps,
        }
    }
}

/// Remembered starting values for one set position of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetDefault {
    pub weight: f64,
    pub reps: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Weight,
    Reps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub exercise_id: String,
    pub sets: Vec<SetEntry>,
}

impl ExerciseLog {
    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|s| s.completed).count()
    }
}

/// A finished session as stored in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    /// Completion time, serialized as an RFC 3339 / ISO-8601 string.
    pub date: DateTime<Utc>,
    /// Id of the workout day that was performed.
    pub program_id: String,
    /// In the order the exercises were first visited.
    pub exercises: Vec<ExerciseLog>,
}

impl WorkoutLog {
    pub fn exercise(&self, exercise_id: &str) -> Option<&ExerciseLog> {
        self.exercises.iter().find(|e| e.exercise_id == exercise_id)
    }

    /// Sum of weight × reps over completed sets.
    pub fn completed_volume(&self) -> f64 {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| s.completed)
            .map(|s| s.weight * s.reps)
            .sum()
    }
}

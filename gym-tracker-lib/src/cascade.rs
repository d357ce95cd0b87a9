// src/cascade.rs
//! Picks the starting weight and reps for a set that has never been shown in
//! the current session.
use crate::catalog::Exercise;
use crate::defaults::DefaultsCache;
use crate::history::HistoryLedger;
use crate::model::SetDefault;

const FALLBACK_REPS: f64 = 10.0;

/// Starting weights used when neither the defaults cache nor the history
/// knows anything about a set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightFallbacks {
    pub standard: f64,
    pub dumbbell: f64,
}

impl Default for WeightFallbacks {
    fn default() -> Self {
        Self {
            standard: 40.0,
            dumbbell: 20.0,
        }
    }
}

/// Where a resolved starting value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialSource {
    Defaults,
    History,
    Fallback,
}

/// Resolves the starting values for set `set_index` of `exercise`, trying in
/// order: the defaults cache, the most recent logged set at the same
/// position, then the exercise-based fallback.
pub fn resolve_initial_set(
    defaults: &DefaultsCache,
    history: &HistoryLedger,
    exercise: &Exercise,
    set_index: usize,
    fallbacks: WeightFallbacks,
) -> (SetDefault, InitialSource) {
    if let Some(value) = defaults.get_set(&exercise.id, set_index) {
        return (value, InitialSource::Defaults);
    }
    if let Some(set) = history
        .most_recent_for(&exercise.id)
        .and_then(|log| log.sets.get(set_index))
    {
        return (set.values(), InitialSource::History);
    }
    (
        SetDefault {
            weight: fallback_weight(exercise, fallbacks),
            reps: target_rep_floor(&exercise.reps),
        },
        InitialSource::Fallback,
    )
}

/// Whether the exercise is performed with dumbbells, judged by the "DB"
/// abbreviation in its name.
pub fn is_dumbbell_movement(exercise: &Exercise) -> bool {
    exercise.name.contains("DB")
}

pub fn fallback_weight(exercise: &Exercise, fallbacks: WeightFallbacks) -> f64 {
    if is_dumbbell_movement(exercise) {
        fallbacks.dumbbell
    } else {
        fallbacks.standard
    }
}

/// The lower bound of a rep label such as "10-12" or "8-10 min".
/// Labels without a leading positive number give 10.
pub fn target_rep_floor(label: &str) -> f64 {
    let first = label.split('-').next().unwrap_or_default().trim_start();
    let digits: String = first.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => f64::from(n),
        _ => FALLBACK_REPS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    fn exercise(name: &str, reps: &str) -> Exercise {
        Exercise::new("x", name, 3, reps, Category::Push, None)
    }

    #[test]
    fn test_rep_floor_from_range() {
        assert_eq!(target_rep_floor("10-12"), 10.0);
        assert_eq!(target_rep_floor("15"), 15.0);
        assert_eq!(target_rep_floor("8-10 min"), 8.0);
        assert_eq!(target_rep_floor(" 12-15"), 12.0);
    }

    #[test]
    fn test_rep_floor_unparsable_defaults_to_ten() {
        assert_eq!(target_rep_floor("AMRAP"), 10.0);
        assert_eq!(target_rep_floor(""), 10.0);
        assert_eq!(target_rep_floor("-5"), 10.0);
        assert_eq!(target_rep_floor("0-3"), 10.0);
    }

    #[test]
    fn test_dumbbell_heuristic() {
        let fallbacks = WeightFallbacks::default();
        assert!(is_dumbbell_movement(&exercise("DB Bench Press", "10-12")));
        assert_eq!(
            fallback_weight(&exercise("DB Bench Press", "10-12"), fallbacks),
            20.0
        );
        // Only the abbreviation counts.
        assert!(!is_dumbbell_movement(&exercise("Dumbbell RDL", "10-12")));
        assert_eq!(
            fallback_weight(&exercise("Lat Pulldown", "10-12"), fallbacks),
            40.0
        );
    }
}

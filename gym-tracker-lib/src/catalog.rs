// src/catalog.rs
//! The built-in training program and stretching routine.
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Push,
    Pull,
    Legs,
    Core,
    Cardio,
}

/// What the rest timer should look like while an exercise is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerHint {
    /// Plain countdown between sets.
    Rest { seconds: u32 },
    /// Alternating work/recover intervals.
    Interval { seconds: u32 },
}

impl Category {
    pub const fn timer_hint(self) -> TimerHint {
        match self {
            Self::Cardio => TimerHint::Interval { seconds: 30 },
            _ => TimerHint::Rest { seconds: 60 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    /// Target number of sets, always at least one.
    pub sets: usize,
    /// Target rep range label, e.g. "10-12" or "8-10 min".
    pub reps: String,
    pub category: Category,
    pub notes: Option<String>,
}

impl Exercise {
    pub fn new(
        id: &str,
        name: &str,
        sets: usize,
        reps: &str,
        category: Category,
        notes: Option<&str>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sets: sets.max(1),
            reps: reps.to_string(),
            category,
            notes: notes.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub id: String,
    pub title: String,
    pub focus: String,
    pub exercises: Vec<Exercise>,
}

impl WorkoutDay {
    pub fn new(id: &str, title: &str, focus: &str, exercises: Vec<Exercise>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            focus: focus.to_string(),
            exercises,
        }
    }

    pub fn exercise_index(&self, exercise_id: &str) -> Option<usize> {
        self.exercises.iter().position(|e| e.id == exercise_id)
    }
}

/// Read-only lookup over the ordered list of workout days.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    days: Vec<WorkoutDay>,
}

impl Catalog {
    pub fn new(days: Vec<WorkoutDay>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[WorkoutDay] {
        &self.days
    }

    pub fn day_by_id(&self, id: &str) -> Option<&WorkoutDay> {
        self.days.iter().find(|d| d.id == id)
    }

    /// Finds an exercise anywhere in the program.
    pub fn exercise_by_id(&self, id: &str) -> Option<&Exercise> {
        self.days
            .iter()
            .flat_map(|d| d.exercises.iter())
            .find(|e| e.id == id)
    }

    /// The four-day upper/lower split.
    pub fn builtin() -> Self {
        use Category::{Cardio, Legs, Pull, Push};
        let ex = Exercise::new;

        Self::new(vec![
            WorkoutDay::new(
                "day-1",
                "Day 1 – Upper A",
                "Horizontal Push/Pull",
                vec![
                    ex("db-bench", "DB Bench Press", 3, "10-12", Push,
                        Some("35-40lb start. Keep elbows at 45 degrees.")),
                    ex("chest-supported-row", "Chest-Supported Row", 3, "10-12", Pull,
                        Some("Stretch chest between sets. Focus on squeezing shoulder blades.")),
                    ex("cable-fly", "Cable Fly or Pec Deck", 3, "12-15", Push,
                        Some("Stretch emphasis at bottom. Keep slight bend in elbows.")),
                    ex("seated-cable-row", "Seated Cable Row", 3, "10-12", Pull,
                        Some("Keep torso upright, drive elbows back.")),
                    ex("tricep-pushdown", "Tricep Pushdown", 3, "12-15", Push,
                        Some("Keep elbows pinned to sides.")),
                    ex("barbell-curl", "Barbell Curl", 2, "12-15", Pull,
                        Some("Control the eccentric (lowering) phase.")),
                    ex("cardio-stair", "Cardio: Stair Master", 1, "8-10 min", Cardio,
                        Some("30s hard / 30s recover. Flat foot contact to protect plantar plate.")),
                ],
            ),
            WorkoutDay::new(
                "day-2",
                "Day 2 – Lower A",
                "Legs (Quad/Hamstring)",
                vec![
                    ex("leg-press", "Leg Press", 2, "10-12", Legs,
                        Some("High foot placement for glutes/hams. Controlled. Hamstring stretch between sets.")),
                    ex("leg-extension", "Leg Extension", 3, "15", Legs,
                        Some("Light weight, slow eccentric. Protect knees.")),
                    ex("lying-leg-curl", "Lying Leg Curl", 3, "12-15", Legs,
                        Some("Hamstring stretch between sets. Keep hips down.")),
                    ex("seated-calf-raise", "Seated Calf Raise", 3, "15", Legs,
                        Some("Calf stretch between sets. Full range of motion.")),
                    ex("hip-adductor", "Hip Adductor", 2, "15", Legs,
                        Some("Inner thigh machine. Control the weight.")),
                    ex("cardio-rowing", "Cardio: Rowing Intervals", 1, "8-10 min", Cardio,
                        Some("30s hard / 30s recover. Watch back posture.")),
                ],
            ),
            WorkoutDay::new(
                "day-3",
                "Day 3 – Upper B",
                "Vertical Push/Pull",
                vec![
                    ex("shoulder-press", "Shoulder Press Machine", 3, "10-12", Push,
                        Some("Front-to-overhead version. Keep core tight.")),
                    ex("lat-pulldown", "Lat Pulldown", 3, "10-12", Pull,
                        Some("120-130lb target. Pull to upper chest.")),
                    ex("lateral-raise", "Lateral Raise", 3, "12-15", Push,
                        Some("DB or Cable. Lead with elbows.")),
                    ex("face-pull", "Cable Face Pull", 3, "15", Pull,
                        Some("Squeeze at contraction – CRITICAL for posture work.")),
                    ex("overhead-tricep", "Overhead Tricep Extension", 3, "12-15", Push,
                        Some("Cable or DB. Stretch triceps at bottom.")),
                    ex("hammer-curl", "Hammer Curl", 2, "12-15", Pull,
                        Some("Neutral grip. Good for forearms.")),
                    ex("cardio-bike", "Cardio: Bike/Stair Master", 1, "8-10 min", Cardio,
                        Some("30s hard / 30s recover.")),
                ],
            ),
            WorkoutDay::new(
                "day-4",
                "Day 4 – Lower B",
                "Legs (Squat/Hinge)",
                vec![
                    ex("hack-squat", "Hack Squat or Belt Squat", 2, "10-12", Legs,
                        Some("Rotate based on knee feel. If knees flare, swap for Leg Curl volume. Hamstring stretch between sets.")),
                    ex("rdl", "Dumbbell RDL", 3, "10-12", Legs,
                        Some("Romanian Deadlifts. Hinge at hips, slight knee bend. Protect back.")),
                    ex("seated-leg-curl", "Seated Leg Curl", 3, "12-15", Legs,
                        Some("Hamstring stretch between sets.")),
                    ex("standing-calf-raise", "Standing Calf Raise", 3, "12-15", Legs,
                        Some("Calf stretch between sets.")),
                    ex("hip-abductor", "Hip Abductor", 2, "15", Legs,
                        Some("Outer thigh machine.")),
                    ex("cardio-stair-2", "Cardio: Stair Master", 1, "8-10 min", Cardio,
                        Some("30s hard / 30s recover.")),
                ],
            ),
        ])
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StretchSetting {
    /// Between sets at the gym.
    Gym,
    /// Daily or on off-days.
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stretch {
    pub name: &'static str,
    pub duration: &'static str,
    /// When to do it (gym) or what it targets (home).
    pub cue: &'static str,
    pub setting: StretchSetting,
}

pub const STRETCHES: &[Stretch] = &[
    Stretch { name: "Hamstring (foot on bench)", duration: "30-45s/side", cue: "Hack squat & leg curl rest", setting: StretchSetting::Gym },
    Stretch { name: "Calf (wall stretch)", duration: "30s/side", cue: "Calf raise rest", setting: StretchSetting::Gym },
    Stretch { name: "Chest (doorway/cable)", duration: "30s/side", cue: "Row rest periods", setting: StretchSetting::Gym },
    Stretch { name: "Lying hamstring stretch", duration: "60s/side", cue: "Hamstrings", setting: StretchSetting::Home },
    Stretch { name: "Wall calf stretch", duration: "60s/side", cue: "Calves", setting: StretchSetting::Home },
    Stretch { name: "Half-kneeling hip flexor", duration: "60s/side", cue: "Hip flexors", setting: StretchSetting::Home },
    Stretch { name: "Chin tucks", duration: "10-15 reps", cue: "Posture", setting: StretchSetting::Home },
    Stretch { name: "Doorway chest stretch", duration: "60s/side", cue: "Pecs", setting: StretchSetting::Home },
    Stretch { name: "Cat-cow", duration: "10 slow reps", cue: "Spine", setting: StretchSetting::Home },
];

pub fn stretches_for(setting: StretchSetting) -> impl Iterator<Item = &'static Stretch> {
    STRETCHES.iter().filter(move |s| s.setting == setting)
}

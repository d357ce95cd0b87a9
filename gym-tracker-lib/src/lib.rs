// src/lib.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::rc::Rc;

// --- Declare modules ---
pub mod cascade;
pub mod catalog;
mod config;
pub mod defaults;
pub mod history;
pub mod model;
pub mod session;
pub mod store;

// --- Expose public types ---
pub use cascade::{resolve_initial_set, InitialSource, WeightFallbacks};
pub use catalog::{
    stretches_for, Catalog, Category, Exercise, Stretch, StretchSetting, TimerHint, WorkoutDay,
    STRETCHES,
};
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, ConfigError, StandardColor, Theme, Units,
};
pub use defaults::DefaultsCache;
pub use history::HistoryLedger;
pub use model::{ExerciseLog, SetDefault, SetEntry, SetField, WorkoutLog};
pub use session::{
    Advance, Progress, SessionError, SessionMachine, SessionState, SessionStatus,
};
pub use store::{
    get_db_path as get_db_path_util, KeyValueStore, MemoryStore, SqliteStore, StoreError,
};

/// Application facade: configuration plus the session machine over the
/// on-disk store.
pub struct AppService {
    pub config: Config,
    pub tracker: SessionMachine,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or
    /// opening the store fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let db_path = store::get_db_path().context("Failed to determine database path")?;
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;

        Self::with_store(config, config_path, db_path, Rc::new(store))
    }

    /// Builds the service over an already opened store with the built-in
    /// program.
    /// # Errors
    /// Returns `anyhow::Error` if the stored records cannot be read.
    pub fn with_store(
        config: Config,
        config_path: PathBuf,
        db_path: PathBuf,
        store: Rc<dyn KeyValueStore>,
    ) -> Result<Self> {
        let fallbacks = fallbacks_from(&config);
        let tracker = SessionMachine::open(store, Catalog::builtin(), fallbacks)
            .context("Failed to load stored workout data")?;
        Ok(Self {
            config,
            tracker,
            db_path,
            config_path,
        })
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// Sets the measurement units.
    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_units(&mut self, units: Units) -> Result<(), ConfigError> {
        self.config.units = units;
        self.save_config()
    }

    /// Sets the increment used by the weight shortcuts.
    /// # Errors
    /// - `ConfigError::InvalidStep` if `step` is not a positive finite number.
    /// - `ConfigError` variants if saving fails.
    pub fn set_weight_step(&mut self, step: f64) -> Result<(), ConfigError> {
        self.config.weight_step = config::check_step(step)?;
        self.save_config()
    }

    /// Sets the increment used by the reps shortcuts.
    /// # Errors
    /// - `ConfigError::InvalidStep` if `step` is not a positive finite number.
    /// - `ConfigError` variants if saving fails.
    pub fn set_reps_step(&mut self, step: f64) -> Result<(), ConfigError> {
        self.config.reps_step = config::check_step(step)?;
        self.save_config()
    }

    /// Sets the starting weights used for exercises with no stored values.
    /// # Errors
    /// - `ConfigError::InvalidFallbackWeight` if either weight is negative or
    ///   not finite.
    /// - `ConfigError` variants if saving fails.
    pub fn set_fallback_weights(&mut self, standard: f64, dumbbell: f64) -> Result<(), ConfigError> {
        let standard = config::check_fallback_weight(standard)?;
        let dumbbell = config::check_fallback_weight(dumbbell)?;
        self.config.fallback_weight = standard;
        self.config.dumbbell_fallback_weight = dumbbell;
        self.tracker.set_fallbacks(fallbacks_from(&self.config));
        self.save_config()
    }

    /// Sets the table header colour.
    /// # Errors
    /// - `ConfigError::InvalidColor` if the name is not a known colour.
    /// - `ConfigError` variants if saving fails.
    pub fn set_header_color(&mut self, color: &str) -> Result<(), ConfigError> {
        let parsed = parse_color(color)?;
        self.config.theme.header_color = format!("{parsed:?}");
        self.save_config()
    }
}

fn fallbacks_from(config: &Config) -> WeightFallbacks {
    WeightFallbacks {
        standard: config.fallback_weight,
        dumbbell: config.dumbbell_fallback_weight,
    }
}

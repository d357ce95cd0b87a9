//src/config.rs
use comfy_table::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "config.toml";
pub(crate) const APP_DIR: &str = "gym-tracker";
const CONFIG_ENV_VAR: &str = "GYM_TRACKER_CONFIG_DIR"; // Environment variable name

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine configuration directory.")]
    CannotDetermineConfigDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config data (TOML): {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid color name: {0}")]
    InvalidColor(String),
    #[error("Step must be a positive number, got {0}")]
    InvalidStep(f64),
    #[error("Fallback weight cannot be negative, got {0}")]
    InvalidFallbackWeight(f64),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric, // kg
    #[default]
    Imperial, // lbs
}

impl Units {
    pub const fn weight_label(self) -> &'static str {
        match self {
            Self::Metric => "kg",
            Self::Imperial => "lbs",
        }
    }
}

// Define standard colors using strum for easy iteration/parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum StandardColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
    DarkRed,
    DarkGreen,
    DarkYellow,
    DarkBlue,
    DarkMagenta,
    DarkCyan,
    Grey,
}

impl From<StandardColor> for Color {
    fn from(value: StandardColor) -> Self {
        match value {
            StandardColor::Black => Self::Black,
            StandardColor::Red => Self::Red,
            StandardColor::Green => Self::Green,
            StandardColor::Yellow => Self::Yellow,
            StandardColor::Blue => Self::Blue,
            StandardColor::Magenta => Self::Magenta,
            StandardColor::Cyan => Self::Cyan,
            StandardColor::White => Self::White,
            StandardColor::DarkGrey => Self::DarkGrey,
            StandardColor::DarkRed => Self::DarkRed,
            StandardColor::DarkGreen => Self::DarkGreen,
            StandardColor::DarkYellow => Self::DarkYellow,
            StandardColor::DarkBlue => Self::DarkBlue,
            StandardColor::DarkMagenta => Self::DarkMagenta,
            StandardColor::DarkCyan => Self::DarkCyan,
            StandardColor::Grey => Self::Grey,
        }
    }
}

/// Parses a colour name (case-insensitive) into a `StandardColor`.
pub fn parse_color(color_str: &str) -> Result<StandardColor, ConfigError> {
    StandardColor::iter()
        .find(|color| format!("{color:?}").eq_ignore_ascii_case(color_str.trim()))
        .ok_or_else(|| ConfigError::InvalidColor(color_str.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Theme {
    pub header_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: "Green".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)] // Missing fields fall back to defaults
pub struct Config {
    pub units: Units,
    /// Increment used by the `weight up/down` shortcuts.
    pub weight_step: f64,
    /// Increment used by the `reps up/down` shortcuts.
    pub reps_step: f64,
    /// Starting weight for a never-seen exercise.
    pub fallback_weight: f64,
    /// Starting weight for a never-seen dumbbell exercise.
    pub dumbbell_fallback_weight: f64,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            units: Units::default(),
            weight_step: 5.0,
            reps_step: 1.0,
            fallback_weight: 40.0,
            dumbbell_fallback_weight: 20.0,
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Rejects values that would feed non-finite numbers into stored sets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_step(self.weight_step)?;
        check_step(self.reps_step)?;
        check_fallback_weight(self.fallback_weight)?;
        check_fallback_weight(self.dumbbell_fallback_weight)?;
        Ok(())
    }
}

pub(crate) fn check_step(step: f64) -> Result<f64, ConfigError> {
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err(ConfigError::InvalidStep(step))
    }
}

pub(crate) fn check_fallback_weight(weight: f64) -> Result<f64, ConfigError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(ConfigError::InvalidFallbackWeight(weight))
    }
}

/// Determines the path to the configuration file.
/// Exposed at crate root as `get_config_path_util`
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir_path = match std::env::var(CONFIG_ENV_VAR).ok() {
        Some(path_str) => PathBuf::from(path_str),
        None => dirs::config_dir()
            .ok_or(ConfigError::CannotDetermineConfigDir)?
            .join(APP_DIR),
    };

    if !config_dir_path.exists() {
        fs::create_dir_all(&config_dir_path)?;
    }

    Ok(config_dir_path.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from the TOML file at the given path.
/// A missing file is created with the default configuration.
pub fn load(config_path: &Path) -> Result<Config, ConfigError> {
    if config_path.exists() {
        let config_content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    } else {
        let default_config = Config::default();
        save(config_path, &default_config)?;
        Ok(default_config)
    }
}

/// Saves the configuration to the TOML file.
pub fn save(config_path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let config_content = toml::to_string_pretty(config)?;
    fs::write(config_path, config_content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_case_insensitive() {
        assert_eq!(parse_color("darkblue").unwrap(), StandardColor::DarkBlue);
        assert_eq!(parse_color(" Green ").unwrap(), StandardColor::Green);
        assert!(matches!(
            parse_color("chartreuse"),
            Err(ConfigError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("units = \"metric\"\nweight_step = 2.5\n").unwrap();
        assert_eq!(config.units, Units::Metric);
        assert_eq!(config.weight_step, 2.5);
        assert_eq!(config.fallback_weight, 40.0);
        assert_eq!(config.theme.header_color, "Green");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = Config {
            units: Units::Metric,
            reps_step: 2.0,
            ..Default::default()
        };
        save(&path, &config).unwrap();
        assert_eq!(load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = load(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_rejects_non_finite_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&path, "fallback_weight = inf\n").unwrap();
        assert!(matches!(
            load(&path),
            Err(ConfigError::InvalidFallbackWeight(w)) if w.is_infinite()
        ));

        fs::write(&path, "weight_step = nan\n").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::InvalidStep(_))));
    }
}

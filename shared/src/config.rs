//! Configuration persistence utilities
//!
//! Provides functions for loading and saving clock preferences to disk.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Error type for configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// How the minute and second pointers move while the clock runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rhythm {
    /// Continuous sweep
    #[default]
    Flow,
    /// Discrete steps, once per unit
    Tick,
}

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub rhythm: Rhythm,
    /// Seconds the displayed time lags real local time
    pub time_offset: f64,
    /// IANA zone name; the system offset is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            rhythm: Rhythm::Flow,
            time_offset: 0.0,
            timezone: None,
        }
    }
}

impl Preferences {
    /// Load preferences for `clock_name`, falling back to defaults
    pub fn load(clock_name: &str) -> Self {
        match config_path(clock_name) {
            Some(path) => Self::load_at(&path),
            None => {
                warn!(clock = clock_name, error = %ConfigError::NoConfigDir, "using default preferences");
                Self::default()
            }
        }
    }

    /// Load preferences from an explicit path, falling back to defaults
    pub fn load_at(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable preferences");
                Self::default()
            }
        }
    }

    /// Parse preferences from TOML, falling back to defaults
    pub fn from_toml_str(contents: &str) -> Self {
        match toml::from_str::<Preferences>(contents) {
            Ok(prefs) => prefs.sanitized(),
            Err(e) => {
                warn!(error = %e, "ignoring malformed preferences");
                Self::default()
            }
        }
    }

    pub fn save(&self, clock_name: &str) -> Result<(), ConfigError> {
        save_config(clock_name, self)
    }

    fn sanitized(mut self) -> Self {
        if !self.time_offset.is_finite() {
            warn!(offset = self.time_offset, "discarding non-finite time offset");
            self.time_offset = 0.0;
        }
        self
    }
}

/// Get the base configuration directory for all clocks
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "clock-series", "clocks")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the configuration file path for a specific clock
pub fn config_path(clock_name: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(format!("{}.toml", clock_name)))
}

/// Save configuration for a specific clock
pub fn save_config<T: Serialize>(clock_name: &str, config: &T) -> Result<(), ConfigError> {
    let path = config_path(clock_name).ok_or(ConfigError::NoConfigDir)?;
    save_config_at(&path, config)
}

/// Save configuration to an explicit path
pub fn save_config_at<T: Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("adjustable-dial-test-{}", std::process::id()))
            .join(format!("{}.toml", name))
    }

    #[test]
    fn test_config_path() {
        let path = config_path("test_clock");
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("test_clock.toml"));
    }

    #[test]
    fn test_preferences_parse() {
        let prefs = Preferences::from_toml_str("rhythm = \"tick\"\ntime_offset = -90.5\n");
        assert_eq!(prefs.rhythm, Rhythm::Tick);
        assert_eq!(prefs.time_offset, -90.5);
        assert_eq!(prefs.timezone, None);
    }

    #[test]
    fn test_partial_preferences_fill_defaults() {
        let prefs = Preferences::from_toml_str("timezone = \"Asia/Tokyo\"\n");
        assert_eq!(prefs.rhythm, Rhythm::Flow);
        assert_eq!(prefs.time_offset, 0.0);
        assert_eq!(prefs.timezone.as_deref(), Some("Asia/Tokyo"));
    }

    #[test]
    fn test_malformed_preferences_fall_back() {
        assert_eq!(Preferences::from_toml_str("rhythm = \"wobble\""), Preferences::default());
        assert_eq!(Preferences::from_toml_str("not toml at all ]["), Preferences::default());
        assert_eq!(
            Preferences::from_toml_str("time_offset = \"soon\""),
            Preferences::default()
        );
        assert_eq!(Preferences::from_toml_str("time_offset = nan").time_offset, 0.0);
    }

    #[test]
    fn test_save_then_load_at_path() {
        let path = scratch_path("saved");
        let prefs = Preferences {
            rhythm: Rhythm::Tick,
            time_offset: 3600.0,
            timezone: None,
        };
        save_config_at(&path, &prefs).unwrap();
        assert_eq!(Preferences::load_at(&path), prefs);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_at_falls_back_on_garbage_file() {
        let path = scratch_path("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "rhythm = [[[ not toml").unwrap();
        assert_eq!(Preferences::load_at(&path), Preferences::default());

        fs::write(&path, "rhythm = \"tick\"\ntime_offset = 12.5\n").unwrap();
        let prefs = Preferences::load_at(&path);
        assert_eq!(prefs.rhythm, Rhythm::Tick);
        assert_eq!(prefs.time_offset, 12.5);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_at_missing_file_is_default() {
        assert_eq!(Preferences::load_at(&scratch_path("absent")), Preferences::default());
    }
}

//! TOML-based engine settings.
//!
//! Stores user preferences: intervention mode, detection thresholds,
//! intervention timers/budgets, monitored apps, and message style.
//!
//! Settings are stored at `~/.config/descroll/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::detect::{DetectionThresholds, MAX_TIME_THRESHOLD_SECS, MIN_TIME_THRESHOLD_SECS};
use crate::error::ConfigError;
use crate::intervention::{InterventionConfig, InterventionMode};
use crate::messages::MessageStyle;

/// Apps monitored by default.
pub const DEFAULT_MONITORED_APPS: &[&str] = &[
    "com.apple.mobilesafari",
    "com.burbn.instagram",
    "com.zhiliaoapp.musically",
    "com.atebits.Tweetie2",
    "com.facebook.Facebook",
    "com.reddit.Reddit",
];

/// Engine settings.
///
/// Serialized to/from TOML at `~/.config/descroll/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub intervention_mode: InterventionMode,
    #[serde(default)]
    pub detection: DetectionThresholds,
    #[serde(default)]
    pub intervention: InterventionConfig,
    #[serde(default = "default_monitored_apps")]
    pub monitored_apps: Vec<String>,
    #[serde(default)]
    pub message_style: MessageStyle,
    /// Fixed RNG seed for reproducible selection (None = entropy).
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_monitored_apps() -> Vec<String> {
    DEFAULT_MONITORED_APPS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            intervention_mode: InterventionMode::default(),
            detection: DetectionThresholds::default(),
            intervention: InterventionConfig::default(),
            monitored_apps: default_monitored_apps(),
            message_style: MessageStyle::default(),
            rng_seed: None,
        }
    }
}

impl Settings {
    /// Check user-settable values against their permitted ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.detection.min_duration_secs;
        if !(MIN_TIME_THRESHOLD_SECS..=MAX_TIME_THRESHOLD_SECS).contains(&threshold) {
            return Err(ConfigError::InvalidValue {
                key: "detection.min_duration_secs".to_string(),
                message: format!(
                    "{threshold} outside {MIN_TIME_THRESHOLD_SECS}..={MAX_TIME_THRESHOLD_SECS}"
                ),
            });
        }
        if self.monitored_apps.iter().any(|app| app.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "monitored_apps".to_string(),
                message: "app identifiers must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed, or
    /// if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    /// Load from an explicit path; missing files yield saved defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let settings: Settings =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                settings.validate()?;
                Ok(settings)
            }
            Err(_) => {
                let settings = Self::default();
                settings.save_to(path)?;
                Ok(settings)
            }
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from disk or fall back to defaults on any failure.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

/// Returns `~/.config/descroll/`, creating it if needed.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");
    let dir = base_dir.join("descroll");
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The default breathing pattern and session length
//! - Display settings (indicator style, frame rate, labels)
//! - User-defined presets
//!
//! Configuration is stored at `~/.config/breathwork/config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::indicator::IndicatorStyle;
use crate::timer::{builtin_preset, PhaseDurations, SessionConfig, TotalDuration};

/// A breathing pattern as written in the config file.
///
/// Values are checked when turned into a [`SessionConfig`], so a file with
/// a bad duration still loads and can be fixed with `config set`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(default = "default_phase_secs")]
    pub inhale: f64,
    #[serde(default = "default_phase_secs")]
    pub hold_full: f64,
    #[serde(default = "default_phase_secs")]
    pub exhale: f64,
    #[serde(default = "default_phase_secs")]
    pub hold_empty: f64,
    #[serde(default)]
    pub total: TotalDuration,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub view: IndicatorStyle,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_true")]
    pub show_labels: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/breathwork/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pattern: PatternConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Preset used when `start` is given no pattern flags.
    #[serde(default)]
    pub default_preset: Option<String>,
    /// User-defined presets; these shadow built-ins of the same name.
    #[serde(default)]
    pub presets: BTreeMap<String, PatternConfig>,
}

fn default_phase_secs() -> f64 {
    4.0
}
fn default_fps() -> u32 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            inhale: default_phase_secs(),
            hold_full: default_phase_secs(),
            exhale: default_phase_secs(),
            hold_empty: default_phase_secs(),
            total: TotalDuration::Unbounded,
        }
    }
}

impl From<PhaseDurations> for PatternConfig {
    fn from(phases: PhaseDurations) -> Self {
        use crate::timer::PhaseKind::*;
        Self {
            inhale: phases[Inhale],
            hold_full: phases[HoldFull],
            exhale: phases[Exhale],
            hold_empty: phases[HoldEmpty],
            total: TotalDuration::Unbounded,
        }
    }
}

impl PatternConfig {
    /// Validate and build the configuration a session runs with.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first non-positive duration.
    pub fn to_session_config(&self) -> Result<SessionConfig> {
        let phases = PhaseDurations::new(self.inhale, self.hold_full, self.exhale, self.hold_empty)?;
        Ok(SessionConfig::new(phases, self.total))
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            view: IndicatorStyle::default(),
            fps: default_fps(),
            show_labels: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern: PatternConfig::default(),
            display: DisplayConfig::default(),
            default_preset: None,
            presets: BTreeMap::new(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Some(n) = value
                            .parse::<f64>()
                            .ok()
                            .and_then(serde_json::Number::from_f64)
                        {
                            serde_json::Value::Number(n)
                        } else {
                            // Fields such as `pattern.total` also accept keywords;
                            // deserialization decides.
                            serde_json::Value::String(value.into())
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::Null => {
                        if value.is_empty() || value == "none" {
                            serde_json::Value::Null
                        } else {
                            serde_json::Value::String(value.into())
                        }
                    }
                    serde_json::Value::String(_) => {
                        if value == "none" && part == "default_preset" {
                            serde_json::Value::Null
                        } else {
                            serde_json::Value::String(value.into())
                        }
                    }
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Path of the config file inside the data directory.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str::<Config>(&content).map_err(|e| {
                CoreError::from(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the resulting configuration
    /// does not deserialize (e.g. a negative total).
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// The pattern a session starts with when no preset is named:
    /// `default_preset` if set, otherwise `[pattern]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] if `default_preset` names
    /// nothing.
    pub fn base_pattern(&self) -> Result<PatternConfig> {
        match &self.default_preset {
            Some(name) => self.preset(name),
            None => Ok(self.pattern),
        }
    }

    /// Resolve a preset: user-defined first, then built-in.
    ///
    /// A built-in preset keeps the session length from `[pattern]`.
    pub fn preset(&self, name: &str) -> Result<PatternConfig> {
        if let Some(p) = self.presets.get(name) {
            return Ok(*p);
        }
        let builtin = builtin_preset(name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;
        Ok(PatternConfig {
            total: self.pattern.total,
            ..PatternConfig::from(builtin.phases)
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

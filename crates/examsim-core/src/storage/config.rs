//! TOML-based application configuration.
//!
//! Stores countdown lengths, the tick interval used by interactive front
//! ends, and an optional question bank path.
//!
//! Configuration is stored at `~/.config/examsim/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::session::{Timing, DEFAULT_FEEDBACK_TICKS, DEFAULT_QUESTION_TICKS};

/// Countdown configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_question_ticks")]
    pub question_ticks: u64,
    #[serde(default = "default_feedback_ticks")]
    pub feedback_ticks: u64,
    /// Wall-clock length of one tick.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

/// Question bank location. `None` uses the built-in sample bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/examsim/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub bank: BankConfig,
}

fn default_question_ticks() -> u64 {
    DEFAULT_QUESTION_TICKS
}
fn default_feedback_ticks() -> u64 {
    DEFAULT_FEEDBACK_TICKS
}
fn default_tick_millis() -> u64 {
    1000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            question_ticks: default_question_ticks(),
            feedback_ticks: default_feedback_ticks(),
            tick_millis: default_tick_millis(),
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
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent) = parent_path {
            for part in parent.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?;
                serde_json::Value::Number(n.into())
            }
            // Unset optionals serialize as null; only the bank path is optional.
            serde_json::Value::Null | serde_json::Value::String(_) => {
                if value.is_empty() {
                    serde_json::Value::Null
                } else {
                    serde_json::Value::String(value.into())
                }
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Location of the user config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DataDir` if the directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Parse the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the user config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::SaveFailed` if serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
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

    /// Set a config value by key in memory. Call `save` to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Zero-length countdowns would resolve every question on the first tick.
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("timing.question_ticks", self.timing.question_ticks),
            ("timing.feedback_ticks", self.timing.feedback_ticks),
            ("timing.tick_millis", self.timing.tick_millis),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn timing(&self) -> Timing {
        Timing {
            question_ticks: self.timing.question_ticks,
            feedback_ticks: self.timing.feedback_ticks,
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timing.question_ticks, 60);
        assert_eq!(parsed.timing.feedback_ticks, 15);
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let parsed: Config = toml::from_str("[timing]\nquestion_ticks = 30\n").unwrap();
        assert_eq!(parsed.timing.question_ticks, 30);
        assert_eq!(parsed.timing.feedback_ticks, 15);
        assert_eq!(parsed.bank.path, None);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timing.question_ticks").as_deref(), Some("60"));
        assert_eq!(cfg.get("bank.path").as_deref(), Some("null"));
        assert!(cfg.get("timing.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("timing.feedback_ticks", "5").unwrap();
        assert_eq!(cfg.timing().feedback_ticks, 5);
    }

    #[test]
    fn set_fills_optional_path() {
        let mut cfg = Config::default();
        cfg.set("bank.path", "/tmp/bank.toml").unwrap();
        assert_eq!(cfg.bank.path, Some(PathBuf::from("/tmp/bank.toml")));
        cfg.set("bank.path", "").unwrap();
        assert_eq!(cfg.bank.path, None);
    }

    #[test]
    fn set_rejects_unknown_and_invalid() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timing.nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("timing.question_ticks", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("timing.question_ticks", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.timing.tick_millis = 250;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timing.tick_millis, 250);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timing = 12").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}

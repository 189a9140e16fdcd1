//! TOML-based application configuration.
//!
//! Stores:
//! - The fixed UTC offset used for "now"
//! - Section ids, titles and their schedule files
//! - Break thresholds for the agenda
//! - The grade scale and an optional catalog override
//!
//! Configuration is stored at `~/.config/classboard/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clock::FixedOffsetClock;
use crate::error::{ConfigError, DataSourceError};
use crate::grades::{Catalog, GradeScale};
use crate::schedule::BreakThresholds;

/// Largest accepted distance from UTC.
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// One cohort and where its schedule lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub id: String,
    pub title: String,
    /// Relative paths resolve against `data_dir`.
    pub file: PathBuf,
}

impl SectionConfig {
    pub fn new(id: &str, title: &str, file: &str) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            file: file.into(),
        }
    }
}

/// Grade calculator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// TOML catalog replacing the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub scale: GradeScale,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/classboard/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Civil time offset east of UTC, in minutes.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub breaks: BreakThresholds,
    #[serde(default)]
    pub grading: GradingConfig,
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,
}

// Default functions
fn default_utc_offset_minutes() -> i32 {
    300
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("A", "BSCE-1A", "scheduleA.csv"),
        SectionConfig::new("B", "BSCE-1B", "scheduleB.csv"),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset_minutes(),
            data_dir: default_data_dir(),
            breaks: BreakThresholds::default(),
            grading: GradingConfig::default(),
            sections: default_sections(),
        }
    }
}

/// Returns `~/.config/classboard[-dev]/` based on CLASSBOARD_ENV.
///
/// Set CLASSBOARD_ENV=dev to use the development directory.
pub fn config_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CLASSBOARD_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("classboard-dev")
    } else {
        base_dir.join("classboard")
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
        let unknown = || ConfigError::invalid(key, "unknown config key");
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let not_a = |kind: &str| {
                    ConfigError::invalid(key, format!("cannot parse '{value}' as {kind}"))
                };
                let new_value = match existing {
                    serde_json::Value::Bool(_) => {
                        serde_json::Value::Bool(value.parse::<bool>().map_err(|_| not_a("bool"))?)
                    }
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| not_a("number"))?
                        } else {
                            return Err(not_a("number"));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|_| not_a("JSON"))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("falling back to default configuration: {e}");
            Self::default()
        })
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
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

    /// Set a config value by key. The result must still validate.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::invalid(key, e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&self.utc_offset_minutes) {
            return Err(ConfigError::invalid(
                "utc_offset_minutes",
                format!("must be within ±{MAX_OFFSET_MINUTES}"),
            ));
        }
        self.breaks.validate()?;
        self.grading.scale.validate()?;
        for (i, section) in self.sections.iter().enumerate() {
            if section.id.trim().is_empty() {
                return Err(ConfigError::invalid("sections", "section id is empty"));
            }
            if self.sections[..i]
                .iter()
                .any(|s| s.id.eq_ignore_ascii_case(&section.id))
            {
                return Err(ConfigError::invalid(
                    "sections",
                    format!("duplicate section '{}'", section.id),
                ));
            }
        }
        Ok(())
    }

    /// Find a section by id, ignoring ASCII case.
    pub fn section(&self, id: &str) -> Result<&SectionConfig, DataSourceError> {
        self.sections
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(id.trim()))
            .ok_or_else(|| DataSourceError::UnknownSection(id.to_string()))
    }

    pub fn section_path(&self, section: &SectionConfig) -> PathBuf {
        if section.file.is_absolute() {
            section.file.clone()
        } else {
            self.data_dir.join(&section.file)
        }
    }

    pub fn clock(&self) -> Result<FixedOffsetClock, ConfigError> {
        FixedOffsetClock::from_offset_minutes(self.utc_offset_minutes).ok_or_else(|| {
            ConfigError::invalid("utc_offset_minutes", "not a valid UTC offset")
        })
    }

    /// The configured catalog, or the built-in one.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.grading.catalog_path {
            Some(path) => Catalog::load(path),
            None => Ok(Catalog::builtin().clone()),
        }
    }
}

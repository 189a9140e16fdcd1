//! Score entry parsing.
//!
//! Scores are typed as `obtained/total`. Anything that does not fit that
//! shape counts as "not attempted" instead of failing the calculation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::catalog::name_key;
use crate::error::ConfigError;

/// Parse `"obtained/total"` into a ratio.
///
/// Returns `None` for blank text, a plain number, non-numeric text, a
/// negative score, or a total that is not positive. The ratio is not
/// clamped: `"12/10"` gives `1.2` since bonus marks are legitimate.
pub fn parse_score(text: &str) -> Option<f64> {
    let (obtained, total) = text.trim().split_once('/')?;
    let obtained: f64 = obtained.trim().parse().ok()?;
    let total: f64 = total.trim().parse().ok()?;
    if !obtained.is_finite() || !total.is_finite() || obtained < 0.0 || total <= 0.0 {
        return None;
    }
    Some(obtained / total)
}

/// The raw text typed for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub component: String,
    pub raw_text: Option<String>,
}

impl ScoreEntry {
    pub fn new(component: impl Into<String>, raw_text: Option<&str>) -> Self {
        Self {
            component: component.into(),
            raw_text: raw_text.map(str::to_string),
        }
    }

    /// Parsed ratio, `None` when not attempted or malformed.
    pub fn ratio(&self) -> Option<f64> {
        self.raw_text.as_deref().and_then(parse_score)
    }
}

/// Everything typed into the calculator for one request.
///
/// In TOML form each subject is a table of component = "obtained/total":
///
/// ```toml
/// ["Applied Physics"]
/// Quizzes = "8/10"
/// "Midterm I" = "22/30"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreSheet {
    subjects: BTreeMap<String, BTreeMap<String, String>>,
}

impl ScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, subject: &str, component: &str, raw_text: &str) {
        self.subjects
            .entry(subject.trim().to_string())
            .or_default()
            .insert(component.trim().to_string(), raw_text.to_string());
    }

    /// Record a `SUBJECT:COMPONENT=TEXT` assignment.
    ///
    /// The subject is split off at the last `:` before the `=`, so subject
    /// names may themselves contain colons.
    pub fn insert_assignment(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let invalid = || {
            ConfigError::invalid(
                "score",
                format!("expected SUBJECT:COMPONENT=OBTAINED/TOTAL, got '{assignment}'"),
            )
        };
        let (target, raw_text) = assignment.split_once('=').ok_or_else(invalid)?;
        let (subject, component) = target.rsplit_once(':').ok_or_else(invalid)?;
        if subject.trim().is_empty() || component.trim().is_empty() {
            return Err(invalid());
        }
        self.insert(subject, component, raw_text);
        Ok(())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Entries typed for `subject`, matched the same way [`super::Catalog::get`]
    /// matches names.
    pub fn entries_for(&self, subject: &str) -> Vec<ScoreEntry> {
        let key = name_key(subject);
        self.subjects
            .iter()
            .filter(|(name, _)| name_key(name) == key)
            .flat_map(|(_, components)| components.iter())
            .map(|(component, raw)| ScoreEntry::new(component.as_str(), Some(raw.as_str())))
            .collect()
    }

    /// Subject names as typed.
    pub fn subject_names(&self) -> impl Iterator<Item = &str> {
        self.subjects.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

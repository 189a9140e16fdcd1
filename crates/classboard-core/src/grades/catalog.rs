//! Assessment catalog: subjects, credit hours and weighted components.
//!
//! The catalog is read-only configuration. A compiled-in default is always
//! available through [`Catalog::builtin`]; a TOML file can replace it:
//!
//! ```toml
//! [[subject]]
//! name = "Applied Physics"
//! credit_hours = 3
//! components = [
//!     { name = "Midterm", weight_pct = 50.0 },
//!     { name = "Final", weight_pct = 50.0 },
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Allowed drift of a subject's component weights from 100.
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// Lookup key shared by subject and component names.
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One graded piece of a subject, e.g. "Final" worth 50%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentComponent {
    pub name: String,
    pub weight_pct: f64,
}

impl AssessmentComponent {
    pub fn new(name: impl Into<String>, weight_pct: f64) -> Self {
        Self {
            name: name.into(),
            weight_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub credit_hours: u32,
    pub components: Vec<AssessmentComponent>,
}

impl Subject {
    pub fn new(
        name: impl Into<String>,
        credit_hours: u32,
        components: Vec<AssessmentComponent>,
    ) -> Self {
        Self {
            name: name.into(),
            credit_hours,
            components,
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.components.iter().map(|c| c.weight_pct).sum()
    }

    /// Look up a component by name, ignoring case and surrounding whitespace.
    pub fn component(&self, name: &str) -> Option<&AssessmentComponent> {
        let key = name_key(name);
        self.components.iter().find(|c| name_key(&c.name) == key)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let key = format!("catalog.{}", self.name);
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid("catalog", "subject name is empty"));
        }
        if self.credit_hours == 0 {
            return Err(ConfigError::invalid(key, "credit_hours must be at least 1"));
        }
        if self.components.is_empty() {
            return Err(ConfigError::invalid(key, "no assessment components"));
        }
        for (i, component) in self.components.iter().enumerate() {
            if !component.weight_pct.is_finite() || component.weight_pct < 0.0 {
                return Err(ConfigError::invalid(
                    key,
                    format!("component '{}' has an invalid weight", component.name),
                ));
            }
            let duplicate = self.components[..i]
                .iter()
                .any(|c| name_key(&c.name) == name_key(&component.name));
            if duplicate {
                return Err(ConfigError::invalid(
                    key,
                    format!("duplicate component '{}'", component.name),
                ));
            }
        }
        let total = self.total_weight();
        if (total - 100.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::invalid(
                key,
                format!("component weights sum to {total}, expected 100"),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    subject: Vec<Subject>,
}

/// Subjects keyed by trimmed, case-folded name, kept in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    subjects: Vec<Subject>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| Catalog::from_subjects(builtin_subjects()));

impl Catalog {
    /// Build and validate a catalog.
    pub fn new(subjects: Vec<Subject>) -> Result<Self, ConfigError> {
        let catalog = Self::from_subjects(subjects);
        catalog.validate()?;
        Ok(catalog)
    }

    fn from_subjects(subjects: Vec<Subject>) -> Self {
        let index = subjects
            .iter()
            .enumerate()
            .map(|(i, s)| (name_key(&s.name), i))
            .collect();
        Self { subjects, index }
    }

    /// The compiled-in catalog for the first-semester cohort.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile =
            toml::from_str(text).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::new(file.subject)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, subject) in self.subjects.iter().enumerate() {
            subject.validate()?;
            if self.index.get(&name_key(&subject.name)) != Some(&i) {
                return Err(ConfigError::invalid(
                    "catalog",
                    format!("duplicate subject '{}'", subject.name),
                ));
            }
        }
        Ok(())
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn get(&self, name: &str) -> Option<&Subject> {
        self.index
            .get(&name_key(name))
            .map(|&i| &self.subjects[i])
    }

    pub fn total_credit_hours(&self) -> u32 {
        self.subjects.iter().map(|s| s.credit_hours).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

/// Theory courses share one split; labs are graded on tasks and a lab final.
fn builtin_subjects() -> Vec<Subject> {
    let theory = || {
        vec![
            AssessmentComponent::new("Quizzes", 10.0),
            AssessmentComponent::new("Assignments", 10.0),
            AssessmentComponent::new("Midterm I", 15.0),
            AssessmentComponent::new("Midterm II", 15.0),
            AssessmentComponent::new("Final", 50.0),
        ]
    };
    let lab = || {
        vec![
            AssessmentComponent::new("Lab Tasks", 25.0),
            AssessmentComponent::new("Lab Reports", 15.0),
            AssessmentComponent::new("Lab Midterm", 20.0),
            AssessmentComponent::new("Lab Final", 40.0),
        ]
    };

    vec![
        Subject::new("Calculus and Analytical Geometry", 3, theory()),
        Subject::new("Applied Physics", 3, theory()),
        Subject::new("Applied Physics Lab", 1, lab()),
        Subject::new("Programming Fundamentals", 3, theory()),
        Subject::new("Programming Fundamentals Lab", 1, lab()),
        Subject::new(
            "Engineering Drawing",
            2,
            vec![
                AssessmentComponent::new("Sheets", 30.0),
                AssessmentComponent::new("Midterm", 20.0),
                AssessmentComponent::new("Final", 50.0),
            ],
        ),
        Subject::new("Functional English", 3, theory()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_part(name: &str, credits: u32) -> Subject {
        Subject::new(
            name,
            credits,
            vec![
                AssessmentComponent::new("Mid", 50.0),
                AssessmentComponent::new("Final", 50.0),
            ],
        )
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert!(catalog.validate().is_ok());
        assert!(!catalog.is_empty());
        assert_eq!(catalog.total_credit_hours(), 16);
    }

    #[test]
    fn lookup_ignores_case() {
        let catalog = Catalog::builtin();
        let physics = catalog.get("applied physics").unwrap();
        assert_eq!(physics.credit_hours, 3);
        assert!(physics.component("final").is_some());
        assert!(catalog.get("Chemistry").is_none());
    }

    #[test]
    fn lookup_folds_unicode_case_and_trims() {
        let subject = Subject::new(
            " Ölçme ",
            3,
            vec![
                AssessmentComponent::new("Ödev", 40.0),
                AssessmentComponent::new("Final", 60.0),
            ],
        );
        let catalog = Catalog::new(vec![subject]).unwrap();
        let found = catalog.get("ÖLÇME").unwrap();
        assert!(found.component(" ödev").is_some());
        assert!(catalog.get("olcme").is_none());
    }

    #[test]
    fn rejects_bad_weights() {
        let mut subject = two_part("X", 3);
        subject.components[1].weight_pct = 40.0;
        assert!(Catalog::new(vec![subject]).is_err());

        let mut subject = two_part("X", 3);
        subject.components[0].weight_pct = 50.005;
        assert!(Catalog::new(vec![subject]).is_ok());
    }

    #[test]
    fn rejects_zero_credit_hours() {
        assert!(Catalog::new(vec![two_part("X", 0)]).is_err());
    }

    #[test]
    fn rejects_duplicates() {
        assert!(Catalog::new(vec![two_part("X", 3), two_part("x", 2)]).is_err());

        let mut subject = two_part("X", 3);
        subject.components[1].name = "MID".into();
        assert!(Catalog::new(vec![subject]).is_err());
    }

    #[test]
    fn empty_catalog_is_allowed() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        assert_eq!(catalog.total_credit_hours(), 0);
    }

    #[test]
    fn parses_toml() {
        let text = r#"
[[subject]]
name = "Statics"
credit_hours = 3
components = [
    { name = "Mid", weight_pct = 40.0 },
    { name = "Final", weight_pct = 60.0 },
]
"#;
        let catalog = Catalog::from_toml_str(text).unwrap();
        assert_eq!(catalog.subjects().len(), 1);
        assert_eq!(catalog.get("statics").unwrap().components[1].weight_pct, 60.0);

        assert!(matches!(
            Catalog::from_toml_str("[[subject]]\nname = 3"),
            Err(ConfigError::ParseFailed(_))
        ));
    }
}

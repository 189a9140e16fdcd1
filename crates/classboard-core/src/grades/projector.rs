//! Grade projection and CGPA aggregation.
//!
//! A subject's projected percentage extrapolates the rate achieved on the
//! components graded so far:
//!
//! ```text
//! projected_pct = obtained_weight / attempted_weight * 100
//! ```
//!
//! where only components with a parseable score contribute to either sum.
//! A subject with nothing entered scores 0 and still counts toward CGPA.

use serde::{Deserialize, Serialize};

use super::catalog::{name_key, Catalog, Subject};
use super::score::{ScoreEntry, ScoreSheet};
use crate::error::{ConfigError, NoCreditsError};

/// Grade point and letter below the lowest step of any scale.
pub const FLOOR_GRADE_POINT: f64 = 0.0;
pub const FLOOR_LETTER: &str = "F";

/// Percentages at or above `min_pct` earn `grade_point`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeStep {
    pub min_pct: f64,
    pub grade_point: f64,
    pub letter: String,
}

impl GradeStep {
    pub fn new(min_pct: f64, grade_point: f64, letter: impl Into<String>) -> Self {
        Self {
            min_pct,
            grade_point,
            letter: letter.into(),
        }
    }
}

/// Monotonic step table from percentage to grade point.
///
/// Total over every input: anything below the lowest step (or NaN) maps to
/// the floor, and anything above 100 lands in the top step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeScale {
    steps: Vec<GradeStep>,
}

impl Default for GradeScale {
    fn default() -> Self {
        Self {
            steps: vec![
                GradeStep::new(85.0, 4.0, "A"),
                GradeStep::new(80.0, 3.67, "A-"),
                GradeStep::new(75.0, 3.33, "B+"),
                GradeStep::new(71.0, 3.0, "B"),
                GradeStep::new(68.0, 2.67, "B-"),
                GradeStep::new(64.0, 2.33, "C+"),
                GradeStep::new(60.0, 2.0, "C"),
                GradeStep::new(57.0, 1.67, "C-"),
                GradeStep::new(54.0, 1.33, "D+"),
                GradeStep::new(50.0, 1.0, "D"),
            ],
        }
    }
}

impl GradeScale {
    /// Build a scale, ordered from the highest step down.
    pub fn new(steps: Vec<GradeStep>) -> Result<Self, ConfigError> {
        let scale = Self { steps };
        scale.validate()?;
        Ok(scale)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for step in &self.steps {
            if !step.min_pct.is_finite() || step.min_pct < 0.0 || !step.grade_point.is_finite() {
                return Err(ConfigError::invalid(
                    "grading.scale",
                    format!("step '{}' has a non-finite or negative bound", step.letter),
                ));
            }
        }
        for pair in self.steps.windows(2) {
            if pair[1].min_pct >= pair[0].min_pct {
                return Err(ConfigError::invalid(
                    "grading.scale",
                    "min_pct must be strictly descending",
                ));
            }
            if pair[1].grade_point > pair[0].grade_point {
                return Err(ConfigError::invalid(
                    "grading.scale",
                    "grade_point must not increase as min_pct falls",
                ));
            }
        }
        Ok(())
    }

    pub fn steps(&self) -> &[GradeStep] {
        &self.steps
    }

    /// Grade point and letter for a percentage.
    pub fn grade(&self, pct: f64) -> (f64, &str) {
        self.steps
            .iter()
            .find(|step| pct >= step.min_pct)
            .map(|step| (step.grade_point, step.letter.as_str()))
            .unwrap_or((FLOOR_GRADE_POINT, FLOOR_LETTER))
    }

    pub fn grade_point(&self, pct: f64) -> f64 {
        self.grade(pct).0
    }
}

/// Projection for one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectResult {
    pub subject: String,
    pub credit_hours: u32,
    pub attempted_weight: f64,
    pub obtained_weight: f64,
    pub projected_pct: f64,
    pub grade_point: f64,
    pub letter: String,
}

/// Per-subject results plus the credit-weighted aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct GradeReport {
    pub subjects: Vec<SubjectResult>,
    pub total_credit_hours: u32,
    pub cgpa: f64,
}

/// Credit-hour weighted mean of grade points.
pub fn cgpa(results: &[SubjectResult]) -> Result<f64, NoCreditsError> {
    let credits: u32 = results.iter().map(|r| r.credit_hours).sum();
    if credits == 0 {
        return Err(NoCreditsError);
    }
    let weighted: f64 = results
        .iter()
        .map(|r| f64::from(r.credit_hours) * r.grade_point)
        .sum();
    Ok(weighted / f64::from(credits))
}

#[derive(Debug, Clone, Default)]
pub struct GradeProjector {
    scale: GradeScale,
}

impl GradeProjector {
    pub fn new(scale: GradeScale) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> &GradeScale {
        &self.scale
    }

    /// Project one subject from whatever entries have been typed.
    pub fn project(&self, subject: &Subject, entries: &[ScoreEntry]) -> SubjectResult {
        for entry in entries {
            if subject.component(&entry.component).is_none() {
                tracing::warn!(
                    subject = %subject.name,
                    component = %entry.component,
                    "score for unknown component ignored"
                );
            }
        }

        let mut attempted_weight = 0.0;
        let mut obtained_weight = 0.0;
        for component in &subject.components {
            let key = name_key(&component.name);
            let ratio = entries
                .iter()
                .find(|e| name_key(&e.component) == key)
                .and_then(ScoreEntry::ratio);
            if let Some(ratio) = ratio {
                attempted_weight += component.weight_pct;
                obtained_weight += component.weight_pct * ratio;
            }
        }

        let (projected_pct, grade_point, letter) = if attempted_weight <= 0.0 {
            (0.0, FLOOR_GRADE_POINT, FLOOR_LETTER)
        } else {
            let pct = obtained_weight / attempted_weight * 100.0;
            let (point, letter) = self.scale.grade(pct);
            (pct, point, letter)
        };

        SubjectResult {
            subject: subject.name.clone(),
            credit_hours: subject.credit_hours,
            attempted_weight,
            obtained_weight,
            projected_pct,
            grade_point,
            letter: letter.to_string(),
        }
    }

    /// Project every catalog subject and aggregate.
    ///
    /// Subjects without entries score the floor; sheet subjects missing from
    /// the catalog are logged and skipped.
    pub fn report(
        &self,
        catalog: &Catalog,
        sheet: &ScoreSheet,
    ) -> Result<GradeReport, NoCreditsError> {
        for name in sheet.subject_names() {
            if catalog.get(name).is_none() {
                tracing::warn!(subject = name, "scores for unknown subject ignored");
            }
        }

        let subjects: Vec<SubjectResult> = catalog
            .subjects()
            .iter()
            .map(|subject| self.project(subject, &sheet.entries_for(&subject.name)))
            .collect();
        let cgpa = cgpa(&subjects)?;
        Ok(GradeReport {
            total_credit_hours: subjects.iter().map(|s| s.credit_hours).sum(),
            subjects,
            cgpa,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::AssessmentComponent;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn mid_final(name: &str, credits: u32) -> Subject {
        Subject::new(
            name,
            credits,
            vec![
                AssessmentComponent::new("Mid", 50.0),
                AssessmentComponent::new("Final", 50.0),
            ],
        )
    }

    fn result(credits: u32, grade_point: f64) -> SubjectResult {
        SubjectResult {
            subject: "S".into(),
            credit_hours: credits,
            attempted_weight: 100.0,
            obtained_weight: 0.0,
            projected_pct: 0.0,
            grade_point,
            letter: String::new(),
        }
    }

    #[test]
    fn projects_from_attempted_components_only() {
        let subject = mid_final("Physics", 3);
        let entries = vec![
            ScoreEntry::new("Mid", Some("40/50")),
            ScoreEntry::new("Final", Some("")),
        ];
        let r = GradeProjector::default().project(&subject, &entries);
        assert!(approx(r.attempted_weight, 50.0));
        assert!(approx(r.obtained_weight, 40.0));
        assert!(approx(r.projected_pct, 80.0));
        assert!(approx(r.grade_point, 3.67));
        assert_eq!(r.letter, "A-");
    }

    #[test]
    fn nothing_attempted_scores_the_floor() {
        let subject = mid_final("Physics", 3);
        let entries = vec![ScoreEntry::new("Mid", Some("abc")), ScoreEntry::new("Final", None)];
        let r = GradeProjector::default().project(&subject, &entries);
        assert_eq!(r.attempted_weight, 0.0);
        assert_eq!(r.projected_pct, 0.0);
        assert_eq!(r.grade_point, 0.0);
        assert_eq!(r.letter, "F");
    }

    #[test]
    fn over_credit_passes_through() {
        let subject = mid_final("Physics", 3);
        let entries = vec![ScoreEntry::new("mid", Some("12/10"))];
        let r = GradeProjector::default().project(&subject, &entries);
        assert!(approx(r.projected_pct, 120.0));
        assert_eq!(r.grade_point, 4.0);
    }

    #[test]
    fn scale_boundaries() {
        let scale = GradeScale::default();
        assert_eq!(scale.grade(85.0), (4.0, "A"));
        assert_eq!(scale.grade(84.99).0, 3.67);
        assert_eq!(scale.grade(50.0), (1.0, "D"));
        assert_eq!(scale.grade(49.99), (0.0, "F"));
        assert_eq!(scale.grade(0.0), (0.0, "F"));
        assert_eq!(scale.grade(250.0).0, 4.0);
        assert_eq!(scale.grade(f64::NAN).0, 0.0);
    }

    #[test]
    fn scale_validation() {
        assert!(GradeScale::default().validate().is_ok());
        let ascending = vec![GradeStep::new(50.0, 1.0, "D"), GradeStep::new(85.0, 4.0, "A")];
        assert!(GradeScale::new(ascending).is_err());
        let inverted = vec![GradeStep::new(85.0, 1.0, "A"), GradeStep::new(50.0, 4.0, "D")];
        assert!(GradeScale::new(inverted).is_err());
        assert!(GradeScale::new(vec![GradeStep::new(-5.0, 1.0, "D")]).is_err());
        assert!(GradeScale::new(Vec::new()).is_ok());
    }

    #[test]
    fn cgpa_weights_by_credit_hours() {
        let value = cgpa(&[result(2, 4.0), result(3, 2.0)]).unwrap();
        assert!(approx(value, 2.8));
    }

    #[test]
    fn cgpa_without_credits_fails() {
        assert_eq!(cgpa(&[]), Err(NoCreditsError));
        assert_eq!(cgpa(&[result(0, 4.0)]), Err(NoCreditsError));
    }

    #[test]
    fn report_covers_every_catalog_subject() {
        let catalog =
            Catalog::new(vec![mid_final("Physics", 2), mid_final("Calculus", 3)]).unwrap();
        let mut sheet = ScoreSheet::new();
        sheet.insert("physics", "Mid", "45/50");
        sheet.insert("Calculus", "Mid", "30/50");
        sheet.insert("Calculus", "Final", "31/50");
        sheet.insert("Chemistry", "Mid", "50/50");

        let report = GradeProjector::default().report(&catalog, &sheet).unwrap();
        assert_eq!(report.subjects.len(), 2);
        assert_eq!(report.total_credit_hours, 5);
        assert_eq!(report.subjects[0].grade_point, 4.0);
        assert!(approx(report.subjects[1].projected_pct, 61.0));
        assert_eq!(report.subjects[1].grade_point, 2.0);
        assert!(approx(report.cgpa, 2.8));
    }

    #[test]
    fn report_matches_sheet_names_like_catalog_lookup() {
        let catalog =
            Catalog::new(vec![mid_final("Ölçme", 3), mid_final(" Statics ", 2)]).unwrap();
        let mut sheet = ScoreSheet::new();
        sheet.insert("ölçme", "FINAL", "45/50");
        sheet.insert("statics", "mid", "40/50");
        assert!(catalog.get("ölçme").is_some());
        assert!(catalog.get("Statics").is_some());

        let report = GradeProjector::default().report(&catalog, &sheet).unwrap();
        assert!(approx(report.subjects[0].attempted_weight, 50.0));
        assert!(approx(report.subjects[0].projected_pct, 90.0));
        assert!(approx(report.subjects[1].attempted_weight, 50.0));
        assert!(approx(report.subjects[1].projected_pct, 80.0));
    }

    #[test]
    fn report_on_empty_catalog_fails() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        let err = GradeProjector::default().report(&catalog, &ScoreSheet::new()).unwrap_err();
        assert_eq!(err, NoCreditsError);
    }
}

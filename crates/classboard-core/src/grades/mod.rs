//! Grade projection calculator.
//!
//! Partial, weighted assessment scores are turned into a projected
//! percentage, a grade point per subject, and a credit-weighted CGPA.

mod catalog;
mod projector;
mod score;

pub use catalog::{AssessmentComponent, Catalog, Subject, WEIGHT_TOLERANCE};
pub use projector::{
    cgpa, GradeProjector, GradeReport, GradeScale, GradeStep, SubjectResult, FLOOR_GRADE_POINT,
    FLOOR_LETTER,
};
pub use score::{parse_score, ScoreEntry, ScoreSheet};

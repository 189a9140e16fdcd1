//! # Classboard Core Library
//!
//! This library provides the logic behind the Classboard student dashboard:
//! a weekly class schedule with live status and a grade projection
//! calculator. Rendering is left to callers (the `classboard-cli` binary is
//! one); the library only returns computed values.
//!
//! ## Architecture
//!
//! - **Clock**: strict "HH:MM" parsing and a fixed-offset wall clock
//! - **Schedule**: CSV-backed sections, current/next class resolution and
//!   per-day agendas with classified breaks
//! - **Grades**: assessment catalog, lenient score parsing, projection and
//!   credit-weighted CGPA
//! - **Config**: TOML configuration for sections, thresholds and grading
//!
//! The schedule and grade halves share no state. Every render recomputes
//! from scratch; nothing is cached.
//!
//! ## Key Components
//!
//! - [`ScheduleRepository`]: one section's classes, loaded per render
//! - [`ScheduleBoard`]: current, next and day agendas for one moment
//! - [`GradeProjector`]: per-subject projection and CGPA
//! - [`Config`]: application configuration management

pub mod clock;
pub mod config;
pub mod error;
pub mod grades;
pub mod schedule;

pub use clock::{minutes_between, Clock, FixedClock, FixedOffsetClock, Moment, TimeOfDay};
pub use config::{Config, GradingConfig, SectionConfig};
pub use error::{ConfigError, CoreError, DataSourceError, FormatError, NoCreditsError};
pub use grades::{
    parse_score, AssessmentComponent, Catalog, GradeProjector, GradeReport, GradeScale,
    ScoreEntry, ScoreSheet, Subject, SubjectResult,
};
pub use schedule::{
    AgendaBuilder, AgendaItem, Break, BreakThresholds, BreakTier, ClassSession, LiveStatus,
    ScheduleBoard, ScheduleRepository,
};

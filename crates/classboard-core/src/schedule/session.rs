//! Class session and section types.

use chrono::Weekday;
use serde::Serialize;

use crate::clock::{minutes_between, TimeOfDay};

/// One scheduled class meeting.
///
/// [`ClassSession::new`] enforces `start < end`; the repository builds every
/// session through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSession {
    pub day: Weekday,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub course: String,
    pub teacher: String,
    pub venue: String,
}

impl ClassSession {
    /// Returns `None` unless `start < end`.
    pub fn new(
        day: Weekday,
        start: TimeOfDay,
        end: TimeOfDay,
        course: impl Into<String>,
        teacher: impl Into<String>,
        venue: impl Into<String>,
    ) -> Option<Self> {
        if start >= end {
            return None;
        }
        Some(Self {
            day,
            start,
            end,
            course: course.into(),
            teacher: teacher.into(),
            venue: venue.into(),
        })
    }

    pub fn duration_minutes(&self) -> i64 {
        minutes_between(self.start, self.end)
    }

    /// Inclusive at both ends, matching how a class is "on" at its end minute.
    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time <= self.end
    }
}

/// A cohort with its own schedule, e.g. "A" titled "BSCE-1A".
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    /// In source order.
    pub sessions: Vec<ClassSession>,
}

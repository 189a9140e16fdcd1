//! CSV-backed schedule loading and per-day queries.
//!
//! A section file carries one row per class with the columns `Day`,
//! `Start_Time`, `End_Time`, `Course`, `Teacher` and `Venue`. Header names
//! are matched after trimming and lower-casing; extra columns are ignored.
//! Any bad row fails the whole load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::Weekday;
use serde::Deserialize;

use super::session::{ClassSession, Section};
use crate::clock::{parse_weekday, TimeOfDay};
use crate::config::Config;
use crate::error::DataSourceError;

/// Normalised header names every section file must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "day",
    "start_time",
    "end_time",
    "course",
    "teacher",
    "venue",
];

#[derive(Debug, Deserialize)]
struct RawRow {
    day: String,
    start_time: String,
    end_time: String,
    course: String,
    teacher: String,
    venue: String,
}

impl RawRow {
    fn into_session(self) -> Result<ClassSession, String> {
        let day = parse_weekday(&self.day)
            .ok_or_else(|| format!("unknown weekday '{}'", self.day))?;
        let start = TimeOfDay::parse(&self.start_time).map_err(|e| e.to_string())?;
        let end = TimeOfDay::parse(&self.end_time).map_err(|e| e.to_string())?;
        ClassSession::new(day, start, end, self.course, self.teacher, self.venue)
            .ok_or_else(|| format!("start {start} is not before end {end}"))
    }
}

/// Read-only snapshot of one section's schedule.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    section: Section,
}

impl ScheduleRepository {
    pub fn new(section: Section) -> Self {
        Self { section }
    }

    /// Load a configured section by id.
    ///
    /// Always reads the file afresh; nothing is cached between calls.
    pub fn load(config: &Config, section_id: &str) -> Result<Self, DataSourceError> {
        let section = config.section(section_id)?;
        Self::open(&section.id, &section.title, &config.section_path(section))
    }

    /// Load a section from a CSV file on disk.
    pub fn open(id: &str, title: &str, path: &Path) -> Result<Self, DataSourceError> {
        let file = File::open(path).map_err(|source| DataSourceError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(id, title, file, &path.display().to_string())
    }

    /// Load a section from any CSV reader. `origin` names the source in errors.
    pub fn from_reader<R: Read>(
        id: &str,
        title: &str,
        reader: R,
        origin: &str,
    ) -> Result<Self, DataSourceError> {
        let csv_error = |source| DataSourceError::Csv {
            origin: origin.to_string(),
            source,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: csv::StringRecord = rdr
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(DataSourceError::MissingColumn {
                    origin: origin.to_string(),
                    column: column.to_string(),
                });
            }
        }
        rdr.set_headers(headers);

        let mut sessions: Vec<ClassSession> = Vec::new();
        for (index, record) in rdr.deserialize::<RawRow>().enumerate() {
            let row = index + 1;
            let session = record
                .map_err(csv_error)?
                .into_session()
                .map_err(|message| DataSourceError::InvalidRow {
                    origin: origin.to_string(),
                    row,
                    message,
                })?;
            if sessions.contains(&session) {
                return Err(DataSourceError::DuplicateRow {
                    origin: origin.to_string(),
                    row,
                });
            }
            tracing::debug!(row, course = %session.course, day = %session.day, "loaded class");
            sessions.push(session);
        }

        tracing::info!(section = id, classes = sessions.len(), "loaded schedule from {origin}");
        Ok(Self::new(Section {
            id: id.to_string(),
            title: title.to_string(),
            sessions,
        }))
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    /// All sessions in source order.
    pub fn sessions(&self) -> &[ClassSession] {
        &self.section.sessions
    }

    /// Sessions on `day`, ordered by start time.
    ///
    /// The sort is stable: classes sharing a start time keep their source
    /// order, so whatever order the data file declares is what callers see.
    pub fn classes_on(&self, day: Weekday) -> Vec<&ClassSession> {
        let mut classes: Vec<&ClassSession> =
            self.section.sessions.iter().filter(|s| s.day == day).collect();
        classes.sort_by_key(|s| s.start);
        classes
    }

    /// Days that have classes, in order of first appearance in the source.
    pub fn days(&self) -> Vec<Weekday> {
        let mut days = Vec::new();
        for session in &self.section.sessions {
            if !days.contains(&session.day) {
                days.push(session.day);
            }
        }
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Day,Start_Time,End_Time,Course,Teacher,Venue
Tuesday,11:00,12:30,Physics,Dr. B,R2
Monday,10:00,11:00,Calculus,Dr. A,R1
Monday,08:30,09:50,English,Ms. C,R3
";

    fn load(text: &str) -> Result<ScheduleRepository, DataSourceError> {
        ScheduleRepository::from_reader("A", "BSCE-1A", text.as_bytes(), "test.csv")
    }

    #[test]
    fn loads_rows_in_source_order() {
        let repo = load(SAMPLE).unwrap();
        assert_eq!(repo.section().id, "A");
        assert_eq!(repo.section().title, "BSCE-1A");
        let courses: Vec<_> = repo.sessions().iter().map(|s| s.course.as_str()).collect();
        assert_eq!(courses, ["Physics", "Calculus", "English"]);
    }

    #[test]
    fn classes_on_sorts_by_start() {
        let repo = load(SAMPLE).unwrap();
        let monday: Vec<_> = repo
            .classes_on(Weekday::Mon)
            .iter()
            .map(|s| s.course.as_str())
            .collect();
        assert_eq!(monday, ["English", "Calculus"]);
        assert!(repo.classes_on(Weekday::Sun).is_empty());
    }

    #[test]
    fn equal_starts_keep_source_order() {
        let text = "\
day,start_time,end_time,course,teacher,venue
Wednesday,09:00,10:00,Second Listed?,X,R1
Wednesday,08:00,09:00,Early,X,R1
Wednesday,09:00,09:30,Also Nine,Y,R2
";
        let repo = load(text).unwrap();
        let wed: Vec<_> = repo
            .classes_on(Weekday::Wed)
            .iter()
            .map(|s| s.course.as_str())
            .collect();
        assert_eq!(wed, ["Early", "Second Listed?", "Also Nine"]);
    }

    #[test]
    fn days_follow_first_appearance() {
        let repo = load(SAMPLE).unwrap();
        assert_eq!(repo.days(), vec![Weekday::Tue, Weekday::Mon]);
    }

    #[test]
    fn headers_are_normalised() {
        let text = " DAY , Start_Time,END_TIME ,course,Teacher,Venue,Notes\n\
                    monday,10:00,11:00,C,T,V,extra\n";
        let repo = load(text).unwrap();
        assert_eq!(repo.sessions().len(), 1);
        assert_eq!(repo.sessions()[0].day, Weekday::Mon);
    }

    #[test]
    fn missing_column_fails() {
        let text = "Day,Start_Time,End_Time,Course,Teacher\nMonday,10:00,11:00,C,T\n";
        match load(text) {
            Err(DataSourceError::MissingColumn { column, .. }) => assert_eq!(column, "venue"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn bad_time_fails_with_row_number() {
        let text = "Day,Start_Time,End_Time,Course,Teacher,Venue\n\
                    Monday,10:00,11:00,C,T,V\n\
                    Monday,9am,11:00,C2,T,V\n";
        match load(text) {
            Err(DataSourceError::InvalidRow { row, message, .. }) => {
                assert_eq!(row, 2);
                assert!(message.contains("9am"));
            }
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn start_not_before_end_fails() {
        let text = "Day,Start_Time,End_Time,Course,Teacher,Venue\nMonday,11:00,11:00,C,T,V\n";
        assert!(matches!(load(text), Err(DataSourceError::InvalidRow { row: 1, .. })));
    }

    #[test]
    fn unknown_weekday_fails() {
        let text = "Day,Start_Time,End_Time,Course,Teacher,Venue\nFunday,10:00,11:00,C,T,V\n";
        assert!(matches!(load(text), Err(DataSourceError::InvalidRow { .. })));
    }

    #[test]
    fn ragged_row_fails() {
        let text = "Day,Start_Time,End_Time,Course,Teacher,Venue\nMonday,10:00,11:00,C\n";
        assert!(matches!(load(text), Err(DataSourceError::Csv { .. })));
    }

    #[test]
    fn duplicate_row_fails() {
        let text = "Day,Start_Time,End_Time,Course,Teacher,Venue\n\
                    Monday,10:00,11:00,C,T,V\n\
                    Monday,10:00,11:00,C,T,V\n";
        assert!(matches!(load(text), Err(DataSourceError::DuplicateRow { row: 2, .. })));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let path = Path::new("/nonexistent/scheduleA.csv");
        let err = ScheduleRepository::open("A", "A", path).unwrap_err();
        assert!(matches!(err, DataSourceError::Unreadable { .. }));
    }
}

//! One render's worth of schedule values for a presentation layer.

use chrono::Weekday;
use serde::Serialize;

use super::agenda::{AgendaBuilder, AgendaItem};
use super::repository::ScheduleRepository;
use super::status::LiveStatus;
use crate::clock::Moment;

/// A day tab: the day's classes with break slots between them.
#[derive(Debug, Clone, Serialize)]
pub struct DayAgenda<'a> {
    pub day: Weekday,
    pub items: Vec<AgendaItem<'a>>,
}

/// Everything a renderer needs for one section at one moment.
///
/// Built from a single sampled `now`, so the live status and the day
/// agendas can never disagree about the time.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleBoard<'a> {
    pub section_id: &'a str,
    pub title: &'a str,
    pub status: LiveStatus<'a>,
    /// In order of first appearance in the source.
    pub days: Vec<DayAgenda<'a>>,
}

impl<'a> ScheduleBoard<'a> {
    pub fn build(repo: &'a ScheduleRepository, now: Moment, agenda: &AgendaBuilder) -> Self {
        let today = repo.classes_on(now.day);
        let status = LiveStatus::resolve(now, &today);

        let days = repo
            .days()
            .into_iter()
            .map(|day| DayAgenda {
                day,
                items: agenda.build(repo.classes_on(day)).collect(),
            })
            .collect();

        Self {
            section_id: &repo.section().id,
            title: &repo.section().title,
            status,
            days,
        }
    }

    pub fn day(&self, day: Weekday) -> Option<&DayAgenda<'a>> {
        self.days.iter().find(|d| d.day == day)
    }
}

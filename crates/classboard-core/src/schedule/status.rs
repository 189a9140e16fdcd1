//! "Happening now" and "next up" resolution.
//!
//! Both lookups are pure functions of the sampled moment and a day's
//! chronologically ordered sessions. Sessions on other weekdays are ignored.

use serde::Serialize;

use super::session::ClassSession;
use crate::clock::Moment;

/// The in-progress class: first session with `start <= now <= end`.
///
/// With overlapping sessions the earliest-starting match wins; the overlap
/// itself is not an error. Use [`in_progress`] to see every match.
pub fn current<'a, I>(now: &Moment, sessions: I) -> Option<&'a ClassSession>
where
    I: IntoIterator<Item = &'a ClassSession>,
{
    in_progress(now, sessions).next()
}

/// The first session starting strictly after now.
///
/// Computed independently of [`current`], so both may be present at once.
pub fn next<'a, I>(now: &Moment, sessions: I) -> Option<&'a ClassSession>
where
    I: IntoIterator<Item = &'a ClassSession>,
{
    sessions
        .into_iter()
        .find(|s| s.day == now.day && s.start > now.time)
}

/// Every session in progress at `now`, in the given order.
pub fn in_progress<'a, I>(now: &Moment, sessions: I) -> impl Iterator<Item = &'a ClassSession>
where
    I: IntoIterator<Item = &'a ClassSession>,
{
    let now = *now;
    sessions
        .into_iter()
        .filter(move |s| s.day == now.day && s.contains(now.time))
}

/// Current and next class for one render.
#[derive(Debug, Clone, Serialize)]
pub struct LiveStatus<'a> {
    pub now: Moment,
    pub current: Option<&'a ClassSession>,
    pub next: Option<&'a ClassSession>,
    /// True when more than one session is in progress at `now`.
    pub conflict: bool,
}

impl<'a> LiveStatus<'a> {
    pub fn resolve(now: Moment, sessions: &[&'a ClassSession]) -> Self {
        let sessions = sessions.iter().copied();
        Self {
            now,
            current: current(&now, sessions.clone()),
            next: next(&now, sessions.clone()),
            conflict: in_progress(&now, sessions).nth(1).is_some(),
        }
    }
}

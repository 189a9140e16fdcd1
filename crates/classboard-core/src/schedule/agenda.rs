//! Per-day agenda with computed breaks between consecutive classes.
//!
//! An agenda for `N` sessions yields exactly `2N - 1` items alternating
//! class, break, class, ... (nothing for an empty day). Every slot between
//! two classes is present; gaps too short to count carry
//! [`BreakTier::NoBreak`] and renderers skip them.

use serde::{Deserialize, Serialize};

use super::session::ClassSession;
use crate::clock::minutes_between;
use crate::error::ConfigError;

/// Tier of a gap between two classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakTier {
    NoBreak,    // gap <= short_after_minutes, or overlap
    ShortBreak, // up to long_after_minutes inclusive
    LongBreak,
}

/// Gap thresholds in minutes. Each boundary value belongs to the lower tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakThresholds {
    #[serde(default = "default_short_after")]
    pub short_after_minutes: i64,
    #[serde(default = "default_long_after")]
    pub long_after_minutes: i64,
}

fn default_short_after() -> i64 {
    30
}
fn default_long_after() -> i64 {
    120
}

impl Default for BreakThresholds {
    fn default() -> Self {
        Self {
            short_after_minutes: default_short_after(),
            long_after_minutes: default_long_after(),
        }
    }
}

impl BreakThresholds {
    pub fn new(short_after_minutes: i64, long_after_minutes: i64) -> Result<Self, ConfigError> {
        let thresholds = Self {
            short_after_minutes,
            long_after_minutes,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_after_minutes < 0 {
            return Err(ConfigError::invalid(
                "breaks.short_after_minutes",
                "must not be negative",
            ));
        }
        if self.long_after_minutes < self.short_after_minutes {
            return Err(ConfigError::invalid(
                "breaks.long_after_minutes",
                format!(
                    "must be at least short_after_minutes ({})",
                    self.short_after_minutes
                ),
            ));
        }
        Ok(())
    }

    /// Classify a gap. Negative gaps (overlapping classes) are never breaks.
    pub fn classify(&self, gap_minutes: i64) -> BreakTier {
        if gap_minutes <= 0 || gap_minutes <= self.short_after_minutes {
            BreakTier::NoBreak
        } else if gap_minutes <= self.long_after_minutes {
            BreakTier::ShortBreak
        } else {
            BreakTier::LongBreak
        }
    }
}

/// The gap between two adjacent classes on one day.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Break<'a> {
    /// Clamped to zero when the classes overlap.
    pub duration_minutes: u32,
    pub tier: BreakTier,
    /// The class after the gap
    #[serde(skip)]
    pub precedes: &'a ClassSession,
    /// The class before the gap
    #[serde(skip)]
    pub follows: &'a ClassSession,
}

impl<'a> Break<'a> {
    pub fn between(
        follows: &'a ClassSession,
        precedes: &'a ClassSession,
        thresholds: &BreakThresholds,
    ) -> Self {
        let gap = minutes_between(follows.end, precedes.start);
        Self {
            duration_minutes: u32::try_from(gap.max(0)).unwrap_or(u32::MAX),
            tier: thresholds.classify(gap),
            precedes,
            follows,
        }
    }

    pub fn is_break(&self) -> bool {
        self.tier != BreakTier::NoBreak
    }

    /// Display label, `None` for [`BreakTier::NoBreak`].
    pub fn label(&self) -> Option<String> {
        match self.tier {
            BreakTier::NoBreak => None,
            BreakTier::ShortBreak => Some(format!("Break ({} min)", self.duration_minutes)),
            BreakTier::LongBreak => Some(format!("Long Break ({} min)", self.duration_minutes)),
        }
    }
}

/// One rendered agenda entry.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgendaItem<'a> {
    Class(&'a ClassSession),
    Break(Break<'a>),
}

/// Lazy agenda over a chronologically ordered day.
///
/// Items are computed as the iterator advances and nothing is mutated, so
/// the same day can be walked again by calling [`AgendaBuilder::build`] once
/// more.
#[derive(Debug, Clone)]
pub struct Agenda<'a> {
    sessions: Vec<&'a ClassSession>,
    thresholds: BreakThresholds,
    pos: usize,
}

impl<'a> Agenda<'a> {
    fn total_len(&self) -> usize {
        match self.sessions.len() {
            0 => 0,
            n => 2 * n - 1,
        }
    }

    /// Only the gaps that count as breaks.
    pub fn breaks(self) -> impl Iterator<Item = Break<'a>> {
        self.filter_map(|item| match item {
            AgendaItem::Break(b) if b.is_break() => Some(b),
            _ => None,
        })
    }
}

impl<'a> Iterator for Agenda<'a> {
    type Item = AgendaItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.total_len() {
            return None;
        }
        let i = self.pos / 2;
        let item = if self.pos % 2 == 0 {
            AgendaItem::Class(self.sessions[i])
        } else {
            AgendaItem::Break(Break::between(
                self.sessions[i],
                self.sessions[i + 1],
                &self.thresholds,
            ))
        };
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_len().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Agenda<'_> {}

/// Builds agendas with a fixed set of thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgendaBuilder {
    thresholds: BreakThresholds,
}

impl AgendaBuilder {
    /// Create a builder with default thresholds (30 / 120 minutes)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(mut self, thresholds: BreakThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> BreakThresholds {
        self.thresholds
    }

    /// Walk `sessions`, which must already be in chronological order
    /// (see [`super::ScheduleRepository::classes_on`]).
    pub fn build<'a, I>(&self, sessions: I) -> Agenda<'a>
    where
        I: IntoIterator<Item = &'a ClassSession>,
    {
        Agenda {
            sessions: sessions.into_iter().collect(),
            thresholds: self.thresholds,
            pos: 0,
        }
    }
}

/// Convenience function to build an agenda with default thresholds
pub fn build_agenda<'a, I>(sessions: I) -> Agenda<'a>
where
    I: IntoIterator<Item = &'a ClassSession>,
{
    AgendaBuilder::new().build(sessions)
}

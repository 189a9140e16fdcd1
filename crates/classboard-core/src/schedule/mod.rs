//! Class schedule engine.
//!
//! This module provides:
//! - Loading a section's classes from CSV
//! - "Happening now" / "next up" resolution
//! - Per-day agendas with classified breaks

mod agenda;
mod board;
mod repository;
mod session;
mod status;

pub use agenda::{
    build_agenda, Agenda, AgendaBuilder, AgendaItem, Break, BreakThresholds, BreakTier,
};
pub use board::{DayAgenda, ScheduleBoard};
pub use repository::{ScheduleRepository, REQUIRED_COLUMNS};
pub use session::{ClassSession, Section};
pub use status::{current, in_progress, next, LiveStatus};

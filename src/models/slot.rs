//! Time slot model.
//!
//! A slot is the discrete unit into which matches are placed. Slots are
//! ordered chronologically; the calendar date groups slots into match days.
//!
//! # Time Representation
//! Timestamps are local wall-clock times (`NaiveDateTime`). RFC 3339 input
//! keeps its wall-clock reading and drops the offset.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Formats accepted by [`TimeSlot::parse`], tried in order.
const SLOT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// A discrete match slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Slot start.
    pub timestamp: NaiveDateTime,
}

impl TimeSlot {
    /// Creates a slot at the given timestamp.
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self { timestamp }
    }

    /// Parses an ISO-8601 date-time string.
    ///
    /// Returns `None` when no supported format matches.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        SLOT_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.naive_local())
            })
            .map(Self::new)
    }

    /// Calendar date of this slot (the match-day key).
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.timestamp.format("%Y-%m-%dT%H:%M"))
    }
}

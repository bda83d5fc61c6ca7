//! Schedule (solution) model.
//!
//! A schedule places fixtures into (slot, venue, referee) triples. Fixtures
//! the solver could not place are kept in `unscheduled` rather than dropped,
//! so a schedule alone carries everything needed to score it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Fixture, TimeSlot};

/// A fixture placed into a slot at a venue with a referee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMatch {
    /// The pairing.
    pub fixture: Fixture,
    /// Assigned slot.
    pub slot: TimeSlot,
    /// Assigned venue name.
    pub venue: String,
    /// Assigned referee name.
    pub referee: String,
}

/// A complete or partial league schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Placed matches, ordered by slot then venue name.
    pub matches: Vec<ScheduledMatch>,
    /// Fixtures that could not be placed under the hard constraints.
    pub unscheduled: Vec<Fixture>,
}

/// A hard-constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Indices into `Schedule::matches` of the offending matches.
    pub match_indices: Vec<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Classification of hard-constraint violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Two matches at one venue in the same slot.
    VenueDoubleBooked,
    /// One referee officiating two matches in the same slot.
    RefereeDoubleBooked,
    /// One team playing two matches in the same slot.
    TeamDoubleBooked,
    /// A team paired with itself.
    SelfPlay,
    /// A team playing more often on one day than the configured cap.
    DailyLimitExceeded,
    /// A marquee match officiated by an under-level referee (enforced rule only).
    RefereeIneligible,
    /// A match referencing a team, venue, referee or slot that is not registered.
    UnknownEntity,
}

impl ScheduledMatch {
    /// Creates a scheduled match.
    pub fn new(
        fixture: Fixture,
        slot: TimeSlot,
        venue: impl Into<String>,
        referee: impl Into<String>,
    ) -> Self {
        Self {
            fixture,
            slot,
            venue: venue.into(),
            referee: referee.into(),
        }
    }

    /// Presentation triple `[home, away, venue]`.
    pub fn triple(&self) -> [String; 3] {
        [
            self.fixture.home.clone(),
            self.fixture.away.clone(),
            self.venue.clone(),
        ]
    }
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        match_indices: Vec<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            match_indices,
            message: message.into(),
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a placed match.
    pub fn add_match(&mut self, scheduled: ScheduledMatch) {
        self.matches.push(scheduled);
    }

    /// Records a fixture that could not be placed.
    pub fn add_unscheduled(&mut self, fixture: Fixture) {
        self.unscheduled.push(fixture);
    }

    /// Restores slot order (ties by venue name, then referee name).
    pub fn sort(&mut self) {
        self.matches.sort_by(|a, b| {
            a.slot
                .cmp(&b.slot)
                .then_with(|| a.venue.cmp(&b.venue))
                .then_with(|| a.referee.cmp(&b.referee))
        });
    }

    /// Whether every required fixture was placed.
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }

    /// Number of placed matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Number of fixtures the schedule was asked to place.
    pub fn required_count(&self) -> usize {
        self.matches.len() + self.unscheduled.len()
    }

    /// Matches grouped by calendar date, in slot order.
    ///
    /// Assumes `matches` is sorted (see [`Schedule::sort`]).
    pub fn days(&self) -> Vec<(NaiveDate, Vec<&ScheduledMatch>)> {
        let mut days: Vec<(NaiveDate, Vec<&ScheduledMatch>)> = Vec::new();
        for m in &self.matches {
            let date = m.slot.date();
            if let Some((d, day)) = days.last_mut() {
                if *d == date {
                    day.push(m);
                    continue;
                }
            }
            days.push((date, vec![m]));
        }
        days
    }
}

//! Error taxonomy.
//!
//! Fatal outcomes are [`LeagueError`] variants. A schedule that could not
//! place every fixture is not an error: it comes back with a
//! [`PartialScheduleWarning`] naming the fixtures left out.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::{Fixture, Schedule};
use crate::validation::ValidationError;

/// Fatal scheduling errors.
#[derive(Debug, Error)]
pub enum LeagueError {
    /// Malformed or insufficient entity input. Carries every problem found.
    #[error("invalid input: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    /// More fixtures than slot × venue pairs; no full placement can exist.
    #[error("insufficient capacity: {required} fixtures required but only {available} slot-venue pairs available")]
    InsufficientCapacity { required: usize, available: usize },

    /// The request payload could not be decoded.
    #[error("malformed request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LeagueError>;

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Non-fatal outcome: the solver placed fewer than all fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialScheduleWarning {
    /// Fixtures left without a (slot, venue, referee) triple.
    pub unscheduled: Vec<Fixture>,
    /// Number of fixtures the run was asked to place.
    pub required: usize,
}

impl PartialScheduleWarning {
    /// The warning for a schedule, or `None` if every fixture was placed.
    pub fn from_schedule(schedule: &Schedule) -> Option<Self> {
        (!schedule.is_complete()).then(|| Self {
            unscheduled: schedule.unscheduled.clone(),
            required: schedule.required_count(),
        })
    }
}

impl fmt::Display for PartialScheduleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "partial schedule: {} of {} fixtures could not be placed",
            self.unscheduled.len(),
            self.required
        )
    }
}

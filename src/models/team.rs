//! Team model.
//!
//! A team is a participant of the league. Its strength rating drives the
//! competitive-balance terms of the objective.

use serde::{Deserialize, Serialize};

/// A registered team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique team name (registry key).
    pub name: String,
    /// Strength rating within the configured strength range.
    pub strength: i32,
}

impl Team {
    /// Creates a new team.
    pub fn new(name: impl Into<String>, strength: i32) -> Self {
        Self {
            name: name.into(),
            strength,
        }
    }

    /// Absolute strength difference to another team.
    #[inline]
    pub fn strength_gap(&self, other: &Team) -> i64 {
        (self.strength as i64 - other.strength as i64).abs()
    }
}

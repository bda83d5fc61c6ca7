//! Fixture model.
//!
//! A fixture is a home/away pairing that still needs a slot, a venue
//! and a referee.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A home/away pairing of two distinct teams.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fixture {
    /// Home team name.
    pub home: String,
    /// Away team name.
    pub away: String,
}

impl Fixture {
    /// Creates a fixture.
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
        }
    }

    /// Whether the given team takes part.
    #[inline]
    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }

    /// The same pairing with home and away swapped.
    pub fn reversed(&self) -> Self {
        Self::new(self.away.clone(), self.home.clone())
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.home, self.away)
    }
}

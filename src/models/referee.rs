//! Referee model.
//!
//! Referees officiate at most one match per slot. The experience level
//! decides eligibility for marquee fixtures when a [`MarqueeRule`] is set.
//!
//! [`MarqueeRule`]: crate::config::MarqueeRule

use serde::{Deserialize, Serialize};

/// A referee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referee {
    /// Unique referee name (registry key).
    pub name: String,
    /// Experience tier (higher = more experienced).
    pub level: i32,
}

impl Referee {
    /// Creates a referee at level 1.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1,
        }
    }

    /// Sets the experience level.
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referee_builder() {
        let r = Referee::new("Collina").with_level(5);
        assert_eq!(r.name, "Collina");
        assert_eq!(r.level, 5);
    }
}

//! Venue model.

use serde::{Deserialize, Serialize};

/// A venue that hosts at most one match per time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    /// Unique venue name (registry key).
    pub name: String,
    /// Spectator capacity (>= 1).
    pub capacity: i32,
}

impl Venue {
    /// Creates a venue with capacity 1.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: 1,
        }
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }
}

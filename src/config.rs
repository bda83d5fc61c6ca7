//! Tunable scheduling parameters.
//!
//! Every weight, cap and valid range used by the registry, the solver and
//! the scorer lives here. All fields carry serde defaults so a partial JSON
//! document (or none at all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Round-robin generation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundRobinMode {
    /// Every unordered pair meets once.
    #[default]
    Single,
    /// Every pair meets twice with home and away reversed.
    Double,
}

/// Weights of the soft objective terms.
///
/// fitness = team_balance * Var(matches per team)
///         + venue_balance * Var(matches per venue)
///         + referee_balance * Var(matches per referee)
///         + strength_gap * Σ (Δstrength)²
///         + referee_mismatch * Σ marquee level deficit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    pub team_balance: f64,
    pub venue_balance: f64,
    pub referee_balance: f64,
    pub strength_gap: f64,
    pub referee_mismatch: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            team_balance: 10.0,
            venue_balance: 5.0,
            referee_balance: 2.0,
            strength_gap: 0.01,
            referee_mismatch: 50.0,
        }
    }
}

/// Referee requirement for high-profile fixtures.
///
/// A fixture is marquee when the mean strength of its two teams reaches
/// `min_average_strength`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarqueeRule {
    pub min_average_strength: i32,
    pub min_referee_level: i32,
    /// Treat the level requirement as a hard constraint instead of a penalty.
    #[serde(default)]
    pub enforce: bool,
}

impl MarqueeRule {
    /// Creates a soft marquee rule.
    pub fn new(min_average_strength: i32, min_referee_level: i32) -> Self {
        Self {
            min_average_strength,
            min_referee_level,
            enforce: false,
        }
    }

    /// Makes the level requirement a hard constraint.
    pub fn enforced(mut self) -> Self {
        self.enforce = true;
        self
    }

    /// Whether a pairing with these strengths is marquee.
    #[inline]
    pub fn is_marquee(&self, home_strength: i32, away_strength: i32) -> bool {
        // mean >= threshold, without integer division
        home_strength as i64 + away_strength as i64 >= 2 * self.min_average_strength as i64
    }
}

/// Inclusive integer range that serializes as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange(pub i32, pub i32);

impl ValueRange {
    pub fn min(&self) -> i32 {
        self.0
    }

    pub fn max(&self) -> i32 {
        self.1
    }

    pub fn contains(&self, value: i32) -> bool {
        self.as_range().contains(&value)
    }

    pub fn span(&self) -> i64 {
        self.1 as i64 - self.0 as i64
    }

    fn as_range(&self) -> RangeInclusive<i32> {
        self.0..=self.1
    }
}

/// Complete configuration of a scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    pub mode: RoundRobinMode,
    pub weights: ObjectiveWeights,
    /// Fitness penalty per unplaced fixture (and per violating match when scoring).
    pub unscheduled_penalty: f64,
    /// Cap on matches per team per calendar day. `None` = per-slot rule only.
    pub max_matches_per_team_per_day: Option<u32>,
    pub marquee: Option<MarqueeRule>,
    /// Cap on accepted moves in the improvement pass.
    pub max_iterations: usize,
    pub strength_range: ValueRange,
    pub level_range: ValueRange,
    pub capacity_range: ValueRange,
    pub default_venue_capacity: i32,
    pub default_referee_level: i32,
    /// Strength gap at or below which a match counts as balanced in reports.
    pub balanced_gap: i64,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            mode: RoundRobinMode::Single,
            weights: ObjectiveWeights::default(),
            unscheduled_penalty: 1000.0,
            max_matches_per_team_per_day: None,
            marquee: None,
            max_iterations: 1000,
            strength_range: ValueRange(0, 100),
            level_range: ValueRange(1, 5),
            capacity_range: ValueRange(1, 200_000),
            default_venue_capacity: 1,
            default_referee_level: 1,
            balanced_gap: 2,
        }
    }
}

impl LeagueConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a (possibly partial) JSON configuration.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn with_mode(mut self, mode: RoundRobinMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_unscheduled_penalty(mut self, penalty: f64) -> Self {
        self.unscheduled_penalty = penalty;
        self
    }

    pub fn with_daily_cap(mut self, cap: u32) -> Self {
        self.max_matches_per_team_per_day = Some(cap);
        self
    }

    pub fn with_marquee(mut self, rule: MarqueeRule) -> Self {
        self.marquee = Some(rule);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_strength_range(mut self, min: i32, max: i32) -> Self {
        self.strength_range = ValueRange(min, max);
        self
    }
}

//! Soft objective (fitness).
//!
//! # Terms
//!
//! | Term | Definition |
//! |------|-----------|
//! | Team balance | Population variance of matches per registered team |
//! | Venue balance | Population variance of matches per registered venue |
//! | Referee balance | Population variance of matches per registered referee |
//! | Strength gap | Σ (home strength − away strength)² over placed matches |
//! | Referee mismatch | Σ level deficit of referees on marquee matches |
//! | Unscheduled | Fixed penalty per unplaced fixture |
//! | Violations | Fixed penalty per match breaking a hard constraint |
//!
//! All running sums are integers, so the value depends only on the set of
//! placements and never on the order in which they were made. The solver's
//! incremental cost and the scorer's from-scratch cost are therefore equal.

use crate::config::{LeagueConfig, ObjectiveWeights};

/// Counts per entity with running sum and sum of squares.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tally {
    counts: Vec<i64>,
    sum: i64,
    sum_sq: i64,
}

impl Tally {
    pub fn new(n: usize) -> Self {
        Self {
            counts: vec![0; n],
            sum: 0,
            sum_sq: 0,
        }
    }

    pub fn add(&mut self, i: usize, delta: i64) {
        let old = self.counts[i];
        let new = old + delta;
        self.counts[i] = new;
        self.sum += delta;
        self.sum_sq += new * new - old * old;
    }

    /// Population variance: (n·Σc² − (Σc)²) / n².
    pub fn variance(&self) -> f64 {
        let n = self.counts.len() as i64;
        if n == 0 {
            return 0.0;
        }
        let numerator = n * self.sum_sq - self.sum * self.sum;
        numerator as f64 / (n * n) as f64
    }
}

/// Precomputed objective inputs of one fixture.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MatchTerms {
    pub home: usize,
    pub away: usize,
    /// (Δstrength)².
    pub gap_sq: i64,
    /// Required referee level if the fixture is marquee.
    pub marquee_level: Option<i32>,
}

impl MatchTerms {
    /// Level shortfall of a referee on this fixture.
    #[inline]
    pub fn deficit(&self, referee_level: i32) -> i64 {
        self.marquee_level
            .map_or(0, |req| (req as i64 - referee_level as i64).max(0))
    }
}

/// Running objective state over a set of placements.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CostState {
    teams: Tally,
    venues: Tally,
    referees: Tally,
    gap_sq: i64,
    deficit: i64,
    unscheduled: usize,
    violating: usize,
}

impl CostState {
    /// Empty state with `unscheduled` fixtures still to place.
    pub fn new(teams: usize, venues: usize, referees: usize, unscheduled: usize) -> Self {
        Self {
            teams: Tally::new(teams),
            venues: Tally::new(venues),
            referees: Tally::new(referees),
            gap_sq: 0,
            deficit: 0,
            unscheduled,
            violating: 0,
        }
    }

    /// Adds a placed match.
    pub fn place(&mut self, terms: &MatchTerms, venue: usize, referee: usize, referee_level: i32) {
        self.apply(terms, venue, referee, referee_level, 1);
        self.unscheduled = self.unscheduled.saturating_sub(1);
    }

    /// Removes a placed match.
    pub fn remove(&mut self, terms: &MatchTerms, venue: usize, referee: usize, referee_level: i32) {
        self.apply(terms, venue, referee, referee_level, -1);
        self.unscheduled += 1;
    }

    pub fn add_violating(&mut self, count: usize) {
        self.violating += count;
    }

    fn apply(
        &mut self,
        terms: &MatchTerms,
        venue: usize,
        referee: usize,
        referee_level: i32,
        sign: i64,
    ) {
        self.teams.add(terms.home, sign);
        self.teams.add(terms.away, sign);
        self.venues.add(venue, sign);
        self.referees.add(referee, sign);
        self.gap_sq += sign * terms.gap_sq;
        self.deficit += sign * terms.deficit(referee_level);
    }
}

/// Weighted objective evaluator.
#[derive(Debug, Clone)]
pub(crate) struct Objective {
    weights: ObjectiveWeights,
    penalty: f64,
}

impl Objective {
    pub fn new(weights: ObjectiveWeights, penalty: f64) -> Self {
        Self { weights, penalty }
    }

    pub fn from_config(config: &LeagueConfig) -> Self {
        Self::new(config.weights.clone(), config.unscheduled_penalty)
    }

    /// Fitness of a state (lower is better, never negative).
    pub(crate) fn evaluate(&self, state: &CostState) -> f64 {
        let w = &self.weights;
        let soft = w.team_balance * state.teams.variance()
            + w.venue_balance * state.venues.variance()
            + w.referee_balance * state.referees.variance()
            + w.strength_gap * state.gap_sq as f64
            + w.referee_mismatch * state.deficit as f64;
        let hard = self.penalty * (state.unscheduled + state.violating) as f64;
        (soft + hard).max(0.0)
    }
}

//! Match assignment and schedule scoring.
//!
//! Places generated fixtures into (slot, venue, referee) triples and scores
//! the result.
//!
//! # Algorithm
//!
//! `LeagueSolver` runs in two phases:
//! 1. **Construction**: greedy, one fixture at a time, cheapest feasible
//!    triple with a deterministic tie-break.
//! 2. **Improvement**: first-improvement local search (insert, make room,
//!    swap, referee swap, relocate) bounded by an iteration budget.
//!
//! Hard constraints are never relaxed. Fixtures that cannot be placed are
//! reported as unscheduled and penalised in the objective.
//!
//! # Scoring
//!
//! `ScoreReport` recomputes fitness, strength balance, constraint
//! satisfaction and quality from a finished schedule alone.
//!
//! # References
//!
//! - Kendall et al. (2010), "Scheduling in sports: An annotated bibliography"
//! - Ribeiro (2012), "Sports scheduling: Problems and applications"

mod greedy;
mod improve;
mod objective;
mod occupancy;
mod score;
mod solver;
mod state;

pub use score::ScoreReport;
pub use solver::{LeagueSolver, SolveResult};

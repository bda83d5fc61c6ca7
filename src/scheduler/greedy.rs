//! Constructive greedy placement.
//!
//! # Algorithm
//!
//! 1. Process fixtures in generation order.
//! 2. For each fixture, enumerate every feasible (slot, venue, referee)
//!    triple: slots chronologically, venues and referees by name.
//! 3. Keep the triple with the lowest resulting fitness; the first one
//!    found wins ties (earliest slot, then venue name, then referee name).
//! 4. Fixtures without a feasible triple stay unplaced.
//!
//! # Complexity
//! O(f · s · v · r) where f=fixtures, s=slots, v=venues, r=referees.

use super::occupancy::Placement;
use super::state::Working;

/// Runs the constructive pass. Returns the number of fixtures placed.
pub(crate) fn construct(working: &mut Working<'_, '_>) -> usize {
    let mut placed = 0;
    for fixture in 0..working.problem.fixtures.len() {
        if let Some(p) = best_placement(working, fixture) {
            working.place(fixture, p);
            placed += 1;
        }
    }
    placed
}

/// Cheapest feasible triple for an unplaced fixture.
pub(crate) fn best_placement(working: &mut Working<'_, '_>, fixture: usize) -> Option<Placement> {
    let problem = working.problem;
    let terms = problem.terms[fixture]?;
    let mut best: Option<(f64, Placement)> = None;

    for slot in 0..problem.slot_count() {
        if working.occupancy().teams_blocked(terms.home, terms.away, slot) {
            continue;
        }
        for &venue in &problem.venue_order {
            if !working.occupancy().venue_free(slot, venue) {
                continue;
            }
            for &referee in &problem.referee_order {
                let p = Placement::new(slot, venue, referee);
                if !working.feasible(fixture, p) {
                    continue;
                }
                let cost = working.cost_with(fixture, p);
                if best.map_or(true, |(c, _)| cost < c) {
                    best = Some((cost, p));
                }
            }
        }
    }

    best.map(|(_, p)| p)
}

//! Bounded local improvement.
//!
//! # Moves
//!
//! Scanned in this order, first improvement wins:
//! 1. **Insert**: place a still-unplaced fixture into a free triple.
//! 2. **Make room**: move the single match that keeps an unplaced fixture's
//!    team busy in a slot to a free triple elsewhere, and place the fixture
//!    in that slot.
//! 3. **Swap**: exchange the full (slot, venue, referee) triples of two matches.
//! 4. **Referee swap**: exchange only the referees of two matches.
//! 5. **Relocate**: move one match to a free triple.
//!
//! A move is applied only if the result is feasible and the fitness drops
//! by more than [`IMPROVEMENT_EPS`], so the cost sequence is strictly
//! decreasing. The pass stops after `max_iterations` accepted moves or
//! after a full scan finds nothing.
//!
//! [`IMPROVEMENT_EPS`]: super::state::IMPROVEMENT_EPS

use tracing::trace;

use super::occupancy::Placement;
use super::state::Working;

/// Outcome of the improvement pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct ImproveOutcome {
    /// Accepted moves.
    pub iterations: usize,
    /// Whether the pass ended at a local optimum rather than at the cap.
    pub converged: bool,
    /// Fitness after each accepted move.
    pub history: Vec<f64>,
}

/// Runs the improvement pass on a constructed assignment.
pub(crate) fn improve(working: &mut Working<'_, '_>, max_iterations: usize) -> ImproveOutcome {
    let mut outcome = ImproveOutcome::default();
    loop {
        if outcome.iterations >= max_iterations {
            return outcome;
        }
        match find_and_apply(working) {
            Some(cost) => {
                outcome.iterations += 1;
                outcome.history.push(cost);
                trace!(iteration = outcome.iterations, cost, "accepted move");
            }
            None => {
                outcome.converged = true;
                return outcome;
            }
        }
    }
}

fn find_and_apply(w: &mut Working<'_, '_>) -> Option<f64> {
    let n = w.problem.fixtures.len();

    for f in 0..n {
        if w.placement(f).is_none() {
            if let Some(cost) = try_relocate(w, f) {
                return Some(cost);
            }
        }
    }

    for f in 0..n {
        if w.placement(f).is_none() {
            if let Some(cost) = try_make_room(w, f) {
                return Some(cost);
            }
        }
    }

    for i in 0..n {
        let Some(pi) = w.placement(i) else { continue };
        for j in (i + 1)..n {
            let Some(pj) = w.placement(j) else { continue };
            if let Some(cost) = w.apply_if_improving(&[(i, pj), (j, pi)]) {
                return Some(cost);
            }
        }
    }

    for i in 0..n {
        let Some(pi) = w.placement(i) else { continue };
        for j in (i + 1)..n {
            let Some(pj) = w.placement(j) else { continue };
            if pi.referee == pj.referee {
                continue;
            }
            let ni = Placement { referee: pj.referee, ..pi };
            let nj = Placement { referee: pi.referee, ..pj };
            if let Some(cost) = w.apply_if_improving(&[(i, ni), (j, nj)]) {
                return Some(cost);
            }
        }
    }

    for f in 0..n {
        if w.placement(f).is_some() {
            if let Some(cost) = try_relocate(w, f) {
                return Some(cost);
            }
        }
    }

    None
}

/// Tries every triple not held by another match, in tie-break order.
fn try_relocate(w: &mut Working<'_, '_>, fixture: usize) -> Option<f64> {
    let problem = w.problem;
    let current = w.placement(fixture);
    for slot in 0..problem.slot_count() {
        for &venue in &problem.venue_order {
            let own_venue = current.is_some_and(|c| c.slot == slot && c.venue == venue);
            if !own_venue && !w.occupancy().venue_free(slot, venue) {
                continue;
            }
            for &referee in &problem.referee_order {
                let p = Placement::new(slot, venue, referee);
                if current == Some(p) {
                    continue;
                }
                let own_referee = current.is_some_and(|c| c.slot == slot && c.referee == referee);
                if !own_referee && !w.occupancy().referee_free(slot, referee) {
                    continue;
                }
                if let Some(cost) = w.apply_if_improving(&[(fixture, p)]) {
                    return Some(cost);
                }
            }
        }
    }
    None
}

/// Moves the one match blocking `fixture` in some slot out of that slot and
/// places `fixture` there, as a single two-change move.
fn try_make_room(w: &mut Working<'_, '_>, fixture: usize) -> Option<f64> {
    let problem = w.problem;
    let terms = problem.terms[fixture]?;

    for slot in 0..problem.slot_count() {
        let blockers: Vec<usize> = (0..problem.fixtures.len())
            .filter(|&j| {
                w.placement(j).is_some_and(|p| p.slot == slot)
                    && problem.terms[j].is_some_and(|t| {
                        [t.home, t.away]
                            .iter()
                            .any(|&team| team == terms.home || team == terms.away)
                    })
            })
            .collect();
        let [blocker] = blockers[..] else { continue };
        let Some(held) = w.placement(blocker) else { continue };

        for target in free_triples(w, slot) {
            for &venue in &problem.venue_order {
                if venue != held.venue && !w.occupancy().venue_free(slot, venue) {
                    continue;
                }
                for &referee in &problem.referee_order {
                    if referee != held.referee && !w.occupancy().referee_free(slot, referee) {
                        continue;
                    }
                    let p = Placement::new(slot, venue, referee);
                    if let Some(cost) = w.apply_if_improving(&[(blocker, target), (fixture, p)]) {
                        return Some(cost);
                    }
                }
            }
        }
    }
    None
}

/// Unoccupied (slot, venue, referee) triples outside `except_slot`, in
/// tie-break order.
fn free_triples(w: &Working<'_, '_>, except_slot: usize) -> Vec<Placement> {
    let problem = w.problem;
    let occupancy = w.occupancy();
    let mut out = Vec::new();
    for slot in (0..problem.slot_count()).filter(|&s| s != except_slot) {
        for &venue in &problem.venue_order {
            if !occupancy.venue_free(slot, venue) {
                continue;
            }
            for &referee in &problem.referee_order {
                if occupancy.referee_free(slot, referee) {
                    out.push(Placement::new(slot, venue, referee));
                }
            }
        }
    }
    out
}

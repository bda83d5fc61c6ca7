//! Working assignment shared by the constructive and improvement passes.

use chrono::NaiveDate;

use super::objective::{CostState, MatchTerms, Objective};
use super::occupancy::{Occupancy, Placement};
use crate::config::LeagueConfig;
use crate::models::{Fixture, Schedule, ScheduledMatch};
use crate::validation::Registry;

/// Minimum cost decrease for a move to count as improving.
pub(crate) const IMPROVEMENT_EPS: f64 = 1e-9;

/// Index-based view of one solving run.
pub(crate) struct Problem<'a> {
    pub registry: &'a Registry,
    pub fixtures: &'a [Fixture],
    /// `None` for fixtures that can never be placed (unknown team, self-play).
    pub terms: Vec<Option<MatchTerms>>,
    /// Venue indices sorted by name (tie-break order).
    pub venue_order: Vec<usize>,
    /// Referee indices sorted by name (tie-break order).
    pub referee_order: Vec<usize>,
    pub day_of_slot: Vec<usize>,
    pub objective: Objective,
    pub daily_cap: Option<u32>,
    enforce_marquee: bool,
}

impl<'a> Problem<'a> {
    pub fn new(registry: &'a Registry, fixtures: &'a [Fixture], config: &LeagueConfig) -> Self {
        let terms = fixtures
            .iter()
            .map(|f| match_terms(registry, f, config))
            .collect();

        let mut venue_order: Vec<usize> = (0..registry.venues().len()).collect();
        venue_order.sort_by(|&a, &b| registry.venues()[a].name.cmp(&registry.venues()[b].name));
        let mut referee_order: Vec<usize> = (0..registry.referees().len()).collect();
        referee_order
            .sort_by(|&a, &b| registry.referees()[a].name.cmp(&registry.referees()[b].name));

        Self {
            registry,
            fixtures,
            terms,
            venue_order,
            referee_order,
            day_of_slot: day_indices(registry),
            objective: Objective::from_config(config),
            daily_cap: config.max_matches_per_team_per_day,
            enforce_marquee: config.marquee.as_ref().is_some_and(|m| m.enforce),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.registry.slots().len()
    }

    pub fn referee_level(&self, referee: usize) -> i32 {
        self.registry.referees()[referee].level
    }
}

/// Objective inputs for a fixture, or `None` if it can never be placed.
pub(crate) fn match_terms(
    registry: &Registry,
    fixture: &Fixture,
    config: &LeagueConfig,
) -> Option<MatchTerms> {
    let home = registry.team_index(&fixture.home)?;
    let away = registry.team_index(&fixture.away)?;
    if home == away {
        return None;
    }
    let home_strength = registry.teams()[home].strength;
    let away_strength = registry.teams()[away].strength;
    let gap = home_strength as i64 - away_strength as i64;
    let marquee_level = config
        .marquee
        .as_ref()
        .filter(|rule| rule.is_marquee(home_strength, away_strength))
        .map(|rule| rule.min_referee_level);
    Some(MatchTerms {
        home,
        away,
        gap_sq: gap * gap,
        marquee_level,
    })
}

/// Day index of every (chronologically sorted) slot.
pub(crate) fn day_indices(registry: &Registry) -> Vec<usize> {
    let mut days = Vec::with_capacity(registry.slots().len());
    let mut last: Option<NaiveDate> = None;
    let mut day = 0;
    for slot in registry.slots() {
        let date = slot.date();
        if last.is_some_and(|d| d != date) {
            day += 1;
        }
        last = Some(date);
        days.push(day);
    }
    days
}

/// Mutable assignment under construction.
pub(crate) struct Working<'p, 'a> {
    pub problem: &'p Problem<'a>,
    placements: Vec<Option<Placement>>,
    occupancy: Occupancy,
    cost: CostState,
}

impl<'p, 'a> Working<'p, 'a> {
    pub fn new(problem: &'p Problem<'a>) -> Self {
        let reg = problem.registry;
        Self {
            problem,
            placements: vec![None; problem.fixtures.len()],
            occupancy: Occupancy::new(
                reg.teams().len(),
                reg.venues().len(),
                reg.referees().len(),
                problem.day_of_slot.clone(),
                problem.daily_cap,
            ),
            cost: CostState::new(
                reg.teams().len(),
                reg.venues().len(),
                reg.referees().len(),
                problem.fixtures.len(),
            ),
        }
    }

    pub fn placement(&self, fixture: usize) -> Option<Placement> {
        self.placements[fixture]
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub fn fitness(&self) -> f64 {
        self.problem.objective.evaluate(&self.cost)
    }

    /// Whether `fixture` can go to `p` given everything else placed.
    pub fn feasible(&self, fixture: usize, p: Placement) -> bool {
        let Some(terms) = self.problem.terms[fixture] else {
            return false;
        };
        if !self.occupancy.can_place(terms.home, terms.away, p) {
            return false;
        }
        if self.problem.enforce_marquee {
            if let Some(required) = terms.marquee_level {
                return self.problem.referee_level(p.referee) >= required;
            }
        }
        true
    }

    /// Places an unplaced fixture. The caller checks feasibility.
    pub fn place(&mut self, fixture: usize, p: Placement) {
        if let Some(terms) = self.problem.terms[fixture] {
            self.occupancy.occupy(terms.home, terms.away, p);
            self.cost
                .place(&terms, p.venue, p.referee, self.problem.referee_level(p.referee));
            self.placements[fixture] = Some(p);
        }
    }

    /// Removes a fixture from the assignment, returning its old placement.
    pub fn unplace(&mut self, fixture: usize) -> Option<Placement> {
        let p = self.placements[fixture].take()?;
        if let Some(terms) = self.problem.terms[fixture] {
            self.occupancy.release(terms.home, terms.away, p);
            self.cost
                .remove(&terms, p.venue, p.referee, self.problem.referee_level(p.referee));
        }
        Some(p)
    }

    /// Fitness if `fixture` were placed at `p`, leaving the state unchanged.
    pub fn cost_with(&mut self, fixture: usize, p: Placement) -> f64 {
        let Some(terms) = self.problem.terms[fixture] else {
            return f64::INFINITY;
        };
        let level = self.problem.referee_level(p.referee);
        self.cost.place(&terms, p.venue, p.referee, level);
        let value = self.fitness();
        self.cost.remove(&terms, p.venue, p.referee, level);
        value
    }

    /// Applies a set of re-placements if all are feasible and the cost
    /// strictly drops. Returns the new cost, or `None` with state untouched.
    pub fn apply_if_improving(&mut self, changes: &[(usize, Placement)]) -> Option<f64> {
        let before = self.fitness();
        let old: Vec<(usize, Option<Placement>)> =
            changes.iter().map(|&(f, _)| (f, self.unplace(f))).collect();

        let mut placed = 0;
        for &(f, p) in changes {
            if !self.feasible(f, p) {
                break;
            }
            self.place(f, p);
            placed += 1;
        }

        if placed == changes.len() {
            let after = self.fitness();
            if after < before - IMPROVEMENT_EPS {
                return Some(after);
            }
        }

        for &(f, _) in &changes[..placed] {
            self.unplace(f);
        }
        for (f, p) in old {
            if let Some(p) = p {
                self.place(f, p);
            }
        }
        None
    }

    /// Converts the assignment into a slot-ordered [`Schedule`].
    pub fn to_schedule(&self) -> Schedule {
        let reg = self.problem.registry;
        let mut schedule = Schedule::new();
        for (fixture, placement) in self.problem.fixtures.iter().zip(&self.placements) {
            match placement {
                Some(p) => schedule.add_match(ScheduledMatch::new(
                    fixture.clone(),
                    reg.slots()[p.slot],
                    reg.venues()[p.venue].name.clone(),
                    reg.referees()[p.referee].name.clone(),
                )),
                None => schedule.add_unscheduled(fixture.clone()),
            }
        }
        schedule.sort();
        schedule
    }
}

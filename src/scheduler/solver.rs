//! Greedy-plus-local-search assignment solver.
//!
//! # Algorithm
//!
//! 1. Constructive pass ([`greedy`](super::greedy)): place each fixture at
//!    its cheapest feasible (slot, venue, referee) triple.
//! 2. Improvement pass ([`improve`](super::improve)): apply strictly
//!    improving feasible moves until none is left or the iteration cap is hit.
//!
//! Fixtures that cannot be placed are reported in
//! [`Schedule::unscheduled`], never dropped. The run is deterministic:
//! identical registry, fixtures and configuration give an identical result.

use tracing::{debug, info, warn};

use super::greedy::construct;
use super::improve::improve;
use super::state::{Problem, Working};
use crate::config::LeagueConfig;
use crate::error::PartialScheduleWarning;
use crate::models::{Fixture, Schedule};
use crate::validation::Registry;

/// Output of one solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    /// Best schedule found.
    pub schedule: Schedule,
    /// Fitness of `schedule`.
    pub fitness: f64,
    /// Accepted improvement moves.
    pub iterations: usize,
    /// Whether improvement stopped at a local optimum (not at the cap).
    pub converged: bool,
    /// Fitness after construction, then after every accepted move.
    pub history: Vec<f64>,
}

impl SolveResult {
    /// Fitness right after the constructive pass.
    pub fn initial_fitness(&self) -> f64 {
        self.history.first().copied().unwrap_or(self.fitness)
    }

    /// Warning listing unplaced fixtures, if any.
    pub fn warning(&self) -> Option<PartialScheduleWarning> {
        PartialScheduleWarning::from_schedule(&self.schedule)
    }
}

/// Assigns fixtures to (slot, venue, referee) triples.
///
/// # Example
///
/// ```
/// use u_league::config::LeagueConfig;
/// use u_league::generator::generate_fixtures;
/// use u_league::models::{Referee, Team, TimeSlot, Venue};
/// use u_league::scheduler::LeagueSolver;
/// use u_league::validation::Registry;
///
/// let config = LeagueConfig::default();
/// let registry = Registry::build(
///     vec![Team::new("Lions", 60), Team::new("Tigers", 55)],
///     vec![Venue::new("Arena")],
///     vec![Referee::new("Smith")],
///     vec![TimeSlot::parse("2024-06-01T15:00").unwrap()],
///     &config,
/// )
/// .unwrap();
/// let fixtures = generate_fixtures(&registry, config.mode).unwrap();
///
/// let result = LeagueSolver::new(config).solve(&registry, &fixtures);
/// assert_eq!(result.schedule.match_count(), 1);
/// assert!(result.warning().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LeagueSolver {
    config: LeagueConfig,
}

impl LeagueSolver {
    /// Creates a solver with the given configuration.
    pub fn new(config: LeagueConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    /// Runs construction followed by bounded improvement.
    pub fn solve(&self, registry: &Registry, fixtures: &[Fixture]) -> SolveResult {
        self.run(registry, fixtures, self.config.max_iterations)
    }

    /// Runs the constructive pass only.
    pub fn construct(&self, registry: &Registry, fixtures: &[Fixture]) -> SolveResult {
        self.run(registry, fixtures, 0)
    }

    fn run(&self, registry: &Registry, fixtures: &[Fixture], max_iterations: usize) -> SolveResult {
        let problem = Problem::new(registry, fixtures, &self.config);
        let mut working = Working::new(&problem);

        let placed = construct(&mut working);
        let initial = working.fitness();
        debug!(
            placed,
            unplaced = fixtures.len() - placed,
            fitness = initial,
            "constructive pass done"
        );

        let outcome = improve(&mut working, max_iterations);
        let fitness = working.fitness();
        info!(
            fixtures = fixtures.len(),
            iterations = outcome.iterations,
            converged = outcome.converged,
            initial_fitness = initial,
            fitness,
            "solver finished"
        );

        let schedule = working.to_schedule();
        if !schedule.is_complete() {
            warn!(
                unscheduled = schedule.unscheduled.len(),
                required = fixtures.len(),
                "some fixtures could not be placed"
            );
        }

        let mut history = Vec::with_capacity(outcome.history.len() + 1);
        history.push(initial);
        history.extend(outcome.history);

        SolveResult {
            schedule,
            fitness,
            iterations: outcome.iterations,
            converged: outcome.converged,
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MarqueeRule, RoundRobinMode};
    use crate::generator::generate_fixtures;
    use crate::models::{check_schedule, Referee, Team, TimeSlot, Venue};
    use crate::scheduler::ScoreReport;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn slots(days: usize, per_day: usize) -> Vec<TimeSlot> {
        (0..days)
            .flat_map(|d| {
                (0..per_day).map(move |h| {
                    TimeSlot::parse(&format!("2024-03-{:02}T{:02}:00", d + 1, 12 + 2 * h)).unwrap()
                })
            })
            .collect()
    }

    fn registry_with(
        teams: Vec<Team>,
        venues: usize,
        referees: usize,
        slots: Vec<TimeSlot>,
    ) -> Registry {
        Registry::build(
            teams,
            (0..venues).map(|i| Venue::new(format!("Venue {i}"))).collect(),
            (0..referees)
                .map(|i| Referee::new(format!("Ref {i}")).with_level(1 + (i as i32 % 5)))
                .collect(),
            slots,
            &LeagueConfig::default(),
        )
        .unwrap()
    }

    fn teams(n: usize) -> Vec<Team> {
        (0..n)
            .map(|i| Team::new(format!("Team {i:02}"), (i as i32 * 37) % 100))
            .collect()
    }

    fn solve(registry: &Registry, config: LeagueConfig) -> SolveResult {
        let fixtures = generate_fixtures(registry, config.mode).unwrap();
        LeagueSolver::new(config).solve(registry, &fixtures)
    }

    #[test]
    fn test_minimal_instance() {
        let reg = registry_with(teams(2), 1, 1, slots(1, 1));
        let result = solve(&reg, LeagueConfig::default());
        assert_eq!(result.schedule.match_count(), 1);
        assert!(result.schedule.is_complete());
        let score = ScoreReport::calculate(&result.schedule, &reg, &LeagueConfig::default());
        assert!((score.constraint_satisfaction - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_full_round_robin_no_violations() {
        let reg = registry_with(teams(8), 3, 4, slots(7, 3));
        let config = LeagueConfig::default();
        let result = solve(&reg, config.clone());
        assert!(result.schedule.is_complete());
        assert_eq!(result.schedule.match_count(), 28);
        assert!(check_schedule(&result.schedule, &reg, &config).is_empty());
    }

    #[test]
    fn test_double_round_robin() {
        let reg = registry_with(teams(4), 2, 2, slots(8, 1));
        let config = LeagueConfig::default().with_mode(RoundRobinMode::Double);
        let result = solve(&reg, config.clone());
        assert_eq!(result.schedule.match_count(), 12);
        assert!(check_schedule(&result.schedule, &reg, &config).is_empty());
    }

    #[test]
    fn test_tight_instances_complete() {
        // n/2 venues and referees over n - 1 slots leaves no spare triple
        for n in [4, 6, 8, 10, 12, 16] {
            let reg = registry_with(teams(n), n / 2, n / 2, slots(n - 1, 1));
            let config = LeagueConfig::default();
            let result = solve(&reg, config.clone());
            assert!(result.schedule.is_complete(), "{n} teams left fixtures unplaced");
            assert_eq!(result.schedule.match_count(), n * (n - 1) / 2);
            assert!(check_schedule(&result.schedule, &reg, &config).is_empty());
        }
    }

    #[test]
    fn test_partial_schedule_enumerates_unplaced() {
        // 10 teams, 1 venue, 3 slots: only 3 of 45 fixtures fit
        let reg = registry_with(teams(10), 1, 1, slots(3, 1));
        let mut fixtures = Vec::new();
        let names: Vec<String> = reg.teams().iter().map(|t| t.name.clone()).collect();
        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                fixtures.push(Fixture::new(names[i].clone(), names[j].clone()));
            }
        }
        let config = LeagueConfig::default();
        let result = LeagueSolver::new(config.clone()).solve(&reg, &fixtures);

        assert_eq!(result.schedule.match_count(), 3);
        let warning = result.warning().unwrap();
        assert!(warning.unscheduled.len() >= 42);
        assert_eq!(warning.required, 45);
        assert!(check_schedule(&result.schedule, &reg, &config).is_empty());

        let score = ScoreReport::calculate(&result.schedule, &reg, &config);
        assert!((score.constraint_satisfaction - 3.0 / 45.0).abs() < 1e-10);
    }

    #[test]
    fn test_daily_cap_respected() {
        let reg = registry_with(teams(4), 2, 2, slots(3, 2));
        let config = LeagueConfig::default().with_daily_cap(1);
        let result = solve(&reg, config.clone());
        assert!(result.schedule.is_complete());
        assert!(check_schedule(&result.schedule, &reg, &config).is_empty());
    }

    #[test]
    fn test_enforced_marquee_uses_senior_referees() {
        let reg = registry_with(
            vec![
                Team::new("Giants", 95),
                Team::new("Titans", 90),
                Team::new("Minnows", 10),
                Team::new("Sprats", 15),
            ],
            2,
            5,
            slots(3, 1),
        );
        let config = LeagueConfig::default().with_marquee(MarqueeRule::new(85, 4).enforced());
        let result = solve(&reg, config.clone());
        assert!(result.schedule.is_complete());
        assert!(check_schedule(&result.schedule, &reg, &config).is_empty());

        let marquee = result
            .schedule
            .matches
            .iter()
            .find(|m| m.fixture.involves("Giants") && m.fixture.involves("Titans"))
            .unwrap();
        let level = reg.referees()[reg.referee_index(&marquee.referee).unwrap()].level;
        assert!(level >= 4);
    }

    #[test]
    fn test_history_monotone_and_ends_at_fitness() {
        let reg = registry_with(teams(6), 2, 3, slots(5, 2));
        let config = LeagueConfig::default().with_marquee(MarqueeRule::new(50, 5));
        let result = solve(&reg, config);
        for pair in result.history.windows(2) {
            assert!(pair[1] < pair[0]);
        }
        assert_eq!(*result.history.last().unwrap(), result.fitness);
        assert!(result.fitness <= result.initial_fitness());
    }

    #[test]
    fn test_iteration_cap_returns_best_so_far() {
        let reg = registry_with(teams(6), 2, 3, slots(5, 2));
        let config = LeagueConfig::default()
            .with_marquee(MarqueeRule::new(50, 5))
            .with_max_iterations(1);
        let result = solve(&reg, config.clone());
        assert!(result.iterations <= 1);
        assert!(check_schedule(&result.schedule, &reg, &config).is_empty());
    }

    #[test]
    fn test_solver_fitness_matches_scorer() {
        let reg = registry_with(teams(7), 3, 3, slots(4, 2));
        let config = LeagueConfig::default().with_marquee(MarqueeRule::new(60, 3));
        let result = solve(&reg, config.clone());
        let score = ScoreReport::calculate(&result.schedule, &reg, &config);
        assert_eq!(score.fitness, result.fitness);
    }

    #[test]
    fn test_deterministic() {
        let reg = registry_with(teams(9), 3, 3, slots(6, 2));
        let a = solve(&reg, LeagueConfig::default());
        let b = solve(&reg, LeagueConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_construct_only() {
        let reg = registry_with(teams(4), 2, 2, slots(3, 1));
        let fixtures = generate_fixtures(&reg, RoundRobinMode::Single).unwrap();
        let result = LeagueSolver::default().construct(&reg, &fixtures);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.schedule.match_count(), 6);
    }

    #[test]
    fn test_random_instances_never_violate_hard_constraints() {
        crate::logging::init_test();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..30 {
            let n_teams = rng.random_range(2..9);
            let n_venues = rng.random_range(1..4);
            let n_refs = rng.random_range(1..4);
            let days = rng.random_range(1..5);
            let per_day = rng.random_range(1..4);
            let team_list: Vec<Team> = (0..n_teams)
                .map(|i| Team::new(format!("T{i}"), rng.random_range(0..=100)))
                .collect();
            let reg = registry_with(team_list, n_venues, n_refs, slots(days, per_day));

            let mut config = LeagueConfig::default().with_max_iterations(50);
            if rng.random_bool(0.5) {
                config = config.with_daily_cap(1);
            }
            if rng.random_bool(0.5) {
                config = config.with_marquee(MarqueeRule::new(60, 3));
            }

            let fixtures = generate_fixtures(&reg, config.mode);
            let Ok(fixtures) = fixtures else { continue };
            let result = LeagueSolver::new(config.clone()).solve(&reg, &fixtures);

            assert!(check_schedule(&result.schedule, &reg, &config).is_empty());
            assert_eq!(result.schedule.required_count(), fixtures.len());
            for pair in result.history.windows(2) {
                assert!(pair[1] < pair[0]);
            }
        }
    }
}

//! Schedule quality metrics.
//!
//! Computes the quality numbers of a schedule from the schedule itself and
//! the registry it was built against. Nothing is carried over from the
//! solver, so any schedule (solver output or hand-edited) can be scored and
//! re-scoring always yields the same values.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Fitness | Weighted soft objective + penalties (see [`objective`](super::objective)) |
//! | Balance | 1 − mean\|Δstrength\| / strength range span, in [0, 1] |
//! | Constraint satisfaction | Clean placed matches / required fixtures, in [0, 1] |
//! | Quality | 1 − fitness / (penalty × required fixtures), in [0, 1] |

use serde::{Deserialize, Serialize};

use super::objective::{CostState, Objective};
use super::state::match_terms;
use crate::config::LeagueConfig;
use crate::models::{check_schedule, violating_matches, Schedule, Violation};
use crate::report::UsageStats;
use crate::validation::Registry;

/// Quality report of one schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Weighted penalty (lower is better, never negative).
    pub fitness: f64,
    /// Competitive evenness (1.0 = every match between equal strengths).
    pub balance: f64,
    /// Fraction of required fixtures placed without hard-constraint violation.
    pub constraint_satisfaction: f64,
    /// Fitness normalised by the penalty of leaving every fixture unplaced.
    pub quality: f64,
    /// Hard-constraint violations found.
    pub violations: Vec<Violation>,
    /// Usage counts.
    pub stats: UsageStats,
}

impl ScoreReport {
    /// Scores a schedule.
    pub fn calculate(schedule: &Schedule, registry: &Registry, config: &LeagueConfig) -> Self {
        let violations = check_schedule(schedule, registry, config);
        let violating = violating_matches(&violations);
        let fitness = fitness(schedule, registry, config, violating.len());

        Self {
            fitness,
            quality: quality(fitness, schedule.required_count(), config.unscheduled_penalty),
            balance: balance(schedule, registry, config),
            constraint_satisfaction: constraint_satisfaction(schedule, violating.len()),
            violations,
            stats: UsageStats::collect(schedule, registry, config),
        }
    }
}

fn fitness(schedule: &Schedule, registry: &Registry, config: &LeagueConfig, violating: usize) -> f64 {
    // Matches with unregistered entities stay out of the tallies; they are
    // already penalised as violations.
    let known: Vec<_> = schedule
        .matches
        .iter()
        .filter_map(|m| {
            Some((
                match_terms(registry, &m.fixture, config)?,
                registry.venue_index(&m.venue)?,
                registry.referee_index(&m.referee)?,
            ))
        })
        .collect();

    let mut state = CostState::new(
        registry.teams().len(),
        registry.venues().len(),
        registry.referees().len(),
        schedule.unscheduled.len() + known.len(),
    );
    for (terms, venue, referee) in &known {
        state.place(terms, *venue, *referee, registry.referees()[*referee].level);
    }
    state.add_violating(violating);

    Objective::from_config(config).evaluate(&state)
}

/// A schedule with every fixture unplaced scores 0; soft terms of a complete
/// schedule only cost a fraction of one penalty per fixture.
fn quality(fitness: f64, required: usize, penalty: f64) -> f64 {
    let scale = penalty * required.max(1) as f64;
    if scale <= 0.0 {
        return 1.0;
    }
    (1.0 - fitness / scale).clamp(0.0, 1.0)
}

fn balance(schedule: &Schedule, registry: &Registry, config: &LeagueConfig) -> f64 {
    let gaps: Vec<i64> = schedule
        .matches
        .iter()
        .filter_map(|m| {
            let home = registry.team(&m.fixture.home)?;
            let away = registry.team(&m.fixture.away)?;
            Some(home.strength_gap(away))
        })
        .collect();

    let span = config.strength_range.span();
    if gaps.is_empty() || span <= 0 {
        return 1.0;
    }
    let mean = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
    (1.0 - mean / span as f64).clamp(0.0, 1.0)
}

fn constraint_satisfaction(schedule: &Schedule, violating: usize) -> f64 {
    let required = schedule.required_count();
    if required == 0 {
        return 1.0;
    }
    let clean = schedule.match_count().saturating_sub(violating);
    clean as f64 / required as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Fixture, Referee, ScheduledMatch, Team, TimeSlot, Venue};

    fn slot(raw: &str) -> TimeSlot {
        TimeSlot::parse(raw).unwrap()
    }

    fn registry() -> Registry {
        Registry::build(
            vec![
                Team::new("Weak", 10),
                Team::new("Strong", 90),
                Team::new("MidA", 50),
                Team::new("MidB", 55),
            ],
            vec![Venue::new("North"), Venue::new("South")],
            vec![Referee::new("R1"), Referee::new("R2")],
            vec![slot("2024-04-06T15:00"), slot("2024-04-13T15:00")],
            &LeagueConfig::default(),
        )
        .unwrap()
    }

    fn pairings(a: (&str, &str), b: (&str, &str)) -> Schedule {
        let mut s = Schedule::new();
        s.add_match(ScheduledMatch::new(
            Fixture::new(a.0, a.1),
            slot("2024-04-06T15:00"),
            "North",
            "R1",
        ));
        s.add_match(ScheduledMatch::new(
            Fixture::new(b.0, b.1),
            slot("2024-04-06T15:00"),
            "South",
            "R2",
        ));
        s
    }

    #[test]
    fn test_cross_pairing_more_balanced() {
        let reg = registry();
        let config = LeagueConfig::default();
        let cross = ScoreReport::calculate(&pairings(("Weak", "MidA"), ("Strong", "MidB")), &reg, &config);
        let lopsided =
            ScoreReport::calculate(&pairings(("Weak", "Strong"), ("MidA", "MidB")), &reg, &config);
        assert!(cross.balance > lopsided.balance);
        // mean gaps 37.5 and 42.5 over a span of 100
        assert!((cross.balance - 0.625).abs() < 1e-10);
        assert!((lopsided.balance - 0.575).abs() < 1e-10);
    }

    #[test]
    fn test_perfect_balance() {
        let reg = Registry::build(
            vec![Team::new("A", 40), Team::new("B", 40)],
            vec![Venue::new("V")],
            vec![Referee::new("R")],
            vec![slot("2024-04-06T15:00")],
            &LeagueConfig::default(),
        )
        .unwrap();
        let mut s = Schedule::new();
        s.add_match(ScheduledMatch::new(
            Fixture::new("A", "B"),
            slot("2024-04-06T15:00"),
            "V",
            "R",
        ));
        let score = ScoreReport::calculate(&s, &reg, &LeagueConfig::default());
        assert!((score.balance - 1.0).abs() < 1e-10);
        assert!((score.constraint_satisfaction - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let reg = registry();
        let config = LeagueConfig::default();
        let s = pairings(("Weak", "MidA"), ("Strong", "MidB"));
        let first = ScoreReport::calculate(&s, &reg, &config);
        let second = ScoreReport::calculate(&s, &reg, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unscheduled_lowers_satisfaction_and_raises_fitness() {
        let reg = registry();
        let config = LeagueConfig::default();
        let complete = pairings(("Weak", "MidA"), ("Strong", "MidB"));
        let mut partial = complete.clone();
        partial.add_unscheduled(Fixture::new("Weak", "Strong"));
        partial.add_unscheduled(Fixture::new("MidA", "MidB"));

        let full = ScoreReport::calculate(&complete, &reg, &config);
        let part = ScoreReport::calculate(&partial, &reg, &config);
        assert!((part.constraint_satisfaction - 0.5).abs() < 1e-10);
        assert!((part.fitness - full.fitness - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_violations_penalised() {
        let reg = registry();
        let config = LeagueConfig::default();
        let mut s = Schedule::new();
        // Same venue, same slot
        for (home, away) in [("Weak", "MidA"), ("Strong", "MidB")] {
            s.add_match(ScheduledMatch::new(
                Fixture::new(home, away),
                slot("2024-04-06T15:00"),
                "North",
                "R1",
            ));
        }
        let score = ScoreReport::calculate(&s, &reg, &config);
        assert_eq!(score.violations.len(), 2); // venue and referee
        assert!((score.constraint_satisfaction - 0.0).abs() < 1e-10);
        assert!(score.fitness >= 2000.0);
        assert!((score.quality - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_schedule() {
        let score = ScoreReport::calculate(&Schedule::new(), &registry(), &LeagueConfig::default());
        assert!((score.fitness - 0.0).abs() < 1e-10);
        assert!((score.balance - 1.0).abs() < 1e-10);
        assert!((score.constraint_satisfaction - 1.0).abs() < 1e-10);
        assert!((score.quality - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_quality_scales_with_fixture_count() {
        let reg = registry();
        let config = LeagueConfig::default();
        let complete = ScoreReport::calculate(&pairings(("Weak", "MidA"), ("Strong", "MidB")), &reg, &config);
        // Soft terms alone stay far below one penalty per fixture
        assert!(complete.quality > 0.9);
        assert!((complete.quality - (1.0 - complete.fitness / 2000.0)).abs() < 1e-10);

        let mut all_unplaced = Schedule::new();
        all_unplaced.add_unscheduled(Fixture::new("Weak", "MidA"));
        all_unplaced.add_unscheduled(Fixture::new("Strong", "MidB"));
        let empty = ScoreReport::calculate(&all_unplaced, &reg, &config);
        assert!((empty.quality - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_quality_without_penalty() {
        let reg = registry();
        let config = LeagueConfig::default().with_unscheduled_penalty(0.0);
        let score = ScoreReport::calculate(&pairings(("Weak", "MidA"), ("Strong", "MidB")), &reg, &config);
        assert!((score.quality - 1.0).abs() < 1e-10);
    }
}

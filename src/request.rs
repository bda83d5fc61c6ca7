//! Scheduling requests and the end-to-end pipeline.
//!
//! A request arrives as JSON in the shape the league client sends:
//!
//! ```json
//! {
//!   "teams": ["Lions", "Tigers"],
//!   "venues": ["Arena"],
//!   "time_slots": ["2024-03-02T15:00"],
//!   "referees": ["Kim"],
//!   "team_strengths": {"Lions": 72, "Tigers": 65}
//! }
//! ```
//!
//! Optional `venue_capacities` and `referee_levels` maps override the
//! configured defaults.
//!
//! # Pipeline
//!
//! validate → generate fixtures → solve → score → report. Each run owns all
//! of its data; nothing is shared between requests.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::info;

use crate::config::LeagueConfig;
use crate::error::{LeagueError, Result};
use crate::generator::generate_fixtures;
use crate::models::{Referee, Team, TimeSlot, Venue};
use crate::report::ScheduleResponse;
use crate::scheduler::{LeagueSolver, ScoreReport};
use crate::validation::{Registry, ValidationError, ValidationErrorKind};

/// Raw scheduling request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub teams: Vec<String>,
    pub venues: Vec<String>,
    pub time_slots: Vec<String>,
    pub referees: Vec<String>,
    pub team_strengths: BTreeMap<String, i32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub venue_capacities: BTreeMap<String, i32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub referee_levels: BTreeMap<String, i32>,
}

impl ScheduleRequest {
    /// Parses a JSON request.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Converts the request into a validated registry.
    ///
    /// Conversion problems (unparseable timestamps, missing or unknown
    /// ratings) and entity validation problems are reported together.
    pub fn to_registry(&self, config: &LeagueConfig) -> Result<Registry> {
        let mut errors = Vec::new();

        let teams: Vec<Team> = self
            .teams
            .iter()
            .map(|name| match self.team_strengths.get(name) {
                Some(&strength) => Team::new(name.as_str(), strength),
                None => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::MissingStrength,
                        format!("No strength given for team '{name}'"),
                    ));
                    // Placeholder so the remaining checks still run
                    Team::new(name.as_str(), config.strength_range.min())
                }
            })
            .collect();

        let venues: Vec<Venue> = self
            .venues
            .iter()
            .map(|name| {
                let capacity = self
                    .venue_capacities
                    .get(name)
                    .copied()
                    .unwrap_or(config.default_venue_capacity);
                Venue::new(name.as_str()).with_capacity(capacity)
            })
            .collect();

        let referees: Vec<Referee> = self
            .referees
            .iter()
            .map(|name| {
                let level = self
                    .referee_levels
                    .get(name)
                    .copied()
                    .unwrap_or(config.default_referee_level);
                Referee::new(name.as_str()).with_level(level)
            })
            .collect();

        let mut slots = Vec::with_capacity(self.time_slots.len());
        for raw in &self.time_slots {
            match TimeSlot::parse(raw) {
                Some(slot) => slots.push(slot),
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTimestamp,
                    format!("Unrecognised time slot: '{raw}'"),
                )),
            }
        }

        unknown_keys("team_strengths", &self.team_strengths, &self.teams, &mut errors);
        unknown_keys("venue_capacities", &self.venue_capacities, &self.venues, &mut errors);
        unknown_keys("referee_levels", &self.referee_levels, &self.referees, &mut errors);

        match Registry::build(teams, venues, referees, slots, config) {
            Ok(registry) if errors.is_empty() => Ok(registry),
            Ok(_) => Err(LeagueError::Validation(errors)),
            Err(more) => {
                errors.extend(more);
                Err(LeagueError::Validation(errors))
            }
        }
    }
}

fn unknown_keys(
    field: &str,
    ratings: &BTreeMap<String, i32>,
    listed: &[String],
    errors: &mut Vec<ValidationError>,
) {
    let listed: HashSet<&str> = listed.iter().map(String::as_str).collect();
    for name in ratings.keys() {
        if !listed.contains(name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownName,
                format!("{field} refers to unlisted name '{name}'"),
            ));
        }
    }
}

/// Runs complete scheduling requests.
#[derive(Debug, Clone, Default)]
pub struct LeagueScheduler {
    config: LeagueConfig,
}

impl LeagueScheduler {
    /// Creates a scheduler with the given configuration.
    pub fn new(config: LeagueConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    /// Runs the full pipeline on a request.
    ///
    /// # Errors
    /// [`LeagueError::Validation`] for bad input and
    /// [`LeagueError::InsufficientCapacity`] when the fixtures cannot fit.
    /// A partial schedule is not an error; see [`ScheduleResponse::warning`].
    pub fn run(&self, request: &ScheduleRequest) -> Result<ScheduleResponse> {
        let registry = request.to_registry(&self.config)?;
        info!(
            teams = registry.teams().len(),
            venues = registry.venues().len(),
            referees = registry.referees().len(),
            slots = registry.slots().len(),
            "registry built"
        );

        let fixtures = generate_fixtures(&registry, self.config.mode)?;
        let result = LeagueSolver::new(self.config.clone()).solve(&registry, &fixtures);
        let score = ScoreReport::calculate(&result.schedule, &registry, &self.config);
        info!(
            fitness = score.fitness,
            balance = score.balance,
            constraint_satisfaction = score.constraint_satisfaction,
            "schedule scored"
        );

        Ok(ScheduleResponse::build(
            &result.schedule,
            &registry,
            &score,
            &result.history,
        ))
    }

    /// Parses a JSON request and runs it.
    pub fn run_json(&self, raw: &str) -> Result<ScheduleResponse> {
        self.run(&ScheduleRequest::from_json(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "teams": ["Lions", "Tigers", "Bears", "Wolves"],
        "venues": ["Arena", "Dome"],
        "time_slots": ["2024-03-02T15:00", "2024-03-02T18:00", "2024-03-09T15:00"],
        "referees": ["Kim", "Lee"],
        "team_strengths": {"Lions": 72, "Tigers": 65, "Bears": 40, "Wolves": 88}
    }"#;

    fn request(teams: usize, venues: usize, slots: usize, referees: usize) -> ScheduleRequest {
        let team_names: Vec<String> = (0..teams).map(|i| format!("Team{i:02}")).collect();
        ScheduleRequest {
            team_strengths: team_names
                .iter()
                .enumerate()
                .map(|(i, n)| (n.clone(), (i as i32 * 7) % 100))
                .collect(),
            teams: team_names,
            venues: (0..venues).map(|i| format!("Venue{i}")).collect(),
            time_slots: (0..slots)
                .map(|i| format!("2024-06-{:02}T19:00", i + 1))
                .collect(),
            referees: (0..referees).map(|i| format!("Ref{i}")).collect(),
            ..ScheduleRequest::default()
        }
    }

    #[test]
    fn test_end_to_end_json() {
        crate::logging::init_test();
        let response = LeagueScheduler::default().run_json(SMALL).unwrap();
        // 4 teams → 6 fixtures, 3 slots × 2 venues fits exactly
        assert_eq!(response.match_count(), 6);
        assert!(response.unscheduled.is_empty());
        assert!(response.warning.is_none());
        assert!((response.constraint_satisfaction - 1.0).abs() < 1e-10);
        assert_eq!(response.schedule.len(), 2);
        for count in response.stats.usage.matches_per_team.values() {
            assert_eq!(*count, 3);
        }
        assert!(!response.stats.optimization.is_empty());
    }

    #[test]
    fn test_tight_league_complete_with_high_quality() {
        let response = LeagueScheduler::default().run(&request(12, 6, 11, 6)).unwrap();
        assert_eq!(response.match_count(), 66);
        assert!(response.unscheduled.is_empty());
        assert!(response.quality > 0.9);
    }

    #[test]
    fn test_minimal_request() {
        let response = LeagueScheduler::default().run(&request(2, 1, 1, 1)).unwrap();
        assert_eq!(response.match_count(), 1);
        assert!((response.constraint_satisfaction - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_insufficient_capacity() {
        let err = LeagueScheduler::default()
            .run(&request(10, 1, 3, 2))
            .unwrap_err();
        match err {
            LeagueError::InsufficientCapacity { required, available } => {
                assert_eq!(required, 45);
                assert_eq!(available, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_partial_schedule_is_not_an_error() {
        // Capacity 6 × 2 = 12 pairs but a single referee allows one match per slot
        let response = LeagueScheduler::default().run(&request(4, 2, 6, 1)).unwrap();
        assert_eq!(response.match_count(), 6);

        let response = LeagueScheduler::default().run(&request(5, 2, 6, 1)).unwrap();
        assert_eq!(response.match_count() + response.unscheduled.len(), 10);
        assert!(response.unscheduled.len() >= 4);
        assert!(response.warning.is_some());
        assert!(response.constraint_satisfaction < 1.0);
    }

    #[test]
    fn test_conversion_errors_collected() {
        let raw = r#"{
            "teams": ["Lions", "Tigers", "Lions"],
            "venues": [],
            "time_slots": ["next tuesday"],
            "referees": ["Kim"],
            "team_strengths": {"Lions": 72, "Ghosts": 10},
            "referee_levels": {"Kim": 9}
        }"#;
        let err = LeagueScheduler::default().run_json(raw).unwrap_err();
        let LeagueError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let kinds: Vec<_> = errors.iter().map(|e| e.kind.clone()).collect();
        assert!(kinds.contains(&ValidationErrorKind::MissingStrength));
        assert!(kinds.contains(&ValidationErrorKind::InvalidTimestamp));
        assert!(kinds.contains(&ValidationErrorKind::UnknownName));
        assert!(kinds.contains(&ValidationErrorKind::DuplicateName));
        assert!(kinds.contains(&ValidationErrorKind::TooFewEntities));
        assert!(kinds.contains(&ValidationErrorKind::OutOfRange));
    }

    #[test]
    fn test_malformed_json() {
        let err = LeagueScheduler::default().run_json("{\"teams\": 3}").unwrap_err();
        assert!(matches!(err, LeagueError::InvalidRequest(_)));
    }

    #[test]
    fn test_optional_ratings_applied() {
        let mut req = request(2, 1, 1, 1);
        req.venue_capacities.insert("Venue0".into(), 30_000);
        req.referee_levels.insert("Ref0".into(), 4);
        let registry = req.to_registry(&LeagueConfig::default()).unwrap();
        assert_eq!(registry.venues()[0].capacity, 30_000);
        assert_eq!(registry.referees()[0].level, 4);
    }

    #[test]
    fn test_identical_requests_identical_responses() {
        let scheduler = LeagueScheduler::default();
        let a = scheduler.run(&request(6, 2, 8, 3)).unwrap();
        let b = scheduler.run(&request(6, 2, 8, 3)).unwrap();
        assert_eq!(a, b);
    }
}

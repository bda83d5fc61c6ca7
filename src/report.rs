//! Schedule report builder.
//!
//! Turns a scored schedule into the response consumed by the presentation
//! layer: matches grouped by calendar day in slot order, per-entity usage
//! counts and the optimization trace. Pure transformation; no decisions
//! are made here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::LeagueConfig;
use crate::error::PartialScheduleWarning;
use crate::models::{Fixture, Schedule, ScheduledMatch};
use crate::scheduler::ScoreReport;
use crate::validation::Registry;

/// Usage counts of one schedule.
///
/// Every registered team, venue and referee appears, including those with
/// zero matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub matches_per_team: BTreeMap<String, usize>,
    pub matches_per_venue: BTreeMap<String, usize>,
    pub matches_per_referee: BTreeMap<String, usize>,
    pub matches_per_day: BTreeMap<NaiveDate, usize>,
    /// Matches whose strength gap is at most `balanced_gap`.
    pub balanced_matches: usize,
}

impl UsageStats {
    /// Counts usage over the placed matches of a schedule.
    pub fn collect(schedule: &Schedule, registry: &Registry, config: &LeagueConfig) -> Self {
        let mut stats = Self {
            matches_per_team: zeroed(registry.teams().iter().map(|t| &t.name)),
            matches_per_venue: zeroed(registry.venues().iter().map(|v| &v.name)),
            matches_per_referee: zeroed(registry.referees().iter().map(|r| &r.name)),
            ..Self::default()
        };

        for m in &schedule.matches {
            for team in [&m.fixture.home, &m.fixture.away] {
                *stats.matches_per_team.entry(team.clone()).or_default() += 1;
            }
            *stats.matches_per_venue.entry(m.venue.clone()).or_default() += 1;
            *stats.matches_per_referee.entry(m.referee.clone()).or_default() += 1;
            *stats.matches_per_day.entry(m.slot.date()).or_default() += 1;

            if let (Some(home), Some(away)) =
                (registry.team(&m.fixture.home), registry.team(&m.fixture.away))
            {
                if home.strength_gap(away) <= config.balanced_gap {
                    stats.balanced_matches += 1;
                }
            }
        }
        stats
    }
}

fn zeroed<'a>(names: impl Iterator<Item = &'a String>) -> BTreeMap<String, usize> {
    names.map(|n| (n.clone(), 0)).collect()
}

/// Usage counts plus the solver trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    #[serde(flatten)]
    pub usage: UsageStats,
    /// Fitness after construction, then after each accepted improvement.
    pub optimization: Vec<f64>,
}

/// One placed match with the details the day view shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub home: String,
    pub away: String,
    pub venue: String,
    pub referee: String,
    /// Slot timestamp, `YYYY-MM-DDTHH:MM`.
    pub slot: String,
    pub home_strength: Option<i32>,
    pub away_strength: Option<i32>,
}

/// All matches of one calendar day, in slot order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub matches: Vec<MatchDetail>,
}

/// Response of one scheduling request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// One entry per day, each a list of `[home, away, venue]`.
    pub schedule: Vec<Vec<[String; 3]>>,
    pub fitness: f64,
    pub balance: f64,
    pub constraint_satisfaction: f64,
    /// clamp(1 − fitness / (unscheduled penalty × fixtures), 0, 1).
    pub quality: f64,
    pub stats: ReportStats,
    pub days: Vec<DaySummary>,
    pub unscheduled: Vec<Fixture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ScheduleResponse {
    /// Builds the response from a schedule, its score and the solver trace.
    ///
    /// The schedule is expected in slot order, as the solver returns it.
    pub fn build(
        schedule: &Schedule,
        registry: &Registry,
        score: &ScoreReport,
        trace: &[f64],
    ) -> Self {
        let grouped = schedule.days();

        let warning = PartialScheduleWarning::from_schedule(schedule).map(|w| w.to_string());

        Self {
            schedule: grouped
                .iter()
                .map(|(_, day)| day.iter().map(|m| m.triple()).collect())
                .collect(),
            fitness: score.fitness,
            balance: score.balance,
            constraint_satisfaction: score.constraint_satisfaction,
            quality: score.quality,
            stats: ReportStats {
                usage: score.stats.clone(),
                optimization: trace.to_vec(),
            },
            days: grouped
                .iter()
                .map(|(date, day)| DaySummary {
                    date: *date,
                    matches: day.iter().map(|m| detail(m, registry)).collect(),
                })
                .collect(),
            unscheduled: schedule.unscheduled.clone(),
            warning,
        }
    }

    /// Number of placed matches.
    pub fn match_count(&self) -> usize {
        self.schedule.iter().map(Vec::len).sum()
    }
}

fn detail(m: &ScheduledMatch, registry: &Registry) -> MatchDetail {
    MatchDetail {
        home: m.fixture.home.clone(),
        away: m.fixture.away.clone(),
        venue: m.venue.clone(),
        referee: m.referee.clone(),
        slot: m.slot.to_string(),
        home_strength: registry.team(&m.fixture.home).map(|t| t.strength),
        away_strength: registry.team(&m.fixture.away).map(|t| t.strength),
    }
}

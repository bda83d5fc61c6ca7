//! Hard constraints and schedule checking.
//!
//! Defines the rules every returned schedule must satisfy and checks an
//! arbitrary [`Schedule`] against them. The solver never produces a
//! violation; the checker exists so that any schedule, including one
//! edited by hand, can be scored on its own.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{Schedule, Violation, ViolationType};
use crate::config::LeagueConfig;
use crate::validation::Registry;

/// A hard scheduling rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HardConstraint {
    /// Teams, venues, referees and slots must be registered.
    KnownEntities,
    /// A team never plays itself.
    NoSelfPlay,
    /// A venue hosts at most one match per slot.
    VenueOncePerSlot,
    /// A referee officiates at most one match per slot.
    RefereeOncePerSlot,
    /// A team plays at most one match per slot.
    TeamOncePerSlot,
    /// A team plays at most `max` matches per calendar day.
    TeamDailyLimit { max: u32 },
    /// Marquee matches need a referee of at least `min_level`.
    MarqueeReferee {
        min_average_strength: i32,
        min_level: i32,
    },
}

impl HardConstraint {
    /// The rules in force under a configuration.
    pub fn active(config: &LeagueConfig) -> Vec<HardConstraint> {
        let mut rules = vec![
            Self::KnownEntities,
            Self::NoSelfPlay,
            Self::VenueOncePerSlot,
            Self::RefereeOncePerSlot,
            Self::TeamOncePerSlot,
        ];
        if let Some(max) = config.max_matches_per_team_per_day {
            rules.push(Self::TeamDailyLimit { max });
        }
        if let Some(rule) = config.marquee.as_ref().filter(|m| m.enforce) {
            rules.push(Self::MarqueeReferee {
                min_average_strength: rule.min_average_strength,
                min_level: rule.min_referee_level,
            });
        }
        rules
    }

    /// Checks this rule against a schedule.
    pub fn check(&self, schedule: &Schedule, registry: &Registry) -> Vec<Violation> {
        match self {
            Self::KnownEntities => check_known(schedule, registry),
            Self::NoSelfPlay => schedule
                .matches
                .iter()
                .enumerate()
                .filter(|(_, m)| m.fixture.home == m.fixture.away)
                .map(|(i, m)| {
                    Violation::new(
                        ViolationType::SelfPlay,
                        vec![i],
                        format!("Team '{}' paired with itself", m.fixture.home),
                    )
                })
                .collect(),
            Self::VenueOncePerSlot => collisions(
                schedule
                    .matches
                    .iter()
                    .enumerate()
                    .map(|(i, m)| ((m.slot, m.venue.as_str()), i)),
                |(slot, venue)| {
                    Violation::new(
                        ViolationType::VenueDoubleBooked,
                        Vec::new(),
                        format!("Venue '{venue}' double-booked at {slot}"),
                    )
                },
                1,
            ),
            Self::RefereeOncePerSlot => collisions(
                schedule
                    .matches
                    .iter()
                    .enumerate()
                    .map(|(i, m)| ((m.slot, m.referee.as_str()), i)),
                |(slot, referee)| {
                    Violation::new(
                        ViolationType::RefereeDoubleBooked,
                        Vec::new(),
                        format!("Referee '{referee}' double-booked at {slot}"),
                    )
                },
                1,
            ),
            Self::TeamOncePerSlot => collisions(
                schedule.matches.iter().enumerate().flat_map(|(i, m)| {
                    [
                        ((m.slot, m.fixture.home.as_str()), i),
                        ((m.slot, m.fixture.away.as_str()), i),
                    ]
                }),
                |(slot, team)| {
                    Violation::new(
                        ViolationType::TeamDoubleBooked,
                        Vec::new(),
                        format!("Team '{team}' plays twice at {slot}"),
                    )
                },
                1,
            ),
            Self::TeamDailyLimit { max } => collisions(
                schedule.matches.iter().enumerate().flat_map(|(i, m)| {
                    [
                        ((m.slot.date(), m.fixture.home.as_str()), i),
                        ((m.slot.date(), m.fixture.away.as_str()), i),
                    ]
                }),
                |(date, team)| {
                    Violation::new(
                        ViolationType::DailyLimitExceeded,
                        Vec::new(),
                        format!("Team '{team}' plays more than {max} matches on {date}"),
                    )
                },
                *max as usize,
            ),
            Self::MarqueeReferee {
                min_average_strength,
                min_level,
            } => schedule
                .matches
                .iter()
                .enumerate()
                .filter_map(|(i, m)| {
                    let home = registry.team(&m.fixture.home)?.strength as i64;
                    let away = registry.team(&m.fixture.away)?.strength as i64;
                    let level = registry.referees()[registry.referee_index(&m.referee)?].level;
                    (home + away >= 2 * *min_average_strength as i64 && level < *min_level).then(
                        || {
                            Violation::new(
                                ViolationType::RefereeIneligible,
                                vec![i],
                                format!(
                                    "Referee '{}' (level {level}) below level {min_level} for marquee match {}",
                                    m.referee, m.fixture
                                ),
                            )
                        },
                    )
                })
                .collect(),
        }
    }
}

/// Checks a schedule against every active rule.
pub fn check_schedule(
    schedule: &Schedule,
    registry: &Registry,
    config: &LeagueConfig,
) -> Vec<Violation> {
    HardConstraint::active(config)
        .iter()
        .flat_map(|rule| rule.check(schedule, registry))
        .collect()
}

/// Indices of matches involved in at least one violation.
pub fn violating_matches(violations: &[Violation]) -> BTreeSet<usize> {
    violations
        .iter()
        .flat_map(|v| v.match_indices.iter().copied())
        .collect()
}

fn check_known(schedule: &Schedule, registry: &Registry) -> Vec<Violation> {
    let mut out = Vec::new();
    for (i, m) in schedule.matches.iter().enumerate() {
        let mut unknown = Vec::new();
        for team in [&m.fixture.home, &m.fixture.away] {
            if registry.team_index(team).is_none() {
                unknown.push(format!("team '{team}'"));
            }
        }
        if registry.venue_index(&m.venue).is_none() {
            unknown.push(format!("venue '{}'", m.venue));
        }
        if registry.referee_index(&m.referee).is_none() {
            unknown.push(format!("referee '{}'", m.referee));
        }
        if registry.slot_index(&m.slot).is_none() {
            unknown.push(format!("slot {}", m.slot));
        }
        if !unknown.is_empty() {
            out.push(Violation::new(
                ViolationType::UnknownEntity,
                vec![i],
                format!("Match {} references unknown {}", m.fixture, unknown.join(", ")),
            ));
        }
    }
    out
}

/// Groups match indices by key and reports every key used more than `max` times.
fn collisions<K, I, F>(entries: I, make: F, max: usize) -> Vec<Violation>
where
    K: Ord + Copy,
    I: Iterator<Item = (K, usize)>,
    F: Fn(K) -> Violation,
{
    let mut groups: BTreeMap<K, BTreeSet<usize>> = BTreeMap::new();
    for (key, idx) in entries {
        groups.entry(key).or_default().insert(idx);
    }
    groups
        .into_iter()
        .filter(|(_, idxs)| idxs.len() > max)
        .map(|(key, idxs)| {
            let mut v = make(key);
            v.match_indices = idxs.into_iter().collect();
            v
        })
        .collect()
}

//! Entity registry and input validation.
//!
//! Checks the raw teams, venues, referees and slots of a request before
//! any fixture is generated, and produces an immutable, name-indexed
//! [`Registry`] for the downstream stages. Detects:
//! - Too few entities in a category
//! - Empty or duplicate names within a category
//! - Duplicate slot timestamps
//! - Strength, level or capacity outside the configured range
//!
//! All problems are collected; validation never stops at the first one.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::config::{LeagueConfig, ValueRange};
use crate::models::{Referee, Team, TimeSlot, Venue};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A category has fewer entities than required.
    TooFewEntities,
    /// Two entities in one category share a name.
    DuplicateName,
    /// Two slots share a timestamp.
    DuplicateSlot,
    /// An entity name is empty or whitespace.
    EmptyName,
    /// Strength, level or capacity outside its valid range.
    OutOfRange,
    /// A slot string is not a recognised date-time.
    InvalidTimestamp,
    /// A listed team has no strength rating.
    MissingStrength,
    /// A rating or attribute refers to a name that is not listed.
    UnknownName,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validated, immutable entity collections of one scheduling run.
///
/// Teams, venues and referees keep their input order; slots are sorted
/// chronologically. Every category has an O(1) name → index map.
#[derive(Debug, Clone)]
pub struct Registry {
    teams: Vec<Team>,
    venues: Vec<Venue>,
    referees: Vec<Referee>,
    slots: Vec<TimeSlot>,
    team_index: HashMap<String, usize>,
    venue_index: HashMap<String, usize>,
    referee_index: HashMap<String, usize>,
    slot_index: HashMap<TimeSlot, usize>,
}

/// Validates the entities of a scheduling request.
///
/// Checks:
/// 1. At least 2 teams, 1 venue, 1 referee and 1 slot
/// 2. No empty names
/// 3. No duplicate names within teams, venues and referees
/// 4. No duplicate slot timestamps
/// 5. Strengths, levels and capacities inside the configured ranges
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    teams: &[Team],
    venues: &[Venue],
    referees: &[Referee],
    slots: &[TimeSlot],
    config: &LeagueConfig,
) -> ValidationResult {
    let mut errors = Vec::new();

    for (label, count, min) in [
        ("teams", teams.len(), 2),
        ("venues", venues.len(), 1),
        ("referees", referees.len(), 1),
        ("time slots", slots.len(), 1),
    ] {
        if count < min {
            errors.push(ValidationError::new(
                ValidationErrorKind::TooFewEntities,
                format!("At least {min} {label} required, got {count}"),
            ));
        }
    }

    check_names("team", teams.iter().map(|t| t.name.as_str()), &mut errors);
    check_names("venue", venues.iter().map(|v| v.name.as_str()), &mut errors);
    check_names("referee", referees.iter().map(|r| r.name.as_str()), &mut errors);

    let mut seen_slots = HashSet::new();
    for slot in slots {
        if !seen_slots.insert(slot) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateSlot,
                format!("Duplicate time slot: {slot}"),
            ));
        }
    }

    for t in teams {
        check_range("Strength", "team", &t.name, t.strength, config.strength_range, &mut errors);
    }
    for v in venues {
        check_range("Capacity", "venue", &v.name, v.capacity, config.capacity_range, &mut errors);
    }
    for r in referees {
        check_range("Level", "referee", &r.name, r.level, config.level_range, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_names<'a>(
    category: &str,
    names: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                format!("Empty {category} name"),
            ));
        } else if !seen.insert(name) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate {category} name: {name}"),
            ));
        }
    }
}

fn check_range(
    attribute: &str,
    category: &str,
    name: &str,
    value: i32,
    range: ValueRange,
    errors: &mut Vec<ValidationError>,
) {
    if !range.contains(value) {
        errors.push(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            format!(
                "{attribute} {value} of {category} '{name}' outside [{}, {}]",
                range.min(),
                range.max()
            ),
        ));
    }
}

impl Registry {
    /// Validates the entities and builds the registry.
    pub fn build(
        teams: Vec<Team>,
        venues: Vec<Venue>,
        referees: Vec<Referee>,
        mut slots: Vec<TimeSlot>,
        config: &LeagueConfig,
    ) -> Result<Self, Vec<ValidationError>> {
        validate_input(&teams, &venues, &referees, &slots, config)?;

        slots.sort();
        let team_index = index_by(&teams, |t| t.name.clone());
        let venue_index = index_by(&venues, |v| v.name.clone());
        let referee_index = index_by(&referees, |r| r.name.clone());
        let slot_index = index_by(&slots, |s| *s);

        Ok(Self {
            teams,
            venues,
            referees,
            slots,
            team_index,
            venue_index,
            referee_index,
            slot_index,
        })
    }

    /// Teams in registration order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Venues in registration order.
    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    /// Referees in registration order.
    pub fn referees(&self) -> &[Referee] {
        &self.referees
    }

    /// Slots in chronological order.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.team_index.get(name).map(|&i| &self.teams[i])
    }

    pub fn team_index(&self, name: &str) -> Option<usize> {
        self.team_index.get(name).copied()
    }

    pub fn venue_index(&self, name: &str) -> Option<usize> {
        self.venue_index.get(name).copied()
    }

    pub fn referee_index(&self, name: &str) -> Option<usize> {
        self.referee_index.get(name).copied()
    }

    pub fn slot_index(&self, slot: &TimeSlot) -> Option<usize> {
        self.slot_index.get(slot).copied()
    }

    /// Number of (slot, venue) pairs: the upper bound on placeable matches.
    pub fn slot_venue_pairs(&self) -> usize {
        self.slots.len() * self.venues.len()
    }
}

fn index_by<T, K, F>(items: &[T], key: F) -> HashMap<K, usize>
where
    K: std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (key(item), i))
        .collect()
}

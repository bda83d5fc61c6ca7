//! Round-robin fixture generation.
//!
//! # Ordering
//! Fixtures come out round by round (circle method over the sorted team
//! names), so that every round is a set of disjoint pairings and identical
//! input always yields identical fixture lists. With an odd team count one
//! team rests each round. The lexicographically smaller name hosts the
//! first leg. In double mode the reversed second legs follow all first
//! legs, in the same order.
//!
//! # Reference
//! Berger tables: Kirkman (1847), de Werra (1981), "Scheduling in sports"
//!
//! # Capacity
//! A round needing more matches than there are (slot, venue) pairs has no
//! full placement, so generation fails early with
//! [`LeagueError::InsufficientCapacity`].

use tracing::debug;

use crate::config::RoundRobinMode;
use crate::error::{LeagueError, Result};
use crate::models::Fixture;
use crate::validation::Registry;

/// Number of fixtures a round-robin over `n` teams produces.
pub fn fixture_count(n: usize, mode: RoundRobinMode) -> usize {
    let single = n * n.saturating_sub(1) / 2;
    match mode {
        RoundRobinMode::Single => single,
        RoundRobinMode::Double => single * 2,
    }
}

/// Generates the fixtures of one round-robin season.
///
/// # Errors
/// [`LeagueError::InsufficientCapacity`] if the fixture count exceeds
/// slots × venues.
pub fn generate_fixtures(registry: &Registry, mode: RoundRobinMode) -> Result<Vec<Fixture>> {
    let required = fixture_count(registry.teams().len(), mode);
    let available = registry.slot_venue_pairs();
    if required > available {
        return Err(LeagueError::InsufficientCapacity {
            required,
            available,
        });
    }

    let mut names: Vec<&str> = registry.teams().iter().map(|t| t.name.as_str()).collect();
    names.sort_unstable();

    let mut fixtures = Vec::with_capacity(required);
    for round in rounds(names.len()) {
        for (a, b) in round {
            let (home, away) = if names[a] < names[b] { (a, b) } else { (b, a) };
            fixtures.push(Fixture::new(names[home], names[away]));
        }
    }
    if mode == RoundRobinMode::Double {
        let second_legs: Vec<Fixture> = fixtures.iter().map(Fixture::reversed).collect();
        fixtures.extend(second_legs);
    }

    debug!(count = fixtures.len(), ?mode, "generated fixtures");
    Ok(fixtures)
}

/// Round-robin rounds over `n` team indices.
///
/// Index 0 stays fixed while the others rotate one position per round. For
/// odd `n` a phantom index `n` is added and its pairings are dropped.
fn rounds(n: usize) -> Vec<Vec<(usize, usize)>> {
    if n < 2 {
        return Vec::new();
    }
    let m = n + n % 2;
    let mut ring: Vec<usize> = (0..m).collect();
    let mut out = Vec::with_capacity(m - 1);
    for _ in 0..m - 1 {
        let round = (0..m / 2)
            .map(|i| (ring[i], ring[m - 1 - i]))
            .filter(|&(a, b)| a < n && b < n)
            .collect();
        out.push(round);
        ring[1..].rotate_right(1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::models::{Referee, Team, TimeSlot, Venue};
    use std::collections::HashSet;

    fn registry(teams: &[&str], venues: usize, slots: usize) -> Registry {
        let teams = teams.iter().map(|n| Team::new(*n, 50)).collect();
        let venues = (0..venues).map(|i| Venue::new(format!("V{i}"))).collect();
        let slots = (0..slots)
            .map(|d| TimeSlot::parse(&format!("2024-01-{:02}T12:00", d + 1)).unwrap())
            .collect();
        Registry::build(
            teams,
            venues,
            vec![Referee::new("R")],
            slots,
            &LeagueConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_fixture_count() {
        assert_eq!(fixture_count(2, RoundRobinMode::Single), 1);
        assert_eq!(fixture_count(10, RoundRobinMode::Single), 45);
        assert_eq!(fixture_count(10, RoundRobinMode::Double), 90);
        assert_eq!(fixture_count(0, RoundRobinMode::Single), 0);
    }

    #[test]
    fn test_odd_team_count_rests_one_per_round() {
        let reg = registry(&["Cobras", "Ants", "Bees"], 1, 3);
        let fixtures = generate_fixtures(&reg, RoundRobinMode::Single).unwrap();
        let pairs: Vec<String> = fixtures.iter().map(|f| f.to_string()).collect();
        assert_eq!(pairs, vec!["Bees vs Cobras", "Ants vs Cobras", "Ants vs Bees"]);
    }

    #[test]
    fn test_rounds_are_disjoint_and_complete() {
        let names: Vec<String> = (0..8).map(|i| format!("T{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let reg = registry(&refs, 4, 7);
        let fixtures = generate_fixtures(&reg, RoundRobinMode::Single).unwrap();
        assert_eq!(fixtures.len(), 28);

        // Every block of 4 consecutive fixtures is one round: all 8 teams once
        for round in fixtures.chunks(4) {
            let teams: HashSet<&str> = round
                .iter()
                .flat_map(|f| [f.home.as_str(), f.away.as_str()])
                .collect();
            assert_eq!(teams.len(), 8);
        }
        for f in &fixtures {
            assert!(f.home < f.away);
        }
    }

    #[test]
    fn test_every_pair_once() {
        let reg = registry(&["A", "B", "C", "D", "E", "F"], 3, 5);
        let fixtures = generate_fixtures(&reg, RoundRobinMode::Single).unwrap();
        assert_eq!(fixtures.len(), 15);

        let mut seen = HashSet::new();
        for f in &fixtures {
            assert_ne!(f.home, f.away);
            let key = if f.home < f.away {
                (f.home.clone(), f.away.clone())
            } else {
                (f.away.clone(), f.home.clone())
            };
            assert!(seen.insert(key), "duplicate pair {f}");
        }
    }

    #[test]
    fn test_double_round_robin_reverses_home() {
        let reg = registry(&["A", "B", "C"], 2, 3);
        let fixtures = generate_fixtures(&reg, RoundRobinMode::Double).unwrap();
        assert_eq!(fixtures.len(), 6);
        for (first, second) in fixtures[..3].iter().zip(&fixtures[3..]) {
            assert_eq!(second, &first.reversed());
        }
    }

    #[test]
    fn test_deterministic_regardless_of_input_order() {
        let a = generate_fixtures(&registry(&["X", "Y", "Z", "W"], 2, 3), RoundRobinMode::Single)
            .unwrap();
        let b = generate_fixtures(&registry(&["W", "Z", "Y", "X"], 2, 3), RoundRobinMode::Single)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_insufficient_capacity() {
        let names: Vec<String> = (0..10).map(|i| format!("T{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let reg = registry(&refs, 1, 3);
        match generate_fixtures(&reg, RoundRobinMode::Single) {
            Err(LeagueError::InsufficientCapacity {
                required,
                available,
            }) => {
                assert_eq!(required, 45);
                assert_eq!(available, 3);
            }
            other => panic!("expected capacity error, got {other:?}"),
        }
    }
}

//! World invariants - sanity checks that detect bugs.
//!
//! A correct commit never violates these. They are bug detectors, not
//! gameplay limits: staging already rejects every command that would break
//! one of them.

use std::collections::HashSet;

use crate::game::agent::ELIMINATED_SCORE;
use crate::game::catalogue;
use crate::game::rules::{MAX_STORAGE, MAX_TRAY, RANK_COUNT};
use crate::game::state::World;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all world invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(world: &World) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut fail = |message: String| violations.push(InvariantViolation { message });

    for agent in &world.agents {
        if agent.storage.total() > MAX_STORAGE {
            fail(format!(
                "agent {} carries {} molecules > {MAX_STORAGE}",
                agent.id,
                agent.storage.total()
            ));
        }
        if agent.tray.len() > MAX_TRAY {
            fail(format!(
                "agent {} carries {} samples > {MAX_TRAY}",
                agent.id,
                agent.tray.len()
            ));
        }
        if !agent.is_alive() && agent.score != ELIMINATED_SCORE {
            fail(format!(
                "eliminated agent {} has score {}",
                agent.id, agent.score
            ));
        }
    }

    let mut seen = HashSet::new();
    let held = world
        .agents
        .iter()
        .flat_map(|a| a.tray.iter())
        .chain(world.stored.iter());
    for sample in held {
        if !seen.insert(sample.id) {
            fail(format!("sample {} is in more than one place", sample.id));
        }
        if sample.id >= world.next_sample_id() {
            fail(format!(
                "sample {} was never issued (next id {})",
                sample.id,
                world.next_sample_id()
            ));
        }
        if !(1..=RANK_COUNT).contains(&sample.rank) {
            fail(format!("sample {} has rank {}", sample.id, sample.rank));
        }
    }

    for rank in 1..=RANK_COUNT {
        let expected = catalogue::templates(rank).len();
        let actual = world.pools.rank(rank).map_or(0, |p| p.len());
        if actual != expected {
            fail(format!("rank {rank} pool holds {actual}, expected {expected}"));
        }
    }

    let live = world
        .agents
        .iter()
        .filter(|a| a.is_alive() || !a.elimination_swept)
        .count();
    if live != world.alive {
        fail(format!(
            "alive count {} does not match {live} agents in play",
            world.alive
        ));
    }

    violations
}

/// Assert that all invariants hold.
///
/// Only compiled in debug builds.
///
/// # Panics
///
/// Panics listing every violation if any invariant is broken.
#[cfg(debug_assertions)]
pub(crate) fn assert_invariants(world: &World) {
    let violations = check_invariants(world);
    assert!(
        violations.is_empty(),
        "Invariant violations at round {}:\n{}",
        world.round,
        violations
            .iter()
            .map(|v| format!("  - {}", v.message))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::molecule::Molecules;
    use crate::game::rules::Rules;
    use crate::game::sample::Sample;

    #[test]
    fn test_fresh_worlds_are_valid() {
        for league in 0..=3 {
            let world = World::new(Rules::for_league(league).unwrap(), 2, 8);
            assert!(check_invariants(&world).is_empty(), "league {league}");
        }
    }

    #[test]
    fn test_detects_overfull_storage() {
        let mut world = World::new(Rules::default(), 2, 8);
        world.agents[1].storage = Molecules([3, 3, 3, 3, 3]);
        let violations = check_invariants(&world);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("agent 1"));
    }

    #[test]
    fn test_detects_duplicate_sample() {
        let mut world = World::new(Rules::default(), 2, 8);
        let id = world.mint_id();
        let sample = Sample::from_template(id, 2, &catalogue::RANK_2[0]);
        world.agents[0].tray.push(sample.clone());
        world.stored.push(sample);
        let violations = check_invariants(&world);
        assert!(violations.iter().any(|v| v.message.contains("more than one place")));
    }

    #[test]
    fn test_detects_unissued_id() {
        let mut world = World::new(Rules::default(), 2, 8);
        world.stored.push(Sample::from_template(77, 1, &catalogue::RANK_1[0]));
        assert_eq!(check_invariants(&world).len(), 1);
    }
}

//! Fixed sample and science-project catalogues.
//!
//! Pool order here is the pre-shuffle order; setup permutes each list with the
//! match seed.

use crate::game::molecule::{Molecule, Molecules};
use crate::game::sample::SampleTemplate;

const fn tpl(cost: [u32; 5], health: i32, reward: Molecule) -> SampleTemplate {
    SampleTemplate {
        cost: Molecules(cost),
        health,
        reward: Some(reward),
    }
}

/// Rank-1 templates.
pub const RANK_1: [SampleTemplate; 40] = [
    tpl([0, 3, 0, 0, 0], 1, Molecule::A),
    tpl([0, 0, 0, 2, 1], 1, Molecule::A),
    tpl([0, 1, 1, 1, 1], 1, Molecule::A),
    tpl([0, 2, 0, 0, 2], 1, Molecule::A),
    tpl([0, 0, 4, 0, 0], 10, Molecule::A),
    tpl([0, 1, 2, 1, 1], 1, Molecule::A),
    tpl([0, 2, 2, 0, 1], 1, Molecule::A),
    tpl([3, 1, 0, 0, 1], 1, Molecule::A),
    tpl([1, 0, 0, 0, 2], 1, Molecule::B),
    tpl([0, 0, 0, 0, 3], 1, Molecule::B),
    tpl([1, 0, 1, 1, 1], 1, Molecule::B),
    tpl([0, 0, 2, 0, 2], 1, Molecule::B),
    tpl([0, 0, 0, 4, 0], 10, Molecule::B),
    tpl([1, 0, 1, 2, 1], 1, Molecule::B),
    tpl([1, 0, 2, 2, 0], 1, Molecule::B),
    tpl([0, 1, 3, 1, 0], 1, Molecule::B),
    tpl([2, 1, 0, 0, 0], 1, Molecule::C),
    tpl([0, 0, 0, 3, 0], 1, Molecule::C),
    tpl([1, 1, 0, 1, 1], 1, Molecule::C),
    tpl([0, 2, 0, 2, 0], 1, Molecule::C),
    tpl([0, 0, 0, 0, 4], 10, Molecule::C),
    tpl([1, 1, 0, 1, 2], 1, Molecule::C),
    tpl([0, 1, 0, 2, 2], 1, Molecule::C),
    tpl([1, 3, 1, 0, 0], 1, Molecule::C),
    tpl([0, 2, 1, 0, 0], 1, Molecule::D),
    tpl([3, 0, 0, 0, 0], 1, Molecule::D),
    tpl([1, 1, 1, 0, 1], 1, Molecule::D),
    tpl([2, 0, 0, 2, 0], 1, Molecule::D),
    tpl([4, 0, 0, 0, 0], 10, Molecule::D),
    tpl([2, 1, 1, 0, 1], 1, Molecule::D),
    tpl([2, 0, 1, 0, 2], 1, Molecule::D),
    tpl([1, 0, 0, 1, 3], 1, Molecule::D),
    tpl([0, 0, 2, 1, 0], 1, Molecule::E),
    tpl([0, 0, 3, 0, 0], 1, Molecule::E),
    tpl([1, 1, 1, 1, 0], 1, Molecule::E),
    tpl([2, 0, 2, 0, 0], 1, Molecule::E),
    tpl([0, 4, 0, 0, 0], 10, Molecule::E),
    tpl([1, 2, 1, 1, 0], 1, Molecule::E),
    tpl([2, 2, 0, 1, 0], 1, Molecule::E),
    tpl([0, 0, 1, 3, 1], 1, Molecule::E),
];

/// Rank-2 templates.
pub const RANK_2: [SampleTemplate; 30] = [
    tpl([0, 0, 0, 5, 0], 20, Molecule::A),
    tpl([6, 0, 0, 0, 0], 30, Molecule::A),
    tpl([0, 0, 3, 2, 2], 10, Molecule::A),
    tpl([0, 0, 1, 4, 2], 20, Molecule::A),
    tpl([2, 3, 0, 3, 0], 10, Molecule::A),
    tpl([0, 0, 0, 5, 3], 20, Molecule::A),
    tpl([0, 5, 0, 0, 0], 20, Molecule::B),
    tpl([0, 6, 0, 0, 0], 30, Molecule::B),
    tpl([0, 2, 2, 3, 0], 10, Molecule::B),
    tpl([2, 0, 0, 1, 4], 20, Molecule::B),
    tpl([0, 2, 3, 0, 3], 20, Molecule::B),
    tpl([5, 3, 0, 0, 0], 20, Molecule::B),
    tpl([0, 0, 5, 0, 0], 20, Molecule::C),
    tpl([0, 0, 6, 0, 0], 30, Molecule::C),
    tpl([2, 3, 0, 0, 2], 10, Molecule::C),
    tpl([3, 0, 2, 3, 0], 10, Molecule::C),
    tpl([4, 2, 0, 0, 1], 20, Molecule::C),
    tpl([0, 5, 3, 0, 0], 20, Molecule::C),
    tpl([5, 0, 0, 0, 0], 20, Molecule::D),
    tpl([0, 0, 0, 6, 0], 30, Molecule::D),
    tpl([2, 0, 0, 2, 3], 10, Molecule::D),
    tpl([1, 4, 2, 0, 0], 20, Molecule::D),
    tpl([0, 3, 0, 2, 3], 10, Molecule::D),
    tpl([3, 0, 0, 0, 5], 20, Molecule::D),
    tpl([0, 0, 0, 0, 5], 20, Molecule::E),
    tpl([0, 0, 0, 0, 6], 30, Molecule::E),
    tpl([3, 2, 2, 0, 0], 10, Molecule::E),
    tpl([0, 1, 4, 2, 0], 20, Molecule::E),
    tpl([3, 0, 3, 0, 2], 10, Molecule::E),
    tpl([0, 0, 5, 3, 0], 20, Molecule::E),
];

/// Rank-3 templates.
pub const RANK_3: [SampleTemplate; 20] = [
    tpl([0, 0, 0, 0, 7], 40, Molecule::A),
    tpl([3, 0, 0, 0, 7], 50, Molecule::A),
    tpl([3, 0, 0, 3, 6], 40, Molecule::A),
    tpl([0, 3, 3, 5, 3], 30, Molecule::A),
    tpl([7, 0, 0, 0, 0], 40, Molecule::B),
    tpl([7, 3, 0, 0, 0], 50, Molecule::B),
    tpl([6, 3, 0, 0, 3], 40, Molecule::B),
    tpl([3, 0, 3, 3, 5], 30, Molecule::B),
    tpl([0, 7, 0, 0, 0], 40, Molecule::C),
    tpl([0, 7, 3, 0, 0], 50, Molecule::C),
    tpl([3, 6, 3, 0, 0], 40, Molecule::C),
    tpl([5, 3, 0, 3, 3], 30, Molecule::C),
    tpl([0, 0, 7, 0, 0], 40, Molecule::D),
    tpl([0, 0, 7, 3, 0], 50, Molecule::D),
    tpl([0, 3, 6, 3, 0], 40, Molecule::D),
    tpl([3, 5, 3, 0, 3], 30, Molecule::D),
    tpl([0, 0, 0, 7, 0], 40, Molecule::E),
    tpl([0, 0, 0, 7, 3], 50, Molecule::E),
    tpl([0, 0, 3, 6, 3], 40, Molecule::E),
    tpl([3, 3, 5, 3, 0], 30, Molecule::E),
];

/// Science-project expertise requirements.
pub const PROJECTS: [Molecules; 10] = [
    Molecules([3, 3, 0, 0, 3]),
    Molecules([0, 3, 3, 3, 0]),
    Molecules([3, 0, 0, 3, 3]),
    Molecules([0, 0, 4, 4, 0]),
    Molecules([0, 4, 4, 0, 0]),
    Molecules([0, 0, 0, 4, 4]),
    Molecules([4, 0, 0, 0, 4]),
    Molecules([3, 3, 3, 0, 0]),
    Molecules([0, 0, 3, 3, 3]),
    Molecules([4, 4, 0, 0, 0]),
];

/// Templates for a 1-based rank.
#[must_use]
pub fn templates(rank: u8) -> &'static [SampleTemplate] {
    match rank {
        1 => &RANK_1,
        2 => &RANK_2,
        _ => &RANK_3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_reward_appears_evenly() {
        for (rank, per_type) in [(1u8, 8usize), (2, 6), (3, 4)] {
            for molecule in Molecule::ALL {
                let count = templates(rank)
                    .iter()
                    .filter(|t| t.reward == Some(molecule))
                    .count();
                assert_eq!(count, per_type, "rank {rank} reward {molecule}");
            }
        }
    }

    #[test]
    fn test_higher_ranks_cost_more() {
        let max_total = |rank: u8| templates(rank).iter().map(|t| t.cost.total()).max();
        let min_total = |rank: u8| templates(rank).iter().map(|t| t.cost.total()).min();
        assert!(max_total(1) <= min_total(3));
        assert_eq!(min_total(1), Some(3));
    }
}

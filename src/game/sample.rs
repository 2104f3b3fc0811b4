//! Samples, their templates, and the self-replenishing rank pools.

use std::collections::{BTreeSet, VecDeque};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::game::catalogue;
use crate::game::molecule::{Molecule, Molecules};
use crate::game::rules::RANK_COUNT;

/// Globally unique sample identifier, assigned in strictly increasing order.
pub type SampleId = u32;

/// The immutable research data a sample is minted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleTemplate {
    /// Molecules needed to produce the medicine.
    pub cost: Molecules,
    /// Health points scored on production.
    pub health: i32,
    /// Expertise gained on production.
    pub reward: Option<Molecule>,
}

/// A live sample held in a tray or in shared storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Unique id.
    pub id: SampleId,
    /// Rank, 1 to 3.
    pub rank: u8,
    /// Production cost.
    pub cost: Molecules,
    /// Health points scored on production.
    pub health: i32,
    /// Expertise reward, if any.
    pub reward: Option<Molecule>,
    /// Whether the sample has been diagnosed.
    pub discovered: bool,
    /// Agent that diagnosed it.
    pub discovered_by: Option<usize>,
    /// Agents allowed to see cost, health and reward.
    pub revealed_to: BTreeSet<usize>,
    /// Stored samples are visible to everyone.
    pub public: bool,
}

impl Sample {
    /// Mint a sample from a template.
    #[must_use]
    pub fn from_template(id: SampleId, rank: u8, template: &SampleTemplate) -> Self {
        Self {
            id,
            rank,
            cost: template.cost,
            health: template.health,
            reward: template.reward,
            discovered: false,
            discovered_by: None,
            revealed_to: BTreeSet::new(),
            public: false,
        }
    }

    /// The template this sample was minted from.
    #[must_use]
    pub fn template(&self) -> SampleTemplate {
        SampleTemplate {
            cost: self.cost,
            health: self.health,
            reward: self.reward,
        }
    }

    /// Whether `agent` may see this sample's data.
    #[must_use]
    pub fn visible_to(&self, agent: usize) -> bool {
        self.public || self.revealed_to.contains(&agent)
    }

    /// Reward letter, or `0` when there is none.
    #[must_use]
    pub fn reward_code(&self) -> String {
        self.reward.map_or_else(|| "0".to_string(), |m| m.to_string())
    }
}

/// One rank's queue of templates. Draws pop the head and push a copy at the
/// tail, so the length never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankPool {
    queue: VecDeque<SampleTemplate>,
}

impl RankPool {
    /// Shuffle `templates` into a new pool.
    pub fn shuffled<R: Rng>(templates: &[SampleTemplate], rng: &mut R) -> Self {
        let mut list = templates.to_vec();
        list.shuffle(rng);
        Self {
            queue: list.into(),
        }
    }

    /// Take the head template and recycle a copy at the tail.
    pub fn draw(&mut self) -> Option<SampleTemplate> {
        let head = self.queue.pop_front()?;
        self.queue.push_back(head);
        Some(head)
    }

    /// Number of templates in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when the pool holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Peek at the template the next draw will return.
    #[must_use]
    pub fn peek(&self) -> Option<&SampleTemplate> {
        self.queue.front()
    }
}

/// The three rank pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePools {
    ranks: Vec<RankPool>,
}

impl SamplePools {
    /// Shuffle every catalogue rank in order 1, 2, 3.
    pub fn from_catalogue<R: Rng>(rng: &mut R) -> Self {
        let ranks = (1..=RANK_COUNT)
            .map(|rank| RankPool::shuffled(catalogue::templates(rank), rng))
            .collect();
        Self { ranks }
    }

    /// Draw from a 1-based rank. `None` for an unknown rank.
    pub fn draw(&mut self, rank: u8) -> Option<SampleTemplate> {
        let slot = usize::from(rank).checked_sub(1)?;
        self.ranks.get_mut(slot)?.draw()
    }

    /// The pool for a 1-based rank.
    #[must_use]
    pub fn rank(&self, rank: u8) -> Option<&RankPool> {
        let slot = usize::from(rank).checked_sub(1)?;
        self.ranks.get(slot)
    }
}

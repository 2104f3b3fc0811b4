//! Events produced by a round commit, in generation order.

use crate::game::agent::AgentId;
use crate::game::molecule::{Molecule, Molecules};
use crate::game::sample::{Sample, SampleId};

/// The sample fields the viewer needs to draw a freshly minted sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleCard {
    /// Sample id.
    pub id: SampleId,
    /// Cost vector.
    pub cost: Molecules,
    /// Rank, 1 to 3.
    pub rank: u8,
    /// Health points.
    pub health: i32,
    /// Expertise reward.
    pub reward: Option<Molecule>,
}

impl SampleCard {
    /// Capture the public fields of `sample`.
    #[must_use]
    pub fn of(sample: &Sample) -> Self {
        Self {
            id: sample.id,
            cost: sample.cost,
            rank: sample.rank,
            health: sample.health,
            reward: sample.reward,
        }
    }

    /// `id c0..c4 rank health reward`, rank zero-based.
    #[must_use]
    pub fn to_line(&self) -> String {
        let reward = self.reward.map_or_else(|| "0".to_string(), |m| m.to_string());
        format!(
            "{} {} {} {} {}",
            self.id,
            self.cost.to_line(),
            self.rank.saturating_sub(1),
            self.health,
            reward
        )
    }
}

/// Something that happened to the world during a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A sample was drawn from a rank pool into a tray.
    NewSample {
        /// The new sample.
        card: SampleCard,
        /// Receiving agent.
        agent: AgentId,
    },
    /// A stored sample moved into a tray.
    SampleTaken {
        /// Sample id.
        sample: SampleId,
        /// Receiving agent.
        agent: AgentId,
    },
    /// A tray sample moved into shared storage.
    SampleStored {
        /// Sample id.
        sample: SampleId,
        /// Previous holder.
        agent: AgentId,
    },
    /// A molecule left the bank.
    ResourceTaken {
        /// Molecule type.
        molecule: Molecule,
        /// Receiving agent.
        agent: AgentId,
    },
    /// A tray sample was diagnosed.
    Diagnosed {
        /// Sample id.
        sample: SampleId,
    },
    /// A sample was turned into medicine.
    Produced {
        /// Sample id.
        sample: SampleId,
    },
    /// A stored sample was duplicated for a losing requester.
    SampleCloned {
        /// The duplicate.
        card: SampleCard,
    },
}

impl Event {
    /// Numeric event code used by the viewer.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::NewSample { .. } => 0,
            Self::SampleTaken { .. } => 1,
            Self::SampleStored { .. } => 2,
            Self::ResourceTaken { .. } => 3,
            Self::Diagnosed { .. } => 4,
            Self::Produced { .. } => 5,
            Self::SampleCloned { .. } => 6,
        }
    }

    /// Frame line: the code followed by the event's fields.
    #[must_use]
    pub fn to_line(&self) -> String {
        let code = self.code();
        match self {
            Self::NewSample { card, agent } => format!("{code} {} {agent}", card.to_line()),
            Self::SampleTaken { sample, agent } | Self::SampleStored { sample, agent } => {
                format!("{code} {sample} {agent}")
            }
            Self::ResourceTaken { molecule, agent } => format!("{code} {molecule} {agent}"),
            Self::Diagnosed { sample } | Self::Produced { sample } => format!("{code} {sample}"),
            Self::SampleCloned { card } => format!("{code} {}", card.to_line()),
        }
    }
}

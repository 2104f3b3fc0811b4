//! Staged world changes.
//!
//! Commands never touch shared state. Staging validates a command against the
//! world as it stands and appends a [`PendingIntent`]; the round commit then
//! applies every intent in submission order.

use crate::game::agent::AgentId;
use crate::game::event::{Event, SampleCard};
use crate::game::molecule::{Molecule, Molecules};
use crate::game::project::ScienceProject;
use crate::game::rules::Payment;
use crate::game::sample::{Sample, SampleId, SampleTemplate};
use crate::game::state::World;
use crate::replay::Sentence;

/// A change requested by one agent this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingIntent {
    /// Take one molecule from the bank.
    TakeMolecule {
        /// Requesting agent.
        agent: AgentId,
        /// Molecule type.
        molecule: Molecule,
        /// Set at commit; false when an earlier intent emptied the bank.
        granted: bool,
    },
    /// Draw a new sample of a rank.
    DrawSample {
        /// Requesting agent.
        agent: AgentId,
        /// Rank, 1 to 3.
        rank: u8,
        /// Id assigned at commit.
        drawn: Option<SampleId>,
    },
    /// Move a diagnosed tray sample into shared storage.
    StoreSample {
        /// Holder.
        agent: AgentId,
        /// Sample id.
        sample: SampleId,
    },
    /// Move a stored sample into the tray.
    RetrieveSample {
        /// Requesting agent.
        agent: AgentId,
        /// Stored sample id.
        sample: SampleId,
    },
    /// Receive a duplicate of a stored sample another agent won.
    ///
    /// The source's data is captured when staged since the winner's
    /// retrieval may empty the storage slot first.
    RetrieveClone {
        /// Requesting agent.
        agent: AgentId,
        /// Stored sample being copied.
        source: SampleId,
        /// Rank of the source.
        rank: u8,
        /// Research data of the source.
        template: SampleTemplate,
        /// Id assigned at commit.
        clone: Option<SampleId>,
    },
    /// Research a tray sample at the laboratory.
    Produce {
        /// Producing agent.
        agent: AgentId,
        /// Sample id.
        sample: SampleId,
        /// Set at commit: molecules taken from storage.
        paid: Molecules,
        /// Set at commit: health points scored.
        health: i32,
        /// Set at commit: expertise gained.
        reward: Option<Molecule>,
    },
}

impl PendingIntent {
    /// The agent this intent belongs to.
    #[must_use]
    pub fn agent(&self) -> AgentId {
        match self {
            Self::TakeMolecule { agent, .. }
            | Self::DrawSample { agent, .. }
            | Self::StoreSample { agent, .. }
            | Self::RetrieveSample { agent, .. }
            | Self::RetrieveClone { agent, .. }
            | Self::Produce { agent, .. } => *agent,
        }
    }

    /// The stored sample a retrieval targets.
    #[must_use]
    pub fn retrieval_target(&self) -> Option<SampleId> {
        match self {
            Self::RetrieveSample { sample, .. } => Some(*sample),
            Self::RetrieveClone { source, .. } => Some(*source),
            _ => None,
        }
    }

    /// Apply the intent, recording ids and amounts resolved at commit time.
    pub fn apply(&mut self, world: &mut World) {
        match self {
            Self::TakeMolecule {
                agent,
                molecule,
                granted,
            } => {
                *granted = world.bank[*molecule] > 0;
                if *granted {
                    world.bank[*molecule] -= 1;
                    world.agents[*agent].storage[*molecule] += 1;
                    world.events.push(Event::ResourceTaken {
                        molecule: *molecule,
                        agent: *agent,
                    });
                } else {
                    world.notify(*agent, format!("No {molecule} molecule left"), false);
                }
            }
            Self::DrawSample { agent, rank, drawn } => {
                let Some(template) = world.pools.draw(*rank) else {
                    return;
                };
                let id = world.mint_id();
                let mut sample = Sample::from_template(id, *rank, &template);
                if !world.rules.sample_rewards {
                    sample.reward = None;
                }
                world.events.push(Event::NewSample {
                    card: SampleCard::of(&sample),
                    agent: *agent,
                });
                world.agents[*agent].tray.push(sample);
                *drawn = Some(id);
            }
            Self::StoreSample { agent, sample } => {
                let Some(mut stored) = world.agents[*agent].take_from_tray(*sample) else {
                    return;
                };
                stored.public = true;
                if !world.stored.iter().any(|s| s.id == stored.id) {
                    world.stored.push(stored);
                }
                world.events.push(Event::SampleStored {
                    sample: *sample,
                    agent: *agent,
                });
            }
            Self::RetrieveSample { agent, sample } => {
                let Some(pos) = world.stored.iter().position(|s| s.id == *sample) else {
                    return;
                };
                let mut taken = world.stored.remove(pos);
                taken.revealed_to.insert(*agent);
                world.agents[*agent].tray.push(taken);
                world.events.push(Event::SampleTaken {
                    sample: *sample,
                    agent: *agent,
                });
            }
            Self::RetrieveClone {
                agent,
                rank,
                template,
                clone,
                ..
            } => {
                let id = world.mint_id();
                let mut copy = Sample::from_template(id, *rank, template);
                copy.discovered = true;
                copy.public = true;
                copy.revealed_to.insert(*agent);
                world.events.push(Event::SampleCloned {
                    card: SampleCard::of(&copy),
                });
                world.events.push(Event::SampleTaken {
                    sample: id,
                    agent: *agent,
                });
                world.agents[*agent].tray.push(copy);
                *clone = Some(id);
            }
            Self::Produce {
                agent,
                sample,
                paid,
                health,
                reward,
            } => {
                let Some(researched) = produce(world, *agent, *sample) else {
                    return;
                };
                *paid = researched.paid;
                *health = researched.health;
                *reward = researched.reward;
            }
        }
    }

    /// The summary sentence for this intent after commit, if it had an effect.
    #[must_use]
    pub fn describe(&self) -> Option<Sentence> {
        let sentence = match self {
            Self::TakeMolecule {
                agent,
                molecule,
                granted,
            } => {
                if *granted {
                    Sentence::new("takeMolecule", [agent.to_string(), molecule.to_string()])
                } else {
                    Sentence::new("moleculeDenied", [agent.to_string(), molecule.to_string()])
                }
            }
            Self::DrawSample { agent, drawn, .. } => {
                Sentence::new("newSample", [agent.to_string(), (*drawn)?.to_string()])
            }
            Self::StoreSample { agent, sample } => {
                Sentence::new("upload", [agent.to_string(), sample.to_string()])
            }
            Self::RetrieveSample { agent, sample } => {
                Sentence::new("download", [agent.to_string(), sample.to_string()])
            }
            Self::RetrieveClone { agent, clone, .. } => {
                Sentence::new("download", [agent.to_string(), (*clone)?.to_string()])
            }
            Self::Produce {
                agent,
                sample,
                health,
                reward,
                ..
            } => match reward {
                Some(gain) => Sentence::new(
                    "production",
                    [
                        agent.to_string(),
                        sample.to_string(),
                        health.to_string(),
                        gain.to_string(),
                    ],
                ),
                None => Sentence::new(
                    "productionNoGain",
                    [agent.to_string(), sample.to_string(), health.to_string()],
                ),
            },
        };
        Some(sentence)
    }
}

/// What a production settled at commit.
struct Research {
    paid: Molecules,
    health: i32,
    reward: Option<Molecule>,
}

fn produce(world: &mut World, agent: AgentId, sample: SampleId) -> Option<Research> {
    let payment = world.rules.payment;
    let producer = &mut world.agents[agent];
    let researched = producer.take_from_tray(sample)?;
    let paid = producer.payment_for(&researched.cost);
    producer.storage = producer.storage.saturating_sub(&paid);
    producer.score += researched.health;
    if let Some(gain) = researched.reward {
        producer.expertise[gain] += 1;
    }
    if payment == Payment::ReturnedToBank {
        world.bank = world.bank.plus(&paid);
    }
    world.events.push(Event::Produced { sample });
    Some(Research {
        paid,
        health: researched.health,
        reward: researched.reward,
    })
}

/// A staged diagnosis of a tray sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnosis {
    /// Holder.
    pub agent: AgentId,
    /// Sample id.
    pub sample: SampleId,
}

impl Diagnosis {
    /// Reveal the sample to its holder.
    pub fn apply(&self, world: &mut World) {
        let Some(sample) = world.agents[self.agent]
            .tray
            .iter_mut()
            .find(|s| s.id == self.sample)
        else {
            return;
        };
        sample.discovered = true;
        sample.discovered_by = Some(self.agent);
        sample.revealed_to.insert(self.agent);
        world.events.push(Event::Diagnosed {
            sample: self.sample,
        });
    }
}

/// A science project completed during a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectCompletion {
    /// Completing agent.
    pub agent: AgentId,
    /// The project, as it was when completed.
    pub project: ScienceProject,
    /// Points awarded.
    pub bonus: i32,
}

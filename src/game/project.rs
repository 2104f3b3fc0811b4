//! Science projects.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::game::catalogue::PROJECTS;
use crate::game::molecule::Molecules;

/// An open expertise goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScienceProject {
    /// Stable index assigned at setup.
    pub index: usize,
    /// Expertise required in each molecule type.
    pub cost: Molecules,
}

impl ScienceProject {
    /// Whether `expertise` meets every requirement.
    #[must_use]
    pub fn is_met_by(&self, expertise: &Molecules) -> bool {
        expertise.dominates(&self.cost)
    }
}

/// Shuffle the project catalogue and keep the first `count`.
#[must_use]
pub(crate) fn deal<R: Rng>(count: usize, rng: &mut R) -> Vec<ScienceProject> {
    let mut costs = PROJECTS.to_vec();
    costs.shuffle(rng);
    costs
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(index, cost)| ScienceProject { index, cost })
        .collect()
}

//! Robot state for one competitor.

use serde::{Deserialize, Serialize};

use crate::game::command::truncate_annotation;
use crate::game::location::Location;
use crate::game::molecule::Molecules;
use crate::game::sample::{Sample, SampleId};

/// Seat index of an agent, `0` or `1` in a normal match.
pub type AgentId = usize;

/// Score recorded for an eliminated agent.
pub const ELIMINATED_SCORE: i32 = -1;

/// Why and when an agent left the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elimination {
    /// Round of the failure.
    pub round: u32,
    /// Machine-readable reason code.
    pub code: String,
    /// Human-readable reason.
    pub message: String,
}

/// State for a single robot.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    /// Seat index.
    pub id: AgentId,
    /// Current score. Frozen at [`ELIMINATED_SCORE`] after elimination.
    pub score: i32,
    /// Molecules carried.
    pub storage: Molecules,
    /// Permanent per-type discount earned by production.
    pub expertise: Molecules,
    /// Carried samples, at most three.
    pub tray: Vec<Sample>,
    /// Location the robot is at, or heading to.
    pub target: Location,
    /// Location of the last departure.
    pub from: Location,
    /// Turns left before arrival.
    pub eta: u32,
    /// Free-form text shown by the viewer.
    pub annotation: Option<String>,
    /// Set during the round this robot advanced along its path.
    pub moved: bool,
    /// Set once the agent's command for the round has been staged.
    pub acted: bool,
    /// Set when the round's command was a `CONNECT`.
    pub attempted_connect: bool,
    /// Present once the agent is out of the match.
    pub elimination: Option<Elimination>,
    /// Whether the elimination has already been counted by a round commit.
    pub elimination_swept: bool,
}

impl Agent {
    /// A fresh robot at the start position.
    #[must_use]
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            score: 0,
            storage: Molecules::ZERO,
            expertise: Molecules::ZERO,
            tray: Vec::new(),
            target: Location::StartPos,
            from: Location::StartPos,
            eta: 0,
            annotation: None,
            moved: false,
            acted: false,
            attempted_connect: false,
            elimination: None,
            elimination_swept: false,
        }
    }

    /// True while the agent is still playing.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.elimination.is_none()
    }

    /// True while travelling.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.eta > 0
    }

    /// Replace the annotation, shortening long text for display.
    pub fn set_annotation(&mut self, text: Option<&str>) {
        self.annotation = text.map(truncate_annotation);
    }

    /// Remove the agent from play. Later calls keep the first reason.
    pub fn eliminate(&mut self, round: u32, code: &str, message: String) {
        if self.elimination.is_some() {
            return;
        }
        self.score = ELIMINATED_SCORE;
        self.elimination = Some(Elimination {
            round,
            code: code.to_string(),
            message,
        });
    }

    /// Clear the per-round flags.
    pub fn reset_round(&mut self) {
        self.moved = false;
        self.acted = false;
        self.attempted_connect = false;
    }

    /// The tray sample with `id`, if carried.
    #[must_use]
    pub fn tray_sample(&self, id: SampleId) -> Option<&Sample> {
        self.tray.iter().find(|s| s.id == id)
    }

    /// Take the tray sample with `id` out of the tray.
    pub fn take_from_tray(&mut self, id: SampleId) -> Option<Sample> {
        let pos = self.tray.iter().position(|s| s.id == id)?;
        Some(self.tray.remove(pos))
    }

    /// Molecules that producing `cost` would take from storage.
    #[must_use]
    pub fn payment_for(&self, cost: &Molecules) -> Molecules {
        cost.saturating_sub(&self.expertise)
    }

    /// Whether storage plus expertise covers `cost`.
    #[must_use]
    pub fn can_afford(&self, cost: &Molecules) -> bool {
        self.storage.plus(&self.expertise).dominates(cost)
    }
}

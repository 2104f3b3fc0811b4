//! Per-league rule tables.
//!
//! Every tier difference lives here as plain data so the economy code never
//! branches on a league number directly.

use serde::{Deserialize, Serialize};

use crate::game::location::DistanceTable;

/// Highest supported league.
pub const MAX_LEAGUE: u8 = 3;

/// Maximum molecules an agent may hold.
pub const MAX_STORAGE: u32 = 10;

/// Maximum samples an agent may carry.
pub const MAX_TRAY: usize = 3;

/// Number of sample ranks.
pub const RANK_COUNT: u8 = 3;

/// How a stored-sample request that lost to another agent is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContestPolicy {
    /// The losing agent receives a fresh diagnosed copy with a new id.
    Clone,
    /// The losing agent's request is silently dropped.
    Deny,
}

/// What happens to the molecules paid at the laboratory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payment {
    /// Paid molecules leave circulation.
    Consumed,
    /// Paid molecules go back to the bank.
    ReturnedToBank,
}

/// The full rule set for one league.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// League this table was built for.
    pub league: u8,
    /// Initial bank count of every molecule type.
    pub molecules_per_type: u32,
    /// Number of science projects dealt at setup.
    pub project_count: usize,
    /// Diagnosed rank-1 samples placed in shared storage at setup.
    pub initial_stored_samples: usize,
    /// Points for completing a science project.
    pub project_bonus: i32,
    /// Score that ends the match immediately, if any.
    pub winning_score: Option<i32>,
    /// Whether `GOTO SAMPLES` is allowed.
    pub samples_module_open: bool,
    /// Whether samples keep their expertise reward.
    pub sample_rewards: bool,
    /// Travel times.
    pub distances: DistanceTable,
    /// Stored-sample contention policy.
    pub contest: ContestPolicy,
    /// Fate of molecules paid at production.
    pub payment: Payment,
}

impl Rules {
    /// Build the rule table for `league`, or `None` when it is out of range.
    #[must_use]
    pub fn for_league(league: u8) -> Option<Self> {
        let rules = match league {
            0 => Self {
                league,
                molecules_per_type: 99,
                project_count: 0,
                initial_stored_samples: 50,
                project_bonus: 30,
                winning_score: Some(170),
                samples_module_open: false,
                sample_rewards: false,
                distances: DistanceTable::Uniform,
                contest: ContestPolicy::Clone,
                payment: Payment::Consumed,
            },
            1 => Self {
                league,
                molecules_per_type: 99,
                project_count: 0,
                initial_stored_samples: 0,
                project_bonus: 30,
                winning_score: Some(170),
                samples_module_open: true,
                sample_rewards: false,
                distances: DistanceTable::Uniform,
                contest: ContestPolicy::Deny,
                payment: Payment::Consumed,
            },
            2 => Self {
                league,
                molecules_per_type: 6,
                project_count: 3,
                initial_stored_samples: 0,
                project_bonus: 30,
                winning_score: Some(170),
                samples_module_open: true,
                sample_rewards: true,
                distances: DistanceTable::Full,
                contest: ContestPolicy::Deny,
                payment: Payment::Consumed,
            },
            3 => Self {
                league,
                molecules_per_type: 5,
                project_count: 3,
                initial_stored_samples: 0,
                project_bonus: 50,
                winning_score: None,
                samples_module_open: true,
                sample_rewards: true,
                distances: DistanceTable::Full,
                contest: ContestPolicy::Deny,
                payment: Payment::Consumed,
            },
            _ => return None,
        };
        Some(rules)
    }

    /// Same table with a different payment policy.
    #[must_use]
    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payment = payment;
        self
    }

    /// The grammar hint reported with invalid-input failures.
    #[must_use]
    pub fn expected_commands(&self) -> &'static str {
        if self.samples_module_open {
            "GOTO LABORATORY|DIAGNOSIS|MOLECULES|SAMPLES | CONNECT data | WAIT"
        } else {
            "GOTO LABORATORY|DIAGNOSIS|MOLECULES | CONNECT data | WAIT"
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            league: MAX_LEAGUE,
            molecules_per_type: 5,
            project_count: 3,
            initial_stored_samples: 0,
            project_bonus: 50,
            winning_score: None,
            samples_module_open: true,
            sample_rewards: true,
            distances: DistanceTable::Full,
            contest: ContestPolicy::Deny,
            payment: Payment::Consumed,
        }
    }
}

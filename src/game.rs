//! Game layer: the molecule research economy.
//!
//! - Locations and travel times
//! - Robots with storage, expertise and a sample tray
//! - Samples drawn from self-replenishing rank pools
//! - Command staging and the once-per-round commit
//! - Science projects

mod agent;
pub mod catalogue;
mod command;
mod economy;
mod event;
mod intent;
mod invariants;
mod location;
mod molecule;
mod project;
pub mod rules;
mod sample;
mod state;
mod view;

pub use agent::{Agent, AgentId, ELIMINATED_SCORE, Elimination};
pub use command::{
    Command, ConnectArg, MAX_ANNOTATION_CHARS, parse_command, truncate_annotation,
};
pub use economy::{
    RoundReport, advance_travel, apply_staged, commit_round, score_projects, sweep_eliminations,
};
pub use event::{Event, SampleCard};
pub use intent::{Diagnosis, PendingIntent, ProjectCompletion};
pub use invariants::{InvariantViolation, check_invariants};
pub use location::{DistanceTable, Location};
pub use molecule::{MOLECULE_TYPES, Molecule, Molecules};
pub use project::ScienceProject;
pub use rules::{ContestPolicy, MAX_LEAGUE, MAX_STORAGE, MAX_TRAY, Payment, Rules};
pub use sample::{RankPool, Sample, SampleId, SamplePools, SampleTemplate};
pub use state::World;
pub use view::{agent_input, setup_lines};

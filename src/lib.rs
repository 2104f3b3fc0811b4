// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Labref: a deterministic referee for a two-robot molecule research game.
//!
//! Two agents steer robots between the modules of a lab, draw and diagnose
//! samples, collect molecules and produce medicines for points. The referee
//! validates every answer, applies the round's actions in one commit, and
//! writes a replay stream for a viewer.
//!
//! - Same seed, same answers, same match: randomness is confined to setup.
//! - Every shared change is staged first and committed at the round boundary.
//! - A misbehaving agent is eliminated; the match itself never fails on it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Referee (turn scheduler)          │
//! ├─────────────────────────────────────┤
//! │   LabGame  ──▶  Replay emitter      │
//! ├─────────────────────────────────────┤
//! │   World: parser, intents, economy   │
//! └─────────────────────────────────────┘
//! ```

pub mod bots;
pub mod config;
pub mod error;
pub mod game;
pub mod lab;
pub mod referee;
pub mod replay;

pub use config::MatchConfig;
pub use error::{Failure, GameOverReason, LinkError, MatchError, RecordingError, SetupError};
pub use game::{Command, Location, Molecule, Molecules, Rules, World, parse_command};
pub use lab::{LabGame, play_match};
pub use referee::{Game, MatchOutcome, Ranking, Referee, TurnMode};
pub use replay::{Recording, Spectator};

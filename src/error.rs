//! Error types for the referee.
//!
//! Failures come in two disjoint classes. A [`Failure`] belongs to one agent
//! and eliminates it; the match goes on. A [`GameOverReason`] belongs to the
//! match as a whole. Setup and transport problems have their own types and
//! never reach an agent.

use std::io;

use thiserror::Error;

use crate::game::{Molecule, SampleId};

/// A hard failure attributed to a single agent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// The line matched no command grammar, or its argument had the wrong shape.
    #[error("Invalid input: expected {expected} but found \"{found}\"")]
    InvalidInput {
        /// Grammar hint.
        expected: String,
        /// The offending line.
        found: String,
    },
    /// The agent did not answer in time.
    #[error("Timeout: the program did not provide {expected_lines} input lines in due time")]
    Timeout {
        /// Lines the referee was waiting for.
        expected_lines: usize,
    },
    /// The agent's channel closed.
    #[error("The program closed its output stream")]
    Disconnected,
    /// The bank has none of the requested type.
    #[error("Invalid CONNECT: there are no {0} type molecules left")]
    NotEnoughMolecules(Molecule),
    /// Tray already holds the maximum number of samples.
    #[error("Invalid CONNECT: your robot may not carry data for more than 3 samples")]
    TrayFull,
    /// Storage already holds the maximum number of molecules.
    #[error("Invalid CONNECT: your robot may not carry more than 10 molecules")]
    StorageFull,
    /// A sample-id module was used without an id.
    #[error("Invalid CONNECT: you must specify a Sample ID to connect to this module")]
    NullSample,
    /// No stored sample has this id.
    #[error("Invalid CONNECT: the sample {0} is not available")]
    SampleNotFound(i64),
    /// The rank argument is not 1, 2 or 3.
    #[error("Invalid CONNECT: there is no sample with rank {0}")]
    BadSampleRank(String),
    /// The agent does not carry this sample.
    #[error("Invalid CONNECT: you are not carrying sample {0}")]
    SampleNotInTray(i64),
    /// The argument is not a molecule letter.
    #[error("Invalid CONNECT: invalid molecule {0}")]
    UnknownMolecule(String),
    /// Storage plus expertise does not cover the sample cost.
    #[error(
        "Invalid CONNECT: you do not have enough molecules/expertise to launch research on sample {0}"
    )]
    CannotAfford(SampleId),
    /// `CONNECT` issued at the start position.
    #[error("Invalid CONNECT: you must go to a module before using the connect command")]
    ConnectToNothing,
    /// A line was staged for a seat no robot occupies.
    #[error("Invalid input: no robot at seat {0}")]
    UnknownAgent(usize),
}

impl Failure {
    /// Machine-readable reason code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INPUT",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Disconnected => "DISCONNECTED",
            Self::NotEnoughMolecules(_) => "NOT_ENOUGH_MOLECULES",
            Self::TrayFull => "TRAY_FULL",
            Self::StorageFull => "STORAGE_FULL",
            Self::NullSample => "NULL_SAMPLE",
            Self::SampleNotFound(_) => "SAMPLE_NOT_FOUND",
            Self::BadSampleRank(_) => "BAD_SAMPLE_RANK",
            Self::SampleNotInTray(_) => "SAMPLE_NOT_IN_TRAY",
            Self::UnknownMolecule(_) => "UNKNOWN_MOLECULE",
            Self::CannotAfford(_) => "CANNOT_AFFORD",
            Self::ConnectToNothing => "CONNECT_TO_NOTHING",
            Self::UnknownAgent(_) => "UNKNOWN_AGENT",
        }
    }

    /// Short text for the viewer's tooltip.
    #[must_use]
    pub fn tooltip(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } | Self::UnknownAgent(_) => "Invalid input",
            Self::Timeout { .. } | Self::Disconnected => "Timeout!",
            _ => "Invalid CONNECT",
        }
    }
}

/// Why the match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameOverReason {
    /// The round limit was reached.
    #[error("Game over: maximum number of rounds reached")]
    MaxRounds,
    /// An agent reached the winning score.
    #[error("Game over: a robot reached the winning score")]
    WinCondition,
    /// Too few agents remain in play.
    #[error("Game over: not enough robots left in play")]
    NotEnoughAgents,
}

impl GameOverReason {
    /// Machine-readable reason code, also used as a frame reason.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::MaxRounds => "maxRoundsCountReached",
            Self::WinCondition => "winConditionReached",
            Self::NotEnoughAgents => "notEnoughPlayers",
        }
    }
}

/// Malformed configuration detected before any agent sees input.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A property value could not be parsed.
    #[error("invalid value {value:?} for property {key}")]
    InvalidProperty {
        /// Property key.
        key: String,
        /// Raw value.
        value: String,
    },
    /// A property line had no `=`.
    #[error("malformed property line {0:?}")]
    MalformedLine(String),
    /// League outside `0..=3`.
    #[error("unknown league {0}")]
    UnknownLeague(u8),
    /// Not enough agents to start.
    #[error("a match needs at least {needed} agents, got {got}")]
    TooFewAgents {
        /// Minimum required.
        needed: usize,
        /// Agents supplied.
        got: usize,
    },
    /// The harness sent something other than `###Start N`.
    #[error("unexpected harness handshake {0:?}")]
    Handshake(String),
    /// Reading the configuration failed.
    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),
}

/// A problem on one agent's channel.
#[derive(Debug, Error)]
pub enum LinkError {
    /// No complete answer before the deadline.
    #[error("agent did not answer in time")]
    Timeout,
    /// The channel reached end of stream.
    #[error("agent channel closed")]
    Closed,
    /// Underlying I/O failure.
    #[error("agent channel I/O error: {0}")]
    Io(#[from] io::Error),
}

impl LinkError {
    /// The agent failure this link problem counts as.
    #[must_use]
    pub fn into_failure(self, expected_lines: usize) -> Failure {
        match self {
            Self::Timeout => Failure::Timeout { expected_lines },
            Self::Closed | Self::Io(_) => Failure::Disconnected,
        }
    }
}

/// Saving or loading a recording failed.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// File access failed.
    #[error("recording I/O error: {0}")]
    Io(#[from] io::Error),
    /// The file is not a valid recording.
    #[error("recording format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Errors that abort a whole match run.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Setup failed.
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// Writing the spectator stream failed.
    #[error("spectator stream error: {0}")]
    Spectator(#[from] io::Error),
    /// The harness channel itself failed.
    #[error("harness error: {0}")]
    Harness(LinkError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            Failure::NotEnoughMolecules(Molecule::C).to_string(),
            "Invalid CONNECT: there are no C type molecules left"
        );
        assert_eq!(
            Failure::SampleNotFound(12).to_string(),
            "Invalid CONNECT: the sample 12 is not available"
        );
        assert_eq!(Failure::TrayFull.code(), "TRAY_FULL");
    }

    #[test]
    fn test_link_error_counts_as_failure() {
        assert_eq!(
            LinkError::Timeout.into_failure(1),
            Failure::Timeout { expected_lines: 1 }
        );
        assert_eq!(LinkError::Closed.into_failure(1), Failure::Disconnected);
        assert_eq!(LinkError::Timeout.into_failure(1).code(), "TIMEOUT");
    }

    #[test]
    fn test_game_over_codes() {
        assert_eq!(GameOverReason::MaxRounds.code(), "maxRoundsCountReached");
        assert_eq!(GameOverReason::NotEnoughAgents.code(), "notEnoughPlayers");
    }
}

//! Spectator stream and match recordings.
//!
//! The spectator stream is a sequence of typed blocks, each a `[[KIND] n]`
//! header followed by exactly `n` payload lines. A viewer reconstructs the
//! match from the `VIEW` frames; `SUMMARY` and `TOOLTIP` blocks carry text.
//!
//! A [`Recording`] is the match configuration plus every agent answer. The
//! engine is deterministic, so replaying the answers through scripted agents
//! reproduces the match exactly.

mod frame;
mod messages;
mod recording;
mod summary;

pub use frame::{GAME_NAME, frame_data, init_view_data};
pub use messages::{Sentence, render, template};
pub use recording::{Recording, Transcript};
pub use summary::{Tooltip, TooltipSet, color_text};

use std::fmt;
use std::io::{self, Write};

/// Kind of a spectator block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A frame.
    View,
    /// Per-turn information about the agent that just played.
    Infos,
    /// The agent about to play, its expected line count and time budget.
    NextPlayerInfo,
    /// The input sent to the agent about to play.
    NextPlayerInput,
    /// Round summary sentences.
    Summary,
    /// Tooltips.
    Tooltip,
    /// Final scores.
    Scores,
    /// Match properties.
    Uinput,
}

impl BlockKind {
    /// Header keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::Infos => "INFOS",
            Self::NextPlayerInfo => "NEXT_PLAYER_INFO",
            Self::NextPlayerInput => "NEXT_PLAYER_INPUT",
            Self::Summary => "SUMMARY",
            Self::Tooltip => "TOOLTIP",
            Self::Scores => "SCORES",
            Self::Uinput => "UINPUT",
        }
    }
}

/// Frame header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// Frame counter.
    pub frame: u32,
    /// Key frames close a round; intermediate frames follow single turns.
    pub key: bool,
    /// Optional reason code.
    pub reason: Option<String>,
}

impl fmt::Display for FrameHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.key {
            "KEY_FRAME"
        } else {
            "INTERMEDIATE_FRAME"
        };
        write!(f, "{kind} {}", self.frame)?;
        if let Some(reason) = &self.reason {
            write!(f, " {reason}")?;
        }
        Ok(())
    }
}

/// Writes spectator blocks to an optional sink.
pub struct Spectator {
    sink: Option<Box<dyn Write>>,
}

impl fmt::Debug for Spectator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spectator")
            .field("enabled", &self.sink.is_some())
            .finish()
    }
}

impl Spectator {
    /// A spectator writing to `sink`.
    #[must_use]
    pub fn new(sink: Box<dyn Write>) -> Self {
        Self { sink: Some(sink) }
    }

    /// A spectator that discards everything.
    #[must_use]
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// Whether blocks are being written anywhere.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Write one block.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    pub fn block(&mut self, kind: BlockKind, lines: &[String]) -> io::Result<()> {
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };
        writeln!(sink, "[[{}] {}]", kind.keyword(), lines.len())?;
        for line in lines {
            writeln!(sink, "{line}")?;
        }
        Ok(())
    }

    /// Write a `VIEW` block: the header followed by `payload`.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    pub fn frame(&mut self, header: &FrameHeader, payload: Vec<String>) -> io::Result<()> {
        let mut lines = Vec::with_capacity(payload.len() + 1);
        lines.push(header.to_string());
        lines.extend(payload);
        self.block(BlockKind::View, &lines)
    }

    /// Flush the sink.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

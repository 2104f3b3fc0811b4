//! Referee command implementation.

use std::io;
use std::path::Path;

use anyhow::Result;
use labref::LabGame;
use labref::referee::{HarnessTransport, Referee};
use tracing::info;

use super::{MatchArgs, open_spectator};

/// Execute the referee command: speak the harness protocol on stdin and
/// stdout until the match is over.
///
/// # Errors
///
/// Returns an error for a bad handshake or setup, or a broken channel.
pub(crate) fn execute(setup: &MatchArgs, spectator: Option<&Path>) -> Result<()> {
    let config = setup.to_config()?;
    let (transport, agents) = HarnessTransport::connect(io::stdin().lock(), io::stdout())?;
    let game = LabGame::new(config, agents)?;
    let spectator = open_spectator(spectator)?;

    let outcome = Referee::new(game, transport).with_spectator(spectator).run()?;
    info!(ranking = %outcome.ranking, rounds = outcome.rounds, "harness match finished");
    Ok(())
}

//! Replay command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use labref::bots::ScriptedBot;
use labref::play_match;
use labref::referee::AgentLink;
use labref::replay::Recording;

use super::output::{JsonMatchResult, format_text};
use super::{OutputFormat, open_spectator};

/// Execute the replay command: feed the recorded answers back through
/// scripted agents.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or replayed.
pub(crate) fn execute(recording: &Path, spectator: Option<&Path>, format: OutputFormat) -> Result<()> {
    let loaded = Recording::load(recording)
        .with_context(|| format!("failed to load {}", recording.display()))?;
    let names: Vec<String> = (0..loaded.transcript.agent_count())
        .map(|i| format!("recorded agent {i}"))
        .collect();
    let links: Vec<Box<dyn AgentLink>> = loaded
        .transcript
        .responses
        .iter()
        .map(|turns| Box::new(ScriptedBot::new(turns.clone())) as Box<dyn AgentLink>)
        .collect();

    let outcome = play_match(loaded.config, links, open_spectator(spectator)?)?;
    if outcome.transcript != loaded.transcript {
        tracing::warn!("replayed answers differ from the recording");
    }

    match format {
        OutputFormat::Text => print!("{}", format_text(loaded.config.seed, &outcome, &names)),
        OutputFormat::Json => {
            let result = JsonMatchResult::from_outcome(loaded.config.seed, &outcome, &names);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

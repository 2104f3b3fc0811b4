//! Run command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use labref::play_match;
use labref::replay::Recording;
use tracing::info;

use super::output::{JsonMatchResult, format_text};
use super::{MatchArgs, OutputFormat, agent_link, open_spectator};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if an agent cannot be started, the setup is invalid, or
/// an output file cannot be written.
pub(crate) fn execute(
    agents: &[String],
    setup: &MatchArgs,
    spectator: Option<&Path>,
    save: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let config = setup.to_config()?;
    let links = agents
        .iter()
        .map(|spec| agent_link(spec))
        .collect::<Result<Vec<_>>>()?;
    let spectator = open_spectator(spectator)?;

    info!(seed = config.seed, agents = agents.len(), "running match");
    let outcome = play_match(config, links, spectator)?;

    if let Some(path) = save {
        Recording::new(config, outcome.transcript.clone())
            .save(path)
            .with_context(|| format!("failed to save recording to {}", path.display()))?;
    }

    match format {
        OutputFormat::Text => print!("{}", format_text(config.seed, &outcome, agents)),
        OutputFormat::Json => {
            let result = JsonMatchResult::from_outcome(config.seed, &outcome, agents);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

//! CLI command implementations for Labref.

pub(crate) mod batch;
pub(crate) mod referee;
pub(crate) mod replay;
pub(crate) mod run;

mod output;

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use labref::MatchConfig;
use labref::bots;
use labref::config::fresh_seed;
use labref::game::Payment;
use labref::referee::{AgentLink, ProcessAgent, TurnMode};
use labref::replay::Spectator;
use tracing_subscriber::{EnvFilter, fmt};

/// Output format for the `run` and `replay` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `batch` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BatchFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Match setup flags shared by the commands that start a match.
#[derive(Args, Debug, Clone)]
pub(crate) struct MatchArgs {
    /// Property file (`key=value` lines) to start from
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Random seed (default: from the clock)
    #[arg(short, long)]
    seed: Option<u64>,

    /// League, 0 to 3
    #[arg(short, long)]
    league: Option<u8>,

    /// Round limit
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Apply each agent's action before the next agent plays
    #[arg(long)]
    alternating: bool,

    /// Return molecules paid at the laboratory to the bank
    #[arg(long)]
    return_payment: bool,
}

impl MatchArgs {
    /// Build the match configuration: property file first, flags on top.
    pub(crate) fn to_config(&self) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                MatchConfig::from_properties(&text)
                    .with_context(|| format!("invalid configuration in {}", path.display()))?
            }
            None => MatchConfig::default().with_seed(fresh_seed()),
        };
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(league) = self.league {
            config = config.with_league(league);
        }
        if let Some(max_rounds) = self.max_rounds {
            config = config.with_max_rounds(max_rounds);
        }
        if self.alternating {
            config = config.with_turn_mode(TurnMode::Alternating);
        }
        if self.return_payment {
            config = config.with_payment(Payment::ReturnedToBank);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Install the log subscriber. Logs go to stderr, or to `log_file`.
pub(crate) fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Resolve an agent argument: `bot:<name>` for a built-in bot, anything
/// else is a command line to launch.
pub(crate) fn agent_link(spec: &str) -> Result<Box<dyn AgentLink>> {
    if let Some(name) = spec.strip_prefix("bot:") {
        return bot_link(name);
    }
    let agent = ProcessAgent::spawn(spec).with_context(|| format!("failed to start {spec:?}"))?;
    Ok(Box::new(agent))
}

/// A built-in bot by name.
pub(crate) fn bot_link(name: &str) -> Result<Box<dyn AgentLink>> {
    match bots::by_name(name) {
        Some(bot) => Ok(bot),
        None => bail!(
            "unknown bot {name:?} (available: {})",
            bots::BOT_NAMES.join(", ")
        ),
    }
}

/// Open the spectator sink: `-` for stdout, a path for a file, or nothing.
pub(crate) fn open_spectator(path: Option<&Path>) -> Result<Spectator> {
    match path {
        None => Ok(Spectator::disabled()),
        Some(path) if path == Path::new("-") => Ok(Spectator::new(Box::new(io::stdout()))),
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Spectator::new(Box::new(BufWriter::new(file))))
        }
    }
}

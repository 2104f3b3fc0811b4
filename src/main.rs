//! Labref CLI - run, referee and replay molecule research matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Labref - a deterministic referee for a two-robot molecule research game
#[derive(Parser, Debug)]
#[command(name = "labref")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// More log output (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a match between agents: `bot:<name>` or a command line
    Run {
        /// Agents, in seat order (2-4)
        #[arg(required = true, num_args = 2..=4)]
        agents: Vec<String>,

        #[command(flatten)]
        setup: cli::MatchArgs,

        /// Write the spectator stream here (`-` for stdout)
        #[arg(long)]
        spectator: Option<PathBuf>,

        /// Save a recording of the match
        #[arg(long)]
        save: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Referee one match for an outer harness over stdin/stdout
    Referee {
        #[command(flatten)]
        setup: cli::MatchArgs,

        /// Write the spectator stream here (`-` for stdout)
        #[arg(long)]
        spectator: Option<PathBuf>,
    },

    /// Replay a recorded match
    Replay {
        /// Recording file
        #[arg(required = true)]
        recording: PathBuf,

        /// Write the spectator stream here (`-` for stdout)
        #[arg(long)]
        spectator: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run many seeds between built-in bots and aggregate statistics
    Batch {
        /// Bot names, in seat order (2-4)
        #[arg(required = true, num_args = 2..=4)]
        bots: Vec<String>,

        /// Number of matches
        #[arg(short, long, default_value = "100")]
        games: u64,

        #[command(flatten)]
        setup: cli::MatchArgs,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = cli::init_logging(args.verbose, args.log_file.as_deref()) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    let result = match args.command {
        Commands::Run {
            agents,
            setup,
            spectator,
            save,
            format,
        } => cli::run::execute(&agents, &setup, spectator.as_deref(), save.as_deref(), format),

        Commands::Referee { setup, spectator } => {
            cli::referee::execute(&setup, spectator.as_deref())
        }

        Commands::Replay {
            recording,
            spectator,
            format,
        } => cli::replay::execute(&recording, spectator.as_deref(), format),

        Commands::Batch {
            bots,
            games,
            setup,
            threads,
            format,
            progress,
        } => cli::batch::execute(&bots, games, &setup, threads, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

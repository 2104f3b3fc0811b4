//! Batch command implementation.

use std::time::Instant;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use labref::play_match;
use labref::replay::Spectator;
use rayon::prelude::*;
use tracing::warn;

use super::output::{BatchStats, JsonBatchResult, format_batch_csv, format_batch_text};
use super::{BatchFormat, MatchArgs, bot_link};

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error for an unknown bot name or an invalid setup.
pub(crate) fn execute(
    bots: &[String],
    games: u64,
    setup: &MatchArgs,
    threads: Option<usize>,
    format: BatchFormat,
    progress: bool,
) -> Result<()> {
    // Fail early on bad names rather than once per match
    for name in bots {
        bot_link(name)?;
    }
    let base = setup.to_config()?;

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = progress.then(|| {
        let pb = ProgressBar::new(games);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} matches ({per_sec})",
        ) {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb
    });

    let start = Instant::now();
    let agents = bots.len();

    let stats = (0..games)
        .into_par_iter()
        .fold(
            || BatchStats::new(agents),
            |mut local, i| {
                let config = base.with_seed(base.seed.wrapping_add(i));
                let result = bots
                    .iter()
                    .map(|name| bot_link(name))
                    .collect::<Result<Vec<_>>>()
                    .and_then(|links| Ok(play_match(config, links, Spectator::disabled())?));
                match result {
                    Ok(outcome) => local.add_outcome(&outcome),
                    Err(e) => {
                        warn!(seed = config.seed, "match failed: {e:#}");
                        local.errors += 1;
                    }
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local
            },
        )
        .reduce(
            || BatchStats::new(agents),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    match format {
        BatchFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats, bots));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        BatchFormat::Json => {
            let result = JsonBatchResult::from_stats(&stats, bots);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        BatchFormat::Csv => print!("{}", format_batch_csv(&stats, bots)),
    }
    Ok(())
}

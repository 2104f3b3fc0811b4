//! Output formatting utilities for CLI.

use std::fmt::Write as _;

use labref::MatchOutcome;
use serde::Serialize;

/// JSON-serializable match result.
#[derive(Debug, Serialize)]
pub(super) struct JsonMatchResult {
    /// Random seed used.
    pub(super) seed: u64,
    /// Sole winner (null on a shared top score).
    pub(super) winner: Option<usize>,
    /// Ranking line, as sent to a harness.
    pub(super) ranking: String,
    /// Rounds played.
    pub(super) rounds: u32,
    /// Game-over reason code.
    pub(super) reason: &'static str,
    /// Per-agent results.
    pub(super) agents: Vec<JsonAgentResult>,
}

/// JSON-serializable agent result.
#[derive(Debug, Serialize)]
pub(super) struct JsonAgentResult {
    /// Seat index.
    pub(super) id: usize,
    /// Agent argument as given.
    pub(super) name: String,
    /// Final score.
    pub(super) score: i32,
    /// Elimination reason code (null if it survived).
    pub(super) eliminated: Option<&'static str>,
    /// Round of elimination.
    pub(super) eliminated_round: Option<u32>,
}

impl JsonMatchResult {
    /// Create from a finished match.
    pub(super) fn from_outcome(seed: u64, outcome: &MatchOutcome, names: &[String]) -> Self {
        let agents = outcome
            .scores
            .iter()
            .enumerate()
            .map(|(id, score)| {
                let elimination = outcome.eliminations.iter().find(|e| e.agent == id);
                JsonAgentResult {
                    id,
                    name: names.get(id).cloned().unwrap_or_default(),
                    score: *score,
                    eliminated: elimination.map(|e| e.code),
                    eliminated_round: elimination.map(|e| e.round),
                }
            })
            .collect();
        Self {
            seed,
            winner: outcome.ranking.winner(),
            ranking: outcome.ranking.to_string(),
            rounds: outcome.rounds,
            reason: outcome.reason.code(),
            agents,
        }
    }
}

/// Format a match result as human-readable text.
pub(super) fn format_text(seed: u64, outcome: &MatchOutcome, names: &[String]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Match Result (seed: {seed})");
    match outcome.ranking.winner() {
        Some(winner) => {
            let name = names.get(winner).map_or("unknown", String::as_str);
            let _ = writeln!(output, "  Winner: Agent {winner} ({name})");
        }
        None => output.push_str("  Winner: none (joint first place)\n"),
    }
    let _ = writeln!(output, "  Rounds: {} ({})", outcome.rounds, outcome.reason);
    let _ = writeln!(output, "  Ranking: {}\n", outcome.ranking);

    for (id, score) in outcome.scores.iter().enumerate() {
        let name = names.get(id).map_or("unknown", String::as_str);
        let _ = write!(output, "  Agent {id}: {score} points ({name})");
        if let Some(e) = outcome.eliminations.iter().find(|e| e.agent == id) {
            let _ = write!(output, " [eliminated round {}: {}]", e.round, e.message);
        }
        output.push('\n');
    }

    output
}

/// Aggregated statistics over many matches.
#[derive(Debug, Default, Clone)]
pub(super) struct BatchStats {
    /// Matches played.
    pub(super) games_played: u64,
    /// Outright wins per agent.
    pub(super) wins: Vec<u64>,
    /// Matches with a shared top score.
    pub(super) ties: u64,
    /// Eliminations per agent.
    pub(super) eliminations: Vec<u64>,
    /// Matches that failed to set up or run.
    pub(super) errors: u64,
    /// Score sum per agent.
    total_scores: Vec<i64>,
    /// Rounds across all matches.
    total_rounds: u64,
}

impl BatchStats {
    /// Empty stats for `agents` agents.
    pub(super) fn new(agents: usize) -> Self {
        Self {
            wins: vec![0; agents],
            eliminations: vec![0; agents],
            total_scores: vec![0; agents],
            ..Self::default()
        }
    }

    /// Fold in one finished match.
    pub(super) fn add_outcome(&mut self, outcome: &MatchOutcome) {
        self.games_played += 1;
        self.total_rounds += u64::from(outcome.rounds);
        match outcome.ranking.winner() {
            Some(winner) => {
                if let Some(wins) = self.wins.get_mut(winner) {
                    *wins += 1;
                }
            }
            None => self.ties += 1,
        }
        for (total, score) in self.total_scores.iter_mut().zip(&outcome.scores) {
            *total += i64::from(*score);
        }
        for e in &outcome.eliminations {
            if let Some(count) = self.eliminations.get_mut(e.agent) {
                *count += 1;
            }
        }
    }

    /// Merge stats gathered on another thread.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.ties += other.ties;
        self.errors += other.errors;
        self.total_rounds += other.total_rounds;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.eliminations.iter_mut().zip(&other.eliminations) {
            *a += b;
        }
        for (a, b) in self.total_scores.iter_mut().zip(&other.total_scores) {
            *a += b;
        }
    }

    /// Win rate for an agent (0.0-1.0).
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn win_rate(&self, agent: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(agent).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Mean final score for an agent.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_score(&self, agent: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_scores.get(agent).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Mean match length.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_rounds(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_rounds as f64 / self.games_played as f64
    }
}

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// Matches played.
    games_played: u64,
    /// Per-agent statistics.
    agents: Vec<JsonBatchAgent>,
    /// Matches with a shared top score.
    ties: u64,
    /// Matches that could not be run.
    errors: u64,
    /// Mean match length in rounds.
    avg_rounds: f64,
}

/// JSON-serializable per-agent batch stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchAgent {
    /// Seat index.
    agent: usize,
    /// Bot name.
    bot: String,
    /// Outright wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Mean score.
    avg_score: f64,
    /// Times eliminated.
    eliminations: u64,
}

impl JsonBatchResult {
    /// Create from stats and bot names.
    pub(super) fn from_stats(stats: &BatchStats, names: &[String]) -> Self {
        let agents = names
            .iter()
            .enumerate()
            .map(|(i, name)| JsonBatchAgent {
                agent: i,
                bot: name.clone(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_score: stats.avg_score(i),
                eliminations: stats.eliminations.get(i).copied().unwrap_or(0),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            agents,
            ties: stats.ties,
            errors: stats.errors,
            avg_rounds: stats.avg_rounds(),
        }
    }
}

/// Format batch stats as human-readable text.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_batch_text(stats: &BatchStats, names: &[String]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Batch Results ({} matches)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in names.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let rate = stats.win_rate(i) * 100.0;
        let _ = writeln!(output, "  Agent {i} ({name}): {rate:.1}% ({wins} wins)");
    }
    let tie_rate = if stats.games_played == 0 {
        0.0
    } else {
        stats.ties as f64 / stats.games_played as f64 * 100.0
    };
    let _ = writeln!(output, "  Ties: {} ({tie_rate:.1}%)\n", stats.ties);

    output.push_str("Average Scores:\n");
    for (i, name) in names.iter().enumerate() {
        let eliminated = stats.eliminations.get(i).copied().unwrap_or(0);
        let _ = writeln!(
            output,
            "  Agent {i} ({name}): {:.1} ({eliminated} eliminations)",
            stats.avg_score(i)
        );
    }

    let _ = writeln!(output, "\nAverage Match Length: {:.0} rounds", stats.avg_rounds());
    if stats.errors > 0 {
        let _ = writeln!(output, "Failed matches: {}", stats.errors);
    }

    output
}

/// Format batch stats as CSV.
pub(super) fn format_batch_csv(stats: &BatchStats, names: &[String]) -> String {
    let mut output = String::from("agent,bot,wins,win_rate,avg_score,eliminations\n");
    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(
            output,
            "{},{},{},{:.4},{:.2},{}",
            i,
            name,
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_score(i),
            stats.eliminations.get(i).copied().unwrap_or(0)
        );
    }
    output
}

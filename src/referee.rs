//! Turn scheduler.
//!
//! The [`Referee`] drives a [`Game`] through its rounds: it sends every
//! agent its view, collects one answer per agent per round, hands answers to
//! the game, commits the round and decides when the match is over. It knows
//! nothing about the rules; everything game-specific sits behind [`Game`].
//!
//! # Match phases
//!
//! ```text
//! Init ──▶ Prime ──▶ Playing ──▶ GameOver
//! ```
//!
//! `Prime` sends each agent its first view without consuming a turn. A round
//! in `Playing` gives every agent still in play exactly one turn, in index
//! order. Any failure eliminates that agent only; the others play on.

mod process;
mod ranking;
mod transport;

pub use process::ProcessAgent;
pub use ranking::Ranking;
pub use transport::{AgentLink, HarnessTransport, LinkTransport, Transport, TurnInput};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Failure, GameOverReason, MatchError, SetupError};
use crate::replay::{BlockKind, FrameHeader, GAME_NAME, Spectator, Tooltip, Transcript, color_text};

/// Round limit used when a game does not set its own.
pub const DEFAULT_MAX_ROUNDS: u32 = 400;

/// Fewest agents that keep a match going.
pub const MIN_AGENTS: usize = 2;

/// When staged actions take effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnMode {
    /// All agents act on the same snapshot; one commit per round.
    #[default]
    Simultaneous,
    /// Each agent's action is applied before the next agent sees the world.
    Alternating,
}

/// A turn-based game the [`Referee`] can run.
pub trait Game {
    /// Name shown in the first frame.
    fn name(&self) -> &str {
        GAME_NAME
    }

    /// Number of agents, fixed for the match.
    fn agent_count(&self) -> usize;

    /// The match ends when fewer agents than this remain.
    fn min_agents(&self) -> usize {
        MIN_AGENTS
    }

    /// Last round index, exclusive.
    fn max_rounds(&self) -> u32 {
        DEFAULT_MAX_ROUNDS
    }

    /// Commit schedule.
    fn turn_mode(&self) -> TurnMode {
        TurnMode::Simultaneous
    }

    /// Time an agent has to answer in `round`.
    fn turn_timeout(&self, round: u32) -> Duration;

    /// Lines expected from `agent` per turn.
    fn expected_output_lines(&self, _agent: usize) -> usize {
        1
    }

    /// Reset per-round state before any agent acts.
    fn begin_round(&mut self, round: u32);

    /// Static data sent once, before the first view.
    fn setup_input(&self, agent: usize) -> Vec<String>;

    /// The view `agent` receives at the start of its turn.
    fn agent_input(&self, agent: usize) -> Vec<String>;

    /// Validate and stage `agent`'s answer.
    ///
    /// # Errors
    ///
    /// Returns the [`Failure`] that eliminates the agent.
    fn handle_output(&mut self, agent: usize, lines: &[String]) -> Result<(), Failure>;

    /// Remove `agent` from play.
    fn eliminate(&mut self, agent: usize, failure: &Failure);

    /// True while `agent` still takes turns.
    fn is_active(&self, agent: usize) -> bool;

    /// Apply one agent's staged action. Only called in alternating mode.
    fn commit_turn(&mut self) {}

    /// Commit the round. Returns agents counted out by this commit.
    fn commit_round(&mut self) -> Vec<usize>;

    /// Agents still in play.
    fn alive_count(&self) -> usize;

    /// True once the game's own win condition holds.
    fn win_reached(&self) -> bool {
        false
    }

    /// Current score of `agent`.
    fn score(&self, agent: usize) -> i32;

    /// Persisted match properties.
    fn properties(&self) -> Vec<(String, String)>;

    /// Static viewer data for frame 0.
    fn init_view(&self) -> Vec<String>;

    /// Viewer data for the current state.
    fn frame_view(&self) -> Vec<String>;

    /// Summary sentences for `round`.
    fn summary(&self, round: u32) -> Vec<String>;

    /// Drain pending tooltips.
    fn take_tooltips(&mut self) -> Vec<Tooltip>;
}

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing sent yet.
    Init,
    /// Sending first views.
    Prime,
    /// Rounds in progress.
    Playing,
    /// Scores are frozen.
    GameOver,
}

/// One agent's exit from the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EliminationRecord {
    /// Agent index.
    pub agent: usize,
    /// Round of the failure.
    pub round: u32,
    /// Machine-readable reason code.
    pub code: &'static str,
    /// Human-readable reason.
    pub message: String,
}

/// Result of a finished match.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Final score per agent.
    pub scores: Vec<i32>,
    /// Agents grouped by score, best first.
    pub ranking: Ranking,
    /// Rounds played.
    pub rounds: u32,
    /// Why the match ended.
    pub reason: GameOverReason,
    /// Failures in the order they happened.
    pub eliminations: Vec<EliminationRecord>,
    /// Every answer read.
    pub transcript: Transcript,
}

/// Drives one match of `G` over transport `T`.
#[derive(Debug)]
pub struct Referee<G, T> {
    game: G,
    transport: T,
    spectator: Spectator,
    phase: Phase,
    frame: u32,
    transcript: Transcript,
    eliminations: Vec<EliminationRecord>,
}

impl<G: Game, T: Transport> Referee<G, T> {
    /// A referee with no spectator output.
    #[must_use]
    pub fn new(game: G, transport: T) -> Self {
        let agents = game.agent_count();
        Self {
            game,
            transport,
            spectator: Spectator::disabled(),
            phase: Phase::Init,
            frame: 0,
            transcript: Transcript::new(agents),
            eliminations: Vec::new(),
        }
    }

    /// Write the spectator stream to `spectator`.
    #[must_use]
    pub fn with_spectator(mut self, spectator: Spectator) -> Self {
        self.spectator = spectator;
        self
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The game being played.
    #[must_use]
    pub fn game(&self) -> &G {
        &self.game
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, "phase change");
        self.phase = phase;
    }

    /// Play the match to the end.
    ///
    /// # Errors
    ///
    /// Fails on a bad setup, a broken spectator sink, or a broken harness
    /// channel. Agent misbehaviour is never an error here; it eliminates
    /// the agent.
    pub fn run(&mut self) -> Result<MatchOutcome, MatchError> {
        let agents = self.game.agent_count();
        let needed = self.game.min_agents();
        if agents < needed {
            return Err(SetupError::TooFewAgents {
                needed,
                got: agents,
            }
            .into());
        }
        info!(agents, game = self.game.name(), "match started");

        self.game.begin_round(0);
        self.opening_frame()?;

        self.enter(Phase::Prime);
        for agent in 0..agents {
            let setup = self.game.setup_input(agent);
            let view = self.game.agent_input(agent);
            self.transport
                .prime(agent, &setup, &view)
                .map_err(MatchError::Harness)?;
        }

        self.enter(Phase::Playing);
        let mut round = 0;
        let reason = loop {
            if round > 0 {
                self.game.begin_round(round);
            }
            self.play_round(round)?;
            self.game.commit_round();
            let reason = self.termination(round + 1);
            self.closing_frame(round, reason)?;
            if let Some(reason) = reason {
                break reason;
            }
            round += 1;
        };

        self.enter(Phase::GameOver);
        let scores: Vec<i32> = (0..agents).map(|a| self.game.score(a)).collect();
        let ranking = Ranking::from_scores(&scores);
        info!(%ranking, reason = reason.code(), rounds = round + 1, "match over");

        let score_lines: Vec<String> = scores
            .iter()
            .enumerate()
            .map(|(agent, score)| format!("{agent} {score}"))
            .collect();
        self.spectator.block(BlockKind::Scores, &score_lines)?;
        let properties: Vec<String> = self
            .game
            .properties()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        self.spectator.block(BlockKind::Uinput, &properties)?;
        self.spectator.flush()?;
        self.transport.finish(&ranking).map_err(MatchError::Harness)?;

        Ok(MatchOutcome {
            scores,
            ranking,
            rounds: round + 1,
            reason,
            eliminations: std::mem::take(&mut self.eliminations),
            transcript: std::mem::take(&mut self.transcript),
        })
    }

    fn play_round(&mut self, round: u32) -> Result<(), MatchError> {
        let agents = self.game.agent_count();
        let alternating = self.game.turn_mode() == TurnMode::Alternating;
        let snapshot: Vec<Option<Vec<String>>> = (0..agents)
            .map(|a| {
                (!alternating && self.game.is_active(a)).then(|| self.game.agent_input(a))
            })
            .collect();

        for (agent, view) in snapshot.into_iter().enumerate() {
            if !self.game.is_active(agent) {
                continue;
            }
            let view = view.unwrap_or_else(|| self.game.agent_input(agent));
            let failure = self.play_turn(round, agent, &view)?;
            if alternating {
                self.game.commit_turn();
            }
            self.intermediate_frame(failure.as_ref(), alternating)?;
        }
        Ok(())
    }

    fn play_turn(
        &mut self,
        round: u32,
        agent: usize,
        view: &[String],
    ) -> Result<Option<Failure>, MatchError> {
        let expected = self.game.expected_output_lines(agent);
        let timeout = self.game.turn_timeout(round);
        let setup = (round == 0).then(|| self.game.setup_input(agent));

        if self.spectator.is_enabled() {
            let info = vec![
                agent.to_string(),
                expected.to_string(),
                timeout.as_millis().to_string(),
            ];
            self.spectator.block(BlockKind::NextPlayerInfo, &info)?;
            let mut input = setup.clone().unwrap_or_default();
            input.extend_from_slice(view);
            self.spectator.block(BlockKind::NextPlayerInput, &input)?;
        }

        debug!(round, agent, "turn");
        let input = TurnInput {
            setup: setup.as_deref(),
            view,
        };
        let result = self.transport.exchange(agent, &input, expected, timeout);
        let outcome = match result {
            Ok(lines) => {
                let outcome = self.game.handle_output(agent, &lines);
                self.transcript.push(agent, Some(lines));
                outcome
            }
            Err(err) => {
                self.transcript.push(agent, None);
                Err(err.into_failure(expected))
            }
        };

        let Err(failure) = outcome else {
            return Ok(None);
        };
        info!(agent, round, code = failure.code(), "agent failed: {failure}");
        self.game.eliminate(agent, &failure);
        self.eliminations.push(EliminationRecord {
            agent,
            round,
            code: failure.code(),
            message: failure.to_string(),
        });
        Ok(Some(failure))
    }

    fn termination(&self, next_round: u32) -> Option<GameOverReason> {
        if next_round >= self.game.max_rounds() {
            Some(GameOverReason::MaxRounds)
        } else if self.game.win_reached() {
            Some(GameOverReason::WinCondition)
        } else if self.game.alive_count() < self.game.min_agents() {
            Some(GameOverReason::NotEnoughAgents)
        } else {
            None
        }
    }

    fn next_header(&mut self, key: bool, reason: Option<String>) -> FrameHeader {
        let header = FrameHeader {
            frame: self.frame,
            key,
            reason,
        };
        self.frame += 1;
        header
    }

    fn opening_frame(&mut self) -> Result<(), MatchError> {
        let header = self.next_header(true, None);
        let mut payload = vec![self.game.name().to_string()];
        payload.extend(self.game.init_view());
        payload.extend(self.game.frame_view());
        self.spectator.frame(&header, payload)?;
        self.spectator.block(BlockKind::Infos, &[])?;
        self.spectator.block(BlockKind::Summary, &[])?;
        self.tooltips()
    }

    fn intermediate_frame(
        &mut self,
        failure: Option<&Failure>,
        with_data: bool,
    ) -> Result<(), MatchError> {
        let header = self.next_header(false, failure.map(|f| f.code().to_string()));
        let payload = if with_data {
            self.game.frame_view()
        } else {
            Vec::new()
        };
        self.spectator.frame(&header, payload)?;
        let infos: Vec<String> = failure
            .map(|f| color_text(&f.to_string(), false))
            .into_iter()
            .collect();
        self.spectator.block(BlockKind::Infos, &infos)?;
        if with_data {
            self.tooltips()?;
        }
        Ok(())
    }

    fn closing_frame(
        &mut self,
        round: u32,
        reason: Option<GameOverReason>,
    ) -> Result<(), MatchError> {
        let header = self.next_header(true, reason.map(|r| r.code().to_string()));
        let payload = self.game.frame_view();
        self.spectator.frame(&header, payload)?;
        self.spectator.block(BlockKind::Infos, &[])?;
        let mut summary = self.game.summary(round);
        if let Some(reason) = reason {
            summary.push(color_text(&reason.to_string(), false));
        }
        self.spectator.block(BlockKind::Summary, &summary)?;
        self.tooltips()
    }

    fn tooltips(&mut self) -> Result<(), MatchError> {
        let tooltips = self.game.take_tooltips();
        if tooltips.is_empty() {
            return Ok(());
        }
        let mut set = crate::replay::TooltipSet::new();
        set.extend(tooltips);
        self.spectator.block(BlockKind::Tooltip, &set.to_lines())?;
        Ok(())
    }
}

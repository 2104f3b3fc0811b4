//! The molecule research game, wired into the scheduler.
//!
//! [`LabGame`] owns the [`World`] and its [`MatchConfig`] and answers the
//! scheduler's questions: what each agent sees, how its answer is staged,
//! when the round commits, what the viewer shows.

use std::time::Duration;

use tracing::info;

use crate::config::MatchConfig;
use crate::error::{Failure, MatchError, SetupError};
use crate::game::{self, World};
use crate::referee::{AgentLink, Game, LinkTransport, MIN_AGENTS, MatchOutcome, Referee, TurnMode};
use crate::replay::{Sentence, Spectator, Tooltip, frame_data, init_view_data};

/// One match of the research game.
#[derive(Debug, Clone)]
pub struct LabGame {
    config: MatchConfig,
    world: World,
}

impl LabGame {
    /// Set up a match for `agents` agents.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration or too few agents.
    pub fn new(config: MatchConfig, agents: usize) -> Result<Self, SetupError> {
        config.validate()?;
        if agents < MIN_AGENTS {
            return Err(SetupError::TooFewAgents {
                needed: MIN_AGENTS,
                got: agents,
            });
        }
        let rules = config.rules()?;
        info!(seed = config.seed, league = config.league, "setting up world");
        Ok(Self {
            config,
            world: World::new(rules, agents, config.seed),
        })
    }

    /// The configuration this match was set up with.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// The world as it stands.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn agent_summary(&self, agent: usize, round: u32, lines: &mut Vec<String>) {
        let world = &self.world;
        lines.extend(
            world
                .committed
                .iter()
                .filter(|intent| intent.agent() == agent)
                .filter_map(game::PendingIntent::describe)
                .map(|s| s.render()),
        );
        lines.extend(
            world
                .diagnoses
                .iter()
                .filter(|d| d.agent == agent)
                .map(|d| {
                    Sentence::new("diagnosis", [agent.to_string(), d.sample.to_string()]).render()
                }),
        );

        let robot = &world.agents[agent];
        if robot.is_alive() && robot.is_moving() {
            let key = if robot.eta == 1 { "etaSingular" } else { "eta" };
            let sentence = Sentence::new(
                key,
                [
                    agent.to_string(),
                    robot.target.module_word().to_string(),
                    robot.eta.to_string(),
                ],
            );
            lines.push(sentence.render());
        }

        lines.extend(
            world
                .completions
                .iter()
                .filter(|c| c.agent == agent)
                .map(|c| {
                    Sentence::new(
                        "projectCompletion",
                        [
                            agent.to_string(),
                            c.project.index.to_string(),
                            c.bonus.to_string(),
                        ],
                    )
                    .render()
                }),
        );

        if let Some(elimination) = robot.elimination.as_ref().filter(|e| e.round == round) {
            lines.push(Sentence::new("eliminated", [agent.to_string()]).render());
            lines.push(elimination.message.clone());
        }
    }
}

impl Game for LabGame {
    fn agent_count(&self) -> usize {
        self.world.agents.len()
    }

    fn max_rounds(&self) -> u32 {
        self.config.max_rounds
    }

    fn turn_mode(&self) -> TurnMode {
        self.config.turn_mode
    }

    fn turn_timeout(&self, round: u32) -> Duration {
        self.config.turn_timeout(round)
    }

    fn begin_round(&mut self, round: u32) {
        self.world.begin_round(round);
    }

    fn setup_input(&self, _agent: usize) -> Vec<String> {
        game::setup_lines(&self.world)
    }

    fn agent_input(&self, agent: usize) -> Vec<String> {
        game::agent_input(&self.world, agent)
    }

    fn handle_output(&mut self, agent: usize, lines: &[String]) -> Result<(), Failure> {
        let Some(line) = lines.first() else {
            return Err(Failure::InvalidInput {
                expected: self.world.rules.expected_commands().to_string(),
                found: String::new(),
            });
        };
        self.world.stage(agent, line)
    }

    fn eliminate(&mut self, agent: usize, failure: &Failure) {
        self.world.eliminate(agent, failure);
    }

    fn is_active(&self, agent: usize) -> bool {
        self.world.agents.get(agent).is_some_and(game::Agent::is_alive)
    }

    fn commit_turn(&mut self) {
        game::apply_staged(&mut self.world);
    }

    fn commit_round(&mut self) -> Vec<usize> {
        game::commit_round(&mut self.world).eliminated
    }

    fn alive_count(&self) -> usize {
        self.world.alive
    }

    fn win_reached(&self) -> bool {
        self.world
            .rules
            .winning_score
            .is_some_and(|target| self.world.agents.iter().any(|a| a.score >= target))
    }

    fn score(&self, agent: usize) -> i32 {
        self.world.agents[agent].score
    }

    fn properties(&self) -> Vec<(String, String)> {
        self.config.properties()
    }

    fn init_view(&self) -> Vec<String> {
        init_view_data(&self.world)
    }

    fn frame_view(&self) -> Vec<String> {
        frame_data(&self.world)
    }

    fn summary(&self, round: u32) -> Vec<String> {
        let mut lines = Vec::new();
        for agent in 0..self.world.agents.len() {
            self.agent_summary(agent, round, &mut lines);
        }
        lines
    }

    fn take_tooltips(&mut self) -> Vec<Tooltip> {
        std::mem::take(&mut self.world.notices)
    }
}

/// Play one full match between `links` under `config`.
///
/// # Errors
///
/// Returns an error for a bad setup or a broken spectator sink.
pub fn play_match(
    config: MatchConfig,
    links: Vec<Box<dyn AgentLink>>,
    spectator: Spectator,
) -> Result<MatchOutcome, MatchError> {
    let game = LabGame::new(config, links.len())?;
    Referee::new(game, LinkTransport::new(links))
        .with_spectator(spectator)
        .run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Location;

    fn lab() -> LabGame {
        LabGame::new(MatchConfig::default().with_seed(3), 2).unwrap()
    }

    #[test]
    fn test_setup_checks() {
        assert!(matches!(
            LabGame::new(MatchConfig::default(), 1),
            Err(SetupError::TooFewAgents { needed: 2, got: 1 })
        ));
        assert!(matches!(
            LabGame::new(MatchConfig::default().with_league(7), 2),
            Err(SetupError::UnknownLeague(7))
        ));
    }

    #[test]
    fn test_travel_summary() {
        let mut game = lab();
        game.begin_round(0);
        game.handle_output(0, &["GOTO DIAGNOSIS".to_string()]).unwrap();
        game.handle_output(1, &["WAIT".to_string()]).unwrap();
        game.commit_round();
        assert_eq!(game.world().agents[0].target, Location::Diagnosis);
        assert_eq!(
            game.summary(0),
            vec!["$0 will arrive at the diagnosis module in 1 turn"]
        );
    }

    #[test]
    fn test_empty_answer_is_invalid() {
        let mut game = lab();
        game.begin_round(0);
        assert!(matches!(
            game.handle_output(0, &[]),
            Err(Failure::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_elimination_summary_and_tooltip() {
        let mut game = lab();
        game.begin_round(0);
        let failure = game.handle_output(0, &["DANCE".to_string()]).unwrap_err();
        game.eliminate(0, &failure);
        game.handle_output(1, &["WAIT".to_string()]).unwrap();
        assert_eq!(game.commit_round(), vec![0]);
        assert_eq!(game.alive_count(), 1);
        assert_eq!(game.score(0), -1);
        let summary = game.summary(0);
        assert_eq!(summary[0], "$0: Eliminated!");
        let tips = game.take_tooltips();
        assert_eq!(tips.len(), 1);
        assert!(!tips[0].success);
        assert!(game.take_tooltips().is_empty());
    }

    #[test]
    fn test_win_threshold_by_league() {
        let mut game = LabGame::new(MatchConfig::default().with_league(2), 2).unwrap();
        assert!(!game.win_reached());
        game.world.agents[1].score = 170;
        assert!(game.win_reached());

        let mut game = lab();
        game.world.agents[1].score = 500;
        assert!(!game.win_reached());
    }
}

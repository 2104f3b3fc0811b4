//! Full matches between in-process agents.
//!
//! Run with: cargo test --release match_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use labref::bots::{GreedyBot, IdleBot, ScriptedBot};
use labref::error::GameOverReason;
use labref::game::{Location, Molecule, Rules, SampleCard, World, check_invariants};
use labref::referee::{AgentLink, LinkTransport, Referee};
use labref::replay::{Recording, Spectator};
use labref::{LabGame, MatchConfig, TurnMode, play_match};

/// A writer whose bytes can be read back after the referee is done.
#[derive(Clone, Default)]
struct Shared(Arc<Mutex<Vec<u8>>>);

impl Shared {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Shared {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn greedy_pair() -> Vec<Box<dyn AgentLink>> {
    vec![Box::new(GreedyBot::new()), Box::new(GreedyBot::new())]
}

fn idle_pair() -> Vec<Box<dyn AgentLink>> {
    vec![Box::new(IdleBot), Box::new(IdleBot)]
}

#[test]
fn test_greedy_matches_complete_in_every_league() {
    for league in 0..=3 {
        for seed in [1, 7, 42] {
            let config = MatchConfig::default().with_seed(seed).with_league(league);
            let outcome = play_match(config, greedy_pair(), Spectator::disabled()).unwrap();
            assert!(
                outcome.eliminations.is_empty(),
                "league {league} seed {seed}: {:?}",
                outcome.eliminations
            );
            assert!(outcome.rounds <= config.max_rounds);
            assert!(outcome.scores.iter().all(|s| *s >= 0));
            assert!(
                outcome.scores.iter().any(|s| *s > 0),
                "league {league} seed {seed}: nobody scored"
            );
            assert_ne!(outcome.reason, GameOverReason::NotEnoughAgents);
        }
    }
}

#[test]
fn test_alternating_mode_completes() {
    let config = MatchConfig::default()
        .with_seed(5)
        .with_turn_mode(TurnMode::Alternating);
    let outcome = play_match(config, greedy_pair(), Spectator::disabled()).unwrap();
    assert!(outcome.eliminations.is_empty());
    assert_eq!(outcome.rounds, 200);
}

#[test]
fn test_same_seed_same_stream() {
    let run = || {
        let out = Shared::default();
        let config = MatchConfig::default().with_seed(99).with_max_rounds(60);
        play_match(config, greedy_pair(), Spectator::new(Box::new(out.clone()))).unwrap();
        out.text()
    };
    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}

#[test]
fn test_recording_replays_identically() {
    let config = MatchConfig::default().with_seed(2024).with_max_rounds(80);
    let out = Shared::default();
    let links: Vec<Box<dyn AgentLink>> = vec![
        Box::new(GreedyBot::new()),
        Box::new(ScriptedBot::new(vec![
            Some(vec!["GOTO SAMPLES".to_string()]),
            Some(vec!["WAIT".to_string()]),
            Some(vec!["WAIT".to_string()]),
            Some(vec!["CONNECT 2".to_string()]),
            None,
        ])),
    ];
    let original = play_match(config, links, Spectator::new(Box::new(out.clone()))).unwrap();
    assert_eq!(original.rounds, 5);
    assert_eq!(original.eliminations[0].code, "TIMEOUT");
    let recording = Recording::new(config, original.transcript.clone());

    let file = tempfile::NamedTempFile::new().unwrap();
    recording.save(file.path()).unwrap();
    let loaded = Recording::load(file.path()).unwrap();

    let replay_out = Shared::default();
    let links: Vec<Box<dyn AgentLink>> = loaded
        .transcript
        .responses
        .iter()
        .map(|turns| Box::new(ScriptedBot::new(turns.clone())) as Box<dyn AgentLink>)
        .collect();
    let replayed = play_match(
        loaded.config,
        links,
        Spectator::new(Box::new(replay_out.clone())),
    )
    .unwrap();

    assert_eq!(replayed.scores, original.scores);
    assert_eq!(replayed.rounds, original.rounds);
    assert_eq!(replayed.transcript, original.transcript);
    assert_eq!(replay_out.text(), out.text());
}

#[test]
fn test_invalid_line_eliminates_only_that_agent() {
    let links: Vec<Box<dyn AgentLink>> = vec![
        Box::new(ScriptedBot::from_lines(&["HELLO"])),
        Box::new(IdleBot),
    ];
    let outcome = play_match(MatchConfig::default().with_seed(1), links, Spectator::disabled()).unwrap();
    assert_eq!(outcome.rounds, 1);
    assert_eq!(outcome.reason, GameOverReason::NotEnoughAgents);
    assert_eq!(outcome.scores, vec![-1, 0]);
    assert_eq!(outcome.ranking.to_string(), "1 0");
    assert_eq!(outcome.eliminations.len(), 1);
    assert_eq!(outcome.eliminations[0].code, "INPUT");
}

#[test]
fn test_missing_answer_is_timeout() {
    let links: Vec<Box<dyn AgentLink>> = vec![
        Box::new(IdleBot),
        Box::new(ScriptedBot::new(vec![Some(vec!["WAIT".to_string()]), None])),
    ];
    let outcome = play_match(MatchConfig::default().with_seed(1), links, Spectator::disabled()).unwrap();
    assert_eq!(outcome.rounds, 2);
    assert_eq!(outcome.eliminations[0].agent, 1);
    assert_eq!(outcome.eliminations[0].round, 1);
    assert_eq!(outcome.eliminations[0].code, "TIMEOUT");
}

#[test]
fn test_equal_scores_rank_jointly() {
    let config = MatchConfig::default().with_seed(3).with_max_rounds(5);
    let outcome = play_match(config, idle_pair(), Spectator::disabled()).unwrap();
    assert_eq!(outcome.rounds, 5);
    assert_eq!(outcome.reason, GameOverReason::MaxRounds);
    assert_eq!(outcome.scores, vec![0, 0]);
    assert_eq!(outcome.ranking.winner(), None);
    assert_eq!(outcome.ranking.to_string(), "01");
}

#[test]
fn test_travel_then_connect() {
    let config = MatchConfig::default().with_seed(8).with_max_rounds(3);
    let game = LabGame::new(config, 2).unwrap();
    let transport = LinkTransport::new(vec![
        Box::new(ScriptedBot::from_lines(&[
            "GOTO MOLECULES",
            "CONNECT A too early",
            "CONNECT A",
        ])),
        Box::new(IdleBot),
    ]);
    let mut referee = Referee::new(game, transport);
    let outcome = referee.run().unwrap();

    assert!(outcome.eliminations.is_empty());
    let world = referee.game().world();
    let robot = &world.agents[0];
    assert_eq!(robot.target, Location::Molecules);
    assert_eq!(robot.eta, 0);
    assert_eq!(robot.storage[Molecule::A], 1);
    assert_eq!(world.bank[Molecule::A], 4);
    assert!(check_invariants(world).is_empty());
}

#[test]
fn test_spectator_stream_layout() {
    let out = Shared::default();
    let config = MatchConfig::default().with_seed(12).with_max_rounds(2);
    play_match(config, idle_pair(), Spectator::new(Box::new(out.clone()))).unwrap();
    let text = out.text();
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines[0].starts_with("[[VIEW] "));
    assert_eq!(lines[1], "KEY_FRAME 0");
    assert_eq!(lines[2], "Roche");

    let views = lines.iter().filter(|l| l.starts_with("[[VIEW]")).count();
    assert_eq!(views, 1 + 2 * 3);
    assert!(text.contains("INTERMEDIATE_FRAME 1\n"));
    assert!(text.contains("KEY_FRAME 6 maxRoundsCountReached\n"));
    assert!(text.contains("[[NEXT_PLAYER_INFO] 3]\n0\n1\n1000\n"));
    assert!(text.contains("[[SCORES] 2]\n0 0\n1 0\n"));
    assert!(text.contains("[[UINPUT] 7]\nseed=12\n"));
}

#[test]
fn test_contested_stored_sample_is_cloned_in_lowest_league() {
    let config = MatchConfig::default()
        .with_seed(31)
        .with_league(0)
        .with_max_rounds(2);
    let script = || ScriptedBot::from_lines(&["GOTO DIAGNOSIS", "CONNECT 4"]);
    let out = Shared::default();
    let game = LabGame::new(config, 2).unwrap();
    let links: Vec<Box<dyn AgentLink>> = vec![Box::new(script()), Box::new(script())];
    let mut referee = Referee::new(game, LinkTransport::new(links))
        .with_spectator(Spectator::new(Box::new(out.clone())));
    let outcome = referee.run().unwrap();
    assert!(outcome.eliminations.is_empty());

    let world = referee.game().world();
    assert_eq!(world.agents[0].tray.len(), 1);
    assert_eq!(world.agents[1].tray.len(), 1);
    assert_eq!(world.agents[0].tray[0].id, 4);
    assert_eq!(world.agents[1].tray[0].id, 50);
    assert_eq!(world.stored.len(), 49);
    assert_eq!(world.next_sample_id(), 51);
    assert!(check_invariants(world).is_empty());

    let mut source = World::new(Rules::for_league(0).unwrap(), 2, 31).stored[4].clone();
    source.id = 50;
    let clone_event = format!("6 {}\n1 50 1\n", SampleCard::of(&source).to_line());
    let text = out.text();
    assert!(text.contains("1 4 0\n"), "winner's retrieval event missing");
    assert!(text.contains(&clone_event), "clone events missing:\n{text}");
    assert!(text.contains("$1 downloads sample 50 from the cloud."));
}

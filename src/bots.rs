//! In-process agents.
//!
//! Bots implement [`AgentLink`] directly so matches can run without child
//! processes: in tests, benches, batch runs and replays.

use std::collections::VecDeque;
use std::time::Duration;

use crate::error::LinkError;
use crate::game::{MAX_STORAGE, MAX_TRAY, MOLECULE_TYPES, Molecule, Molecules};
use crate::referee::AgentLink;

/// Names accepted by [`by_name`].
pub const BOT_NAMES: &[&str] = &["idle", "greedy"];

/// Build a bot from its name.
#[must_use]
pub fn by_name(name: &str) -> Option<Box<dyn AgentLink>> {
    match name {
        "idle" => Some(Box::new(IdleBot)),
        "greedy" => Some(Box::new(GreedyBot::new())),
        _ => None,
    }
}

/// Always waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleBot;

impl AgentLink for IdleBot {
    fn send(&mut self, _lines: &[String]) -> Result<(), LinkError> {
        Ok(())
    }

    fn receive(&mut self, expected: usize, _timeout: Duration) -> Result<Vec<String>, LinkError> {
        Ok(vec!["WAIT".to_string(); expected])
    }
}

/// Plays back fixed answers. A `None` answer times out; once the script
/// runs out the channel is closed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBot {
    answers: VecDeque<Option<Vec<String>>>,
}

impl ScriptedBot {
    /// Play back `answers`, one entry per turn.
    #[must_use]
    pub fn new(answers: Vec<Option<Vec<String>>>) -> Self {
        Self {
            answers: answers.into(),
        }
    }

    /// One single-line answer per turn.
    #[must_use]
    pub fn from_lines(lines: &[&str]) -> Self {
        Self::new(
            lines
                .iter()
                .map(|line| Some(vec![(*line).to_string()]))
                .collect(),
        )
    }

    /// Answers not yet given.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl AgentLink for ScriptedBot {
    fn send(&mut self, _lines: &[String]) -> Result<(), LinkError> {
        Ok(())
    }

    fn receive(&mut self, _expected: usize, _timeout: Duration) -> Result<Vec<String>, LinkError> {
        match self.answers.pop_front() {
            Some(Some(lines)) => Ok(lines),
            Some(None) => Err(LinkError::Timeout),
            None => Err(LinkError::Closed),
        }
    }
}

/// A sample as listed in a view.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SeenSample {
    id: i64,
    carrier: i64,
    health: i64,
    cost: Molecules,
}

impl SeenSample {
    fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 10 {
            return None;
        }
        let mut cost = Molecules::ZERO;
        for (slot, field) in cost.0.iter_mut().zip(&fields[5..]) {
            *slot = field.parse().unwrap_or(0);
        }
        Some(Self {
            id: fields[0].parse().ok()?,
            carrier: fields[1].parse().ok()?,
            health: fields[4].parse().ok()?,
            cost,
        })
    }

    fn diagnosed(&self) -> bool {
        self.health >= 0
    }
}

/// What a bot reads out of one view.
#[derive(Debug, Clone, Default)]
struct Seen {
    target: String,
    eta: u32,
    storage: Molecules,
    expertise: Molecules,
    bank: Molecules,
    samples: Vec<SeenSample>,
}

fn parse_vector(fields: &[&str]) -> Option<Molecules> {
    let mut out = Molecules::ZERO;
    if fields.len() != MOLECULE_TYPES {
        return None;
    }
    for (slot, field) in out.0.iter_mut().zip(fields) {
        *slot = field.parse().ok()?;
    }
    Some(out)
}

impl Seen {
    /// Parse a view: robot lines (self first), bank, count, samples.
    fn parse(lines: &[String]) -> Option<Self> {
        let mut rest = lines.iter();
        let me: Vec<&str> = rest.next()?.split_whitespace().collect();
        if me.len() != 3 + 2 * MOLECULE_TYPES {
            return None;
        }
        let mut seen = Self {
            target: me[0].to_string(),
            eta: me[1].parse().ok()?,
            storage: parse_vector(&me[3..8])?,
            expertise: parse_vector(&me[8..13])?,
            ..Self::default()
        };

        let bank = rest
            .by_ref()
            .find(|line| line.split_whitespace().count() == MOLECULE_TYPES)?;
        seen.bank = parse_vector(&bank.split_whitespace().collect::<Vec<_>>())?;
        let count: usize = rest.next()?.trim().parse().ok()?;
        seen.samples = rest.take(count).filter_map(|l| SeenSample::parse(l)).collect();
        Some(seen)
    }

    fn tray(&self) -> impl Iterator<Item = &SeenSample> {
        self.samples.iter().filter(|s| s.carrier == 0)
    }

    fn payment(&self, sample: &SeenSample) -> Molecules {
        sample.cost.saturating_sub(&self.expertise)
    }

    fn can_produce(&self, sample: &SeenSample) -> bool {
        sample.diagnosed() && self.storage.dominates(&self.payment(sample))
    }

    /// Molecules still to collect for `sample`, if the bank and the storage
    /// limit allow it.
    fn shortfall(&self, sample: &SeenSample) -> Option<Molecules> {
        let missing = self.payment(sample).saturating_sub(&self.storage);
        let reachable = self.bank.dominates(&missing)
            && self.storage.total() + missing.total() <= MAX_STORAGE;
        reachable.then_some(missing)
    }
}

/// Cycles samples, diagnosis, molecules and laboratory, one sample batch at
/// a time. Never sends a command the referee would reject, as long as no
/// other agent changes the world between its view and its turn.
#[derive(Debug, Clone, Default)]
pub struct GreedyBot {
    turn: usize,
    use_storage: Option<bool>,
    view: Vec<String>,
}

impl GreedyBot {
    /// A fresh bot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn goto_or(seen: &Seen, place: &str, connect: String) -> String {
        if seen.target == place {
            connect
        } else {
            format!("GOTO {place}")
        }
    }

    fn decide(&mut self, seen: &Seen) -> String {
        if seen.eta > 0 {
            return "WAIT".to_string();
        }
        let use_storage = *self
            .use_storage
            .get_or_insert_with(|| seen.samples.iter().any(|s| s.carrier == -1));
        let tray: Vec<&SeenSample> = seen.tray().collect();

        if seen.target == "SAMPLES" && tray.len() < 2 {
            return Self::fetch(seen, use_storage, tray.len());
        }
        if let Some(hidden) = tray.iter().find(|s| !s.diagnosed()) {
            return Self::goto_or(seen, "DIAGNOSIS", format!("CONNECT {} diagnose", hidden.id));
        }
        if let Some(ready) = tray.iter().find(|s| seen.can_produce(s)) {
            return Self::goto_or(seen, "LABORATORY", format!("CONNECT {}", ready.id));
        }
        if tray.is_empty() {
            return Self::fetch(seen, use_storage, 0);
        }

        if let Some(missing) = tray.iter().find_map(|s| seen.shortfall(s)) {
            if seen.target != "MOLECULES" {
                return "GOTO MOLECULES".to_string();
            }
            let pick = Molecule::ALL
                .into_iter()
                .find(|m| missing[*m] > 0 && seen.bank[*m] > 0);
            return match pick {
                Some(molecule) => format!("CONNECT {molecule}"),
                None => "WAIT".to_string(),
            };
        }

        match tray.first() {
            Some(stuck) => Self::goto_or(seen, "DIAGNOSIS", format!("CONNECT {} store", stuck.id)),
            None => "WAIT".to_string(),
        }
    }

    fn fetch(seen: &Seen, use_storage: bool, carried: usize) -> String {
        if carried >= MAX_TRAY {
            return "WAIT".to_string();
        }
        if use_storage {
            let pick = seen
                .samples
                .iter()
                .filter(|s| s.carrier == -1 && s.diagnosed())
                .find(|s| seen.shortfall(s).is_some());
            return match pick {
                Some(sample) => {
                    Self::goto_or(seen, "DIAGNOSIS", format!("CONNECT {} fetch", sample.id))
                }
                None => "WAIT".to_string(),
            };
        }
        let rank = match seen.expertise.total() {
            0..=5 => 1,
            6..=11 => 2,
            _ => 3,
        };
        Self::goto_or(seen, "SAMPLES", format!("CONNECT {rank}"))
    }
}

impl AgentLink for GreedyBot {
    fn send(&mut self, lines: &[String]) -> Result<(), LinkError> {
        let skip = if self.turn == 0 {
            lines
                .first()
                .and_then(|l| l.trim().parse::<usize>().ok())
                .map_or(0, |projects| projects + 1)
        } else {
            0
        };
        self.view = lines.iter().skip(skip).cloned().collect();
        self.turn += 1;
        Ok(())
    }

    fn receive(&mut self, expected: usize, _timeout: Duration) -> Result<Vec<String>, LinkError> {
        let answer = match Seen::parse(&self.view) {
            Some(seen) => self.decide(&seen),
            None => "WAIT".to_string(),
        };
        let mut lines = vec![answer];
        lines.resize(expected.max(1), "WAIT".to_string());
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| (*l).to_string()).collect()
    }

    fn answer(bot: &mut GreedyBot, lines: &[&str]) -> String {
        bot.send(&view(lines)).unwrap();
        bot.receive(1, Duration::ZERO).unwrap().remove(0)
    }

    #[test]
    fn test_idle_bot() {
        let mut bot = IdleBot;
        assert_eq!(bot.receive(2, Duration::ZERO).unwrap(), vec!["WAIT", "WAIT"]);
    }

    #[test]
    fn test_scripted_bot() {
        let mut bot = ScriptedBot::new(vec![Some(vec!["WAIT".to_string()]), None]);
        assert_eq!(bot.receive(1, Duration::ZERO).unwrap(), vec!["WAIT"]);
        assert!(matches!(bot.receive(1, Duration::ZERO), Err(LinkError::Timeout)));
        assert!(matches!(bot.receive(1, Duration::ZERO), Err(LinkError::Closed)));
        assert_eq!(bot.remaining(), 0);
    }

    #[test]
    fn test_by_name() {
        assert!(by_name("greedy").is_some());
        assert!(by_name("idle").is_some());
        assert!(by_name("clever").is_none());
    }

    #[test]
    fn test_greedy_first_turn_skips_setup() {
        let mut bot = GreedyBot::new();
        let first = answer(
            &mut bot,
            &[
                "1",
                "0 0 0 3 0",
                "START_POS 0 0 0 0 0 0 0 0 0 0 0 0",
                "START_POS 0 0 0 0 0 0 0 0 0 0 0 0",
                "5 5 5 5 5",
                "0",
            ],
        );
        assert_eq!(first, "GOTO SAMPLES");
    }

    #[test]
    fn test_greedy_cycle() {
        let mut bot = GreedyBot::new();
        bot.turn = 1;
        let at_samples = "SAMPLES 0 0 0 0 0 0 0 0 0 0 0 0";
        assert_eq!(answer(&mut bot, &[at_samples, "5 5 5 5 5", "0"]), "CONNECT 1");

        let hidden = "4 0 1 0 -1 -1 -1 -1 -1 -1";
        assert_eq!(
            answer(&mut bot, &[at_samples, "5 5 5 5 5", "1", hidden]),
            "CONNECT 1"
        );
        assert_eq!(
            answer(&mut bot, &[at_samples, "5 5 5 5 5", "2", hidden, hidden]),
            "GOTO DIAGNOSIS"
        );

        let at_diagnosis = "DIAGNOSIS 0 0 0 0 0 0 0 0 0 0 0 0";
        assert_eq!(
            answer(&mut bot, &[at_diagnosis, "5 5 5 5 5", "1", hidden]),
            "CONNECT 4 diagnose"
        );

        let known = "4 0 1 B 10 2 0 0 0 0";
        assert_eq!(
            answer(&mut bot, &[at_diagnosis, "5 5 5 5 5", "1", known]),
            "GOTO MOLECULES"
        );
        let at_molecules = "MOLECULES 0 0 1 0 0 0 0 0 0 0 0 0";
        assert_eq!(
            answer(&mut bot, &[at_molecules, "4 5 5 5 5", "1", known]),
            "CONNECT A"
        );
        let stocked = "MOLECULES 0 0 2 0 0 0 0 0 0 0 0 0";
        assert_eq!(
            answer(&mut bot, &[stocked, "3 5 5 5 5", "1", known]),
            "GOTO LABORATORY"
        );
        let at_lab = "LABORATORY 0 0 2 0 0 0 0 0 0 0 0 0";
        assert_eq!(answer(&mut bot, &[at_lab, "3 5 5 5 5", "1", known]), "CONNECT 4");
    }

    #[test]
    fn test_greedy_stores_unreachable_sample() {
        let mut bot = GreedyBot::new();
        bot.turn = 1;
        bot.use_storage = Some(false);
        let at_molecules = "MOLECULES 0 0 0 0 0 0 0 0 0 0 0 0";
        let costly = "7 0 3 C 40 0 0 7 0 0";
        assert_eq!(
            answer(&mut bot, &[at_molecules, "5 5 5 5 5", "1", costly]),
            "GOTO DIAGNOSIS"
        );
    }

    #[test]
    fn test_greedy_waits_while_travelling() {
        let mut bot = GreedyBot::new();
        bot.turn = 1;
        let moving = "MOLECULES 2 0 0 0 0 0 0 0 0 0 0 0";
        assert_eq!(answer(&mut bot, &[moving, "5 5 5 5 5", "0"]), "WAIT");
    }
}

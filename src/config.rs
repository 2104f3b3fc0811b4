//! Match configuration and its `key=value` property form.
//!
//! The property set is what gets persisted next to a match so that it can be
//! replayed from the same seed:
//!
//! ```text
//! seed=8812773
//! league=3
//! maxRounds=200
//! ```

use std::fmt::Write as _;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SetupError;
use crate::game::{MAX_LEAGUE, Payment, Rules};
use crate::referee::TurnMode;

/// Round limit for this game.
pub const DEFAULT_MAX_ROUNDS: u32 = 200;

/// Time allowed for the first answer, in milliseconds.
pub const DEFAULT_FIRST_TURN_TIMEOUT_MS: u64 = 1000;

/// Time allowed for every later answer, in milliseconds.
pub const DEFAULT_TURN_TIMEOUT_MS: u64 = 50;

/// Everything needed to set up and replay one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed for the setup shuffles.
    pub seed: u64,
    /// Difficulty tier, 0 to 3.
    pub league: u8,
    /// Round limit.
    pub max_rounds: u32,
    /// Timeout for round 0, in milliseconds.
    pub first_turn_timeout_ms: u64,
    /// Timeout for later rounds, in milliseconds.
    pub turn_timeout_ms: u64,
    /// When staged intents are committed.
    pub turn_mode: TurnMode,
    /// Fate of molecules paid at the laboratory.
    pub payment: Payment,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            league: MAX_LEAGUE,
            max_rounds: DEFAULT_MAX_ROUNDS,
            first_turn_timeout_ms: DEFAULT_FIRST_TURN_TIMEOUT_MS,
            turn_timeout_ms: DEFAULT_TURN_TIMEOUT_MS,
            turn_mode: TurnMode::Simultaneous,
            payment: Payment::Consumed,
        }
    }
}

/// A seed taken from the clock, for matches started without one.
#[must_use]
pub fn fresh_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() ^ u64::from(d.subsec_nanos()).rotate_left(32))
}

fn invalid(key: &str, value: &str) -> SetupError {
    SetupError::InvalidProperty {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SetupError> {
    value.parse().map_err(|_| invalid(key, value))
}

impl MatchConfig {
    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the league.
    #[must_use]
    pub fn with_league(mut self, league: u8) -> Self {
        self.league = league;
        self
    }

    /// Set the round limit.
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Set both turn timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, first_turn_ms: u64, turn_ms: u64) -> Self {
        self.first_turn_timeout_ms = first_turn_ms;
        self.turn_timeout_ms = turn_ms;
        self
    }

    /// Set the commit schedule.
    #[must_use]
    pub fn with_turn_mode(mut self, turn_mode: TurnMode) -> Self {
        self.turn_mode = turn_mode;
        self
    }

    /// Set the production payment policy.
    #[must_use]
    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payment = payment;
        self
    }

    /// Check ranges.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown league or a zero round limit.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.league > MAX_LEAGUE {
            return Err(SetupError::UnknownLeague(self.league));
        }
        if self.max_rounds == 0 {
            return Err(invalid("maxRounds", "0"));
        }
        Ok(())
    }

    /// The rule table this configuration plays under.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown league.
    pub fn rules(&self) -> Result<Rules, SetupError> {
        Rules::for_league(self.league)
            .map(|rules| rules.with_payment(self.payment))
            .ok_or(SetupError::UnknownLeague(self.league))
    }

    /// Timeout for an answer in `round`.
    #[must_use]
    pub fn turn_timeout(&self, round: u32) -> Duration {
        if round == 0 {
            Duration::from_millis(self.first_turn_timeout_ms)
        } else {
            Duration::from_millis(self.turn_timeout_ms)
        }
    }

    /// The persisted property pairs, in a stable order.
    #[must_use]
    pub fn properties(&self) -> Vec<(String, String)> {
        let turn_mode = match self.turn_mode {
            TurnMode::Simultaneous => "simultaneous",
            TurnMode::Alternating => "alternating",
        };
        let payment = match self.payment {
            Payment::Consumed => "consumed",
            Payment::ReturnedToBank => "returned",
        };
        vec![
            ("seed".to_string(), self.seed.to_string()),
            ("league".to_string(), self.league.to_string()),
            ("maxRounds".to_string(), self.max_rounds.to_string()),
            (
                "firstTurnTimeout".to_string(),
                self.first_turn_timeout_ms.to_string(),
            ),
            ("turnTimeout".to_string(), self.turn_timeout_ms.to_string()),
            ("turnMode".to_string(), turn_mode.to_string()),
            ("payment".to_string(), payment.to_string()),
        ]
    }

    /// Render as `key=value` lines.
    #[must_use]
    pub fn to_properties(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.properties() {
            let _ = writeln!(out, "{key}={value}");
        }
        out
    }

    /// Parse `key=value` lines. Blank lines and `#` comments are skipped,
    /// unknown keys are ignored with a warning, and a missing seed is drawn
    /// from the clock.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed line, a bad value, or an invalid
    /// resulting configuration.
    pub fn from_properties(text: &str) -> Result<Self, SetupError> {
        let mut config = Self::default();
        let mut seeded = false;
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| SetupError::MalformedLine(line.to_string()))?;
            let (key, value) = (key.trim(), value.trim());
            match key {
                "seed" => {
                    config.seed = parse_value(key, value)?;
                    seeded = true;
                }
                "league" => config.league = parse_value(key, value)?,
                "maxRounds" => config.max_rounds = parse_value(key, value)?,
                "firstTurnTimeout" => config.first_turn_timeout_ms = parse_value(key, value)?,
                "turnTimeout" => config.turn_timeout_ms = parse_value(key, value)?,
                "turnMode" => {
                    config.turn_mode = match value {
                        "simultaneous" => TurnMode::Simultaneous,
                        "alternating" => TurnMode::Alternating,
                        _ => return Err(invalid(key, value)),
                    };
                }
                "payment" => {
                    config.payment = match value {
                        "consumed" => Payment::Consumed,
                        "returned" => Payment::ReturnedToBank,
                        _ => return Err(invalid(key, value)),
                    };
                }
                _ => warn!(key, "ignoring unknown property"),
            }
        }
        if !seeded {
            config.seed = fresh_seed();
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = MatchConfig::default();
        assert_eq!(config.league, 3);
        assert_eq!(config.max_rounds, 200);
        assert_eq!(config.turn_timeout(0), Duration::from_millis(1000));
        assert_eq!(config.turn_timeout(1), Duration::from_millis(50));
    }

    #[test]
    fn test_properties_roundtrip() {
        let config = MatchConfig::default()
            .with_seed(987_654_321)
            .with_league(1)
            .with_max_rounds(40)
            .with_turn_mode(TurnMode::Alternating)
            .with_payment(Payment::ReturnedToBank);
        let text = config.to_properties();
        assert!(text.starts_with("seed=987654321\n"));
        assert_eq!(MatchConfig::from_properties(&text).unwrap(), config);
    }

    #[test]
    fn test_comments_and_unknown_keys() {
        let config = MatchConfig::from_properties("# saved match\n\nseed = 5\ncolour=blue\n").unwrap();
        assert_eq!(config.seed, 5);
        assert_eq!(config.league, 3);
    }

    #[test]
    fn test_bad_values() {
        assert!(matches!(
            MatchConfig::from_properties("seed=abc"),
            Err(SetupError::InvalidProperty { .. })
        ));
        assert!(matches!(
            MatchConfig::from_properties("seed=1\nleague=9"),
            Err(SetupError::UnknownLeague(9))
        ));
        assert!(matches!(
            MatchConfig::from_properties("seed"),
            Err(SetupError::MalformedLine(_))
        ));
        assert!(matches!(
            MatchConfig::from_properties("seed=1\nturnMode=sideways"),
            Err(SetupError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn test_rules_follow_config() {
        let rules = MatchConfig::default()
            .with_league(2)
            .with_payment(Payment::ReturnedToBank)
            .rules()
            .unwrap();
        assert_eq!(rules.league, 2);
        assert_eq!(rules.payment, Payment::ReturnedToBank);
    }
}

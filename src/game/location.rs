//! The five robot locations and the travel-time table between them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A place a robot can stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// Where every robot begins. Not a valid `GOTO` target.
    StartPos,
    /// Draws undiagnosed samples from the rank pools.
    Samples,
    /// Diagnoses tray samples and exchanges samples with shared storage.
    Diagnosis,
    /// Hands out molecules from the bank.
    Molecules,
    /// Turns a paid-for sample into health points.
    Laboratory,
}

impl Location {
    /// Wire name, as printed in agent input and frame data.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StartPos => "START_POS",
            Self::Samples => "SAMPLES",
            Self::Diagnosis => "DIAGNOSIS",
            Self::Molecules => "MOLECULES",
            Self::Laboratory => "LABORATORY",
        }
    }

    /// Parse a `GOTO` target. `START_POS` cannot be travelled to.
    #[must_use]
    pub fn from_goto_target(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "SAMPLES" => Some(Self::Samples),
            "DIAGNOSIS" => Some(Self::Diagnosis),
            "MOLECULES" => Some(Self::Molecules),
            "LABORATORY" => Some(Self::Laboratory),
            _ => None,
        }
    }

    /// Lower-case module name used in arrival sentences.
    #[must_use]
    pub const fn module_word(self) -> &'static str {
        match self {
            Self::StartPos => "start",
            Self::Samples => "samples",
            Self::Diagnosis => "diagnosis",
            Self::Molecules => "molecules",
            Self::Laboratory => "laboratory",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pairwise travel times, symmetric, zero on the diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceTable {
    /// Every pair of distinct locations is one turn apart.
    Uniform,
    /// Full distances used by the upper tiers.
    Full,
}

impl DistanceTable {
    /// Turns needed to travel from `from` to `to`.
    #[must_use]
    pub fn between(self, from: Location, to: Location) -> u32 {
        use Location::{Diagnosis, Laboratory, Molecules, Samples, StartPos};

        if from == to {
            return 0;
        }
        if self == Self::Uniform {
            return 1;
        }
        match (from, to) {
            (StartPos, _) | (_, StartPos) => 2,
            (Diagnosis, Laboratory) | (Laboratory, Diagnosis) => 4,
            (Samples | Diagnosis | Molecules | Laboratory, _) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Location; 5] = [
        Location::StartPos,
        Location::Samples,
        Location::Diagnosis,
        Location::Molecules,
        Location::Laboratory,
    ];

    #[test]
    fn test_full_table_values() {
        let t = DistanceTable::Full;
        assert_eq!(t.between(Location::StartPos, Location::Laboratory), 2);
        assert_eq!(t.between(Location::Samples, Location::Diagnosis), 3);
        assert_eq!(t.between(Location::Samples, Location::Laboratory), 3);
        assert_eq!(t.between(Location::Diagnosis, Location::Molecules), 3);
        assert_eq!(t.between(Location::Diagnosis, Location::Laboratory), 4);
        assert_eq!(t.between(Location::Molecules, Location::Laboratory), 3);
    }

    #[test]
    fn test_tables_are_symmetric_with_zero_diagonal() {
        for table in [DistanceTable::Uniform, DistanceTable::Full] {
            for a in ALL {
                assert_eq!(table.between(a, a), 0);
                for b in ALL {
                    assert_eq!(table.between(a, b), table.between(b, a));
                }
            }
        }
    }

    #[test]
    fn test_uniform_table() {
        assert_eq!(
            DistanceTable::Uniform.between(Location::Diagnosis, Location::Laboratory),
            1
        );
    }

    #[test]
    fn test_goto_target_parsing() {
        assert_eq!(Location::from_goto_target("molecules"), Some(Location::Molecules));
        assert_eq!(Location::from_goto_target("LaBoRaToRy"), Some(Location::Laboratory));
        assert_eq!(Location::from_goto_target("START_POS"), None);
        assert_eq!(Location::from_goto_target("KITCHEN"), None);
    }
}

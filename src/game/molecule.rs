//! Molecule types and the five-slot count vectors used for costs, storage,
//! expertise and the bank.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Number of molecule types.
pub const MOLECULE_TYPES: usize = 5;

/// One of the five molecule types, written `A`..`E` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Molecule {
    /// Type A.
    A,
    /// Type B.
    B,
    /// Type C.
    C,
    /// Type D.
    D,
    /// Type E.
    E,
}

impl Molecule {
    /// All molecule types in slot order.
    pub const ALL: [Self; MOLECULE_TYPES] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    /// Slot index of this type in a [`Molecules`] vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse a single-letter molecule code, case-insensitively.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" | "a" => Some(Self::A),
            "B" | "b" => Some(Self::B),
            "C" | "c" => Some(Self::C),
            "D" | "d" => Some(Self::D),
            "E" | "e" => Some(Self::E),
            _ => None,
        }
    }

    /// The upper-case letter for this type.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
        }
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A non-negative count per molecule type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Molecules(pub [u32; MOLECULE_TYPES]);

impl Molecules {
    /// The all-zero vector.
    pub const ZERO: Self = Self([0; MOLECULE_TYPES]);

    /// A vector with the same count in every slot.
    #[must_use]
    pub const fn splat(count: u32) -> Self {
        Self([count; MOLECULE_TYPES])
    }

    /// Sum over all slots.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// True when every slot of `self` is at least the matching slot of `other`.
    #[must_use]
    pub fn dominates(&self, other: &Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a >= b)
    }

    /// Slot-wise `max(0, self - other)`.
    #[must_use]
    pub fn saturating_sub(&self, other: &Self) -> Self {
        let mut out = Self::ZERO;
        for i in 0..MOLECULE_TYPES {
            out.0[i] = self.0[i].saturating_sub(other.0[i]);
        }
        out
    }

    /// Slot-wise sum.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        let mut out = Self::ZERO;
        for i in 0..MOLECULE_TYPES {
            out.0[i] = self.0[i] + other.0[i];
        }
        out
    }

    /// Space-separated slot values, as used by every wire format.
    #[must_use]
    pub fn to_line(&self) -> String {
        self.0
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Index<Molecule> for Molecules {
    type Output = u32;

    fn index(&self, molecule: Molecule) -> &u32 {
        &self.0[molecule.index()]
    }
}

impl IndexMut<Molecule> for Molecules {
    fn index_mut(&mut self, molecule: Molecule) -> &mut u32 {
        &mut self.0[molecule.index()]
    }
}

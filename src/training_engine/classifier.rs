//! Starting-hand notation: two cards in, `"AA"` / `"AKs"` / `"AKo"` out.
//!
//! The 13×13 grid uses the conventional chart layout: pairs on the diagonal,
//! suited hands above it (row rank higher than column rank), offsuit hands
//! below it. Rows and columns run Ace → Two.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::training_engine::{
    error::ParseError,
    models::{Card, Rank},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    Pair,
    Suited,
    Offsuit,
}

/// Canonical starting-hand class. `high >= low` always holds, and
/// `high == low` exactly when `shape == Pair`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HandNotation {
    high: Rank,
    low: Rank,
    shape: Shape,
}

impl HandNotation {
    pub fn pair(rank: Rank) -> Self {
        HandNotation { high: rank, low: rank, shape: Shape::Pair }
    }

    /// Two distinct ranks in either order. Returns `None` for equal ranks.
    pub fn unpaired(a: Rank, b: Rank, suited: bool) -> Option<Self> {
        if a == b {
            return None;
        }
        let (high, low) = if a > b { (a, b) } else { (b, a) };
        let shape = if suited { Shape::Suited } else { Shape::Offsuit };
        Some(HandNotation { high, low, shape })
    }

    pub fn high(&self) -> Rank {
        self.high
    }

    pub fn low(&self) -> Rank {
        self.low
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of concrete two-card holdings this class stands for.
    pub fn combos(&self) -> u32 {
        match self.shape {
            Shape::Pair => 6,
            Shape::Suited => 4,
            Shape::Offsuit => 12,
        }
    }

    /// Grid coordinates `(row, col)` of this class.
    pub fn grid_cell(&self) -> (usize, usize) {
        let (hi, lo) = (self.high.grid_index(), self.low.grid_index());
        match self.shape {
            Shape::Pair | Shape::Suited => (hi, lo),
            Shape::Offsuit => (lo, hi),
        }
    }
}

impl fmt::Display for HandNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            Shape::Pair => write!(f, "{}{}", self.high, self.low),
            Shape::Suited => write!(f, "{}{}s", self.high, self.low),
            Shape::Offsuit => write!(f, "{}{}o", self.high, self.low),
        }
    }
}

impl FromStr for HandNotation {
    type Err = ParseError;

    /// Accepts the canonical form plus low-card-first input (`"KAs"`), which
    /// is normalised. Ten may be written `T` or `10` (`"A10s"`, `"1010"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseError::Notation(s.to_string());
        let text = s.trim();
        if !text.is_ascii() {
            return Err(bad());
        }
        let (ranks, suited) = match text.as_bytes().last().map(u8::to_ascii_lowercase) {
            Some(b's') => (&text[..text.len() - 1], Some(true)),
            Some(b'o') => (&text[..text.len() - 1], Some(false)),
            _ => (text, None),
        };

        let mut rest = ranks;
        let mut next_rank = || -> Result<Rank, ParseError> {
            let width = if rest.starts_with("10") { 2 } else { 1 };
            if rest.len() < width {
                return Err(bad());
            }
            let (token, tail) = rest.split_at(width);
            rest = tail;
            token.parse::<Rank>().map_err(|_| bad())
        };
        let (a, b) = (next_rank()?, next_rank()?);
        if !rest.is_empty() {
            return Err(bad());
        }

        match suited {
            None if a == b => Ok(HandNotation::pair(a)),
            None => Err(bad()),
            Some(suited) => HandNotation::unpaired(a, b, suited).ok_or_else(bad),
        }
    }
}

impl TryFrom<String> for HandNotation {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HandNotation> for String {
    fn from(value: HandNotation) -> Self {
        value.to_string()
    }
}

/// Classify two hole cards. Symmetric in its arguments.
pub fn classify(a: Card, b: Card) -> HandNotation {
    HandNotation::unpaired(a.rank, b.rank, a.suit == b.suit)
        .unwrap_or_else(|| HandNotation::pair(a.rank))
}

/// The notation at grid cell `(row, col)`.
pub fn grid_cell(row: usize, col: usize) -> HandNotation {
    let (r, c) = (Rank::DESCENDING[row], Rank::DESCENDING[col]);
    if row == col {
        HandNotation::pair(r)
    } else {
        // row < col means the row rank is higher: suited half.
        HandNotation::unpaired(r, c, row < col).unwrap_or_else(|| HandNotation::pair(r))
    }
}

pub fn build_grid() -> [[HandNotation; 13]; 13] {
    std::array::from_fn(|row| std::array::from_fn(|col| grid_cell(row, col)))
}

/// All 169 classes in grid order (row-major).
pub fn all_hands() -> Vec<HandNotation> {
    build_grid().iter().flat_map(|row| row.iter().copied()).collect()
}

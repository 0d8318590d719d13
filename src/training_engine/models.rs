use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::training_engine::error::ParseError;

// ---------------------------------------------------------------------------
// Card primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suit::Clubs => write!(f, "c"),
            Suit::Diamonds => write!(f, "d"),
            Suit::Hearts => write!(f, "h"),
            Suit::Spades => write!(f, "s"),
        }
    }
}

impl FromStr for Suit {
    type Err = ParseError;

    /// Accepts long names (`"hearts"`) as the remote store writes them and
    /// single letters (`"h"`) as they appear in card strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" | "club" | "clubs" => Ok(Suit::Clubs),
            "d" | "diamond" | "diamonds" => Ok(Suit::Diamonds),
            "h" | "heart" | "hearts" => Ok(Suit::Hearts),
            "s" | "spade" | "spades" => Ok(Suit::Spades),
            _ => Err(ParseError::Suit(s.to_string())),
        }
    }
}

/// Card rank, Two low through Ace high. Discriminants are the pip values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// All thirteen ranks, highest first (grid order).
    pub const DESCENDING: [Rank; 13] = [
        Rank::Ace, Rank::King, Rank::Queen, Rank::Jack, Rank::Ten,
        Rank::Nine, Rank::Eight, Rank::Seven, Rank::Six, Rank::Five,
        Rank::Four, Rank::Three, Rank::Two,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(v: u8) -> Option<Rank> {
        Rank::DESCENDING.iter().copied().find(|r| r.value() == v)
    }

    /// Position in [`Rank::DESCENDING`]: 0 for Ace, 12 for Two.
    pub fn grid_index(self) -> usize {
        (Rank::Ace.value() - self.value()) as usize
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Two => "2", Rank::Three => "3", Rank::Four => "4",
            Rank::Five => "5", Rank::Six => "6", Rank::Seven => "7",
            Rank::Eight => "8", Rank::Nine => "9", Rank::Ten => "T",
            Rank::Jack => "J", Rank::Queen => "Q", Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Rank {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "2" => Ok(Rank::Two), "3" => Ok(Rank::Three), "4" => Ok(Rank::Four),
            "5" => Ok(Rank::Five), "6" => Ok(Rank::Six), "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight), "9" => Ok(Rank::Nine),
            "T" | "10" => Ok(Rank::Ten),
            "J" => Ok(Rank::Jack), "Q" => Ok(Rank::Queen),
            "K" => Ok(Rank::King), "A" => Ok(Rank::Ace),
            _ => Err(ParseError::Rank(s.to_string())),
        }
    }
}

impl Serialize for Rank {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = ParseError;

    /// Parses `"Ah"`, `"Td"` or `"10d"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() < 2 || !s.is_ascii() {
            return Err(ParseError::Card(s.to_string()));
        }
        let (rank, suit) = s.split_at(s.len() - 1);
        let rank = rank.parse().map_err(|_| ParseError::Card(s.to_string()))?;
        let suit = suit.parse().map_err(|_| ParseError::Card(s.to_string()))?;
        Ok(Card { rank, suit })
    }
}

// ---------------------------------------------------------------------------
// Table metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    UTG,
    HJ,   // Hijack
    CO,   // Cutoff
    BTN,  // Button
    SB,   // Small Blind
    BB,   // Big Blind
}

impl Position {
    /// Short seat label as shown on the table.
    pub fn label(self) -> &'static str {
        match self {
            Position::UTG => "UTG",
            Position::HJ  => "HJ",
            Position::CO  => "CO",
            Position::BTN => "BTN",
            Position::SB  => "SB",
            Position::BB  => "BB",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::UTG => "Under the Gun",
            Position::HJ  => "Hijack",
            Position::CO  => "Cutoff",
            Position::BTN => "Button",
            Position::SB  => "Small Blind",
            Position::BB  => "Big Blind",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Fold,
    Call,
    Raise,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold  => write!(f, "fold"),
            Action::Call  => write!(f, "call"),
            Action::Raise => write!(f, "raise"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy   => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard   => write!(f, "hard"),
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// The four procedural templates used when no remote scenario is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    PreflopTrash,
    PreflopPremium,
    PostflopNuts,
    PostflopAir,
}

/// Which tier produced a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    Remote,
    Generated(Archetype),
    /// Index into the static fallback list.
    Fallback(usize),
    ChartDeal,
}

/// How a submitted action is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grading {
    /// Compare against the scenario's `correct_action`.
    Literal,
    /// Classify the hole cards and look them up in the active range chart
    /// when the action is submitted. `correct_action` is not consulted.
    ActiveChart,
}

/// One decision to present to the player. Built fresh per round and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub hole_cards: [Card; 2],
    pub community_cards: Vec<Card>,
    pub pot_size: f64,
    pub position: Option<String>,
    /// Meaningful only for [`Grading::Literal`]. Chart-graded deals carry
    /// `Fold` here as a placeholder; ask
    /// `ProgressionEngine::correct_action_for` for the live answer.
    pub correct_action: Action,
    pub explanation: String,
    pub difficulty: Difficulty,
    pub origin: Origin,
    pub grading: Grading,
}

impl Scenario {
    pub fn is_preflop(&self) -> bool {
        self.community_cards.is_empty()
    }
}

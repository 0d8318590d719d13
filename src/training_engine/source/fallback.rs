//! Last-resort scenarios: a fixed list shown in rotation.

use crate::training_engine::{
    helpers::{fresh_id, scenario},
    models::*,
};

/// One literal entry of the rotation.
struct Entry {
    id: &'static str,
    hole: [(Rank, Suit); 2],
    board: &'static [(Rank, Suit)],
    pot: f64,
    position: Position,
    action: Action,
    explanation: &'static str,
    difficulty: Difficulty,
}

const ENTRIES: [Entry; 3] = [
    Entry {
        id: "fb_1",
        hole: [(Rank::Ace, Suit::Spades), (Rank::Ace, Suit::Hearts)],
        board: &[],
        pot: 30.0,
        position: Position::CO,
        action: Action::Raise,
        explanation: "Pocket aces are the best starting hand. Always raise them preflop.",
        difficulty: Difficulty::Easy,
    },
    Entry {
        id: "fb_2",
        hole: [(Rank::Seven, Suit::Clubs), (Rank::Two, Suit::Diamonds)],
        board: &[],
        pot: 15.0,
        position: Position::UTG,
        action: Action::Fold,
        explanation: "72 offsuit is the weakest starting hand. Fold it without a second thought.",
        difficulty: Difficulty::Easy,
    },
    Entry {
        id: "fb_3",
        hole: [(Rank::Queen, Suit::Hearts), (Rank::Jack, Suit::Hearts)],
        board: &[(Rank::Ten, Suit::Hearts), (Rank::Four, Suit::Hearts), (Rank::Two, Suit::Clubs)],
        pot: 90.0,
        position: Position::BTN,
        action: Action::Call,
        explanation: "An open-ended straight flush draw has too much equity to fold, but \
                      calling keeps the pot under control. Call.",
        difficulty: Difficulty::Medium,
    },
];

/// Rotation state. Remembers which entry was shown last, so the next call
/// always moves on to the following one.
#[derive(Debug, Clone, Default)]
pub struct FallbackRotation {
    last_shown: Option<usize>,
}

impl FallbackRotation {
    pub fn len() -> usize {
        ENTRIES.len()
    }

    /// Base id of entry `index` (e.g. `"fb_2"`).
    pub fn base_id(index: usize) -> &'static str {
        ENTRIES[index % ENTRIES.len()].id
    }

    pub fn last_shown(&self) -> Option<usize> {
        self.last_shown
    }

    /// Emit the next entry, wrapping after the last one.
    pub fn next_scenario(&mut self) -> Scenario {
        let index = self.last_shown.map_or(0, |i| (i + 1) % ENTRIES.len());
        self.last_shown = Some(index);
        let e = &ENTRIES[index];
        let card = |(rank, suit): (Rank, Suit)| Card::new(rank, suit);
        scenario(
            fresh_id(e.id),
            Origin::Fallback(index),
            [card(e.hole[0]), card(e.hole[1])],
            e.board.iter().copied().map(card).collect(),
            e.pot,
            Some(e.position),
            e.action,
            e.explanation.to_string(),
            e.difficulty,
        )
    }
}

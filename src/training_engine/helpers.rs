//! Shared builder functions for the scenario tiers.
//!
//! Every tier ends up assembling the same pieces: a fresh id, formatted card
//! strings for the explanation, and the final [`Scenario`] struct. These
//! helpers keep that out of the tier code.

use uuid::Uuid;

use crate::training_engine::models::*;

/// Identifier that is never handed out twice: `"{prefix}_{uuid}"`.
pub fn fresh_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

/// Format hole cards as one string (e.g. "AcKs").
pub fn hand_str(hand: [Card; 2]) -> String {
    format!("{}{}", hand[0], hand[1])
}

/// Format board as space-separated string (e.g. "Ac Ks 7h").
pub fn board_str(board: &[Card]) -> String {
    board.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
}

/// True if no card appears twice across hole cards and board.
pub fn all_distinct(hole: [Card; 2], board: &[Card]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(2 + board.len());
    hole.iter().chain(board).all(|c| seen.insert(*c))
}

/// Assemble a literal-graded [`Scenario`] from its parts.
#[allow(clippy::too_many_arguments)]
pub fn scenario(
    id: String, origin: Origin, hole_cards: [Card; 2], community_cards: Vec<Card>,
    pot_size: f64, position: Option<Position>, correct_action: Action,
    explanation: String, difficulty: Difficulty,
) -> Scenario {
    Scenario {
        id,
        hole_cards,
        community_cards,
        pot_size,
        position: position.map(|p| p.label().to_string()),
        correct_action,
        explanation,
        difficulty,
        origin,
        grading: Grading::Literal,
    }
}

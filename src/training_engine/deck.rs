use rand::Rng;
use crate::training_engine::models::{Card, Rank, Suit};

/// A standard 52-card deck that can be shuffled and dealt from.
pub struct Deck {
    cards: Vec<Card>,
    cursor: usize,
}

impl Deck {
    /// All 52 cards in a fixed order (suit-major, Ace first).
    pub fn ordered() -> Vec<Card> {
        Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::DESCENDING.iter().map(move |&rank| Card { rank, suit }))
            .collect()
    }

    /// Build a fresh ordered deck and shuffle it with `rng`.
    pub fn new_shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut cards = Self::ordered();

        // Fisher-Yates shuffle
        for i in (1..cards.len()).rev() {
            let j = rng.gen_range(0..=i);
            cards.swap(i, j);
        }

        Deck { cards, cursor: 0 }
    }

    /// Deal one card, or `None` once all 52 are out.
    pub fn deal(&mut self) -> Option<Card> {
        let card = self.cards.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(card)
    }

    /// Deal the first card matching `keep`, skipping (and burning) the rest.
    pub fn deal_where(&mut self, keep: impl Fn(&Card) -> bool) -> Option<Card> {
        while let Some(card) = self.deal() {
            if keep(&card) {
                return Some(card);
            }
        }
        None
    }

    /// Remaining cards available.
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.cursor
    }
}

//! Procedural scenarios. Each archetype owns its card-construction rule and
//! explanation template; [`draw`] picks one with equal weight.

use rand::Rng;

use crate::training_engine::{
    classifier::classify,
    deck::Deck,
    error::SourceError,
    helpers::{board_str, fresh_id, hand_str, scenario},
    models::*,
};

/// Straight-flush rerolls before the nuts template gives up.
const MAX_NUTS_ATTEMPTS: usize = 16;

/// Fixed table dressing per archetype.
struct Template {
    pot: f64,
    position: Position,
    difficulty: Difficulty,
    action: Action,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::PreflopTrash,
        Archetype::PreflopPremium,
        Archetype::PostflopNuts,
        Archetype::PostflopAir,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Archetype::PreflopTrash   => "trash",
            Archetype::PreflopPremium => "premium",
            Archetype::PostflopNuts   => "nuts",
            Archetype::PostflopAir    => "air",
        }
    }

    fn template(self) -> Template {
        match self {
            Archetype::PreflopTrash => Template {
                pot: 15.0, position: Position::UTG, difficulty: Difficulty::Easy, action: Action::Fold,
            },
            Archetype::PreflopPremium => Template {
                pot: 60.0, position: Position::BTN, difficulty: Difficulty::Easy, action: Action::Raise,
            },
            Archetype::PostflopNuts => Template {
                pot: 150.0, position: Position::SB, difficulty: Difficulty::Medium, action: Action::Raise,
            },
            Archetype::PostflopAir => Template {
                pot: 80.0, position: Position::BB, difficulty: Difficulty::Medium, action: Action::Fold,
            },
        }
    }

    /// Build one scenario of this archetype with a fresh id.
    pub fn synthesize<R: Rng>(self, rng: &mut R) -> Result<Scenario, SourceError> {
        let (hole, board) = match self {
            Archetype::PreflopTrash   => (trash_hand(&mut Deck::new_shuffled(rng))?, vec![]),
            Archetype::PreflopPremium => (premium_pair(rng)?, vec![]),
            Archetype::PostflopNuts   => nut_flush(rng)?,
            Archetype::PostflopAir    => air(&mut Deck::new_shuffled(rng))?,
        };
        let t = self.template();
        Ok(scenario(
            fresh_id(&format!("gen_{}", self.slug())),
            Origin::Generated(self),
            hole,
            board.clone(),
            t.pot,
            Some(t.position),
            t.action,
            self.explain(hole, &board),
            t.difficulty,
        ))
    }

    fn explain(self, hole: [Card; 2], board: &[Card]) -> String {
        let hand = classify(hole[0], hole[1]);
        match self {
            Archetype::PreflopTrash => format!(
                "{} ({}) is offsuit trash. Playing it from early position loses chips \
                 over the long run. Fold.",
                hand_str(hole), hand
            ),
            Archetype::PreflopPremium => format!(
                "Pocket {} is a premium hand. Raise now to build the pot before the flop.",
                hand
            ),
            Archetype::PostflopNuts => format!(
                "{} on {} makes the nut flush. Only a straight flush beats you, so \
                 raise for value.",
                hand_str(hole), board_str(board)
            ),
            Archetype::PostflopAir => format!(
                "{} missed {} completely. Opponents hold big cards here far more often \
                 than you do. Fold and don't bluff into it.",
                hand_str(hole), board_str(board)
            ),
        }
    }
}

/// Uniform draw over the four archetypes.
pub fn draw<R: Rng>(rng: &mut R) -> Archetype {
    Archetype::ALL[rng.gen_range(0..Archetype::ALL.len())]
}

fn dealt(card: Option<Card>, archetype: Archetype) -> Result<Card, SourceError> {
    card.ok_or(SourceError::Synthesis(archetype.slug()))
}

fn is_low(card: &Card) -> bool {
    card.rank <= Rank::Seven
}

/// Two unpaired low cards of different suits.
fn low_offsuit(deck: &mut Deck, archetype: Archetype) -> Result<[Card; 2], SourceError> {
    let a = dealt(deck.deal_where(is_low), archetype)?;
    let b = dealt(
        deck.deal_where(|c| is_low(c) && c.rank != a.rank && c.suit != a.suit),
        archetype,
    )?;
    Ok([a, b])
}

fn trash_hand(deck: &mut Deck) -> Result<[Card; 2], SourceError> {
    low_offsuit(deck, Archetype::PreflopTrash)
}

fn premium_pair<R: Rng>(rng: &mut R) -> Result<[Card; 2], SourceError> {
    const PREMIUM: [Rank; 3] = [Rank::Ace, Rank::King, Rank::Queen];
    let rank = PREMIUM[rng.gen_range(0..PREMIUM.len())];
    let mut deck = Deck::new_shuffled(rng);
    let a = dealt(deck.deal_where(|c| c.rank == rank), Archetype::PreflopPremium)?;
    let b = dealt(deck.deal_where(|c| c.rank == rank), Archetype::PreflopPremium)?;
    Ok([a, b])
}

/// Ace plus one suited card in hand, three more of the suit on the board.
fn nut_flush<R: Rng>(rng: &mut R) -> Result<([Card; 2], Vec<Card>), SourceError> {
    for _ in 0..MAX_NUTS_ATTEMPTS {
        let suit = Suit::ALL[rng.gen_range(0..Suit::ALL.len())];
        let mut deck = Deck::new_shuffled(rng);
        let mut suited = || deck.deal_where(|c| c.suit == suit && c.rank != Rank::Ace);
        let kicker = dealt(suited(), Archetype::PostflopNuts)?;
        let board = (0..3)
            .map(|_| dealt(suited(), Archetype::PostflopNuts))
            .collect::<Result<Vec<_>, _>>()?;
        let hole = [Card::new(Rank::Ace, suit), kicker];
        if !is_straight_flush(hole, &board) {
            return Ok((hole, board));
        }
    }
    Err(SourceError::Synthesis(Archetype::PostflopNuts.slug()))
}

/// Five same-suited cards including the Ace: only Broadway or the wheel run.
fn is_straight_flush(hole: [Card; 2], board: &[Card]) -> bool {
    let mut values: Vec<u8> = hole.iter().chain(board).map(|c| c.rank.value()).collect();
    values.sort_unstable();
    values == [10, 11, 12, 13, 14] || values == [2, 3, 4, 5, 14]
}

/// Low offsuit hand against a rainbow board of Ten-or-better cards.
fn air(deck: &mut Deck) -> Result<([Card; 2], Vec<Card>), SourceError> {
    let hole = low_offsuit(deck, Archetype::PostflopAir)?;
    let mut board: Vec<Card> = Vec::with_capacity(3);
    for _ in 0..3 {
        let card = deck.deal_where(|c| {
            c.rank >= Rank::Ten
                && board.iter().all(|b| b.rank != c.rank && b.suit != c.suit)
        });
        board.push(dealt(card, Archetype::PostflopAir)?);
    }
    Ok((hole, board))
}

use serde::{Deserialize, Serialize};

use crate::{BlackjackError, Card, RawCard, Rank};

pub const BLACKJACK: u8 = 21;

/// Best total of a sequence of ranks: every ace starts at 11 and drops to 1
/// while the hand would otherwise bust.
fn value_of_ranks(ranks: impl Iterator<Item = Rank>) -> u8 {
    let mut total: u16 = 0;
    let mut aces = 0;

    for rank in ranks {
        if rank.is_ace() {
            aces += 1;
        }
        total += rank.value() as u16;
    }

    while total > BLACKJACK as u16 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    total.min(u8::MAX as u16) as u8
}

/// Calculate the value of a blackjack hand
pub fn calculate_hand_value(cards: &[Card]) -> u8 {
    value_of_ranks(cards.iter().map(|c| c.rank))
}

/// Value the hand would have after drawing one more card of `rank`.
pub fn value_with(cards: &[Card], rank: Rank) -> u8 {
    value_of_ranks(cards.iter().map(|c| c.rank).chain(std::iter::once(rank)))
}

/// Score cards straight from an external payload. A malformed or missing rank
/// fails the whole evaluation instead of being skipped.
pub fn score_raw(cards: &[RawCard]) -> Result<u8, BlackjackError> {
    let ranks = cards
        .iter()
        .map(RawCard::rank)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(value_of_ranks(ranks.into_iter()))
}

/// Check if a hand is soft (has an ace counted as 11)
pub fn is_soft_hand(cards: &[Card]) -> bool {
    let hard: u16 = cards
        .iter()
        .map(|c| if c.rank.is_ace() { 1 } else { c.value() as u16 })
        .sum();
    cards.iter().any(|c| c.rank.is_ace()) && hard + 10 <= BLACKJACK as u16
}

pub fn is_busted(cards: &[Card]) -> bool {
    calculate_hand_value(cards) > BLACKJACK
}

/// Check if a hand is blackjack (21 with 2 cards)
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && calculate_hand_value(cards) == BLACKJACK
}

/// Cards held by one party. Only grows; the score is always recomputed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn value(&self) -> u8 {
        calculate_hand_value(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft_hand(&self.cards)
    }

    pub fn is_busted(&self) -> bool {
        is_busted(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// First card dealt; for the dealer this is the hole card.
    pub fn first(&self) -> Option<&Card> {
        self.cards.first()
    }
}

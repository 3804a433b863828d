use std::collections::VecDeque;

use crate::{BlackjackError, Card, Rank, Suit};

/// Supplies cards to the engine.
///
/// `draw` is all-or-nothing: it returns exactly `count` cards or fails with
/// `SourceUnavailable` / `ShoeExhausted` without consuming anything.
pub trait CardSource {
    /// Start a fresh shoe.
    fn shuffle(&mut self) -> Result<(), BlackjackError>;

    fn draw(&mut self, count: usize) -> Result<Vec<Card>, BlackjackError>;
}

impl<S: CardSource + ?Sized> CardSource for &mut S {
    fn shuffle(&mut self) -> Result<(), BlackjackError> {
        (**self).shuffle()
    }

    fn draw(&mut self, count: usize) -> Result<Vec<Card>, BlackjackError> {
        (**self).draw(count)
    }
}

/// Draw and check the source kept its contract.
pub(crate) fn draw_exact<S: CardSource + ?Sized>(
    source: &mut S,
    count: usize,
) -> Result<Vec<Card>, BlackjackError> {
    let cards = source.draw(count)?;
    if cards.len() != count {
        return Err(BlackjackError::ShoeExhausted {
            requested: count,
            available: cards.len(),
        });
    }
    Ok(cards)
}

/// Cards dealt in a fixed order. Shuffling is a no-op.
#[derive(Debug, Clone, Default)]
pub struct StackedDeck {
    cards: VecDeque<Card>,
}

impl StackedDeck {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Suits are assigned round-robin; scoring never looks at them.
    pub fn from_ranks(ranks: &[Rank]) -> Self {
        Self::new(
            ranks
                .iter()
                .enumerate()
                .map(|(i, &rank)| Card::new(rank, Suit::ALL[i % 4])),
        )
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl CardSource for StackedDeck {
    fn shuffle(&mut self) -> Result<(), BlackjackError> {
        Ok(())
    }

    fn draw(&mut self, count: usize) -> Result<Vec<Card>, BlackjackError> {
        if count > self.cards.len() {
            return Err(BlackjackError::ShoeExhausted {
                requested: count,
                available: self.cards.len(),
            });
        }
        Ok(self.cards.drain(..count).collect())
    }
}

use serde::{Deserialize, Serialize};

use crate::{Card, Rank};

/// Unseen cards per rank, indexed like `Rank::ALL`.
/// Six decks: [24; 13].
type Counts = [u16; 13];

/// Running count of the shoe: how many cards of each rank have not been seen yet.
///
/// Starts at `4 × num_decks` per rank and loses one for every card drawn by
/// either party, so `total_remaining() + drawn() == capacity()` as long as the
/// card source honours the shoe composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoeCounts {
    num_decks: u8,
    remaining: Counts,
    drawn: u32,
}

impl ShoeCounts {
    pub fn new(num_decks: u8) -> Self {
        Self {
            num_decks,
            remaining: [4 * num_decks as u16; 13],
            drawn: 0,
        }
    }

    /// Back to a full, unseen shoe.
    pub fn reset(&mut self) {
        *self = Self::new(self.num_decks);
    }

    pub fn num_decks(&self) -> u8 {
        self.num_decks
    }

    pub fn capacity(&self) -> u32 {
        52 * self.num_decks as u32
    }

    pub fn remaining(&self, rank: Rank) -> u16 {
        self.remaining[rank.index()]
    }

    pub fn total_remaining(&self) -> u32 {
        self.remaining.iter().map(|&c| c as u32).sum()
    }

    /// Cards observed since the last reset.
    pub fn drawn(&self) -> u32 {
        self.drawn
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rank, u16)> + '_ {
        Rank::ALL.iter().map(move |&r| (r, self.remaining(r)))
    }

    pub fn observe(&mut self, card: &Card) {
        let slot = &mut self.remaining[card.rank.index()];
        if *slot == 0 {
            log::warn!(
                "Saw {} but the count for {} was already zero",
                card.to_display(),
                card.rank
            );
        } else {
            *slot -= 1;
        }
        self.drawn += 1;
    }

    pub fn observe_all<'a>(&mut self, cards: impl IntoIterator<Item = &'a Card>) {
        for card in cards {
            self.observe(card);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Suit;

    #[test]
    fn test_shoe_initial() {
        let shoe = ShoeCounts::new(6);
        assert!(shoe.iter().all(|(_, c)| c == 24));
        assert_eq!(shoe.total_remaining(), 312);
        assert_eq!(shoe.capacity(), 312);
        assert_eq!(shoe.drawn(), 0);
    }

    #[test]
    fn test_observe_decrements_one_rank() {
        let mut shoe = ShoeCounts::new(1);
        shoe.observe(&Card::new(Rank::Queen, Suit::Clubs));
        assert_eq!(shoe.remaining(Rank::Queen), 3);
        assert_eq!(shoe.remaining(Rank::King), 4);
        assert_eq!(shoe.drawn(), 1);
    }

    #[test]
    fn test_remaining_plus_drawn_is_capacity() {
        let mut shoe = ShoeCounts::new(2);
        let cards: Vec<Card> = (0..37).map(Card::from_index).collect();
        shoe.observe_all(&cards);
        assert_eq!(shoe.total_remaining() + shoe.drawn(), 104);
    }

    #[test]
    fn test_observe_saturates_at_zero() {
        let mut shoe = ShoeCounts::new(1);
        let ace = Card::new(Rank::Ace, Suit::Spades);
        for _ in 0..5 {
            shoe.observe(&ace);
        }
        assert_eq!(shoe.remaining(Rank::Ace), 0);
        assert_eq!(shoe.drawn(), 5);
    }

    #[test]
    fn test_reset() {
        let mut shoe = ShoeCounts::new(1);
        shoe.observe(&Card::from_index(3));
        shoe.reset();
        assert_eq!(shoe, ShoeCounts::new(1));
    }
}

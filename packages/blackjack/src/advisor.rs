use serde::{Deserialize, Serialize};

use crate::hand::{calculate_hand_value, value_with, BLACKJACK};
use crate::{Card, Rank, ShoeCounts};

/// Bust probability above which the advisor says stand.
pub const STAND_THRESHOLD: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Hit,
    Stand,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    /// Chance that the very next card busts the hand, in [0, 1].
    pub bust_probability: f64,
    pub recommendation: Recommendation,
    /// Coarse placeholder, see [`FlatWinChance`].
    pub rough_win_chance: f64,
}

/// Estimates how likely the player is to win from here.
pub trait WinChanceModel {
    fn win_chance(&self, player_value: u8, bust_probability: f64) -> f64;
}

/// Two-level heuristic: 0.6 while a hit is fairly safe, 0.3 otherwise, 0 once busted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatWinChance;

impl WinChanceModel for FlatWinChance {
    fn win_chance(&self, player_value: u8, bust_probability: f64) -> f64 {
        if player_value > BLACKJACK {
            0.0
        } else if bust_probability < STAND_THRESHOLD {
            0.6
        } else {
            0.3
        }
    }
}

/// Probability that one more card busts the hand, weighted by the unseen
/// rank counts. Looks exactly one card ahead and ignores the dealer.
/// An empty shoe yields 0.
pub fn bust_probability(player_cards: &[Card], shoe: &ShoeCounts) -> f64 {
    let mut busts: u32 = 0;
    let mut total: u32 = 0;

    for rank in Rank::ALL {
        let count = shoe.remaining(rank) as u32;
        if count == 0 {
            continue;
        }
        if value_with(player_cards, rank) > BLACKJACK {
            busts += count;
        }
        total += count;
    }

    if total == 0 {
        0.0
    } else {
        busts as f64 / total as f64
    }
}

pub fn recommend(bust_probability: f64) -> Recommendation {
    if bust_probability > STAND_THRESHOLD {
        Recommendation::Stand
    } else {
        Recommendation::Hit
    }
}

pub fn advise(player_cards: &[Card], shoe: &ShoeCounts) -> Advice {
    advise_with(player_cards, shoe, &FlatWinChance)
}

pub fn advise_with<M: WinChanceModel + ?Sized>(
    player_cards: &[Card],
    shoe: &ShoeCounts,
    model: &M,
) -> Advice {
    let bust = bust_probability(player_cards, shoe);
    Advice {
        bust_probability: bust,
        recommendation: recommend(bust),
        rough_win_chance: model.win_chance(calculate_hand_value(player_cards), bust),
    }
}

mod advisor;
mod card;
mod dealer;
mod error;
mod game_state;
pub mod hand;
mod rules;
mod shoe;
mod source;

pub use advisor::{
    advise, advise_with, bust_probability, recommend, Advice, FlatWinChance, Recommendation,
    WinChanceModel, STAND_THRESHOLD,
};
pub use card::{Card, RawCard, Rank, Suit};
pub use dealer::{dealer_should_hit, play_dealer};
pub use error::BlackjackError;
pub use game_state::{RoundSnapshot, RoundState, RoundStatus};
pub use hand::{calculate_hand_value, is_blackjack, is_busted, is_soft_hand, score_raw, Hand};
pub use rules::{TableRules, DEALER_STAND_VALUE, MAX_DECKS};
pub use shoe::ShoeCounts;
pub use source::{CardSource, StackedDeck};

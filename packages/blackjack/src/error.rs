use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlackjackError {
    #[error("Invalid card: {0}")]
    InvalidCard(String),
    #[error("Card source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("Shoe exhausted: requested {requested} cards, {available} available")]
    ShoeExhausted { requested: usize, available: usize },
    #[error("Invalid rules: {0}")]
    InvalidRules(String),
}

impl BlackjackError {
    /// Fatal errors end the current round; everything else leaves it untouched.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BlackjackError::ShoeExhausted { .. })
    }
}

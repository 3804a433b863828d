use blackjack::BlackjackError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("{0}")]
    Engine(#[from] BlackjackError),

    #[error("Another action is still resolving")]
    Busy,

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid table config: {0}")]
    Config(String),
}

impl TableError {
    /// The round was halted and needs a fresh deal.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TableError::Engine(e) if e.is_fatal())
    }
}

use serde::{Deserialize, Serialize};

use crate::BlackjackError;

/// Dealer draws while below this total and stands on anything at or above it.
pub const DEALER_STAND_VALUE: u8 = 17;

pub const MAX_DECKS: u8 = 8;

/// Table configuration for a sequence of rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRules {
    /// Number of 52-card decks in the shoe
    pub num_decks: u8,

    /// Compute bust odds and a hit/stand recommendation for the player
    pub advisor_enabled: bool,
}

impl Default for TableRules {
    fn default() -> Self {
        // Six-deck shoe with the advisor overlay switched on
        Self {
            num_decks: 6,
            advisor_enabled: true,
        }
    }
}

impl TableRules {
    pub fn new(num_decks: u8, advisor_enabled: bool) -> Result<Self, BlackjackError> {
        let rules = Self {
            num_decks,
            advisor_enabled,
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Single deck, no advisor
    pub fn single_deck() -> Self {
        Self {
            num_decks: 1,
            advisor_enabled: false,
        }
    }

    pub fn validate(&self) -> Result<(), BlackjackError> {
        if self.num_decks == 0 || self.num_decks > MAX_DECKS {
            return Err(BlackjackError::InvalidRules(format!(
                "Number of decks must be between 1 and {MAX_DECKS}, got {}",
                self.num_decks
            )));
        }
        Ok(())
    }

    pub fn shoe_size(&self) -> usize {
        52 * self.num_decks as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = TableRules::default();
        assert_eq!(rules.num_decks, 6);
        assert!(rules.advisor_enabled);
        assert_eq!(rules.shoe_size(), 312);
    }

    #[test]
    fn test_single_deck_rules() {
        let rules = TableRules::single_deck();
        assert_eq!(rules.num_decks, 1);
        assert!(!rules.advisor_enabled);
        assert_eq!(rules.shoe_size(), 52);
    }

    #[test]
    fn test_new_rejects_bad_deck_counts() {
        assert!(TableRules::new(0, true).is_err());
        assert!(TableRules::new(9, false).is_err());
        assert_eq!(TableRules::new(8, false).unwrap().num_decks, 8);
    }

    #[test]
    fn test_rules_serde() {
        let rules = TableRules::new(2, true).unwrap();
        let json = serde_json::to_string(&rules).unwrap();
        assert_eq!(json, r#"{"num_decks":2,"advisor_enabled":true}"#);
    }
}

use std::time::Duration;

use blackjack::TableRules;
use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Upper bound on dealer pacing; anything longer is a typo, not a setting.
pub const MAX_DEALER_PACING_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TableConfig {
    pub rules: TableRules,
    /// Pause after each dealer card while a stand resolves. Display only.
    #[serde(default)]
    pub dealer_pacing_ms: u64,
    /// Seed for the shuffled shoe; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TableConfig {
    pub fn new(rules: TableRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn with_pacing(mut self, dealer_pacing_ms: u64) -> Self {
        self.dealer_pacing_ms = dealer_pacing_ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), TableError> {
        self.rules
            .validate()
            .map_err(|e| TableError::Config(e.to_string()))?;
        if self.dealer_pacing_ms > MAX_DEALER_PACING_MS {
            return Err(TableError::Config(format!(
                "Dealer pacing must be at most {MAX_DEALER_PACING_MS}ms, got {}",
                self.dealer_pacing_ms
            )));
        }
        Ok(())
    }

    pub fn dealer_pacing(&self) -> Duration {
        Duration::from_millis(self.dealer_pacing_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TableConfig::default();
        assert_eq!(config.rules, TableRules::default());
        assert_eq!(config.dealer_pacing_ms, 0);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = TableConfig::new(TableRules::single_deck())
            .with_pacing(250)
            .with_seed(7);
        assert_eq!(config.rules.num_decks, 1);
        assert_eq!(config.dealer_pacing(), Duration::from_millis(250));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validate_rejects_bad_decks() {
        let config = TableConfig::new(TableRules {
            num_decks: 9,
            advisor_enabled: true,
        });
        assert!(matches!(config.validate(), Err(TableError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_long_pacing() {
        let config = TableConfig::default().with_pacing(MAX_DEALER_PACING_MS + 1);
        assert!(matches!(config.validate(), Err(TableError::Config(_))));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: TableConfig =
            serde_json::from_str(r#"{"rules":{"num_decks":2,"advisor_enabled":false}}"#).unwrap();
        assert_eq!(config.rules.num_decks, 2);
        assert_eq!(config.dealer_pacing_ms, 0);
        assert_eq!(config.seed, None);
    }
}

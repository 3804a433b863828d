use std::str::FromStr;

use blackjack::RoundSnapshot;
use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Everything a player can ask the table to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableCommand {
    NewRound,
    Hit,
    Stand,
    /// Read-only; never takes the action lock.
    Snapshot,
}

impl TableCommand {
    /// Whether the command changes the round.
    pub fn is_action(&self) -> bool {
        !matches!(self, TableCommand::Snapshot)
    }
}

impl FromStr for TableCommand {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "new" | "deal" => Ok(TableCommand::NewRound),
            "h" | "hit" => Ok(TableCommand::Hit),
            "s" | "stand" => Ok(TableCommand::Stand),
            "a" | "advice" | "show" => Ok(TableCommand::Snapshot),
            other => Err(TableError::InvalidCommand(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub round: RoundSnapshot,
    /// A stand is still drawing dealer cards.
    pub resolving: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("n".parse::<TableCommand>().unwrap(), TableCommand::NewRound);
        assert_eq!("Deal".parse::<TableCommand>().unwrap(), TableCommand::NewRound);
        assert_eq!(" h ".parse::<TableCommand>().unwrap(), TableCommand::Hit);
        assert_eq!("STAND".parse::<TableCommand>().unwrap(), TableCommand::Stand);
        assert_eq!("advice".parse::<TableCommand>().unwrap(), TableCommand::Snapshot);
        assert_eq!("show".parse::<TableCommand>().unwrap(), TableCommand::Snapshot);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            "double".parse::<TableCommand>(),
            Err(TableError::InvalidCommand("double".to_string()))
        );
        assert!("".parse::<TableCommand>().is_err());
    }

    #[test]
    fn test_command_json() {
        let json = serde_json::to_string(&TableCommand::NewRound).unwrap();
        assert_eq!(json, r#""new_round""#);
        let cmd: TableCommand = serde_json::from_str(r#""stand""#).unwrap();
        assert_eq!(cmd, TableCommand::Stand);
        assert!(!TableCommand::Snapshot.is_action());
        assert!(TableCommand::Hit.is_action());
    }
}

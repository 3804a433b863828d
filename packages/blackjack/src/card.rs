use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::BlackjackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Blackjack value with the ace counted high.
    pub fn value(self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }

    pub fn is_ace(self) -> bool {
        self == Rank::Ace
    }

    /// Position in `Rank::ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    /// Rank name as the remote card service spells it.
    pub fn name(self) -> &'static str {
        match self {
            Rank::Ace => "ACE",
            Rank::Jack => "JACK",
            Rank::Queen => "QUEEN",
            Rank::King => "KING",
            other => other.symbol(),
        }
    }
}

impl FromStr for Rank {
    type Err = BlackjackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rank = match s.trim().to_ascii_uppercase().as_str() {
            "A" | "ACE" | "1" => Rank::Ace,
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" | "0" => Rank::Ten,
            "J" | "JACK" => Rank::Jack,
            "Q" | "QUEEN" => Rank::Queen,
            "K" | "KING" => Rank::King,
            _ => return Err(BlackjackError::InvalidCard(format!("unknown rank '{s}'"))),
        };
        Ok(rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "♠",
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
        }
    }
}

impl FromStr for Suit {
    type Err = BlackjackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" | "SPADES" => Ok(Suit::Spades),
            "H" | "HEARTS" => Ok(Suit::Hearts),
            "D" | "DIAMONDS" => Ok(Suit::Diamonds),
            "C" | "CLUBS" => Ok(Suit::Clubs),
            _ => Err(BlackjackError::InvalidCard(format!("unknown suit '{s}'"))),
        }
    }
}

/// A single card. The suit only identifies the card; scoring looks at the rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    pub fn to_display(&self) -> String {
        format!("{}{}", self.rank.symbol(), self.suit.symbol())
    }

    /// Maps 0..52 onto a single deck, suit-major (Ace..King of spades first).
    /// Larger indexes wrap, so `i` and `i + 52` name the same card of different decks.
    pub fn from_index(index: usize) -> Self {
        let index = index % 52;
        Self {
            rank: Rank::ALL[index % 13],
            suit: Suit::ALL[index / 13],
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

impl FromStr for Card {
    type Err = BlackjackError;

    /// Parses card codes such as `AS`, `0H`, `10H` or `KD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if !code.is_ascii() || code.len() < 2 || code.len() > 3 {
            return Err(BlackjackError::InvalidCard(format!("bad card code '{s}'")));
        }
        let (rank, suit) = code.split_at(code.len() - 1);
        Ok(Card::new(rank.parse()?, suit.parse()?))
    }
}

/// Card payload as delivered by an external card service.
/// Every field is optional so a malformed entry can be reported rather than dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCard {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub suit: Option<String>,
}

impl RawCard {
    pub fn rank(&self) -> Result<Rank, BlackjackError> {
        match (&self.value, &self.code) {
            (Some(value), _) => value.parse(),
            (None, Some(code)) => code.parse::<Card>().map(|c| c.rank),
            (None, None) => Err(BlackjackError::InvalidCard("missing rank".to_string())),
        }
    }
}

impl TryFrom<&RawCard> for Card {
    type Error = BlackjackError;

    fn try_from(raw: &RawCard) -> Result<Self, Self::Error> {
        let rank = raw.rank()?;
        let suit = match (&raw.suit, &raw.code) {
            (Some(suit), _) => suit.parse()?,
            (None, Some(code)) => code.parse::<Card>()?.suit,
            (None, None) => return Err(BlackjackError::InvalidCard("missing suit".to_string())),
        };
        Ok(Card::new(rank, suit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_values() {
        assert_eq!(Rank::Ace.value(), 11);
        assert_eq!(Rank::Seven.value(), 7);
        assert_eq!(Rank::Ten.value(), 10);
        assert_eq!(Rank::King.value(), 10);
    }

    #[test]
    fn test_rank_index_round_trip() {
        for (i, rank) in Rank::ALL.iter().enumerate() {
            assert_eq!(rank.index(), i);
            assert_eq!(Rank::from_index(i), Some(*rank));
        }
        assert_eq!(Rank::from_index(13), None);
    }

    #[test]
    fn test_rank_from_service_names() {
        assert_eq!("ACE".parse::<Rank>().unwrap(), Rank::Ace);
        assert_eq!("10".parse::<Rank>().unwrap(), Rank::Ten);
        assert_eq!("queen".parse::<Rank>().unwrap(), Rank::Queen);
        assert_eq!("0".parse::<Rank>().unwrap(), Rank::Ten);
    }

    #[test]
    fn test_rank_rejects_garbage() {
        assert!(matches!("11".parse::<Rank>(), Err(BlackjackError::InvalidCard(_))));
        assert!("".parse::<Rank>().is_err());
        assert!("JOKER".parse::<Rank>().is_err());
    }

    #[test]
    fn test_card_from_code() {
        assert_eq!("AS".parse::<Card>().unwrap(), Card::new(Rank::Ace, Suit::Spades));
        assert_eq!("0H".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Hearts));
        assert_eq!("10H".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Hearts));
        assert_eq!("kd".parse::<Card>().unwrap(), Card::new(Rank::King, Suit::Diamonds));
    }

    #[test]
    fn test_card_from_bad_code() {
        assert!("X".parse::<Card>().is_err());
        assert!("ZS".parse::<Card>().is_err());
        assert!("AX".parse::<Card>().is_err());
        assert!("A♠".parse::<Card>().is_err());
    }

    #[test]
    fn test_card_display() {
        assert_eq!(Card::new(Rank::Ace, Suit::Spades).to_display(), "A♠");
        assert_eq!(Card::new(Rank::Ten, Suit::Hearts).to_string(), "10♥");
    }

    #[test]
    fn test_card_from_index() {
        assert_eq!(Card::from_index(0), Card::new(Rank::Ace, Suit::Spades));
        assert_eq!(Card::from_index(12), Card::new(Rank::King, Suit::Spades));
        assert_eq!(Card::from_index(13), Card::new(Rank::Ace, Suit::Hearts));
        assert_eq!(Card::from_index(51), Card::new(Rank::King, Suit::Clubs));
        assert_eq!(Card::from_index(52), Card::from_index(0));
    }

    #[test]
    fn test_raw_card_from_service_payload() {
        let raw: RawCard = serde_json::from_str(
            r#"{"code":"QH","image":"https://example.invalid/QH.png","value":"QUEEN","suit":"HEARTS"}"#,
        )
        .unwrap();
        assert_eq!(Card::try_from(&raw).unwrap(), Card::new(Rank::Queen, Suit::Hearts));
    }

    #[test]
    fn test_raw_card_falls_back_to_code() {
        let raw = RawCard {
            code: Some("9C".to_string()),
            ..RawCard::default()
        };
        assert_eq!(Card::try_from(&raw).unwrap(), Card::new(Rank::Nine, Suit::Clubs));
    }

    #[test]
    fn test_raw_card_missing_rank() {
        let raw: RawCard = serde_json::from_str(r#"{"suit":"SPADES"}"#).unwrap();
        assert_eq!(
            raw.rank(),
            Err(BlackjackError::InvalidCard("missing rank".to_string()))
        );
    }
}

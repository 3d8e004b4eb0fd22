use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CardError;

/// Represents one of the four suits in a standard 52-card deck.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (c)
    Clubs,
    /// Diamonds suit (d)
    Diamonds,
    /// Hearts suit (h)
    Hearts,
    /// Spades suit (s)
    Spades,
}

impl Suit {
    pub fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_lowercase() {
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            'h' => Some(Suit::Hearts),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }
}

/// Represents the rank (face value) of a playing card from Two through Ace.
/// Ordering follows poker strength, so `Rank::Ten` and above are broadway ranks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 2
    Two = 2,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank T
    Ten,
    /// Jack (11)
    Jack,
    /// Queen (12)
    Queen,
    /// King (13)
    King,
    /// Ace (14)
    Ace,
}

impl Rank {
    pub fn from_char(c: char) -> Option<Rank> {
        match c.to_ascii_uppercase() {
            '2' => Some(Rank::Two),
            '3' => Some(Rank::Three),
            '4' => Some(Rank::Four),
            '5' => Some(Rank::Five),
            '6' => Some(Rank::Six),
            '7' => Some(Rank::Seven),
            '8' => Some(Rank::Eight),
            '9' => Some(Rank::Nine),
            'T' => Some(Rank::Ten),
            'J' => Some(Rank::Jack),
            'Q' => Some(Rank::Queen),
            'K' => Some(Rank::King),
            'A' => Some(Rank::Ace),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn is_broadway(self) -> bool {
        self >= Rank::Ten
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A single board card, written in hand histories as rank then suit (`"Ah"`, `"Td"`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Card {
    /// The rank of the card (Two through Ace)
    pub rank: Rank,
    /// The suit of the card (Clubs, Diamonds, Hearts, or Spades)
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = |reason| CardError::Malformed {
            card: s.to_string(),
            reason,
        };
        let mut chars = trimmed.chars();
        let (Some(r), Some(su), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(malformed("expected exactly two characters"));
        };
        let rank = Rank::from_char(r).ok_or_else(|| malformed("unrecognized rank"))?;
        let suit = Suit::from_char(su).ok_or_else(|| malformed("unrecognized suit"))?;
        Ok(Card { rank, suit })
    }
}

impl Serialize for Card {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a list of card strings, failing on the first malformed one.
pub fn parse_cards<S: AsRef<str>>(cards: &[S]) -> Result<Vec<Card>, CardError> {
    cards.iter().map(|c| c.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rank_then_suit() {
        let card: Card = "Td".parse().unwrap();
        assert_eq!(card, Card::new(Rank::Ten, Suit::Diamonds));
        assert_eq!(card.to_string(), "Td");
    }

    #[test]
    fn rejects_unknown_rank() {
        let err = "1h".parse::<Card>().unwrap_err();
        assert!(matches!(err, CardError::Malformed { reason: "unrecognized rank", .. }));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!("10h".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
    }

    #[test]
    fn broadway_starts_at_ten() {
        assert!(Rank::Ten.is_broadway());
        assert!(Rank::Ace.is_broadway());
        assert!(!Rank::Nine.is_broadway());
    }

    #[test]
    fn cards_round_trip_through_json_strings() {
        let cards: Vec<Card> = serde_json::from_str(r#"["Ah","Kc"]"#).unwrap();
        assert_eq!(serde_json::to_string(&cards).unwrap(), r#"["Ah","Kc"]"#);
    }
}

use crate::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Denomination for double-dummy analysis.
///
/// Discriminants are the strain indices used by the double-dummy oracle's
/// result grid (spades first, no-trump last).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Strain {
    Spades = 0,
    Hearts = 1,
    Diamonds = 2,
    Clubs = 3,
    #[serde(rename = "No-Trump")]
    NoTrump = 4,
}

impl Strain {
    /// All five strains in oracle index order
    pub const ALL: [Strain; 5] = [
        Strain::Spades,
        Strain::Hearts,
        Strain::Diamonds,
        Strain::Clubs,
        Strain::NoTrump,
    ];

    /// Convert from Suit
    pub fn from_suit(suit: Suit) -> Self {
        match suit {
            Suit::Clubs => Strain::Clubs,
            Suit::Diamonds => Strain::Diamonds,
            Suit::Hearts => Strain::Hearts,
            Suit::Spades => Strain::Spades,
        }
    }

    /// Convert to Suit (NoTrump returns None)
    pub fn to_suit(&self) -> Option<Suit> {
        match self {
            Strain::Clubs => Some(Suit::Clubs),
            Strain::Diamonds => Some(Suit::Diamonds),
            Strain::Hearts => Some(Suit::Hearts),
            Strain::Spades => Some(Suit::Spades),
            Strain::NoTrump => None,
        }
    }

    /// Parse a strain letter (S, H, D, C, N), case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Strain::NoTrump),
            other => Suit::from_char(other).map(Strain::from_suit),
        }
    }

    /// Convert to character representation
    pub fn to_char(&self) -> char {
        match self {
            Strain::Clubs => 'C',
            Strain::Diamonds => 'D',
            Strain::Hearts => 'H',
            Strain::Spades => 'S',
            Strain::NoTrump => 'N',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid contract {text:?}: expected a level 1-7 followed by S, H, D, C or N")]
pub struct ContractError {
    pub text: String,
}

/// A final contract: level and strain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub level: u8,
    pub strain: Strain,
}

impl Contract {
    pub fn new(level: u8, strain: Strain) -> Option<Self> {
        (1..=7).contains(&level).then_some(Contract { level, strain })
    }
}

impl FromStr for Contract {
    type Err = ContractError;

    /// Accepts `4S`, `3n`, `6NT`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ContractError {
            text: s.to_string(),
        };
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let level = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(err)? as u8;
        let strain = chars.next().and_then(Strain::from_char).ok_or_else(err)?;
        let rest: String = chars.collect();
        if !(rest.is_empty() || (strain == Strain::NoTrump && rest.eq_ignore_ascii_case("T"))) {
            return Err(err());
        }
        Contract::new(level, strain).ok_or_else(err)
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.level, self.strain.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strain_conversion() {
        assert_eq!(Strain::from_suit(Suit::Spades), Strain::Spades);
        assert_eq!(Strain::from_suit(Suit::Clubs), Strain::Clubs);
        assert_eq!(Strain::NoTrump.to_suit(), None);
        assert_eq!(Strain::from_char('n'), Some(Strain::NoTrump));
        assert_eq!(Strain::from_char('X'), None);
    }

    #[test]
    fn test_strain_oracle_order() {
        assert_eq!(Strain::Spades as usize, 0);
        assert_eq!(Strain::Clubs as usize, 3);
        assert_eq!(Strain::NoTrump as usize, 4);
    }

    #[test]
    fn test_parse_contract() {
        let c: Contract = "4S".parse().unwrap();
        assert_eq!(c, Contract { level: 4, strain: Strain::Spades });
        assert_eq!("3n".parse::<Contract>().unwrap().strain, Strain::NoTrump);
        assert_eq!("6NT".parse::<Contract>().unwrap().to_string(), "6N");
        assert!("8S".parse::<Contract>().is_err());
        assert!("0H".parse::<Contract>().is_err());
        assert!("4".parse::<Contract>().is_err());
        assert!("4SX".parse::<Contract>().is_err());
    }

    #[test]
    fn test_strain_serde_name() {
        let json = serde_json::to_string(&Strain::NoTrump).unwrap();
        assert_eq!(json, "\"No-Trump\"");
    }
}

use crate::{Card, Hand};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the four positions at a bridge table
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Position {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Position {
    /// All positions in standard order
    pub const ALL: [Position; 4] = [
        Position::North,
        Position::East,
        Position::South,
        Position::West,
    ];

    /// Parse a seat letter (N, E, S, W), case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Position::North),
            'E' => Some(Position::East),
            'S' => Some(Position::South),
            'W' => Some(Position::West),
            _ => None,
        }
    }

    /// Get position as a character (N, E, S, W)
    pub fn to_char(&self) -> char {
        match self {
            Position::North => 'N',
            Position::East => 'E',
            Position::South => 'S',
            Position::West => 'W',
        }
    }

    /// Lowercase name, as used by the dealer predicate language
    pub fn name(&self) -> &'static str {
        match self {
            Position::North => "north",
            Position::East => "east",
            Position::South => "south",
            Position::West => "west",
        }
    }

    /// Left-hand opponent (next seat clockwise)
    pub fn next(&self) -> Position {
        self.rotate(1)
    }

    /// Rotate clockwise by n steps
    pub fn rotate(&self, steps: usize) -> Position {
        Position::ALL[(*self as usize + steps) % 4]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A full or partial bridge deal.
///
/// Seats with no known hand are `None`. `first` is the seat written first in
/// hand notation and handed to the solvers as the deal's reference seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub first: Position,
    hands: [Option<Hand>; 4],
}

impl Deal {
    /// Create a deal with no known hands
    pub fn new(first: Position) -> Self {
        Deal {
            first,
            hands: [None, None, None, None],
        }
    }

    /// Create a deal with all four hands known
    pub fn from_hands(first: Position, hands: [Hand; 4]) -> Self {
        Deal {
            first,
            hands: hands.map(Some),
        }
    }

    /// Get the hand at a position, if known
    pub fn hand(&self, position: Position) -> Option<&Hand> {
        self.hands[position as usize].as_ref()
    }

    /// Set (or clear) the hand at a position
    pub fn set_hand(&mut self, position: Position, hand: Option<Hand>) {
        self.hands[position as usize] = hand;
    }

    /// Seats with a known hand, in N, E, S, W order
    pub fn known_hands(&self) -> impl Iterator<Item = (Position, &Hand)> + '_ {
        Position::ALL
            .into_iter()
            .filter_map(|pos| self.hand(pos).map(|hand| (pos, hand)))
    }

    /// True when every seat holds exactly 13 cards
    pub fn is_complete(&self) -> bool {
        self.hands
            .iter()
            .all(|h| h.as_ref().is_some_and(|hand| hand.len() == 13))
    }

    /// Total cards across all known hands
    pub fn card_count(&self) -> usize {
        self.known_hands().map(|(_, hand)| hand.len()).sum()
    }

    /// First card held by two different seats, if any
    pub fn duplicate_card(&self) -> Option<Card> {
        let mut seen = [false; 52];
        for (_, hand) in self.known_hands() {
            for card in hand.cards() {
                let idx = card.to_index() as usize;
                if seen[idx] {
                    return Some(*card);
                }
                seen[idx] = true;
            }
        }
        None
    }
}

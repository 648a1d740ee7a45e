use analyzer_core::{Position, Suit};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Highest HCP a single hand can hold
pub const MAX_HCP: i32 = 40;
/// Highest length a single suit can have
pub const MAX_SUIT_LENGTH: i32 = 13;

/// Inclusive `min..=max` range, written in JSON as `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Range {
    pub min: i32,
    pub max: i32,
}

impl Range {
    pub const fn new(min: i32, max: i32) -> Self {
        Range { min, max }
    }

    pub const fn exactly(value: i32) -> Self {
        Range {
            min: value,
            max: value,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.min == self.max
    }

    fn check(
        &self,
        seat: Position,
        field: &'static str,
        ceiling: i32,
    ) -> Result<(), InvalidRangeError> {
        if self.min < 0 || self.max > ceiling || self.min > self.max {
            return Err(InvalidRangeError {
                seat,
                field,
                min: self.min,
                max: self.max,
                ceiling,
            });
        }
        Ok(())
    }
}

impl From<(i32, i32)> for Range {
    fn from((min, max): (i32, i32)) -> Self {
        Range { min, max }
    }
}

impl From<Range> for (i32, i32) {
    fn from(range: Range) -> Self {
        (range.min, range.max)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Named families of suit-length patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapePreset {
    /// 4-3-3-3, 4-4-3-2 or 5-3-3-2
    #[serde(rename = "balanced")]
    Balanced,
    /// Anything not balanced
    #[serde(rename = "unbalanced")]
    Unbalanced,
    /// Balanced plus 5-4-2-2 and 6-3-2-2
    #[serde(rename = "semiBalanced")]
    SemiBalanced,
    /// Balanced without a five-card major
    #[serde(rename = "balanced-without-major")]
    BalancedWithoutMajor,
}

/// Structural constraints on one unknown seat.
///
/// Missing fields in JSON fall back to the unconstrained range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeatConstraint {
    pub spades: Range,
    pub hearts: Range,
    pub diamonds: Range,
    pub clubs: Range,
    pub hcp: Range,
    pub shape: Option<ShapePreset>,
}

impl Default for SeatConstraint {
    fn default() -> Self {
        let any_length = Range::new(0, MAX_SUIT_LENGTH);
        SeatConstraint {
            spades: any_length,
            hearts: any_length,
            diamonds: any_length,
            clubs: any_length,
            hcp: Range::new(0, MAX_HCP),
            shape: None,
        }
    }
}

impl SeatConstraint {
    /// Length range for a suit
    pub fn suit(&self, suit: Suit) -> Range {
        match suit {
            Suit::Spades => self.spades,
            Suit::Hearts => self.hearts,
            Suit::Diamonds => self.diamonds,
            Suit::Clubs => self.clubs,
        }
    }

    /// Check every range against its bounds
    pub fn validate(&self, seat: Position) -> Result<(), InvalidRangeError> {
        for suit in Suit::PBN_ORDER {
            self.suit(suit).check(seat, suit.name(), MAX_SUIT_LENGTH)?;
        }
        self.hcp.check(seat, "hcp", MAX_HCP)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "invalid {field} range {min}-{max} for {}: must satisfy 0 <= min <= max <= {ceiling}",
    .seat.name()
)]
pub struct InvalidRangeError {
    pub seat: Position,
    pub field: &'static str,
    pub min: i32,
    pub max: i32,
    pub ceiling: i32,
}

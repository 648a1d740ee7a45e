//! Hand and deal notation.
//!
//! A hand is four dot-separated suit groups in S.H.D.C order, e.g.
//! `AKQ.JT9.876.5432`. A void is written `-` (an empty group is also read as
//! a void). A deal is a seat prefix followed by four hands clockwise, e.g.
//! `N:AKQ.JT9.876.5432 - 2.AKQ.JT9.AKQ876 -`, where a lone `-` marks a seat
//! whose hand is unknown.

mod deal;
mod oneline;

pub use deal::{format_deal, format_hand, parse_deal, parse_deal_tag, parse_hand};
pub use oneline::{format_oneline, parse_oneline};

/// Placeholder written for a void suit, and on its own for an unknown hand
pub const VOID: &str = "-";

/// Error type for hand notation parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed hand: {message}")]
pub struct MalformedHandError {
    pub message: String,
}

impl MalformedHandError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        MalformedHandError {
            message: message.into(),
        }
    }
}

/// Parse one line of generator output, in either `N:...` or one-line
/// (`n <hand> e <hand> s <hand> w <hand>`) form.
pub fn parse_deal_line(line: &str) -> Result<analyzer_core::Deal, MalformedHandError> {
    let trimmed = line.trim();
    if trimmed.starts_with("[Deal") {
        parse_deal_tag(trimmed)
    } else if trimmed.chars().nth(1) == Some(':') {
        parse_deal(trimmed)
    } else {
        parse_oneline(trimmed)
    }
}

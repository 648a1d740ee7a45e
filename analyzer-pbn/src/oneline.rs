use crate::{format_hand, parse_hand, MalformedHandError};
use analyzer_core::{Deal, Position};

/// Parse a deal in dealer's `printoneline` format
/// Format: "n AKQT3.J6.KJ42.95 e 652.AK42.AQ87.T4 s J74.QT95.T.AK863 w 98.873.9653.QJ72"
pub fn parse_oneline(input: &str) -> Result<Deal, MalformedHandError> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    if parts.len() != 8 {
        return Err(MalformedHandError::new(format!(
            "expected 8 parts (4 positions + 4 hands), got {}",
            parts.len()
        )));
    }

    let mut deal = Deal::new(Position::North);
    for pair in parts.chunks(2) {
        let position = parse_position_token(pair[0])?;
        if deal.hand(position).is_some() {
            return Err(MalformedHandError::new(format!(
                "position {} listed twice",
                position
            )));
        }
        deal.set_hand(position, Some(parse_hand(pair[1])?));
    }

    if let Some(card) = deal.duplicate_card() {
        return Err(MalformedHandError::new(format!(
            "card {} is dealt to more than one seat",
            card
        )));
    }

    Ok(deal)
}

/// Format a deal in oneline format, North first. Unknown seats are skipped.
pub fn format_oneline(deal: &Deal) -> String {
    deal.known_hands()
        .map(|(pos, hand)| {
            format!(
                "{} {}",
                pos.to_char().to_ascii_lowercase(),
                format_hand(hand)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_position_token(s: &str) -> Result<Position, MalformedHandError> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Position::from_char(c),
        _ => None,
    }
    .ok_or_else(|| MalformedHandError::new(format!("invalid position character: {}", s)))
}

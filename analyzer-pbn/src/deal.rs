use crate::{MalformedHandError, VOID};
use analyzer_core::{Card, Deal, Hand, Position, Rank, Suit};

/// Most cards a seat can hold
const HAND_SIZE: usize = 13;

/// Parse a hand in PBN format: Spades.Hearts.Diamonds.Clubs
/// Example: "KQ4.QJ982.-.AKQ43" (void diamonds; "KQ4.QJ982..AKQ43" is read the same)
pub fn parse_hand(s: &str) -> Result<Hand, MalformedHandError> {
    let suits_str: Vec<&str> = s.trim().split('.').collect();
    if suits_str.len() != 4 {
        return Err(MalformedHandError::new(format!(
            "expected 4 suits separated by dots, got {} in {:?}",
            suits_str.len(),
            s
        )));
    }

    let mut hand = Hand::new();
    for (suit, suit_str) in Suit::PBN_ORDER.into_iter().zip(suits_str) {
        if suit_str.is_empty() || suit_str == VOID {
            continue;
        }

        for c in suit_str.chars() {
            let rank = Rank::from_char(c).ok_or_else(|| {
                MalformedHandError::new(format!("invalid rank character {:?} in {:?}", c, s))
            })?;
            let card = Card::new(suit, rank);
            if !hand.add_card(card) {
                return Err(MalformedHandError::new(format!(
                    "card {} appears twice in {:?}",
                    card, s
                )));
            }
        }
    }

    check_hand_size(&hand, s)?;
    Ok(hand)
}

/// Reject a hand holding more cards than a seat is dealt
fn check_hand_size(hand: &Hand, text: &str) -> Result<(), MalformedHandError> {
    if hand.len() > HAND_SIZE {
        return Err(MalformedHandError::new(format!(
            "hand {:?} holds {} cards",
            text.trim(),
            hand.len()
        )));
    }
    Ok(())
}

/// Format a hand in PBN format, writing voids as `-`
pub fn format_hand(hand: &Hand) -> String {
    Suit::PBN_ORDER
        .iter()
        .map(|&suit| {
            let ranks: String = hand.cards_in_suit(suit).map(|c| c.rank.to_char()).collect();
            if ranks.is_empty() {
                VOID.to_string()
            } else {
                ranks
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Parse a deal: `N:<hand> <hand> <hand> <hand>`, hands clockwise from the
/// prefix seat. A lone `-` leaves that seat unknown.
pub fn parse_deal(input: &str) -> Result<Deal, MalformedHandError> {
    let trimmed = input.trim();
    let (prefix, rest) = trimmed
        .split_once(':')
        .ok_or_else(|| MalformedHandError::new(format!("missing seat prefix in {:?}", input)))?;

    let mut prefix_chars = prefix.trim().chars();
    let first = match (prefix_chars.next(), prefix_chars.next()) {
        (Some(c), None) => Position::from_char(c),
        _ => None,
    }
    .ok_or_else(|| MalformedHandError::new(format!("invalid seat prefix {:?}", prefix)))?;

    let hands_str: Vec<&str> = rest.split_whitespace().collect();
    if hands_str.len() != 4 {
        return Err(MalformedHandError::new(format!(
            "expected 4 hands, got {}",
            hands_str.len()
        )));
    }

    let mut deal = Deal::new(first);
    for (i, hand_str) in hands_str.into_iter().enumerate() {
        if hand_str == VOID {
            continue;
        }
        deal.set_hand(first.rotate(i), Some(parse_hand(hand_str)?));
    }

    if let Some(card) = deal.duplicate_card() {
        return Err(MalformedHandError::new(format!(
            "card {} is dealt to more than one seat",
            card
        )));
    }

    Ok(deal)
}

/// Format a deal as `F:<hand> <hand> <hand> <hand>`, clockwise from `deal.first`
pub fn format_deal(deal: &Deal) -> String {
    let hands: Vec<String> = (0..4)
        .map(|i| {
            deal.hand(deal.first.rotate(i))
                .map(format_hand)
                .unwrap_or_else(|| VOID.to_string())
        })
        .collect();
    format!("{}:{}", deal.first.to_char(), hands.join(" "))
}

/// Parse a PBN [Deal "..."] tag
pub fn parse_deal_tag(input: &str) -> Result<Deal, MalformedHandError> {
    let trimmed = input.trim();
    let content = trimmed
        .strip_prefix("[Deal \"")
        .and_then(|rest| rest.strip_suffix("\"]"))
        .ok_or_else(|| MalformedHandError::new("expected [Deal \"...\"] format"))?;
    parse_deal(content)
}

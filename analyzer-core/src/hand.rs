use crate::{Card, Suit};

/// One player's holding.
///
/// Cards are kept sorted (spades first, highest rank first) and never repeat,
/// so two hands holding the same cards always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Create a new empty hand
    pub fn new() -> Self {
        Hand { cards: Vec::new() }
    }

    /// Create a hand from a list of cards, dropping repeats
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut hand = Hand::new();
        for card in cards {
            hand.add_card(card);
        }
        hand
    }

    /// Add a card to the hand. Returns false if the card was already held.
    pub fn add_card(&mut self, card: Card) -> bool {
        match self.cards.binary_search_by(|c| display_order(c).cmp(&display_order(&card))) {
            Ok(_) => false,
            Err(pos) => {
                self.cards.insert(pos, card);
                true
            }
        }
    }

    /// Get all cards in the hand
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Get the number of cards in the hand
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the hand is empty
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Count cards of a specific suit
    pub fn suit_length(&self, suit: Suit) -> usize {
        self.cards.iter().filter(|c| c.suit == suit).count()
    }

    /// Cards of one suit, highest first
    pub fn cards_in_suit(&self, suit: Suit) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().filter(move |c| c.suit == suit)
    }

    /// Calculate total High Card Points (HCP)
    /// A=4, K=3, Q=2, J=1
    pub fn hcp(&self) -> u8 {
        self.cards.iter().map(|c| c.hcp()).sum()
    }

    /// Get the suit lengths in standard order [S, H, D, C]
    pub fn suit_lengths(&self) -> [usize; 4] {
        Suit::PBN_ORDER.map(|suit| self.suit_length(suit))
    }
}

/// Sort key: suit descending (spades first), then rank descending
fn display_order(card: &Card) -> (std::cmp::Reverse<Suit>, std::cmp::Reverse<crate::Rank>) {
    (std::cmp::Reverse(card.suit), std::cmp::Reverse(card.rank))
}

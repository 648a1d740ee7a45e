use crate::oracle::{check_deal, DoubleDummyOracle, OracleReturn, RawTable, RETURN_NO_FAULT};
use analyzer_core::{Card, Deal, Position, Strain, Suit};
use bridge_solver::cards::card_of;
use bridge_solver::{CutoffCache, Hands, PatternCache, Solver};
use bridge_solver::{CLUB, DIAMOND, EAST, HEART, NORTH, NOTRUMP, SOUTH, SPADE, WEST};
use rayon::prelude::*;

/// Double-dummy oracle backed by the `bridge-solver` search.
///
/// Each deal is validated first and reported with a fault code when it cannot
/// be solved. Batches are solved in parallel, one deal per task.
#[derive(Debug, Default, Clone, Copy)]
pub struct BridgeSolverOracle;

impl BridgeSolverOracle {
    pub fn new() -> Self {
        BridgeSolverOracle
    }
}

impl DoubleDummyOracle for BridgeSolverOracle {
    fn calc_table(&mut self, deal: &Deal) -> OracleReturn {
        solve_deal(deal)
    }

    fn calc_tables(&mut self, deals: &[Deal]) -> Vec<OracleReturn> {
        deals.par_iter().map(solve_deal).collect()
    }
}

fn solve_deal(deal: &Deal) -> OracleReturn {
    let code = check_deal(deal);
    if code != RETURN_NO_FAULT {
        return OracleReturn::fault(code);
    }

    let hands = to_hands(deal);
    let num_tricks = hands.num_tricks() as i32;
    let mut raw = RawTable::default();

    for strain in Strain::ALL {
        // caches are valid for one trump suit, shared across declarers
        let mut cutoff_cache = CutoffCache::new(16);
        let mut pattern_cache = PatternCache::new(16);

        for declarer in Position::ALL {
            let leader = seat_of(declarer.next());
            let solver = Solver::new(hands, trump_of(strain), leader);
            let ns_tricks = solver.solve_with_caches(&mut cutoff_cache, &mut pattern_cache) as i32;
            let tricks = match declarer {
                Position::North | Position::South => ns_tricks,
                Position::East | Position::West => num_tricks - ns_tricks,
            };
            raw.set_tricks(strain, declarer, tricks);
        }
    }

    OracleReturn::solved(raw)
}

fn to_hands(deal: &Deal) -> Hands {
    let mut hands = Hands::new();
    for (position, hand) in deal.known_hands() {
        let cards = hands.hand_mut(seat_of(position));
        for card in hand.cards() {
            cards.add(card_index(card));
        }
    }
    hands
}

fn seat_of(position: Position) -> usize {
    match position {
        Position::North => NORTH,
        Position::East => EAST,
        Position::South => SOUTH,
        Position::West => WEST,
    }
}

fn suit_of(suit: Suit) -> usize {
    match suit {
        Suit::Spades => SPADE,
        Suit::Hearts => HEART,
        Suit::Diamonds => DIAMOND,
        Suit::Clubs => CLUB,
    }
}

fn trump_of(strain: Strain) -> usize {
    strain.to_suit().map_or(NOTRUMP, suit_of)
}

fn card_index(card: &Card) -> usize {
    // solver ranks run TWO = 0 .. ACE = 12
    card_of(suit_of(card.suit), card.rank as usize - 2)
}

use analyzer_core::{Deal, Position, Strain};

/// Deal solved without error
pub const RETURN_NO_FAULT: i32 = 1;
/// Oracle failed for a reason it could not classify
pub const RETURN_UNKNOWN_FAULT: i32 = -1;
/// A deal with no cards at all
pub const RETURN_ZERO_CARDS: i32 = -2;
/// The same card is held by two seats
pub const RETURN_DUPLICATE_CARDS: i32 = -4;
/// A seat holds more than 13 cards
pub const RETURN_TOO_MANY_CARDS: i32 = -10;
/// Seats hold different numbers of cards
pub const RETURN_CARD_COUNT: i32 = -14;

/// Largest number of deals accepted by one batch call
pub const MAX_BATCH_DEALS: usize = 40;

/// Human-readable meaning of an oracle return code
pub fn fault_description(code: i32) -> &'static str {
    match code {
        RETURN_NO_FAULT => "no fault",
        RETURN_ZERO_CARDS => "deal has no cards",
        RETURN_DUPLICATE_CARDS => "card dealt to more than one seat",
        RETURN_TOO_MANY_CARDS => "seat holds more than 13 cards",
        RETURN_CARD_COUNT => "seats hold different numbers of cards",
        _ => "unknown fault",
    }
}

/// The oracle's result grid, indexed `[strain][seat]`.
///
/// Strains run S, H, D, C, NT and seats N, E, S, W, matching the
/// discriminants of [`Strain`] and [`Position`]. Read and write it through
/// [`RawTable::tricks`] and [`RawTable::set_tricks`] only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawTable {
    pub res_table: [[i32; 4]; 5],
}

impl RawTable {
    /// Tricks for a declarer in a strain
    pub fn tricks(&self, strain: Strain, declarer: Position) -> i32 {
        self.res_table[strain as usize][declarer as usize]
    }

    pub fn set_tricks(&mut self, strain: Strain, declarer: Position, tricks: i32) {
        self.res_table[strain as usize][declarer as usize] = tricks;
    }
}

/// One return from the oracle: a status code and, when the code is
/// [`RETURN_NO_FAULT`], a filled result grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleReturn {
    pub code: i32,
    pub table: RawTable,
}

impl OracleReturn {
    pub fn solved(table: RawTable) -> Self {
        OracleReturn {
            code: RETURN_NO_FAULT,
            table,
        }
    }

    pub fn fault(code: i32) -> Self {
        OracleReturn {
            code,
            table: RawTable::default(),
        }
    }
}

/// Narrow interface to an external double-dummy solver.
///
/// Implementations need not be reentrant: callers hold exclusive access for
/// the length of each call.
pub trait DoubleDummyOracle: Send {
    /// Most deals one `calc_tables` call may carry
    fn max_batch(&self) -> usize {
        MAX_BATCH_DEALS
    }

    /// Solve every strain for every declarer of one deal
    fn calc_table(&mut self, deal: &Deal) -> OracleReturn;

    /// Solve a batch of at most `max_batch()` deals, one return per deal in
    /// input order
    fn calc_tables(&mut self, deals: &[Deal]) -> Vec<OracleReturn> {
        deals.iter().map(|deal| self.calc_table(deal)).collect()
    }
}

/// Structural checks an oracle runs before solving a deal.
///
/// Returns [`RETURN_NO_FAULT`] when the deal can be solved.
pub fn check_deal(deal: &Deal) -> i32 {
    let lengths = Position::ALL.map(|pos| deal.hand(pos).map_or(0, |hand| hand.len()));

    if lengths.iter().all(|&len| len == 0) {
        return RETURN_ZERO_CARDS;
    }
    if lengths.iter().any(|&len| len > 13) {
        return RETURN_TOO_MANY_CARDS;
    }
    if deal.duplicate_card().is_some() {
        return RETURN_DUPLICATE_CARDS;
    }
    if lengths.iter().any(|&len| len != lengths[0]) {
        return RETURN_CARD_COUNT;
    }
    RETURN_NO_FAULT
}

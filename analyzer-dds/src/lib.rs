//! Double-dummy analysis for bridge deals.
//!
//! The solving itself is delegated to a [`DoubleDummyOracle`]. This crate
//! drives the oracle in bounded batches behind a single lock, maps its return
//! codes to per-deal results and folds solved tables into trick histograms.

mod batch;
mod distribution;
mod oracle;
#[cfg(feature = "bridge-solver")]
mod solver;
mod table;

pub use batch::{BatchSolver, SolveFault};
pub use distribution::{aggregate, Histogram, NoValidSamplesError, TrickDistribution};
pub use oracle::{
    check_deal, fault_description, DoubleDummyOracle, OracleReturn, RawTable, MAX_BATCH_DEALS,
    RETURN_CARD_COUNT, RETURN_DUPLICATE_CARDS, RETURN_NO_FAULT, RETURN_TOO_MANY_CARDS,
    RETURN_UNKNOWN_FAULT, RETURN_ZERO_CARDS,
};
#[cfg(feature = "bridge-solver")]
pub use solver::BridgeSolverOracle;
pub use table::{TrickTable, DISPLAY_STRAINS};

use crate::oracle::{
    fault_description, DoubleDummyOracle, OracleReturn, RETURN_NO_FAULT, RETURN_UNKNOWN_FAULT,
};
use crate::table::TrickTable;
use analyzer_core::Deal;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// A deal the oracle could not solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("double-dummy fault {code}: {}", describe(.code))]
pub struct SolveFault {
    pub code: i32,
}

/// Owns the double-dummy oracle and serializes every call into it.
///
/// The lock is taken for exactly one single or batch call and released when
/// the guard drops, so no other caller can interleave with a batch.
pub struct BatchSolver<O> {
    oracle: Mutex<O>,
    chunk_size: usize,
}

impl<O: DoubleDummyOracle> BatchSolver<O> {
    /// Create a solver using the oracle's full batch size
    pub fn new(oracle: O) -> Self {
        let chunk_size = oracle.max_batch().max(1);
        BatchSolver {
            oracle: Mutex::new(oracle),
            chunk_size,
        }
    }

    /// Use smaller chunks; clamped to `1..=max_batch()`
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        let cap = self.oracle.get_mut().max_batch().max(1);
        self.chunk_size = chunk_size.clamp(1, cap);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Solve one deal
    pub fn solve_one(&self, deal: &Deal) -> Result<TrickTable, SolveFault> {
        let ret = {
            let mut oracle = self.oracle.lock();
            oracle.calc_table(deal)
        };
        into_result(0, ret)
    }

    /// Solve every deal, returning one result per input in input order.
    ///
    /// A fault on one deal only affects that deal's slot.
    pub fn solve_many(&self, deals: &[Deal]) -> Vec<Result<TrickTable, SolveFault>> {
        let mut results: Vec<Option<Result<TrickTable, SolveFault>>> = vec![None; deals.len()];

        for (chunk_index, chunk) in deals.chunks(self.chunk_size).enumerate() {
            let base = chunk_index * self.chunk_size;
            debug!(first = base, len = chunk.len(), "solving double-dummy batch");

            let returns = {
                let mut oracle = self.oracle.lock();
                oracle.calc_tables(chunk)
            };

            if returns.len() != chunk.len() {
                warn!(
                    expected = chunk.len(),
                    got = returns.len(),
                    "oracle returned the wrong number of results for a batch"
                );
            }

            for (offset, ret) in returns.into_iter().take(chunk.len()).enumerate() {
                let index = base + offset;
                results[index] = Some(into_result(index, ret));
            }
        }

        results
            .into_iter()
            .map(|slot| {
                slot.unwrap_or(Err(SolveFault {
                    code: RETURN_UNKNOWN_FAULT,
                }))
            })
            .collect()
    }

    pub fn into_inner(self) -> O {
        self.oracle.into_inner()
    }
}

fn describe(code: &i32) -> &'static str {
    fault_description(*code)
}

fn into_result(index: usize, ret: OracleReturn) -> Result<TrickTable, SolveFault> {
    if ret.code != RETURN_NO_FAULT {
        warn!(deal = index, code = ret.code, "double-dummy oracle fault");
        return Err(SolveFault { code: ret.code });
    }
    TrickTable::from_raw(&ret.table).ok_or_else(|| {
        warn!(deal = index, "double-dummy oracle returned an out-of-range trick count");
        SolveFault {
            code: RETURN_UNKNOWN_FAULT,
        }
    })
}

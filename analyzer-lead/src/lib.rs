//! Opening-lead ranking.
//!
//! Sampled deals are handed in chunks to an external lead solver, which
//! reports for every card in the leader's hand how many tricks the defence
//! takes double dummy. The chunk tables are parsed, merged and turned into
//! [`LeadCandidate`]s ordered by tricks conceded to declarer.

mod oracle;
mod rank;
mod table;

pub use oracle::{LeadOracle, LeadSolverProcess, DEFAULT_LEAD_TIMEOUT};
pub use rank::{LeadCandidate, LeadError, LeadRanker, DEFAULT_LEAD_CHUNK};
pub use table::{parse_lead_table, LeadRow};

//! Bridge deal analysis.
//!
//! Three request pipelines over the analyzer crates:
//!
//! - `analyse`: double-dummy table of a complete deal
//! - `simulate`: sample deals around the known hands, solve each and
//!   histogram the tricks North and South take in every strain
//! - `rank_leads`: sample deals around the opening leader's hand and rank
//!   each card by the tricks it concedes

mod config;
mod error;
mod pipeline;
mod request;

pub use config::Config;
pub use error::AnalysisError;
pub use pipeline::{Analyzer, ProcessAnalyzer};
pub use request::{
    parse_constraints, parse_seat, AnalyseReport, Constraints, LeadReport, LeadRequest,
    SimulateRequest, SimulationReport, DEFAULT_SAMPLES, TRACKED_SEATS,
};

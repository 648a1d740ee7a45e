use crate::error::AnalysisError;
use analyzer_constraint::SeatConstraint;
use analyzer_core::{Contract, Position};
use analyzer_dds::{TrickDistribution, TrickTable};
use analyzer_lead::LeadCandidate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Deals sampled per request when no count is given
pub const DEFAULT_SAMPLES: usize = 200;

/// Seats whose trick histograms a simulation reports
pub const TRACKED_SEATS: [Position; 2] = [Position::North, Position::South];

pub type Constraints = BTreeMap<Position, SeatConstraint>;

/// Single-dummy simulation: known hands in `deal`, constraints on the rest
#[derive(Debug, Clone, Deserialize)]
pub struct SimulateRequest {
    pub deal: String,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default)]
    pub constraints: Constraints,
}

/// Opening-lead ranking for the leader's hand against `contract`
#[derive(Debug, Clone, Deserialize)]
pub struct LeadRequest {
    pub hand: String,
    pub leader: Position,
    pub contract: String,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default)]
    pub constraints: Constraints,
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyseReport {
    pub tricks: TrickTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub requested: usize,
    pub generated: usize,
    pub solved: usize,
    pub faulted: usize,
    pub distribution: TrickDistribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadReport {
    pub contract: String,
    pub leader: Position,
    pub requested: usize,
    pub generated: usize,
    pub leads: Vec<LeadCandidate>,
}

impl LeadReport {
    pub(crate) fn new(
        contract: Contract,
        leader: Position,
        requested: usize,
        generated: usize,
        leads: Vec<LeadCandidate>,
    ) -> Self {
        LeadReport {
            contract: contract.to_string(),
            leader,
            requested,
            generated,
            leads,
        }
    }
}

/// Read seat constraints from inline JSON, or from a file given as `@path`.
///
/// ```text
/// {"east": {"spades": [5, 5], "hcp": [10, 15], "shape": "balanced"}}
/// ```
pub fn parse_constraints(arg: &str) -> Result<Constraints, AnalysisError> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path)).map_err(|e| {
            AnalysisError::InvalidRequest(format!("cannot read constraints file {}: {}", path, e))
        })?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text)
        .map_err(|e| AnalysisError::InvalidRequest(format!("bad constraints: {}", e)))
}

/// Parse a seat given as a letter (`W`) or a name (`west`)
pub fn parse_seat(text: &str) -> Result<Position, AnalysisError> {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let seat = match (chars.next(), chars.next()) {
        (Some(c), None) => Position::from_char(c),
        _ => Position::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(trimmed)),
    };
    seat.ok_or_else(|| AnalysisError::InvalidRequest(format!("unknown seat {:?}", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyzer_constraint::{Range, ShapePreset};

    #[test]
    fn test_parse_inline_constraints() {
        let constraints =
            parse_constraints(r#"{"east": {"spades": [5, 5], "shape": "semiBalanced"}}"#)
                .unwrap();
        let east = &constraints[&Position::East];
        assert_eq!(east.spades, Range::exactly(5));
        assert_eq!(east.hcp, Range::new(0, 40));
        assert_eq!(east.shape, Some(ShapePreset::SemiBalanced));
    }

    #[test]
    fn test_parse_constraints_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("west.json");
        std::fs::write(&path, r#"{"west": {"hcp": [12, 14]}}"#).unwrap();
        let constraints = parse_constraints(&format!("@{}", path.display())).unwrap();
        assert_eq!(constraints[&Position::West].hcp, Range::new(12, 14));
    }

    #[test]
    fn test_bad_constraints() {
        let err = parse_constraints(r#"{"east": {"spadez": [5, 5]}}"#).unwrap_err();
        assert_eq!(err.kind(), "InvalidRequest");
        let err = parse_constraints("@/nonexistent/constraints.json").unwrap_err();
        assert_eq!(err.kind(), "InvalidRequest");
    }

    #[test]
    fn test_parse_seat() {
        assert_eq!(parse_seat("W").unwrap(), Position::West);
        assert_eq!(parse_seat("n").unwrap(), Position::North);
        assert_eq!(parse_seat("East").unwrap(), Position::East);
        assert!(parse_seat("X").is_err());
        assert!(parse_seat("northwest").is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request: SimulateRequest = serde_json::from_str(r#"{"deal": "N:- - - -"}"#).unwrap();
        assert_eq!(request.samples, DEFAULT_SAMPLES);
        assert!(request.constraints.is_empty());
    }
}

use analyzer_constraint::InvalidRangeError;
use analyzer_core::ContractError;
use analyzer_dds::{NoValidSamplesError, SolveFault};
use analyzer_lead::LeadError;
use analyzer_pbn::MalformedHandError;
use analyzer_sample::SampleError;
use thiserror::Error;

/// Every way a request can fail, with a stable kind string for callers
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    MalformedHand(#[from] MalformedHandError),

    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),

    #[error(transparent)]
    InvalidContract(#[from] ContractError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Solve(#[from] SolveFault),

    #[error(transparent)]
    NoValidSamples(#[from] NoValidSamplesError),

    #[error(transparent)]
    Lead(#[from] LeadError),

    #[error("failed to encode response: {0}")]
    Output(#[source] serde_json::Error),
}

impl AnalysisError {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::MalformedHand(_) => "MalformedHand",
            AnalysisError::InvalidRange(_) => "InvalidRange",
            AnalysisError::InvalidContract(_) | AnalysisError::InvalidRequest(_) => {
                "InvalidRequest"
            }
            AnalysisError::Sample(e) => match e {
                SampleError::GeneratorUnavailable(_) => "GeneratorUnavailable",
                SampleError::GenerationTimeout(_) => "GenerationTimeout",
                SampleError::GenerationFailed(_) => "GenerationFailed",
                SampleError::TooManySamples { .. } => "InvalidRequest",
            },
            AnalysisError::Solve(_) => "SolveFault",
            AnalysisError::NoValidSamples(_) => "NoValidSamples",
            AnalysisError::Lead(e) => match e {
                LeadError::Unavailable(_) => "LeadSolverUnavailable",
                LeadError::Timeout(_) => "LeadSolverTimeout",
                LeadError::Failed(_) => "LeadSolverFailed",
                LeadError::NoLeadData => "NoLeadData",
            },
            AnalysisError::Output(_) => "Internal",
        }
    }
}

use crate::generator::{GenerationRequest, GeneratorOracle};
use crate::process::ProcessError;
use analyzer_constraint::CompiledPredicate;
use analyzer_core::Deal;
use analyzer_pbn::parse_deal_line;
use thiserror::Error;
use tracing::{debug, info};

/// Upper bound on deals per request unless configured otherwise
pub const DEFAULT_MAX_SAMPLES: usize = 5000;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("deal generator unavailable: {0}")]
    GeneratorUnavailable(ProcessError),

    #[error("deal generation timed out: {0}")]
    GenerationTimeout(ProcessError),

    #[error("deal generation failed: {0}")]
    GenerationFailed(ProcessError),

    #[error("requested {requested} samples but at most {max} are allowed")]
    TooManySamples { requested: usize, max: usize },
}

impl From<ProcessError> for SampleError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Unavailable { .. } => SampleError::GeneratorUnavailable(err),
            ProcessError::Timeout { .. } => SampleError::GenerationTimeout(err),
            ProcessError::Failed { .. } | ProcessError::Io { .. } => {
                SampleError::GenerationFailed(err)
            }
        }
    }
}

/// Draws deals consistent with fixed hands and a predicate from a generator
pub struct Sampler<G> {
    generator: G,
    max_samples: usize,
}

impl<G: GeneratorOracle> Sampler<G> {
    pub fn new(generator: G) -> Self {
        Sampler {
            generator,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Generate up to `count` deals.
    ///
    /// `count == 0` returns immediately without running the generator. The
    /// result may be shorter than `count` when the generator gives up early;
    /// blank lines and lines that are not deals are dropped.
    pub fn sample(
        &self,
        predicate: &CompiledPredicate,
        fixed: &Deal,
        count: usize,
    ) -> Result<Vec<Deal>, SampleError> {
        if count > self.max_samples {
            return Err(SampleError::TooManySamples {
                requested: count,
                max: self.max_samples,
            });
        }
        if count == 0 {
            return Ok(Vec::new());
        }

        let output = self.generator.generate(&GenerationRequest {
            fixed,
            predicate,
            count,
        })?;

        let deals: Vec<Deal> = output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| match parse_deal_line(line) {
                Ok(deal) => Some(deal),
                Err(e) => {
                    debug!(line, error = %e, "skipping generator output line");
                    None
                }
            })
            .collect();

        info!(requested = count, generated = deals.len(), "sampled deals");
        Ok(deals)
    }
}

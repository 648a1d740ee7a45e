//! Constrained deal sampling through an external generator process.
//!
//! Also home to the process plumbing shared by every external tool: a runner
//! with a hard wall-clock timeout and uniquely named scratch files.

mod generator;
mod process;
mod sampler;
mod scratch;

pub use generator::{
    DealerProcess, GenerationRequest, GeneratorOracle, DEFAULT_GENERATION_TIMEOUT,
};
pub use process::{run_with_timeout, ProcessError, ProcessOutput};
pub use sampler::{SampleError, Sampler, DEFAULT_MAX_SAMPLES};
pub use scratch::ScratchFile;

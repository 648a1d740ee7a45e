use analyzer_lead::DEFAULT_LEAD_TIMEOUT;
use analyzer_sample::{DEFAULT_GENERATION_TIMEOUT, DEFAULT_MAX_SAMPLES};
use std::path::PathBuf;
use std::time::Duration;

/// Where the external programs live and how long they may run
#[derive(Debug, Clone)]
pub struct Config {
    pub dealer: PathBuf,
    pub leadsolver: PathBuf,
    pub scratch_dir: PathBuf,
    pub generation_timeout: Duration,
    pub lead_timeout: Duration,
    pub max_samples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dealer: PathBuf::from("dealer"),
            leadsolver: PathBuf::from("leadsolver"),
            scratch_dir: std::env::temp_dir(),
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            lead_timeout: DEFAULT_LEAD_TIMEOUT,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

use analyzer_core::{Contract, Deal, Hand, Position, Suit};
use analyzer_sample::{run_with_timeout, ProcessError, ScratchFile};
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tracing::info;

/// Default wall-clock budget for one lead solver run
pub const DEFAULT_LEAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Narrow interface to an external opening-lead evaluator.
///
/// Given complete deals, a contract and the opening leader, returns the raw
/// lead table text (see [`crate::parse_lead_table`]).
pub trait LeadOracle: Send + Sync {
    fn evaluate(
        &self,
        deals: &[Deal],
        contract: Contract,
        leader: Position,
    ) -> Result<String, ProcessError>;
}

/// Runs the `leadsolver` program on a scratch file of deals
#[derive(Debug, Clone)]
pub struct LeadSolverProcess {
    pub program: PathBuf,
    /// Arguments placed before the solver's own flags
    pub args: Vec<String>,
    pub scratch_dir: PathBuf,
    pub timeout: Duration,
}

impl LeadSolverProcess {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        LeadSolverProcess {
            program: program.into(),
            args: Vec::new(),
            scratch_dir: std::env::temp_dir(),
            timeout: DEFAULT_LEAD_TIMEOUT,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One deal per line, seat-prefixed, voids written as empty suits
fn deal_file(deals: &[Deal]) -> String {
    let mut text = String::new();
    for deal in deals {
        let hands: Vec<String> = (0..4)
            .map(|i| deal.hand(deal.first.rotate(i)).map(solver_hand).unwrap_or_default())
            .collect();
        text.push_str(&format!("{}:{}\n", deal.first.to_char(), hands.join(" ")));
    }
    text
}

fn solver_hand(hand: &Hand) -> String {
    Suit::PBN_ORDER
        .iter()
        .map(|&suit| {
            hand.cards_in_suit(suit)
                .map(|c| c.rank.to_char())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(".")
}

impl LeadOracle for LeadSolverProcess {
    fn evaluate(
        &self,
        deals: &[Deal],
        contract: Contract,
        leader: Position,
    ) -> Result<String, ProcessError> {
        let scratch = ScratchFile::create(&self.scratch_dir, "deals", "txt", &deal_file(deals))
            .map_err(|source| ProcessError::Io {
                program: self.program.display().to_string(),
                source,
            })?;

        info!(
            program = %self.program.display(),
            deals = deals.len(),
            %contract,
            leader = %leader,
            "running lead solver"
        );
        let output = run_with_timeout(
            Command::new(&self.program)
                .args(&self.args)
                .arg("-q")
                .arg("-l")
                .arg(leader.to_char().to_string())
                .arg(contract.to_string())
                .arg(scratch.path()),
            self.timeout,
        )?;
        Ok(output.stdout)
    }
}

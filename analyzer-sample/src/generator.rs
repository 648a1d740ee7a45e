use crate::process::{run_with_timeout, ProcessError};
use crate::scratch::ScratchFile;
use analyzer_constraint::CompiledPredicate;
use analyzer_core::{Deal, Hand, Suit};
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tracing::info;

/// Default wall-clock budget for one generator run
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(180);

/// What the generator is asked to produce
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Seats whose hands are already known
    pub fixed: &'a Deal,
    pub predicate: &'a CompiledPredicate,
    pub count: usize,
}

impl GenerationRequest<'_> {
    /// Render the request as a dealer input script
    pub fn script(&self) -> String {
        let mut script = format!("produce {}\n", self.count);
        for (position, hand) in self.fixed.known_hands() {
            if !hand.is_empty() {
                script.push_str(&format!("predeal {} {}\n", position.name(), predeal_cards(hand)));
            }
        }
        script.push_str(&self.predicate.to_string());
        script.push_str("\naction printoneline\n");
        script
    }
}

/// Dealer's predeal notation: `SAKQ, HJT9, D876, C5432`, voids omitted
fn predeal_cards(hand: &Hand) -> String {
    Suit::PBN_ORDER
        .iter()
        .filter(|&&suit| hand.suit_length(suit) > 0)
        .map(|&suit| {
            let ranks: String = hand.cards_in_suit(suit).map(|c| c.rank.to_char()).collect();
            format!("{}{}", suit.to_char(), ranks)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Narrow interface to an external random-deal generator.
///
/// Returns the generator's raw output, one deal per line. The generator may
/// return fewer deals than requested when the predicate is hard to satisfy.
pub trait GeneratorOracle: Send + Sync {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, ProcessError>;
}

/// Runs the `dealer` program on a scratch script file
#[derive(Debug, Clone)]
pub struct DealerProcess {
    pub program: PathBuf,
    /// Arguments placed before the script path
    pub args: Vec<String>,
    pub scratch_dir: PathBuf,
    pub timeout: Duration,
}

impl DealerProcess {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        DealerProcess {
            program: program.into(),
            args: Vec::new(),
            scratch_dir: std::env::temp_dir(),
            timeout: DEFAULT_GENERATION_TIMEOUT,
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

impl GeneratorOracle for DealerProcess {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, ProcessError> {
        let script = request.script();
        let scratch = ScratchFile::create(&self.scratch_dir, "constraint", "dl", &script)
            .map_err(|source| ProcessError::Io {
                program: self.program.display().to_string(),
                source,
            })?;

        info!(
            program = %self.program.display(),
            count = request.count,
            "running deal generator"
        );
        let output = run_with_timeout(
            Command::new(&self.program)
                .args(&self.args)
                .arg(scratch.path()),
            self.timeout,
        )?;
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyzer_constraint::{compile, Range, SeatConstraint};
    use analyzer_core::Position;
    use analyzer_pbn::parse_deal;
    use std::collections::BTreeMap;

    #[test]
    fn test_script_layout() {
        let fixed = parse_deal("N:AKQ.JT9.-.AKQ8765 - 2.AKQ.JT9.J432 -").unwrap();
        let constraints = BTreeMap::from([(
            Position::East,
            SeatConstraint {
                spades: Range::exactly(5),
                ..SeatConstraint::default()
            },
        )]);
        let predicate = compile(&constraints).unwrap();
        let request = GenerationRequest {
            fixed: &fixed,
            predicate: &predicate,
            count: 200,
        };

        assert_eq!(
            request.script(),
            "produce 200\n\
             predeal north SAKQ, HJT9, CAKQ8765\n\
             predeal south S2, HAKQ, DJT9, CJ432\n\
             condition spades(east) == 5 && hcp(east) >= 0 && hcp(east) <= 40\n\
             action printoneline\n"
        );
    }

    #[test]
    fn test_script_without_fixed_hands() {
        let fixed = Deal::new(Position::North);
        let predicate = CompiledPredicate::always();
        let request = GenerationRequest {
            fixed: &fixed,
            predicate: &predicate,
            count: 3,
        };
        assert_eq!(
            request.script(),
            "produce 3\ncondition 1\naction printoneline\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_dealer_process_reads_script_and_cleans_up() {
        let bin_dir = tempfile::tempdir().unwrap();
        let scratch_dir = tempfile::tempdir().unwrap();
        let fake = bin_dir.path().join("fake-dealer");
        // echoes the produce line back, proving it was handed the script path
        std::fs::write(&fake, "grep '^produce' \"$1\"\n").unwrap();

        let fixed = Deal::new(Position::North);
        let predicate = CompiledPredicate::always();
        let request = GenerationRequest {
            fixed: &fixed,
            predicate: &predicate,
            count: 12,
        };
        let dealer = DealerProcess::new("sh")
            .with_args([fake.display().to_string()])
            .with_scratch_dir(scratch_dir.path())
            .with_timeout(Duration::from_secs(10));

        assert_eq!(dealer.generate(&request).unwrap(), "produce 12\n");
        assert_eq!(std::fs::read_dir(scratch_dir.path()).unwrap().count(), 0);
    }
}

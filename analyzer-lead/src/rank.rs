use crate::oracle::LeadOracle;
use crate::table::{parse_lead_table, LeadRow};
use analyzer_core::{Card, Contract, Deal, Position};
use analyzer_sample::ProcessError;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Deals handed to one lead solver run
pub const DEFAULT_LEAD_CHUNK: usize = 250;

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("lead solver unavailable: {0}")]
    Unavailable(ProcessError),

    #[error("lead solver timed out: {0}")]
    Timeout(ProcessError),

    #[error("lead solver failed: {0}")]
    Failed(ProcessError),

    #[error("lead solver produced no usable rows")]
    NoLeadData,
}

impl From<ProcessError> for LeadError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Unavailable { .. } => LeadError::Unavailable(err),
            ProcessError::Timeout { .. } => LeadError::Timeout(err),
            ProcessError::Failed { .. } | ProcessError::Io { .. } => LeadError::Failed(err),
        }
    }
}

/// One ranked opening lead, seen from the declaring side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadCandidate {
    pub card: Card,
    /// Mean tricks declarer takes after this lead
    pub mean_tricks_conceded: f64,
    /// Percentage of deals on which the contract is defeated
    pub set_pct: f64,
    /// Highest set percentage among all candidates
    pub best_set: bool,
    /// `trick_percentages[n]`: percentage of deals on which declarer takes `n`
    pub trick_percentages: [f64; 14],
}

/// Running totals for one card across chunks.
///
/// A card only counts the deals of chunks whose table listed it, so its
/// averages and percentages are over those deals alone. A chunk may omit a
/// card the solver folded into an equivalent one.
#[derive(Debug, Default)]
struct Tally {
    deals: usize,
    taken_sum: f64,
    set_sum: f64,
    counts: [u64; 14],
}

impl Tally {
    fn add(&mut self, row: &LeadRow, chunk_deals: usize) {
        let weight = chunk_deals as f64;
        self.deals += chunk_deals;
        self.taken_sum += row.avg_taken * weight;
        self.set_sum += row.set_pct * weight;
        for (total, &count) in self.counts.iter_mut().zip(&row.counts) {
            *total += u64::from(count);
        }
    }

    fn into_candidate(self, card: Card) -> LeadCandidate {
        let deals = self.deals as f64;
        let mut trick_percentages = [0.0; 14];
        for (conceded, pct) in trick_percentages.iter_mut().enumerate() {
            *pct = self.counts[13 - conceded] as f64 * 100.0 / deals;
        }
        LeadCandidate {
            card,
            mean_tricks_conceded: 13.0 - self.taken_sum / deals,
            set_pct: self.set_sum / deals,
            best_set: false,
            trick_percentages,
        }
    }
}

/// Ranks opening leads by running the lead oracle over chunks of deals
pub struct LeadRanker<O> {
    oracle: O,
    chunk_size: usize,
}

impl<O: LeadOracle> LeadRanker<O> {
    pub fn new(oracle: O) -> Self {
        LeadRanker {
            oracle,
            chunk_size: DEFAULT_LEAD_CHUNK,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Evaluate every legal lead over `deals` and rank them, fewest tricks
    /// conceded first.
    ///
    /// Chunks are evaluated concurrently and merged weighting each chunk's
    /// averages by its deal count. Ties keep the higher card first.
    pub fn rank_leads(
        &self,
        deals: &[Deal],
        contract: Contract,
        leader: Position,
    ) -> Result<Vec<LeadCandidate>, LeadError> {
        if deals.is_empty() {
            return Err(LeadError::NoLeadData);
        }

        let chunks: Vec<(usize, Vec<LeadRow>)> = deals
            .par_chunks(self.chunk_size)
            .map(|chunk| {
                let text = self.oracle.evaluate(chunk, contract, leader)?;
                let rows = parse_lead_table(&text);
                debug!(deals = chunk.len(), rows = rows.len(), "evaluated lead chunk");
                Ok((chunk.len(), rows))
            })
            .collect::<Result<_, ProcessError>>()?;

        let mut tallies: FxHashMap<Card, Tally> = FxHashMap::default();
        for (chunk_deals, rows) in &chunks {
            for row in rows {
                tallies.entry(row.card).or_default().add(row, *chunk_deals);
            }
        }
        if tallies.is_empty() {
            return Err(LeadError::NoLeadData);
        }

        let mut candidates: Vec<LeadCandidate> = tallies
            .into_iter()
            .map(|(card, tally)| tally.into_candidate(card))
            .collect();
        candidates.sort_by(|a, b| {
            a.mean_tricks_conceded
                .total_cmp(&b.mean_tricks_conceded)
                .then_with(|| b.card.cmp(&a.card))
        });

        let best = candidates
            .iter()
            .map(|c| c.set_pct)
            .fold(f64::NEG_INFINITY, f64::max);
        for candidate in &mut candidates {
            candidate.best_set = candidate.set_pct == best;
        }

        info!(
            deals = deals.len(),
            %contract,
            leader = %leader,
            leads = candidates.len(),
            "ranked opening leads"
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyzer_core::{Rank, Suit};
    use analyzer_pbn::parse_deal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const DEAL: &str = "N:AKQT3.J6.KJ42.95 652.AK42.AQ87.T4 J74.QT95.T.AK863 98.873.9653.QJ72";

    /// Returns the same table for every chunk, or a table chosen by chunk size
    struct TableOracle {
        table: fn(usize) -> String,
        calls: AtomicUsize,
    }

    impl TableOracle {
        fn new(table: fn(usize) -> String) -> Self {
            TableOracle {
                table,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl LeadOracle for TableOracle {
        fn evaluate(
            &self,
            deals: &[Deal],
            _contract: Contract,
            _leader: Position,
        ) -> Result<String, ProcessError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((self.table)(deals.len()))
        }
    }

    struct FailingOracle(fn() -> ProcessError);

    impl LeadOracle for FailingOracle {
        fn evaluate(
            &self,
            _deals: &[Deal],
            _contract: Contract,
            _leader: Position,
        ) -> Result<String, ProcessError> {
            Err((self.0)())
        }
    }

    fn deals(n: usize) -> Vec<Deal> {
        vec![parse_deal(DEAL).unwrap(); n]
    }

    fn card(token: &str) -> Card {
        Card::parse(token).unwrap()
    }

    fn four_spades() -> Contract {
        "4S".parse().unwrap()
    }

    #[test]
    fn test_rank_by_tricks_conceded() {
        let oracle = TableOracle::new(|_| {
            "Ld   Avg  %Set    00 01 02 03 04 05 06 07 08 09 10 11 12 13\n\
             SK  4.40  60.00* [00 00 00 01 01 02 01 00 00 00 00 00 00 00 ]\n\
             H2  3.20  20.00  [00 00 01 02 01 01 00 00 00 00 00 00 00 00 ]\n"
                .to_string()
        });
        let ranker = LeadRanker::new(oracle);
        let leads = ranker
            .rank_leads(&deals(5), four_spades(), Position::West)
            .unwrap();

        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].card, card("SK"));
        assert!((leads[0].mean_tricks_conceded - 8.6).abs() < 1e-9);
        assert!(leads[0].best_set);
        assert_eq!(leads[1].card, card("H2"));
        assert!((leads[1].mean_tricks_conceded - 9.8).abs() < 1e-9);
        assert!(!leads[1].best_set);

        // defence took 5 on two of five deals, so declarer took 8
        assert!((leads[0].trick_percentages[8] - 40.0).abs() < 1e-9);
        assert!((leads[0].trick_percentages.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_truncated_row_leaves_one_candidate() {
        let oracle = TableOracle::new(|_| {
            "SA  4.23  45.00* [00 00 00 00 01 00 00 00 00 00 00 00 00 00]\n\
             HK  3.10  20.00  [00 00 01"
                .to_string()
        });
        let leads = LeadRanker::new(oracle)
            .rank_leads(&deals(1), four_spades(), Position::West)
            .unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].card, Card::new(Suit::Spades, Rank::Ace));
    }

    #[test]
    fn test_chunks_merge_weighted_by_deal_count() {
        // a chunk of 3 deals reports avg 6, a chunk of 1 deal reports avg 2
        let oracle = TableOracle::new(|n| {
            if n == 3 {
                "DA  6.00  100.00 [00 00 00 00 00 00 03 00 00 00 00 00 00 00]\n".to_string()
            } else {
                "DA  2.00  0.00   [00 00 01 00 00 00 00 00 00 00 00 00 00 00]\n".to_string()
            }
        });
        let ranker = LeadRanker::new(oracle).with_chunk_size(3);
        let leads = ranker
            .rank_leads(&deals(4), four_spades(), Position::West)
            .unwrap();

        assert_eq!(ranker.oracle().calls.load(Ordering::SeqCst), 2);
        assert_eq!(leads.len(), 1);
        assert!((leads[0].mean_tricks_conceded - 8.0).abs() < 1e-9);
        assert!((leads[0].set_pct - 75.0).abs() < 1e-9);
        assert!((leads[0].trick_percentages[7] - 75.0).abs() < 1e-9);
        assert!((leads[0].trick_percentages[11] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_card_missing_from_a_chunk_counts_only_its_deals() {
        let oracle = TableOracle::new(|n| {
            if n == 3 {
                "DA  6.00  100.00 [00 00 00 00 00 00 03 00 00 00 00 00 00 00]\n\
                 SK  5.00  0.00   [00 00 00 00 00 03 00 00 00 00 00 00 00 00]\n"
                    .to_string()
            } else {
                "DA  2.00  0.00   [00 00 01 00 00 00 00 00 00 00 00 00 00 00]\n".to_string()
            }
        });
        let leads = LeadRanker::new(oracle)
            .with_chunk_size(3)
            .rank_leads(&deals(4), four_spades(), Position::West)
            .unwrap();

        let king = leads.iter().find(|c| c.card == card("SK")).unwrap();
        assert!((king.mean_tricks_conceded - 8.0).abs() < 1e-9);
        assert!((king.trick_percentages[8] - 100.0).abs() < 1e-9);
        assert!(king.set_pct.abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_higher_card_first() {
        let oracle = TableOracle::new(|_| {
            "C2  4.00  50.00* [00 00 00 00 01 00 00 00 00 00 00 00 00 00]\n\
             SQ  4.00  50.00* [00 00 00 00 01 00 00 00 00 00 00 00 00 00]\n\
             H7  4.00  50.00* [00 00 00 00 01 00 00 00 00 00 00 00 00 00]\n"
                .to_string()
        });
        let leads = LeadRanker::new(oracle)
            .rank_leads(&deals(1), four_spades(), Position::West)
            .unwrap();
        let order: Vec<String> = leads.iter().map(|c| c.card.to_string()).collect();
        assert_eq!(order, ["SQ", "H7", "C2"]);
        assert!(leads.iter().all(|c| c.best_set));
    }

    #[test]
    fn test_no_lead_data() {
        let ranker = LeadRanker::new(TableOracle::new(|_| "Ld Avg %Set\n".to_string()));
        assert!(matches!(
            ranker.rank_leads(&deals(2), four_spades(), Position::West),
            Err(LeadError::NoLeadData)
        ));

        assert!(matches!(
            ranker.rank_leads(&[], four_spades(), Position::West),
            Err(LeadError::NoLeadData)
        ));
        assert_eq!(ranker.oracle().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_process_errors_map_to_kinds() {
        let timeout = LeadRanker::new(FailingOracle(|| ProcessError::Timeout {
            program: "leadsolver".into(),
            timeout: Duration::from_secs(300),
        }));
        assert!(matches!(
            timeout.rank_leads(&deals(1), four_spades(), Position::West),
            Err(LeadError::Timeout(_))
        ));

        let missing = LeadRanker::new(FailingOracle(|| ProcessError::Unavailable {
            program: "leadsolver".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }));
        assert!(matches!(
            missing.rank_leads(&deals(1), four_spades(), Position::West),
            Err(LeadError::Unavailable(_))
        ));

        let failed = LeadRanker::new(FailingOracle(|| ProcessError::Failed {
            program: "leadsolver".into(),
            status: "exit status: 2".into(),
            diagnostic: "Contract must be a combination of a letter and a number".into(),
        }));
        let err = failed
            .rank_leads(&deals(1), four_spades(), Position::West)
            .unwrap_err();
        assert!(matches!(err, LeadError::Failed(_)));
        assert!(err.to_string().contains("Contract must be"));
    }

    #[test]
    fn test_candidate_serializes_card_token() {
        let oracle = TableOracle::new(|_| {
            "HT  5.00  100.00* [00 00 00 00 00 01 00 00 00 00 00 00 00 00]\n".to_string()
        });
        let leads = LeadRanker::new(oracle)
            .rank_leads(&deals(1), four_spades(), Position::West)
            .unwrap();
        let json = serde_json::to_value(&leads[0]).unwrap();
        assert_eq!(json["card"], "HT");
        assert_eq!(json["mean_tricks_conceded"], 8.0);
        assert_eq!(json["trick_percentages"][8], 100.0);
    }
}

use crate::table::{TrickTable, DISPLAY_STRAINS};
use analyzer_core::{Position, Strain};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no sampled deal could be solved")]
pub struct NoValidSamplesError;

/// Trick histogram for one declarer in one strain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub strain: Strain,
    pub seat: Position,
    /// Index is the trick count 0..=13
    pub percentages: [f64; 14],
    pub average: f64,
}

/// Histograms for every strain and tracked seat, over the solved tables only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrickDistribution {
    pub samples: usize,
    pub histograms: Vec<Histogram>,
}

impl TrickDistribution {
    pub fn get(&self, strain: Strain, seat: Position) -> Option<&Histogram> {
        self.histograms
            .iter()
            .find(|h| h.strain == strain && h.seat == seat)
    }
}

/// Fold solved tables into percentage histograms for `seats`.
///
/// The denominator is the number of tables given, so callers pass only the
/// deals that solved.
pub fn aggregate(
    tables: &[TrickTable],
    seats: &[Position],
) -> Result<TrickDistribution, NoValidSamplesError> {
    if tables.is_empty() {
        return Err(NoValidSamplesError);
    }
    let samples = tables.len() as f64;

    let mut histograms = Vec::with_capacity(DISPLAY_STRAINS.len() * seats.len());
    for strain in DISPLAY_STRAINS {
        for &seat in seats {
            let mut counts = [0usize; 14];
            let mut total = 0usize;
            for table in tables {
                let tricks = table.get(strain, seat) as usize;
                counts[tricks.min(13)] += 1;
                total += tricks;
            }
            histograms.push(Histogram {
                strain,
                seat,
                percentages: counts.map(|c| c as f64 * 100.0 / samples),
                average: total as f64 / samples,
            });
        }
    }

    Ok(TrickDistribution {
        samples: tables.len(),
        histograms,
    })
}

use analyzer_core::Card;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Columns in a complete row: card, average, set percentage, 14 buckets
const ROW_COLUMNS: usize = 17;

/// One row of the lead solver's table.
///
/// All figures are from the defenders' side: `avg_taken` is the mean number
/// of tricks the defence took after this lead, `counts[n]` the number of
/// deals on which it took exactly `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadRow {
    pub card: Card,
    pub avg_taken: f64,
    pub set_pct: f64,
    /// Row carried the `*` marking the best set percentage
    pub best: bool,
    pub counts: [u32; 14],
}

fn card_token() -> &'static Regex {
    static CARD: OnceLock<Regex> = OnceLock::new();
    CARD.get_or_init(|| Regex::new(r"^[SHDC][AKQJT2-9]$").unwrap())
}

/// Parse the lead table printed by the lead solver.
///
/// Lines not starting with a card token (titles, column headers, progress)
/// are skipped, as are rows with missing or non-numeric columns.
///
/// ```text
///                          Frequency of Tricks Taken
/// Ld   Avg  %Set    00 01 02 03 04 05 06 07 08 09 10 11 12 13
/// SK  4.40  60.00* [00 00 00 01 01 02 01 00 00 00 00 00 00 00 ]
/// ```
pub fn parse_lead_table(text: &str) -> Vec<LeadRow> {
    text.lines().filter_map(parse_row).collect()
}

fn parse_row(line: &str) -> Option<LeadRow> {
    let first = line.split_whitespace().next()?;
    if !card_token().is_match(first) {
        return None;
    }

    let best = line.split('[').next().is_some_and(|head| head.contains('*'));
    let cleaned = line.replace(['[', ']', '*'], " ");
    let fields: Vec<&str> = cleaned.split_whitespace().collect();
    if fields.len() < ROW_COLUMNS {
        debug!(line, "skipping truncated lead row");
        return None;
    }

    let parsed = parse_fields(&fields, best);
    if parsed.is_none() {
        debug!(line, "skipping lead row with non-numeric fields");
    }
    parsed
}

fn parse_fields(fields: &[&str], best: bool) -> Option<LeadRow> {
    let card = Card::parse(fields[0])?;
    let avg_taken: f64 = fields[1].parse().ok()?;
    let set_pct: f64 = fields[2].parse().ok()?;
    let mut counts = [0u32; 14];
    for (slot, field) in counts.iter_mut().zip(&fields[3..ROW_COLUMNS]) {
        *slot = field.parse().ok()?;
    }
    Some(LeadRow {
        card,
        avg_taken,
        set_pct,
        best,
        counts,
    })
}

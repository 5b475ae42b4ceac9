// Theme aggregation — folding one comment's keywords into the global table.
//
// A theme is keyed by (keyword, sentiment). For each keyword the aggregator
// looks the theme up; an existing theme has its frequency increased by the
// keyword's count, a missing one is created with that count. Increments are
// relative ("frequency = frequency + n"), never a write of a value read
// earlier, so two writers can never overwrite each other's contribution.
//
// Callers run `merge_keywords` inside a single storage transaction per
// comment, which makes the whole fold all-or-nothing.

use anyhow::Result;
use tracing::debug;

use crate::analysis::keywords::KeywordCount;
use crate::db::models::ThemeEntry;
use crate::sentiment::traits::Sentiment;

/// Storage operations the aggregator needs. Implemented by the SQLite
/// connection (inside a transaction) and by the in-memory table used in tests.
pub trait ThemeLedger {
    fn get_theme(&self, keyword: &str, sentiment: Sentiment) -> Result<Option<ThemeEntry>>;
    fn insert_theme(&self, keyword: &str, sentiment: Sentiment, frequency: i64) -> Result<()>;
    fn increment_theme(&self, id: i64, amount: i64) -> Result<()>;
}

/// How a merge touched the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub inserted: usize,
    pub incremented: usize,
    /// Sum of all frequencies applied.
    pub total: i64,
}

/// The order in which a backend with row-level locks should write `keywords`:
/// sorted by keyword, with zero counts dropped. Every writer that follows it
/// locks shared theme rows in the same sequence, so two comments with
/// overlapping keywords cannot deadlock each other.
pub fn write_order(keywords: &[KeywordCount]) -> Vec<&KeywordCount> {
    let mut ordered: Vec<&KeywordCount> = keywords.iter().filter(|kw| kw.frequency > 0).collect();
    ordered.sort_by(|a, b| a.keyword.cmp(&b.keyword));
    ordered
}

/// Fold `keywords` into the ledger under `sentiment`.
pub fn merge_keywords<L: ThemeLedger + ?Sized>(
    ledger: &L,
    sentiment: Sentiment,
    keywords: &[KeywordCount],
) -> Result<MergeOutcome> {
    let mut outcome = MergeOutcome::default();

    for kw in keywords {
        let amount = i64::from(kw.frequency);
        if amount == 0 {
            continue;
        }
        match ledger.get_theme(&kw.keyword, sentiment)? {
            Some(existing) => {
                ledger.increment_theme(existing.id, amount)?;
                outcome.incremented += 1;
            }
            None => {
                ledger.insert_theme(&kw.keyword, sentiment, amount)?;
                outcome.inserted += 1;
            }
        }
        outcome.total += amount;
    }

    debug!(
        %sentiment,
        inserted = outcome.inserted,
        incremented = outcome.incremented,
        total = outcome.total,
        "Merged keywords into themes"
    );
    Ok(outcome)
}

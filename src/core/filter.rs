//! Incremental row filtering
//!
//! Given a full snapshot of a relation and the dataset's current watermark,
//! keep only the rows whose change-timestamp is strictly newer, and compute
//! the watermark the run should commit afterwards.

use crate::core::state::watermark::Watermark;
use crate::domain::record::Record;
use crate::domain::result::Result;
use tracing::debug;

/// The outcome of filtering one snapshot against a watermark
#[derive(Debug)]
pub struct Batch {
    /// Rows strictly newer than the input watermark, in scan order
    pub records: Vec<Record>,

    /// Watermark to commit once `records` is durably written
    ///
    /// Equal to the input watermark when `records` is empty, otherwise the
    /// maximum change-timestamp among the kept rows.
    pub new_watermark: Watermark,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Selects new rows by comparing a change-timestamp column to a watermark
pub struct IncrementalFilter {
    timestamp_column: String,
}

impl IncrementalFilter {
    pub fn new(timestamp_column: impl Into<String>) -> Self {
        Self {
            timestamp_column: timestamp_column.into(),
        }
    }

    /// The column this filter compares against
    pub fn timestamp_column(&self) -> &str {
        &self.timestamp_column
    }

    /// Filter `records` down to rows strictly newer than `watermark`
    ///
    /// The comparison is strict (`>`): rows whose timestamp equals the
    /// watermark belong to a previous run. The new watermark never moves
    /// backwards, even on an empty result.
    ///
    /// # Errors
    ///
    /// Returns a schema error if any row lacks the timestamp column or
    /// holds a non-temporal value in it. One bad row fails the whole batch
    /// so a corrupt snapshot cannot silently advance the watermark past
    /// rows it dropped.
    pub fn apply<I>(&self, records: I, watermark: Watermark) -> Result<Batch>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut kept = Vec::new();
        let mut new_watermark = watermark;
        let mut scanned = 0usize;

        for record in records {
            scanned += 1;
            let ts = record.change_timestamp(&self.timestamp_column)?;
            if watermark.is_newer(ts) {
                new_watermark = new_watermark.advanced_to(ts);
                kept.push(record);
            }
        }

        debug!(
            scanned,
            kept = kept.len(),
            watermark = %watermark,
            new_watermark = %new_watermark,
            "Filtered snapshot against watermark"
        );

        Ok(Batch {
            records: kept,
            new_watermark,
        })
    }
}

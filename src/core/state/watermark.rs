//! Watermark value type
//!
//! A watermark is the change-timestamp of the newest row a previous run has
//! already exported. Rows with a timestamp strictly greater than the
//! watermark are "new"; everything else has been seen before. The value is
//! persisted as ASCII decimal text so the marker object is inspectable with
//! any tool that can read the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A high-water mark over a dataset's change-timestamp column
///
/// Watermarks are totally ordered and compare by their underlying epoch
/// value. They only ever move forward: a run either keeps the current
/// watermark (no new rows) or replaces it with the maximum timestamp it
/// observed, which the strict filter guarantees is larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watermark(i64);

impl Watermark {
    /// Create a watermark from a raw epoch-seconds value
    pub fn new(value: i64) -> Self {
        Watermark(value)
    }

    /// The raw epoch value
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Whether `timestamp` is strictly newer than this watermark
    ///
    /// Strictness matters: rows whose timestamp equals the watermark were
    /// exported by the run that produced it, so re-emitting them would
    /// duplicate data downstream.
    pub fn is_newer(&self, timestamp: i64) -> bool {
        timestamp > self.0
    }

    /// Return the later of this watermark and `timestamp`
    pub fn advanced_to(&self, timestamp: i64) -> Self {
        Watermark(self.0.max(timestamp))
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Watermark {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Watermark)
    }
}

impl From<i64> for Watermark {
    fn from(value: i64) -> Self {
        Watermark(value)
    }
}

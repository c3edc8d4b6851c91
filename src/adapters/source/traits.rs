//! Source database adapter trait

use crate::domain::ids::RelationName;
use crate::domain::record::Snapshot;
use crate::domain::result::Result;
use async_trait::async_trait;

/// Abstraction over the relational source being extracted
///
/// A reader performs full scans only; incremental selection happens after
/// the scan, against the watermark. This keeps the source requirements
/// minimal (no index on the change-timestamp column is assumed).
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Read every row of a relation
    async fn load(&self, relation: &RelationName) -> Result<Snapshot>;
}

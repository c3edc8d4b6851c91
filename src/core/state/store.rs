//! Watermark persistence over the object store
//!
//! Each dataset owns exactly one marker object at `<prefix>/last_update`
//! holding the watermark as ASCII decimal text. The store never invents a
//! watermark: a missing marker is a hard error surfaced to the caller,
//! because defaulting to zero would silently turn an incremental run into
//! a full re-export.

use crate::adapters::storage::traits::ObjectStore;
use crate::core::state::watermark::Watermark;
use crate::domain::dataset::Dataset;
use crate::domain::errors::{StorageError, TidemarkError};
use crate::domain::result::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the marker object under each dataset prefix
pub const MARKER_NAME: &str = "last_update";

/// Reads and commits per-dataset watermarks
pub struct WatermarkStore {
    storage: Arc<dyn ObjectStore>,
}

impl WatermarkStore {
    pub fn new(storage: Arc<dyn ObjectStore>) -> Self {
        Self { storage }
    }

    /// Storage key of a dataset's marker object
    pub fn marker_key(dataset: &Dataset) -> String {
        format!("{}/{}", dataset.prefix(), MARKER_NAME)
    }

    /// Read the current watermark for a dataset
    ///
    /// # Errors
    ///
    /// Returns [`TidemarkError::WatermarkMissing`] when no marker object
    /// exists, and [`StorageError::InvalidMarker`] when the object exists
    /// but does not parse as a decimal integer.
    pub async fn get(&self, dataset: &Dataset) -> Result<Watermark> {
        let key = Self::marker_key(dataset);
        debug!(dataset = %dataset.name, key = %key, "Reading watermark marker");

        let bytes = self.storage.get_object(&key).await?.ok_or_else(|| {
            TidemarkError::WatermarkMissing {
                dataset: dataset.name.to_string(),
                key: key.clone(),
            }
        })?;

        let text = String::from_utf8(bytes).map_err(|e| {
            TidemarkError::Storage(StorageError::InvalidMarker {
                key: key.clone(),
                message: format!("marker is not valid UTF-8: {}", e),
            })
        })?;

        let watermark: Watermark = text.parse().map_err(|e| {
            TidemarkError::Storage(StorageError::InvalidMarker {
                key: key.clone(),
                message: format!("marker '{}' is not a decimal integer: {}", text.trim(), e),
            })
        })?;

        debug!(dataset = %dataset.name, watermark = %watermark, "Loaded watermark");
        Ok(watermark)
    }

    /// Commit a new watermark for a dataset
    ///
    /// Must only be called after the run's partition objects are durably
    /// written; committing first would let a crash drop rows forever. A
    /// failure here is reported as [`TidemarkError::WatermarkCommit`] so
    /// callers can distinguish "data written, marker stale" (safe, the next
    /// run re-exports) from a data write failure.
    pub async fn set(&self, dataset: &Dataset, watermark: Watermark, dry_run: bool) -> Result<()> {
        let key = Self::marker_key(dataset);

        if dry_run {
            info!(
                dataset = %dataset.name,
                key = %key,
                watermark = %watermark,
                "Dry run: skipping watermark commit"
            );
            return Ok(());
        }

        self.storage
            .put_object(&key, watermark.to_string().into_bytes())
            .await
            .map_err(|e| TidemarkError::WatermarkCommit {
                dataset: dataset.name.to_string(),
                key: key.clone(),
                message: e.to_string(),
            })?;

        info!(dataset = %dataset.name, key = %key, watermark = %watermark, "Committed watermark");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::memory::MemoryStore;

    fn dataset() -> Dataset {
        Dataset::new("sales", "food_mart.sales_fact_all", "trg/sales_avro").unwrap()
    }

    #[test]
    fn test_marker_key_layout() {
        assert_eq!(
            WatermarkStore::marker_key(&dataset()),
            "trg/sales_avro/last_update"
        );
    }

    #[tokio::test]
    async fn test_get_missing_marker_is_fatal() {
        let store = WatermarkStore::new(Arc::new(MemoryStore::new()));
        let err = store.get(&dataset()).await.unwrap_err();
        assert!(matches!(err, TidemarkError::WatermarkMissing { .. }));
    }

    #[tokio::test]
    async fn test_get_parses_decimal_marker() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .put_object("trg/sales_avro/last_update", b"1577836800".to_vec())
            .await
            .unwrap();

        let store = WatermarkStore::new(storage);
        let wm = store.get(&dataset()).await.unwrap();
        assert_eq!(wm, Watermark::new(1577836800));
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_marker() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .put_object("trg/sales_avro/last_update", b"yesterday".to_vec())
            .await
            .unwrap();

        let store = WatermarkStore::new(storage);
        let err = store.get(&dataset()).await.unwrap_err();
        assert!(matches!(
            err,
            TidemarkError::Storage(StorageError::InvalidMarker { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_then_get_round_trips() {
        let storage = Arc::new(MemoryStore::new());
        let store = WatermarkStore::new(storage.clone());

        store
            .set(&dataset(), Watermark::new(105), false)
            .await
            .unwrap();

        let bytes = storage
            .get_object("trg/sales_avro/last_update")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bytes, b"105");

        assert_eq!(store.get(&dataset()).await.unwrap(), Watermark::new(105));
    }

    #[tokio::test]
    async fn test_set_dry_run_writes_nothing() {
        let storage = Arc::new(MemoryStore::new());
        let store = WatermarkStore::new(storage.clone());

        store
            .set(&dataset(), Watermark::new(105), true)
            .await
            .unwrap();

        assert!(storage
            .get_object("trg/sales_avro/last_update")
            .await
            .unwrap()
            .is_none());
    }
}

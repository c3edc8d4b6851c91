//! Partition file writer
//!
//! Splits a filtered batch into fixed-size chunks, encodes each chunk as an
//! Avro container file, and writes it under a key derived from the batch's
//! outgoing watermark. Keys are a pure function of (prefix, watermark,
//! chunk index), so a retried run overwrites its own partial output instead
//! of accumulating duplicates.

use crate::adapters::storage::traits::ObjectStore;
use crate::core::codec;
use crate::core::filter::Batch;
use crate::core::state::watermark::Watermark;
use crate::domain::dataset::Dataset;
use crate::domain::result::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Storage key of one partition file
///
/// Layout: `<prefix>/update_<watermark>_part<index>`, index counted from 0.
pub fn partition_key(prefix: &str, watermark: Watermark, index: usize) -> String {
    format!("{}/update_{}_part{}", prefix, watermark, index)
}

/// Writes filtered batches as Avro partition files
pub struct PartitionedWriter {
    storage: Arc<dyn ObjectStore>,
    partition_max_rows: usize,
}

impl PartitionedWriter {
    pub fn new(storage: Arc<dyn ObjectStore>, partition_max_rows: usize) -> Self {
        Self {
            storage,
            partition_max_rows: partition_max_rows.max(1),
        }
    }

    /// Write a batch as one or more partition files, returning their keys
    ///
    /// An empty batch writes nothing and returns no keys. All partitions
    /// are written before this returns; the caller commits the watermark
    /// only after that, so a failure partway through leaves the marker
    /// untouched and the next run simply rewrites the same keys.
    pub async fn write(&self, dataset: &Dataset, batch: &Batch, dry_run: bool) -> Result<Vec<String>> {
        if batch.is_empty() {
            debug!(dataset = %dataset.name, "No new rows, skipping partition write");
            return Ok(Vec::new());
        }

        let partitions = batch.records.len().div_ceil(self.partition_max_rows);
        let mut keys = Vec::with_capacity(partitions);

        for (index, chunk) in batch.records.chunks(self.partition_max_rows).enumerate() {
            let key = partition_key(dataset.prefix(), batch.new_watermark, index);
            let bytes = codec::encode(dataset.name.as_str(), chunk)?;

            if dry_run {
                info!(
                    dataset = %dataset.name,
                    key = %key,
                    rows = chunk.len(),
                    bytes = bytes.len(),
                    "Dry run: skipping partition write"
                );
            } else {
                self.storage.put_object(&key, bytes).await?;
                debug!(dataset = %dataset.name, key = %key, rows = chunk.len(), "Wrote partition");
            }
            keys.push(key);
        }

        info!(
            dataset = %dataset.name,
            partitions = keys.len(),
            rows = batch.len(),
            watermark = %batch.new_watermark,
            "Partition write complete"
        );
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::memory::MemoryStore;
    use crate::domain::record::{FieldValue, Record};

    fn dataset() -> Dataset {
        Dataset::new("sales", "food_mart.sales_fact_all", "trg/sales_avro").unwrap()
    }

    fn row(id: i64, ts: i64) -> Record {
        Record::new(vec![
            ("id".to_string(), FieldValue::Integer(id)),
            ("last_update".to_string(), FieldValue::Integer(ts)),
        ])
    }

    fn batch(records: Vec<Record>, watermark: i64) -> Batch {
        Batch {
            records,
            new_watermark: Watermark::new(watermark),
        }
    }

    #[test]
    fn test_partition_key_layout() {
        assert_eq!(
            partition_key("trg/sales_avro", Watermark::new(105), 0),
            "trg/sales_avro/update_105_part0"
        );
        assert_eq!(
            partition_key("trg/sales_avro", Watermark::new(105), 3),
            "trg/sales_avro/update_105_part3"
        );
    }

    #[tokio::test]
    async fn test_empty_batch_writes_nothing() {
        let storage = Arc::new(MemoryStore::new());
        let writer = PartitionedWriter::new(storage.clone(), 100);

        let keys = writer
            .write(&dataset(), &batch(Vec::new(), 200), false)
            .await
            .unwrap();

        assert!(keys.is_empty());
        assert!(storage.list_keys("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chunking_by_partition_max_rows() {
        let storage = Arc::new(MemoryStore::new());
        let writer = PartitionedWriter::new(storage.clone(), 1);

        let keys = writer
            .write(&dataset(), &batch(vec![row(3, 101), row(4, 105)], 105), false)
            .await
            .unwrap();

        assert_eq!(
            keys,
            vec![
                "trg/sales_avro/update_105_part0".to_string(),
                "trg/sales_avro/update_105_part1".to_string(),
            ]
        );

        // Each partition holds exactly one row and is a valid Avro file
        let bytes = storage
            .get_object("trg/sales_avro/update_105_part1")
            .await
            .unwrap()
            .unwrap();
        let rows = codec::decode(&bytes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some(&FieldValue::Integer(4)));
    }

    #[tokio::test]
    async fn test_single_partition_for_small_batch() {
        let storage = Arc::new(MemoryStore::new());
        let writer = PartitionedWriter::new(storage.clone(), 100_000);

        let keys = writer
            .write(&dataset(), &batch(vec![row(1, 101), row(2, 105)], 105), false)
            .await
            .unwrap();

        assert_eq!(keys, vec!["trg/sales_avro/update_105_part0".to_string()]);
        let bytes = storage.get_object(&keys[0]).await.unwrap().unwrap();
        assert_eq!(codec::decode(&bytes).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_returns_keys_without_writing() {
        let storage = Arc::new(MemoryStore::new());
        let writer = PartitionedWriter::new(storage.clone(), 100);

        let keys = writer
            .write(&dataset(), &batch(vec![row(1, 101)], 101), true)
            .await
            .unwrap();

        assert_eq!(keys.len(), 1);
        assert!(storage.list_keys("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rewrite_same_batch_overwrites_keys() {
        let storage = Arc::new(MemoryStore::new());
        let writer = PartitionedWriter::new(storage.clone(), 100);
        let b = batch(vec![row(1, 101)], 101);

        let first = writer.write(&dataset(), &b, false).await.unwrap();
        let second = writer.write(&dataset(), &b, false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(storage.list_keys("").await.unwrap().len(), 1);
    }
}

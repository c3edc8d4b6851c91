//! End-to-end pipeline tests over in-process adapters
//!
//! These exercise the full watermark lifecycle (read marker, scan, filter,
//! write partitions, commit marker) against an in-memory object store and
//! a canned source, covering the failure orderings the lifecycle exists
//! to get right.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tidemark::adapters::source::SourceReader;
use tidemark::adapters::storage::{MemoryStore, ObjectStore};
use tidemark::core::codec;
use tidemark::core::{
    DatasetOutcome, IncrementalFilter, Orchestrator, PartitionedWriter, WatermarkStore,
};
use tidemark::domain::dataset::Dataset;
use tidemark::domain::ids::RelationName;
use tidemark::domain::record::{FieldValue, Record, Snapshot};
use tidemark::domain::{Result, SourceError, TidemarkError};

struct FakeSource {
    tables: HashMap<String, Vec<Record>>,
    scans: AtomicUsize,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            tables: HashMap::new(),
            scans: AtomicUsize::new(0),
        }
    }

    fn with_table(mut self, relation: &str, rows: Vec<Record>) -> Self {
        self.tables.insert(relation.to_string(), rows);
        self
    }

    fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceReader for FakeSource {
    async fn load(&self, relation: &RelationName) -> Result<Snapshot> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let rows = self
            .tables
            .get(relation.as_str())
            .cloned()
            .ok_or_else(|| SourceError::QueryFailed(format!("unknown relation {}", relation)))?;
        Ok(Snapshot::new(relation.clone(), rows))
    }
}

fn row(id: i64, ts: i64) -> Record {
    Record::new(vec![
        ("id".to_string(), FieldValue::Integer(id)),
        ("last_update".to_string(), FieldValue::Integer(ts)),
    ])
}

fn orchestrator(
    source: Arc<FakeSource>,
    storage: Arc<MemoryStore>,
    partition_max_rows: usize,
) -> Orchestrator {
    Orchestrator::new(
        source,
        WatermarkStore::new(storage.clone()),
        PartitionedWriter::new(storage, partition_max_rows),
        IncrementalFilter::new("last_update"),
        2,
        false,
    )
}

async fn seed_marker(storage: &MemoryStore, prefix: &str, value: &str) {
    storage
        .put_object(&format!("{prefix}/last_update"), value.as_bytes().to_vec())
        .await
        .unwrap();
}

async fn marker(storage: &MemoryStore, prefix: &str) -> Option<String> {
    storage
        .get_object(&format!("{prefix}/last_update"))
        .await
        .unwrap()
        .map(|b| String::from_utf8(b).unwrap())
}

#[tokio::test]
async fn exports_only_strictly_newer_rows_under_deterministic_keys() {
    let storage = Arc::new(MemoryStore::new());
    seed_marker(&storage, "trg/sales_avro", "100").await;

    let source = Arc::new(FakeSource::new().with_table(
        "sales_fact_all",
        vec![row(1, 90), row(2, 100), row(3, 101), row(4, 105)],
    ));
    let orch = orchestrator(source, storage.clone(), 1);
    let dataset = Dataset::new("sales", "sales_fact_all", "trg/sales_avro").unwrap();

    let outcome = orch.run_dataset(&dataset).await.unwrap();
    assert_eq!(
        outcome,
        DatasetOutcome::Updated {
            records: 2,
            partitions: 2,
            watermark: 105.into(),
        }
    );

    // Rows 90 and 100 were filtered; 101 and 105 landed one per partition
    let part0 = storage
        .get_object("trg/sales_avro/update_105_part0")
        .await
        .unwrap()
        .unwrap();
    let part1 = storage
        .get_object("trg/sales_avro/update_105_part1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        codec::decode(&part0).unwrap()[0].get("id"),
        Some(&FieldValue::Integer(3))
    );
    assert_eq!(
        codec::decode(&part1).unwrap()[0].get("id"),
        Some(&FieldValue::Integer(4))
    );

    // Marker advanced to the max exported timestamp, as decimal text
    assert_eq!(marker(&storage, "trg/sales_avro").await.unwrap(), "105");
}

#[tokio::test]
async fn no_new_rows_leaves_store_untouched() {
    let storage = Arc::new(MemoryStore::new());
    seed_marker(&storage, "trg/promo_avro", "200").await;

    let source =
        Arc::new(FakeSource::new().with_table("promotion", vec![row(1, 150), row(2, 200)]));
    let orch = orchestrator(source, storage.clone(), 100);
    let dataset = Dataset::new("promotions", "promotion", "trg/promo_avro").unwrap();

    let outcome = orch.run_dataset(&dataset).await.unwrap();
    assert_eq!(
        outcome,
        DatasetOutcome::NoNewRows {
            watermark: 200.into(),
        }
    );

    assert_eq!(marker(&storage, "trg/promo_avro").await.unwrap(), "200");
    assert_eq!(storage.len(), 1);
}

#[tokio::test]
async fn missing_marker_fails_without_scanning_source() {
    let storage = Arc::new(MemoryStore::new());
    let source = Arc::new(FakeSource::new().with_table("promotion", vec![row(1, 10)]));
    let orch = orchestrator(source.clone(), storage, 100);
    let dataset = Dataset::new("promotions", "promotion", "trg/promo_avro").unwrap();

    let err = orch.run_dataset(&dataset).await.unwrap_err();
    assert!(matches!(err, TidemarkError::WatermarkMissing { .. }));
    assert_eq!(source.scan_count(), 0);
}

#[tokio::test]
async fn failed_dataset_does_not_stop_the_others() {
    let storage = Arc::new(MemoryStore::new());
    seed_marker(&storage, "trg/sales_avro", "100").await;
    // promotions has no marker and must fail in isolation

    let source = Arc::new(
        FakeSource::new()
            .with_table("sales_fact_all", vec![row(1, 101), row(2, 105)])
            .with_table("promotion", vec![row(3, 50)]),
    );
    let orch = orchestrator(source, storage.clone(), 100);

    let datasets = vec![
        Dataset::new("promotions", "promotion", "trg/promo_avro").unwrap(),
        Dataset::new("sales", "sales_fact_all", "trg/sales_avro").unwrap(),
    ];

    let summary = orch.run_all(&datasets).await;
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.total_records(), 2);

    assert_eq!(marker(&storage, "trg/sales_avro").await.unwrap(), "105");
    assert!(marker(&storage, "trg/promo_avro").await.is_none());
}

#[tokio::test]
async fn partition_write_failure_leaves_marker_untouched() {
    let storage = Arc::new(MemoryStore::new());
    seed_marker(&storage, "trg/sales_avro", "100").await;
    // The second partition of the run will fail to write
    storage.fail_writes_to("trg/sales_avro/update_105_part1");

    let source = Arc::new(
        FakeSource::new().with_table("sales_fact_all", vec![row(1, 101), row(2, 105)]),
    );
    let orch = orchestrator(source, storage.clone(), 1);
    let dataset = Dataset::new("sales", "sales_fact_all", "trg/sales_avro").unwrap();

    let err = orch.run_dataset(&dataset).await.unwrap_err();
    assert!(matches!(err, TidemarkError::Storage(_)));

    // The marker still points at the old watermark, so the next run
    // re-exports rows 101 and 105 to the same keys
    assert_eq!(marker(&storage, "trg/sales_avro").await.unwrap(), "100");
}

#[tokio::test]
async fn marker_commit_failure_keeps_previous_watermark() {
    let storage = Arc::new(MemoryStore::new());
    seed_marker(&storage, "trg/sales_avro", "100").await;
    // Partitions write fine; the marker commit itself fails
    storage.fail_writes_to("trg/sales_avro/last_update");

    let source = Arc::new(
        FakeSource::new().with_table("sales_fact_all", vec![row(1, 101), row(2, 105)]),
    );
    let orch = orchestrator(source, storage.clone(), 1);
    let dataset = Dataset::new("sales", "sales_fact_all", "trg/sales_avro").unwrap();

    let err = orch.run_dataset(&dataset).await.unwrap_err();
    assert!(matches!(err, TidemarkError::WatermarkCommit { .. }));

    // Every partition was durable before the commit was attempted
    assert!(storage
        .get_object("trg/sales_avro/update_105_part0")
        .await
        .unwrap()
        .is_some());
    assert!(storage
        .get_object("trg/sales_avro/update_105_part1")
        .await
        .unwrap()
        .is_some());

    // The marker still holds the old watermark, so a retry re-filters
    // from 100 and overwrites the exact same keys
    assert_eq!(marker(&storage, "trg/sales_avro").await.unwrap(), "100");
}

#[tokio::test]
async fn retried_run_reproduces_identical_keys() {
    let storage = Arc::new(MemoryStore::new());
    seed_marker(&storage, "trg/sales_avro", "100").await;
    storage.fail_writes_to("trg/sales_avro/update_105_part1");

    let source = Arc::new(
        FakeSource::new().with_table("sales_fact_all", vec![row(1, 101), row(2, 105)]),
    );
    let dataset = Dataset::new("sales", "sales_fact_all", "trg/sales_avro").unwrap();

    // First attempt fails partway through
    let orch = orchestrator(source.clone(), storage.clone(), 1);
    assert!(orch.run_dataset(&dataset).await.is_err());

    // A fresh run against the same store (write failure cleared) completes
    // and overwrites the partial output rather than duplicating it
    let healthy = Arc::new(MemoryStore::new());
    seed_marker(&healthy, "trg/sales_avro", "100").await;
    let retry = orchestrator(source, healthy.clone(), 1);
    let outcome = retry.run_dataset(&dataset).await.unwrap();
    assert!(matches!(outcome, DatasetOutcome::Updated { .. }));

    let keys = healthy.list_keys("trg/sales_avro/update_").await.unwrap();
    assert_eq!(
        keys,
        vec![
            "trg/sales_avro/update_105_part0".to_string(),
            "trg/sales_avro/update_105_part1".to_string(),
        ]
    );
}

#[tokio::test]
async fn watermark_is_monotonic_across_runs() {
    let storage = Arc::new(MemoryStore::new());
    seed_marker(&storage, "trg/sales_avro", "100").await;
    let dataset = Dataset::new("sales", "sales_fact_all", "trg/sales_avro").unwrap();

    // First run advances to 105
    let source = Arc::new(FakeSource::new().with_table("sales_fact_all", vec![row(1, 105)]));
    orchestrator(source, storage.clone(), 100)
        .run_dataset(&dataset)
        .await
        .unwrap();
    assert_eq!(marker(&storage, "trg/sales_avro").await.unwrap(), "105");

    // A second run over the same data finds nothing new; the marker holds
    let source = Arc::new(FakeSource::new().with_table("sales_fact_all", vec![row(1, 105)]));
    let outcome = orchestrator(source, storage.clone(), 100)
        .run_dataset(&dataset)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        DatasetOutcome::NoNewRows {
            watermark: 105.into(),
        }
    );
    assert_eq!(marker(&storage, "trg/sales_avro").await.unwrap(), "105");
}

#[tokio::test]
async fn timestamp_columns_use_epoch_seconds() {
    use chrono::TimeZone;

    let storage = Arc::new(MemoryStore::new());
    let base = chrono::Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    seed_marker(&storage, "trg/events", &base.timestamp().to_string()).await;

    let newer = base + chrono::Duration::seconds(60);
    let source = Arc::new(FakeSource::new().with_table(
        "events",
        vec![
            Record::new(vec![
                ("id".to_string(), FieldValue::Integer(1)),
                ("last_update".to_string(), FieldValue::Timestamp(base)),
            ]),
            Record::new(vec![
                ("id".to_string(), FieldValue::Integer(2)),
                ("last_update".to_string(), FieldValue::Timestamp(newer)),
            ]),
        ],
    ));
    let orch = orchestrator(source, storage.clone(), 100);
    let dataset = Dataset::new("events", "events", "trg/events").unwrap();

    let outcome = orch.run_dataset(&dataset).await.unwrap();
    assert_eq!(
        outcome,
        DatasetOutcome::Updated {
            records: 1,
            partitions: 1,
            watermark: newer.timestamp().into(),
        }
    );
    assert_eq!(
        marker(&storage, "trg/events").await.unwrap(),
        newer.timestamp().to_string()
    );
}

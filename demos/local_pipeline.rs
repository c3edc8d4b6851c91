//! Runs the full extraction lifecycle against in-process adapters.
//!
//! Useful for seeing the watermark mechanics without a MySQL server or an
//! object store:
//!
//! ```sh
//! cargo run --example local_pipeline
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use tidemark::adapters::source::SourceReader;
use tidemark::adapters::storage::{MemoryStore, ObjectStore};
use tidemark::core::{IncrementalFilter, Orchestrator, PartitionedWriter, WatermarkStore};
use tidemark::domain::dataset::Dataset;
use tidemark::domain::ids::RelationName;
use tidemark::domain::record::{FieldValue, Record, Snapshot};
use tidemark::domain::Result;

struct DemoSource;

#[async_trait]
impl SourceReader for DemoSource {
    async fn load(&self, relation: &RelationName) -> Result<Snapshot> {
        let rows = vec![
            row(1, 90, "Price Winners"),
            row(2, 100, "Bag Stuffers"),
            row(3, 101, "Two Day Sale"),
            row(4, 105, "Shelf Clearing Days"),
        ];
        Ok(Snapshot::new(relation.clone(), rows))
    }
}

fn row(id: i64, ts: i64, name: &str) -> Record {
    Record::new(vec![
        ("promotion_id".to_string(), FieldValue::Integer(id)),
        ("promotion_name".to_string(), FieldValue::Text(name.into())),
        ("last_update".to_string(), FieldValue::Integer(ts)),
    ])
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("tidemark=debug").init();

    let storage = Arc::new(MemoryStore::new());
    // Seed the marker; a dataset without one refuses to run
    storage
        .put_object("trg/promotions_avro/last_update", b"100".to_vec())
        .await?;

    let orchestrator = Orchestrator::new(
        Arc::new(DemoSource),
        WatermarkStore::new(storage.clone()),
        PartitionedWriter::new(storage.clone(), 1),
        IncrementalFilter::new("last_update"),
        1,
        false,
    );

    let dataset = Dataset::new("promotions", "food_mart.promotion", "trg/promotions_avro")
        .map_err(tidemark::TidemarkError::Configuration)?;
    let outcome = orchestrator.run_dataset(&dataset).await?;
    println!("outcome: {outcome:?}");

    println!("objects in store:");
    for key in storage.list_keys("").await? {
        println!("  {key}");
    }
    Ok(())
}

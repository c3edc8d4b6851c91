//! Extraction orchestration
//!
//! Drives the watermark lifecycle for each configured dataset:
//!
//! 1. read the dataset's watermark (fatal if missing)
//! 2. scan the full source relation
//! 3. keep rows strictly newer than the watermark
//! 4. write the kept rows as Avro partition files
//! 5. commit the new watermark
//!
//! The marker is committed strictly after step 4 completes. A crash between
//! the two leaves a stale marker and already-written partitions; the next
//! run re-filters from the stale marker and overwrites the same keys, so no
//! row is ever lost, only re-exported.

use crate::adapters::source::traits::SourceReader;
use crate::core::filter::IncrementalFilter;
use crate::core::state::store::WatermarkStore;
use crate::core::summary::{DatasetOutcome, DatasetReport, RunSummary};
use crate::core::writer::PartitionedWriter;
use crate::domain::dataset::Dataset;
use crate::domain::result::Result;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Coordinates one extraction run across all configured datasets
pub struct Orchestrator {
    source: Arc<dyn SourceReader>,
    watermarks: WatermarkStore,
    writer: PartitionedWriter,
    filter: IncrementalFilter,
    parallel_datasets: usize,
    dry_run: bool,
}

impl Orchestrator {
    pub fn new(
        source: Arc<dyn SourceReader>,
        watermarks: WatermarkStore,
        writer: PartitionedWriter,
        filter: IncrementalFilter,
        parallel_datasets: usize,
        dry_run: bool,
    ) -> Self {
        Self {
            source,
            watermarks,
            writer,
            filter,
            parallel_datasets: parallel_datasets.max(1),
            dry_run,
        }
    }

    /// Run the full extraction over all datasets
    ///
    /// Datasets are isolated: a failure in one is recorded in the summary
    /// and the others proceed. Up to `parallel_datasets` datasets run
    /// concurrently.
    pub async fn run_all(&self, datasets: &[Dataset]) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::new();

        if self.dry_run {
            info!("Dry run: no objects will be written");
        }

        let mut outcomes = stream::iter(datasets.iter())
            .map(|dataset| async move {
                let dataset_started = Instant::now();
                let outcome = match self.run_dataset(dataset).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!(dataset = %dataset.name, error = %e, "Dataset extraction failed");
                        DatasetOutcome::Failed {
                            message: e.to_string(),
                        }
                    }
                };
                DatasetReport {
                    dataset: dataset.name.to_string(),
                    outcome,
                    duration: dataset_started.elapsed(),
                }
            })
            .buffer_unordered(self.parallel_datasets);

        while let Some(report) = outcomes.next().await {
            summary.record(report);
        }

        summary.duration = started.elapsed();
        summary
    }

    /// Run the watermark lifecycle for a single dataset
    #[instrument(skip(self), fields(dataset = %dataset.name, relation = %dataset.relation))]
    pub async fn run_dataset(&self, dataset: &Dataset) -> Result<DatasetOutcome> {
        // Read the watermark before touching the source: a dataset with no
        // marker must fail without scanning anything.
        let watermark = self.watermarks.get(dataset).await?;
        info!(watermark = %watermark, "Starting incremental extraction");

        let snapshot = self.source.load(&dataset.relation).await?;
        info!(rows = snapshot.len(), "Scanned source relation");

        let batch = self.filter.apply(snapshot.records, watermark)?;

        if batch.is_empty() {
            info!(watermark = %watermark, "No rows newer than watermark");
            return Ok(DatasetOutcome::NoNewRows { watermark });
        }

        let keys = self.writer.write(dataset, &batch, self.dry_run).await?;

        // Data is durable; only now is it safe to advance the marker.
        self.watermarks
            .set(dataset, batch.new_watermark, self.dry_run)
            .await?;

        Ok(DatasetOutcome::Updated {
            records: batch.len(),
            partitions: keys.len(),
            watermark: batch.new_watermark,
        })
    }
}

//! Run command implementation
//!
//! This module implements the `run` command, which performs one incremental
//! extraction pass over all configured datasets.

use crate::adapters::source::MySqlSource;
use crate::adapters::storage::S3Store;
use crate::cli::commands::configured_datasets;
use crate::config::load_config;
use crate::core::summary::log_summary;
use crate::core::{IncrementalFilter, Orchestrator, PartitionedWriter, WatermarkStore};
use clap::Args;
use std::sync::Arc;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Dry run mode - scan and filter, but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Run only the named dataset (comma-separated for several)
    #[arg(long)]
    pub dataset: Option<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting extraction run");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.extract.dry_run = true;
        }
        let dry_run = config.extract.dry_run || config.application.dry_run;

        // Resolve datasets, applying the --dataset filter if given
        let mut datasets = match configured_datasets(&config) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Invalid dataset configuration: {e}");
                return Ok(2);
            }
        };
        if let Some(filter) = &self.dataset {
            let wanted: Vec<&str> = filter.split(',').map(|s| s.trim()).collect();
            datasets.retain(|d| wanted.contains(&d.name.as_str()));
            if datasets.is_empty() {
                eprintln!("No configured dataset matches --dataset {filter}");
                return Ok(2);
            }
        }

        if dry_run {
            println!("DRY RUN - nothing will be written to the object store");
            println!();
        }

        // Connect adapters
        let storage = match S3Store::connect(&config.storage).await {
            Ok(s) => Arc::new(s),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create object store client");
                eprintln!("Failed to connect to object store: {e}");
                return Ok(4); // Connection error exit code
            }
        };
        let source = match MySqlSource::connect(&config.source) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create source pool");
                eprintln!("Failed to connect to source database: {e}");
                return Ok(4);
            }
        };

        let orchestrator = Orchestrator::new(
            source,
            WatermarkStore::new(storage.clone()),
            PartitionedWriter::new(storage, config.extract.partition_max_rows),
            IncrementalFilter::new(&config.extract.timestamp_column),
            config.extract.parallel_datasets,
            dry_run,
        );

        let summary = orchestrator.run_all(&datasets).await;
        log_summary(&summary);

        // Display summary
        println!();
        println!("Extraction Summary:");
        println!("  Datasets: {}", summary.reports.len());
        println!("  Succeeded: {}", summary.succeeded());
        println!("  Failed: {}", summary.failed());
        println!("  Records exported: {}", summary.total_records());
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        for report in &summary.reports {
            use crate::core::DatasetOutcome;
            match &report.outcome {
                DatasetOutcome::Updated {
                    records,
                    partitions,
                    watermark,
                } => println!(
                    "  {} - {} record(s) in {} partition(s), watermark {}",
                    report.dataset, records, partitions, watermark
                ),
                DatasetOutcome::NoNewRows { watermark } => {
                    println!("  {} - up to date at watermark {}", report.dataset, watermark)
                }
                DatasetOutcome::Failed { message } => {
                    println!("  {} - FAILED: {}", report.dataset, message)
                }
            }
        }
        println!();

        let exit_code = if summary.is_success() {
            println!("Extraction completed successfully");
            0
        } else {
            println!("Extraction completed with failures");
            1 // Partial failure
        };

        Ok(exit_code)
    }
}

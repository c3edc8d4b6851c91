//! Status command implementation
//!
//! This module implements the `status` command for displaying per-dataset
//! watermarks from the object store.

use crate::adapters::storage::S3Store;
use crate::cli::commands::configured_datasets;
use crate::config::load_config;
use crate::core::WatermarkStore;
use crate::domain::dataset::Dataset;
use crate::domain::errors::TidemarkError;
use clap::Args;
use std::sync::Arc;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show only the named dataset
    #[arg(long)]
    pub dataset: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking dataset watermarks");

        println!("Dataset Status");
        println!();

        // Load configuration
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Failed to load configuration file");
                println!("  Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let mut datasets = match configured_datasets(&config) {
            Ok(d) => d,
            Err(e) => {
                println!("Invalid dataset configuration");
                println!("  Error: {e}");
                return Ok(2);
            }
        };
        if let Some(name) = &self.dataset {
            datasets.retain(|d| d.name.as_str() == name);
            if datasets.is_empty() {
                println!("No configured dataset named '{name}'");
                return Ok(0);
            }
        }

        // Connect to the object store
        let storage = match S3Store::connect(&config.storage).await {
            Ok(s) => Arc::new(s),
            Err(e) => {
                println!("Failed to connect to object store");
                println!("  Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };
        let watermarks = WatermarkStore::new(storage);

        println!(
            "{:<20} {:<40} {:<15} {}",
            "Dataset", "Relation", "Watermark", "Marker Key"
        );
        println!("{}", "-".repeat(100));

        let mut failures = 0;
        for dataset in &datasets {
            let (watermark, failed) = watermark_cell(&watermarks, dataset).await;
            if failed {
                failures += 1;
            }
            println!(
                "{:<20} {:<40} {:<15} {}",
                dataset.name.as_str(),
                dataset.relation.as_str(),
                watermark,
                WatermarkStore::marker_key(dataset)
            );
        }
        println!();

        if failures > 0 {
            println!("Failed to read {failures} of {} watermark(s)", datasets.len());
            return Ok(5); // Fatal error exit code
        }
        Ok(0)
    }
}

/// Render one dataset's watermark cell
///
/// A read failure becomes a cell in the table rather than aborting the
/// listing; one unreadable marker must not hide the remaining datasets.
/// The second element reports whether the read failed.
async fn watermark_cell(watermarks: &WatermarkStore, dataset: &Dataset) -> (String, bool) {
    match watermarks.get(dataset).await {
        Ok(wm) => (wm.to_string(), false),
        Err(TidemarkError::WatermarkMissing { .. }) => ("(not seeded)".to_string(), false),
        Err(e) => (format!("(read failed: {e})"), true),
    }
}

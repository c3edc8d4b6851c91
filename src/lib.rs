// Tidemark - Incremental Relational-to-Blob Extraction Tool
// Copyright (c) 2025 Tidemark Contributors
// Licensed under the MIT License

//! # Tidemark - Incremental Relational-to-Blob Extraction
//!
//! Tidemark is an incremental extraction tool built in Rust that exports new
//! rows from relational tables into Avro partition files in an object store,
//! using per-dataset high-water marks to decide what "new" means.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Reading** each dataset's watermark marker from the object store
//! - **Scanning** the source relation and keeping rows strictly newer than
//!   the watermark
//! - **Writing** the kept rows as self-describing Avro partition files under
//!   deterministic, watermark-stamped keys
//! - **Committing** the advanced watermark only after the data is durable
//!
//! ## Architecture
//!
//! Tidemark follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (watermark state, filtering, partition writing)
//! - [`adapters`] - External integrations (MySQL, S3)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tidemark::adapters::source::MySqlSource;
//! use tidemark::adapters::storage::S3Store;
//! use tidemark::config::load_config;
//! use tidemark::core::{IncrementalFilter, Orchestrator, PartitionedWriter, WatermarkStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("tidemark.toml")?;
//!
//!     let storage = Arc::new(S3Store::connect(&config.storage).await?);
//!     let source = Arc::new(MySqlSource::connect(&config.source)?);
//!
//!     let orchestrator = Orchestrator::new(
//!         source,
//!         WatermarkStore::new(storage.clone()),
//!         PartitionedWriter::new(storage, config.extract.partition_max_rows),
//!         IncrementalFilter::new(&config.extract.timestamp_column),
//!         config.extract.parallel_datasets,
//!         false,
//!     );
//!
//!     // Datasets come from the [[datasets]] config entries
//!     # let datasets = Vec::new();
//!     let summary = orchestrator.run_all(&datasets).await;
//!     println!("Exported {} records", summary.total_records());
//!     Ok(())
//! }
//! ```
//!
//! ## Watermark Semantics
//!
//! A dataset's watermark is the change-timestamp of the newest row already
//! exported. Three rules keep incremental runs safe:
//!
//! - **Strict filter**: only rows with `timestamp > watermark` are exported,
//!   so rows seen by a previous run are never duplicated.
//! - **Missing marker is fatal**: a dataset whose marker object does not
//!   exist fails without scanning the source. It is never treated as
//!   watermark zero, which would silently re-export the whole table.
//! - **Data before marker**: the watermark is committed only after every
//!   partition file of the run is written. A crash in between re-exports
//!   the same rows to the same keys on the next run; nothing is lost.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

// Re-export commonly used types at the crate root
pub use domain::{Result, TidemarkError};

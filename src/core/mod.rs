//! Core extraction logic
//!
//! The pipeline stages, in the order a run executes them:
//!
//! - [`state`] — per-dataset watermark read and commit
//! - [`filter`] — strict newer-than selection over a snapshot
//! - [`codec`] — Avro container-file encoding of partitions
//! - [`writer`] — chunking and durable partition writes
//! - [`orchestrator`] — the lifecycle tying the stages together
//! - [`summary`] — end-of-run reporting

pub mod codec;
pub mod filter;
pub mod orchestrator;
pub mod state;
pub mod summary;
pub mod writer;

pub use filter::{Batch, IncrementalFilter};
pub use orchestrator::Orchestrator;
pub use state::{Watermark, WatermarkStore};
pub use summary::{DatasetOutcome, DatasetReport, RunSummary};
pub use writer::{partition_key, PartitionedWriter};

//! Watermark state management
//!
//! Tracks the per-dataset high-water mark that makes runs incremental. The
//! marker lives next to the data it describes, under the dataset's key
//! prefix in the object store, and is committed only after the data it
//! covers is durable.

pub mod store;
pub mod watermark;

pub use store::{WatermarkStore, MARKER_NAME};
pub use watermark::Watermark;

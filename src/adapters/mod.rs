//! External system adapters
//!
//! Adapters isolate the pipeline from concrete backends behind narrow
//! async traits: [`source::SourceReader`] for the relational source and
//! [`storage::ObjectStore`] for the blob store. Core code depends only on
//! the traits, so tests run against in-process fakes.

pub mod source;
pub mod storage;

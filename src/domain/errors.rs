//! Domain error types
//!
//! This module defines the error hierarchy for Tidemark. All errors are
//! domain-specific and don't expose third-party driver or SDK types.

use thiserror::Error;

/// Main Tidemark error type
///
/// This is the primary error type used throughout the application.
/// It wraps adapter-specific error types and provides context for error
/// handling and operator remediation.
#[derive(Debug, Error)]
pub enum TidemarkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No watermark marker exists for a dataset.
    ///
    /// Fatal for that dataset's run: the operator must perform an initial
    /// full load to seed the marker. Never silently treated as watermark 0.
    #[error("No watermark marker for dataset '{dataset}' (missing key '{key}'); run an initial load to seed it")]
    WatermarkMissing { dataset: String, key: String },

    /// The partition data was fully written but the marker update failed.
    ///
    /// Retrying is safe: partition keys are deterministic from the watermark
    /// that was about to be committed, so a re-run reproduces the same keys.
    #[error("Failed to commit watermark for dataset '{dataset}' (key '{key}'): {message}")]
    WatermarkCommit {
        dataset: String,
        key: String,
        message: String,
    },

    /// Source database errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Object store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Change-timestamp column absent or not coercible to the watermark domain
    #[error("Schema error: {0}")]
    Schema(String),

    /// Partition serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl TidemarkError {
    /// Whether re-invoking the run without operator intervention can succeed
    ///
    /// Connectivity failures against the source or store are transient;
    /// a missing watermark or a schema mismatch is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            TidemarkError::Source(SourceError::ConnectionFailed(_)) => true,
            TidemarkError::Storage(StorageError::RequestFailed(_)) => true,
            TidemarkError::WatermarkCommit { .. } => true,
            _ => false,
        }
    }
}

/// Source database errors
///
/// Errors that occur when scanning the source relation. The scan stage is
/// read-only, so none of these leave partial state behind.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to connect or authenticate to the source database
    #[error("Failed to connect to source database: {0}")]
    ConnectionFailed(String),

    /// The snapshot query failed
    #[error("Snapshot query failed: {0}")]
    QueryFailed(String),

    /// A row could not be converted into a record
    #[error("Invalid row in relation '{relation}': {message}")]
    InvalidRow { relation: String, message: String },
}

/// Object store errors
///
/// Errors that occur against the blob store. A `WriteFailed` after some
/// partitions of a batch were written is recoverable by retry as long as
/// the watermark was not advanced: the retried run reproduces identical
/// keys for the already-written partitions and completes the missing ones.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Request-level failure (connectivity, auth, throttling)
    #[error("Object store request failed: {0}")]
    RequestFailed(String),

    /// Failed to read an object
    #[error("Failed to read object '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Failed to write an object
    #[error("Failed to write object '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// A marker object exists but does not hold a valid decimal watermark
    #[error("Invalid watermark marker at '{key}': {message}")]
    InvalidMarker { key: String, message: String },
}

// Conversion from std::io::Error
impl From<std::io::Error> for TidemarkError {
    fn from(err: std::io::Error) -> Self {
        TidemarkError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TidemarkError {
    fn from(err: toml::de::Error) -> Self {
        TidemarkError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<apache_avro::Error> for TidemarkError {
    fn from(err: apache_avro::Error) -> Self {
        TidemarkError::Serialization(err.to_string())
    }
}

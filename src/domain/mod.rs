//! Domain models and types for Tidemark.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`DatasetName`], [`RelationName`])
//! - **Domain models** ([`Dataset`], [`Record`], [`Snapshot`])
//! - **Error types** ([`TidemarkError`], [`SourceError`], [`StorageError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Tidemark uses the newtype pattern for identifiers to prevent mixing
//! different name domains:
//!
//! ```rust
//! use tidemark::domain::{DatasetName, RelationName};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = DatasetName::new("sales")?;
//! let relation = RelationName::new("food_mart.sales_fact_all")?;
//!
//! // This won't compile - type safety prevents mixing names
//! // let wrong: DatasetName = relation;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TidemarkError>`]:
//!
//! ```rust
//! use tidemark::domain::{Result, TidemarkError};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = tidemark::config::load_config("tidemark.toml")?;
//!     Ok(())
//! }
//! ```

pub mod dataset;
pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use dataset::Dataset;
pub use errors::{SourceError, StorageError, TidemarkError};
pub use ids::{DatasetName, RelationName};
pub use record::{FieldValue, Record, Snapshot};
pub use result::Result;

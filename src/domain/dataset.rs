//! Dataset configuration model
//!
//! A [`Dataset`] identifies one incremental pipeline: a logical name, the
//! source relation it scans, and the key prefix its output lives under in
//! the object store. Datasets are immutable and built from configuration
//! at startup; they own their watermark marker 1:1 and share nothing with
//! other datasets.

use crate::domain::ids::{DatasetName, RelationName};

/// One incremental pipeline's immutable identity
///
/// # Examples
///
/// ```
/// use tidemark::domain::dataset::Dataset;
///
/// let dataset = Dataset::new("sales", "food_mart.sales_fact_all", "trg/sales_avro").unwrap();
/// assert_eq!(dataset.name.as_str(), "sales");
/// assert_eq!(dataset.prefix(), "trg/sales_avro");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// Logical name of the pipeline
    pub name: DatasetName,

    /// Source relation to scan
    pub relation: RelationName,

    /// Key prefix in the object store under which all of this dataset's
    /// objects (marker and partition files) are stored
    prefix: String,
}

impl Dataset {
    /// Create a dataset, validating all three parts
    ///
    /// # Errors
    ///
    /// Returns an error if the name or relation is invalid, or if the
    /// prefix is empty. A trailing `/` on the prefix is stripped so key
    /// construction is uniform.
    pub fn new(
        name: impl Into<String>,
        relation: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Result<Self, String> {
        let name = DatasetName::new(name)?;
        let relation = RelationName::new(relation)?;
        let prefix = prefix.into();
        let prefix = prefix.trim_end_matches('/').to_string();
        if prefix.trim().is_empty() {
            return Err(format!("Dataset '{}' has an empty storage prefix", name));
        }
        Ok(Self {
            name,
            relation,
            prefix,
        })
    }

    /// The dataset's storage key prefix (no trailing slash)
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

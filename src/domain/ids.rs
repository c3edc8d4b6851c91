//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for dataset and relation
//! identifiers. Each type ensures type safety and validates format
//! compliance at construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dataset name newtype wrapper
///
/// The logical name of one incremental pipeline. Used in logs, summaries,
/// and for selecting a dataset from the CLI.
///
/// # Examples
///
/// ```
/// use tidemark::domain::ids::DatasetName;
/// use std::str::FromStr;
///
/// let name = DatasetName::from_str("sales").unwrap();
/// assert_eq!(name.as_str(), "sales");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetName(String);

impl DatasetName {
    /// Creates a new DatasetName from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or whitespace-only.
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Dataset name cannot be empty".to_string());
        }
        Ok(Self(name))
    }

    /// Returns the dataset name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DatasetName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DatasetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Relation name newtype wrapper
///
/// Identifies a source relation, optionally schema-qualified
/// (e.g. `food_mart.sales_fact_all`). The name is interpolated into the
/// snapshot query, so construction rejects anything outside
/// `[A-Za-z0-9_.]` — there is no way to parameterize a table name in SQL.
///
/// # Examples
///
/// ```
/// use tidemark::domain::ids::RelationName;
/// use std::str::FromStr;
///
/// let relation = RelationName::from_str("food_mart.promotion").unwrap();
/// assert_eq!(relation.as_str(), "food_mart.promotion");
/// assert!(RelationName::from_str("x; DROP TABLE y").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationName(String);

impl RelationName {
    /// Creates a new RelationName from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains characters
    /// outside `[A-Za-z0-9_.]`.
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Relation name cannot be empty".to_string());
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(format!(
                "Invalid relation name '{}': only alphanumerics, '_' and '.' are allowed",
                name
            ));
        }
        Ok(Self(name))
    }

    /// Returns the relation name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RelationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RelationName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RelationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

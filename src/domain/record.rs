//! Source records and snapshots
//!
//! This module defines the row-level data model: a [`Record`] is one row
//! read from a source relation, a [`Snapshot`] is a full read of a relation
//! at scan time. Records are format-agnostic; the partition writer decides
//! how they are serialized.

use crate::domain::errors::TidemarkError;
use crate::domain::ids::RelationName;
use crate::domain::Result;
use chrono::{DateTime, Utc};

/// A single column value from a source row
///
/// The variants cover the value domain of the supported source types.
/// Timestamps are always UTC; their watermark-domain representation is
/// epoch seconds (see [`FieldValue::as_epoch_seconds`]).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// SQL NULL
    Null,
    /// Boolean value
    Boolean(bool),
    /// Signed integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
    /// Raw binary value
    Bytes(Vec<u8>),
    /// UTC timestamp value
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Coerce this value into the integer watermark domain
    ///
    /// Integers pass through unchanged; timestamps coerce to epoch seconds.
    /// Returns `None` for every other variant — the change-timestamp column
    /// must be an integer or temporal type.
    pub fn as_epoch_seconds(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            FieldValue::Timestamp(ts) => Some(ts.timestamp()),
            _ => None,
        }
    }

    /// Short type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Text(_) => "text",
            FieldValue::Bytes(_) => "bytes",
            FieldValue::Timestamp(_) => "timestamp",
        }
    }
}

/// One row from a source relation
///
/// Columns keep the order the source reported them in, so partition files
/// reproduce the relation's column layout.
///
/// # Examples
///
/// ```
/// use tidemark::domain::record::{FieldValue, Record};
///
/// let record = Record::new(vec![
///     ("product_id".to_string(), FieldValue::Integer(7)),
///     ("last_update".to_string(), FieldValue::Integer(1_700_000_000)),
/// ]);
///
/// assert_eq!(record.change_timestamp("last_update").unwrap(), 1_700_000_000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create a record from ordered (column, value) pairs
    pub fn new(columns: Vec<(String, FieldValue)>) -> Self {
        Self { columns }
    }

    /// The ordered (column, value) pairs of this record
    pub fn columns(&self) -> &[(String, FieldValue)] {
        &self.columns
    }

    /// Look up a column value by name
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Number of columns in this record
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The record's change timestamp in the integer watermark domain
    ///
    /// # Errors
    ///
    /// Returns a `Schema` error if the column is absent or its value is
    /// not coercible to the watermark domain.
    pub fn change_timestamp(&self, column: &str) -> Result<i64> {
        let value = self.get(column).ok_or_else(|| {
            TidemarkError::Schema(format!("change-timestamp column '{}' not present", column))
        })?;

        value.as_epoch_seconds().ok_or_else(|| {
            TidemarkError::Schema(format!(
                "change-timestamp column '{}' has type '{}', expected integer or timestamp",
                column,
                value.type_name()
            ))
        })
    }
}

/// A full read of a source relation at scan time
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// The relation this snapshot was read from
    pub relation: RelationName,

    /// All rows of the relation at scan time
    pub records: Vec<Record>,
}

impl Snapshot {
    /// Create a snapshot from a relation name and its rows
    pub fn new(relation: RelationName, records: Vec<Record>) -> Self {
        Self { relation, records }
    }

    /// Number of rows in the snapshot
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot holds no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

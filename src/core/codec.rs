//! Avro object-container-file encoding for extracted rows
//!
//! Partition files are self-describing Avro OCF: the schema travels with
//! the data, so downstream consumers need no side-channel to read them.
//! The schema is derived per batch from the observed column types, with
//! every field nullable, since a full table scan has no catalog to consult.

use crate::domain::errors::TidemarkError;
use crate::domain::record::{FieldValue, Record};
use crate::domain::result::Result;
use apache_avro::types::Value as AvroValue;
use apache_avro::{Codec, Reader, Schema, Writer};
use chrono::{DateTime, Utc};
use serde_json::json;

/// Derive an Avro record schema from a batch of rows
///
/// Column order follows the first row. Each field is a `["null", T]` union
/// where `T` is taken from the first non-null value observed for that
/// column across the batch; a column that is null everywhere falls back to
/// string.
pub fn derive_schema(name: &str, records: &[Record]) -> Result<Schema> {
    let first = records.first().ok_or_else(|| {
        TidemarkError::Schema("cannot derive a schema from an empty batch".to_string())
    })?;

    let mut fields = Vec::with_capacity(first.len());
    for (column, _) in first.columns() {
        let avro_type = records
            .iter()
            .find_map(|r| r.get(column).and_then(avro_type_of))
            .unwrap_or_else(|| json!("string"));
        fields.push(json!({
            "name": column,
            "type": ["null", avro_type],
            "default": null,
        }));
    }

    let schema_json = json!({
        "type": "record",
        "name": name,
        "fields": fields,
    });

    Schema::parse_str(&schema_json.to_string()).map_err(TidemarkError::from)
}

fn avro_type_of(value: &FieldValue) -> Option<serde_json::Value> {
    match value {
        FieldValue::Null => None,
        FieldValue::Boolean(_) => Some(json!("boolean")),
        FieldValue::Integer(_) => Some(json!("long")),
        FieldValue::Float(_) => Some(json!("double")),
        FieldValue::Text(_) => Some(json!("string")),
        FieldValue::Bytes(_) => Some(json!("bytes")),
        FieldValue::Timestamp(_) => {
            Some(json!({"type": "long", "logicalType": "timestamp-millis"}))
        }
    }
}

fn to_avro_value(value: &FieldValue) -> AvroValue {
    match value {
        FieldValue::Null => AvroValue::Union(0, Box::new(AvroValue::Null)),
        FieldValue::Boolean(b) => AvroValue::Union(1, Box::new(AvroValue::Boolean(*b))),
        FieldValue::Integer(i) => AvroValue::Union(1, Box::new(AvroValue::Long(*i))),
        FieldValue::Float(f) => AvroValue::Union(1, Box::new(AvroValue::Double(*f))),
        FieldValue::Text(s) => AvroValue::Union(1, Box::new(AvroValue::String(s.clone()))),
        FieldValue::Bytes(b) => AvroValue::Union(1, Box::new(AvroValue::Bytes(b.clone()))),
        FieldValue::Timestamp(ts) => AvroValue::Union(
            1,
            Box::new(AvroValue::TimestampMillis(ts.timestamp_millis())),
        ),
    }
}

/// Encode a batch of rows as a deflate-compressed Avro container file
pub fn encode(name: &str, records: &[Record]) -> Result<Vec<u8>> {
    let schema = derive_schema(name, records)?;
    let mut writer = Writer::with_codec(&schema, Vec::new(), Codec::Deflate);

    for record in records {
        let fields: Vec<(String, AvroValue)> = record
            .columns()
            .iter()
            .map(|(col, val)| (col.clone(), to_avro_value(val)))
            .collect();
        writer.append(AvroValue::Record(fields))?;
    }

    writer.into_inner().map_err(TidemarkError::from)
}

/// Decode an Avro container file back into rows
pub fn decode(bytes: &[u8]) -> Result<Vec<Record>> {
    let reader = Reader::new(bytes)?;
    let mut records = Vec::new();

    for value in reader {
        let value = value?;
        match value {
            AvroValue::Record(fields) => {
                let columns = fields
                    .into_iter()
                    .map(|(col, val)| Ok((col, from_avro_value(val)?)))
                    .collect::<Result<Vec<_>>>()?;
                records.push(Record::new(columns));
            }
            other => {
                return Err(TidemarkError::Schema(format!(
                    "expected an Avro record, got {:?}",
                    other
                )))
            }
        }
    }

    Ok(records)
}

fn from_avro_value(value: AvroValue) -> Result<FieldValue> {
    match value {
        AvroValue::Union(_, inner) => from_avro_value(*inner),
        AvroValue::Null => Ok(FieldValue::Null),
        AvroValue::Boolean(b) => Ok(FieldValue::Boolean(b)),
        AvroValue::Int(i) => Ok(FieldValue::Integer(i64::from(i))),
        AvroValue::Long(i) => Ok(FieldValue::Integer(i)),
        AvroValue::Float(f) => Ok(FieldValue::Float(f64::from(f))),
        AvroValue::Double(f) => Ok(FieldValue::Float(f)),
        AvroValue::String(s) => Ok(FieldValue::Text(s)),
        AvroValue::Bytes(b) => Ok(FieldValue::Bytes(b)),
        AvroValue::TimestampMillis(ms) => {
            let ts: DateTime<Utc> = DateTime::from_timestamp_millis(ms).ok_or_else(|| {
                TidemarkError::Schema(format!("timestamp {} ms out of range", ms))
            })?;
            Ok(FieldValue::Timestamp(ts))
        }
        other => Err(TidemarkError::Schema(format!(
            "unsupported Avro value in partition file: {:?}",
            other
        ))),
    }
}

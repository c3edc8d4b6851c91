//! MySQL source adapter
//!
//! Scans relations over a `mysql_async` connection pool. The scan is a
//! plain `SELECT *`; relation names are validated at the domain boundary
//! (identifier characters only), which is what makes the interpolation
//! below safe.

use crate::adapters::source::traits::SourceReader;
use crate::config::schema::SourceConfig;
use crate::domain::errors::SourceError;
use crate::domain::ids::RelationName;
use crate::domain::record::{FieldValue, Record, Snapshot};
use crate::domain::result::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use mysql_async::prelude::Queryable;
use mysql_async::{Opts, OptsBuilder, Pool, PoolConstraints, PoolOpts, Row, Value};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::debug;

/// Source reader backed by a MySQL connection pool
pub struct MySqlSource {
    pool: Pool,
    timeout: Duration,
}

impl MySqlSource {
    /// Build a pool from the source configuration
    ///
    /// The pool is lazy; no connection is made until the first scan.
    pub fn connect(config: &SourceConfig) -> Result<Self> {
        let opts = Opts::from_url(config.url.expose_secret().as_ref())
            .map_err(|e| SourceError::ConnectionFailed(format!("invalid source URL: {}", e)))?;

        let constraints = PoolConstraints::new(1, config.pool_max_connections.max(1))
            .unwrap_or_default();
        let opts = OptsBuilder::from_opts(opts)
            .pool_opts(PoolOpts::default().with_constraints(constraints));

        Ok(Self {
            pool: Pool::new(opts),
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    /// Close the pool, draining its connections
    pub async fn disconnect(self) -> Result<()> {
        self.pool
            .disconnect()
            .await
            .map_err(|e| SourceError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }

    fn convert_row(relation: &RelationName, row: Row) -> Result<Record> {
        let columns: Vec<String> = row
            .columns_ref()
            .iter()
            .map(|c| c.name_str().to_string())
            .collect();

        let mut fields = Vec::with_capacity(columns.len());
        let values = row.unwrap();
        for (name, value) in columns.into_iter().zip(values) {
            let field = convert_value(value).map_err(|message| SourceError::InvalidRow {
                relation: relation.to_string(),
                message: format!("column '{}': {}", name, message),
            })?;
            fields.push((name, field));
        }

        Ok(Record::new(fields))
    }
}

/// Map a MySQL protocol value into the domain value model
fn convert_value(value: Value) -> std::result::Result<FieldValue, String> {
    match value {
        Value::NULL => Ok(FieldValue::Null),
        Value::Int(i) => Ok(FieldValue::Integer(i)),
        Value::UInt(u) => i64::try_from(u)
            .map(FieldValue::Integer)
            .map_err(|_| format!("unsigned value {} exceeds the integer range", u)),
        Value::Float(f) => Ok(FieldValue::Float(f64::from(f))),
        Value::Double(f) => Ok(FieldValue::Float(f)),
        Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Ok(FieldValue::Text(text)),
            Err(e) => Ok(FieldValue::Bytes(e.into_bytes())),
        },
        Value::Date(year, month, day, hour, minute, second, micros) => {
            let naive = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
                .and_then(|d| {
                    d.and_hms_micro_opt(
                        u32::from(hour),
                        u32::from(minute),
                        u32::from(second),
                        micros,
                    )
                })
                .ok_or_else(|| {
                    format!(
                        "invalid datetime {}-{}-{} {}:{}:{}",
                        year, month, day, hour, minute, second
                    )
                })?;
            Ok(FieldValue::Timestamp(Utc.from_utc_datetime(&naive)))
        }
        Value::Time(..) => Err("TIME values are not supported".to_string()),
    }
}

#[async_trait]
impl SourceReader for MySqlSource {
    async fn load(&self, relation: &RelationName) -> Result<Snapshot> {
        let mut conn = self
            .pool
            .get_conn()
            .await
            .map_err(|e| SourceError::ConnectionFailed(e.to_string()))?;

        let query = format!("SELECT * FROM {}", relation);
        debug!(relation = %relation, "Scanning source relation");

        let rows: Vec<Row> = tokio::time::timeout(self.timeout, conn.query(query.as_str()))
            .await
            .map_err(|_| {
                SourceError::QueryFailed(format!(
                    "scan of '{}' timed out after {:?}",
                    relation, self.timeout
                ))
            })?
            .map_err(|e| SourceError::QueryFailed(e.to_string()))?;

        let records = rows
            .into_iter()
            .map(|row| Self::convert_row(relation, row))
            .collect::<Result<Vec<_>>>()?;

        debug!(relation = %relation, rows = records.len(), "Scan complete");
        Ok(Snapshot::new(relation.clone(), records))
    }
}

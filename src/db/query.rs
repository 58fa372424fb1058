//! Query execution with rows materialized as JSON objects.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde_json::{json, Map, Value};
use thiserror::Error;

use super::Database;

/// A result row: column name to value.
pub type Record = Map<String, Value>;

/// Errors raised while executing a query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Query worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("Refusing to run a statement that writes: {0}")]
    NotReadOnly(String),
}

/// Executes SQL and returns rows as JSON records.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run `sql` and return every row, in the order the statement yields them.
    async fn query_array_json(&self, sql: &str, params: &[Value])
        -> Result<Vec<Record>, QueryError>;

    /// Run `sql` and return the first row, if any.
    async fn query_object_json(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<Record>, QueryError> {
        Ok(self.query_array_json(sql, params).await?.into_iter().next())
    }
}

#[async_trait]
impl QueryExecutor for Database {
    async fn query_array_json(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<Record>, QueryError> {
        self.run_query(sql, params, None).await
    }

    async fn query_object_json(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<Record>, QueryError> {
        Ok(self.run_query(sql, params, Some(1)).await?.into_iter().next())
    }
}

impl Database {
    async fn run_query(
        &self,
        sql: &str,
        params: &[Value],
        limit: Option<usize>,
    ) -> Result<Vec<Record>, QueryError> {
        let conn = self.shared();
        let sql = sql.to_owned();
        let params = params.to_vec();

        let records = tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            query_rows(&conn, &sql, &params, limit)
        })
        .await??;

        tracing::trace!(rows = records.len(), "query complete");
        Ok(records)
    }
}

/// Run a read-only statement and collect up to `limit` rows as records.
pub(crate) fn query_rows(
    conn: &Connection,
    sql: &str,
    params: &[Value],
    limit: Option<usize>,
) -> Result<Vec<Record>, QueryError> {
    let mut stmt = conn.prepare(sql)?;
    if !stmt.readonly() {
        return Err(QueryError::NotReadOnly(sql.trim().to_string()));
    }

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = stmt.query(params_from_iter(params.iter().map(sql_from_json)))?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        if limit.is_some_and(|max| records.len() >= max) {
            break;
        }

        let mut record = Record::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            let value: SqlValue = row.get(index)?;
            record.insert(column.clone(), json_from_sql(value));
        }
        records.push(record);
    }

    Ok(records)
}

/// Bind a JSON parameter as its natural SQLite type.
fn sql_from_json(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(flag) => SqlValue::Integer(i64::from(*flag)),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => SqlValue::Integer(integer),
            None if number.is_f64() => number.as_f64().map_or(SqlValue::Null, SqlValue::Real),
            // Unsigned values past i64::MAX keep their digits as text
            None => SqlValue::Text(number.to_string()),
        },
        Value::String(text) => SqlValue::Text(text.clone()),
        // Arrays and objects are stored as JSON text
        other => SqlValue::Text(other.to_string()),
    }
}

fn json_from_sql(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(value) => json!(value),
        SqlValue::Real(value) => json!(value),
        SqlValue::Text(value) => Value::String(value),
        SqlValue::Blob(value) => Value::String(STANDARD.encode(value)),
    }
}

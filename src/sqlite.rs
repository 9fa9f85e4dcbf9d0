//! SQLite backend for the `Executor` trait.
//!
//! Values cross the boundary as `sea_query::Value` on our side and
//! `rusqlite::types::Value` on SQLite's side. NULLs decoded from SQLite carry no
//! type, so they come back as `Value::String(None)`.

use crate::config::DatabaseConfig;
use crate::executor::{ExecError, Executor, Row};
use crate::value::is_null;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use sea_query::Value;
use std::path::Path;
use std::time::{Duration, Instant};

#[cfg(feature = "tracing")]
use crate::tracing_helpers;

/// Implementation of `Executor` for a `rusqlite::Connection`
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    /// Create a new executor from an open connection
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open (or create) a database file
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Sqlite` if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExecError> {
        Ok(Self::new(Connection::open(path)?))
    }

    /// Open a private in-memory database
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Sqlite` if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, ExecError> {
        Ok(Self::new(Connection::open_in_memory()?))
    }

    /// Open the database described by `config`
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Sqlite` if the database cannot be opened or configured.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, ExecError> {
        let conn = Connection::open(&config.path)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        log::debug!("opened sqlite database at {}", config.path);
        Ok(Self::new(conn))
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consume the executor and return the underlying connection
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Run several `;`-separated statements without parameters (schema setup)
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Sqlite` if any statement fails.
    pub fn execute_batch(&self, sql: &str) -> Result<(), ExecError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Check if the connection answers `SELECT 1`
    ///
    /// # Errors
    ///
    /// Returns `ExecError` if the health check query itself fails.
    pub fn check_health(&self) -> Result<bool, ExecError> {
        let one: i64 = self.conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(one == 1)
    }
}

impl Executor for SqliteExecutor {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, ExecError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::execute_query_span(sql).entered();

        let bound = bind_all(params)?;
        let start = Instant::now();
        let mut stmt = self.conn.prepare_cached(sql)?;
        let affected = stmt.execute(params_from_iter(bound.iter()))?;
        log::trace!("{sql} ({} params, {affected} rows, {:?})", bound.len(), start.elapsed());

        Ok(affected as u64)
    }

    fn query_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, ExecError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::execute_query_span(sql).entered();

        let bound = bind_all(params)?;
        let start = Instant::now();
        let mut stmt = self.conn.prepare_cached(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt.query(params_from_iter(bound.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                values.push(decode(row.get_ref(idx)?));
            }
            out.push(Row::new(columns.clone(), values)?);
        }
        log::trace!("{sql} ({} params, {} rows, {:?})", bound.len(), out.len(), start.elapsed());

        Ok(out)
    }

    fn last_insert_id(&self) -> Result<Value, ExecError> {
        Ok(Value::BigInt(Some(self.conn.last_insert_rowid())))
    }
}

fn bind_all(params: &[Value]) -> Result<Vec<SqlValue>, ExecError> {
    params.iter().map(bind).collect()
}

/// Convert one `sea_query::Value` into its SQLite storage class.
pub(crate) fn bind(value: &Value) -> Result<SqlValue, ExecError> {
    if is_null(value) {
        return Ok(SqlValue::Null);
    }
    let bound = match value {
        Value::Bool(Some(b)) => SqlValue::Integer(i64::from(*b)),
        Value::TinyInt(Some(i)) => SqlValue::Integer(i64::from(*i)),
        Value::SmallInt(Some(i)) => SqlValue::Integer(i64::from(*i)),
        Value::Int(Some(i)) => SqlValue::Integer(i64::from(*i)),
        Value::BigInt(Some(i)) => SqlValue::Integer(*i),
        Value::TinyUnsigned(Some(u)) => SqlValue::Integer(i64::from(*u)),
        Value::SmallUnsigned(Some(u)) => SqlValue::Integer(i64::from(*u)),
        Value::Unsigned(Some(u)) => SqlValue::Integer(i64::from(*u)),
        Value::BigUnsigned(Some(u)) => SqlValue::Integer(i64::try_from(*u).map_err(|_| {
            ExecError::Unsupported(format!(
                "BigUnsigned value {u} exceeds i64::MAX and cannot be stored"
            ))
        })?),
        Value::Float(Some(f)) => SqlValue::Real(f64::from(*f)),
        Value::Double(Some(d)) => SqlValue::Real(*d),
        Value::String(Some(s)) => SqlValue::Text(s.to_string()),
        Value::Char(Some(c)) => SqlValue::Text(c.to_string()),
        Value::Bytes(Some(b)) => SqlValue::Blob(b.to_vec()),
        Value::Json(Some(j)) => SqlValue::Text(j.to_string()),
        other => {
            return Err(ExecError::Unsupported(format!("{other:?}")));
        }
    };
    Ok(bound)
}

/// Convert a borrowed SQLite cell into an owned `sea_query::Value`.
pub(crate) fn decode(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::String(None),
        ValueRef::Integer(i) => Value::BigInt(Some(i)),
        ValueRef::Real(f) => Value::Double(Some(f)),
        ValueRef::Text(bytes) => Value::String(Some(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Blob(bytes) => Value::Bytes(Some(bytes.to_vec())),
    }
}

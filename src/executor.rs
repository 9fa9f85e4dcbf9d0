//! `Executor` module.
//!
//! Provides the `Executor` trait that abstracts the storage backend. The record
//! runtime, the finder and the code generator only ever talk to the database
//! through this trait, one blocking statement at a time.

use sea_query::Value;
use std::fmt;

/// `Executor` error type
#[derive(Debug)]
pub enum ExecError {
    /// SQLite error from `rusqlite`
    Sqlite(rusqlite::Error),
    /// Row decoding error
    Parse(String),
    /// A bound value has no representation in the backend
    Unsupported(String),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Sqlite(e) => {
                write!(f, "SQLite error: {e}")
            }
            ExecError::Parse(s) => {
                write!(f, "Parse error: {s}")
            }
            ExecError::Unsupported(s) => {
                write!(f, "Unsupported value: {s}")
            }
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for ExecError {
    fn from(err: rusqlite::Error) -> Self {
        ExecError::Sqlite(err)
    }
}

/// One result row: column names in select order, each paired with its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Build a row from parallel column/value vectors.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Parse` when the two vectors differ in length.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Result<Self, ExecError> {
        if columns.len() != values.len() {
            return Err(ExecError::Parse(format!(
                "row has {} columns but {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self { columns, values })
    }

    /// Value of `column`, or `None` when the row does not carry it.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    /// Value at a positional index.
    pub fn get_index(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate `(column, value)` pairs in select order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Consume the row into owned `(column, value)` pairs.
    pub fn into_pairs(self) -> impl Iterator<Item = (String, Value)> {
        self.columns.into_iter().zip(self.values)
    }
}

/// Trait for executing database operations
///
/// Implementations bind `params` positionally to `?` placeholders. The trait is
/// object safe so lifecycle hooks can receive `&dyn Executor` and issue their
/// own statements or save other records.
///
/// # Examples
///
/// ```no_run
/// use rowkeeper::{Executor, SqliteExecutor, ExecError};
/// use sea_query::Value;
///
/// # fn main() -> Result<(), ExecError> {
/// let executor = SqliteExecutor::open_in_memory()?;
/// executor.execute("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)", &[])?;
/// executor.execute("INSERT INTO users (name) VALUES (?)", &[Value::from("Alice")])?;
/// let id = executor.last_insert_id()?;
/// let rows = executor.query_all("SELECT id, name FROM users WHERE id = ?", &[id])?;
/// assert_eq!(rows.len(), 1);
/// # Ok(())
/// # }
/// ```
pub trait Executor {
    /// Execute a statement and return the number of rows affected
    ///
    /// # Errors
    ///
    /// Returns `ExecError` if the statement fails or a parameter cannot be bound.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, ExecError>;

    /// Execute a query and return all rows in backend order
    ///
    /// # Errors
    ///
    /// Returns `ExecError` if the query fails or a column cannot be decoded.
    fn query_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, ExecError>;

    /// Primary key assigned by the most recent INSERT on this connection
    ///
    /// # Errors
    ///
    /// Returns `ExecError` if the backend cannot report it.
    fn last_insert_id(&self) -> Result<Value, ExecError>;

    /// Execute a query and return the first row, if any
    ///
    /// # Errors
    ///
    /// Returns `ExecError` if the query fails.
    fn query_first(&self, sql: &str, params: &[Value]) -> Result<Option<Row>, ExecError> {
        Ok(self.query_all(sql, params)?.into_iter().next())
    }
}

//! Per-table metadata: table name, ordered columns, primary key.
//!
//! Produced ahead of time (usually by `rowkeeper-codegen`) and treated as
//! read-only configuration by the runtime.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    table_name: String,
    columns: Vec<String>,
    primary_key: String,
}

impl Metadata {
    /// Build metadata, checking that the primary key is a declared column and
    /// that no column repeats.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMetadata` when either invariant is violated.
    pub fn new<I, S>(table_name: impl Into<String>, columns: I, primary_key: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table_name = table_name.into();
        let primary_key = primary_key.into();
        let mut ordered: Vec<String> = Vec::new();
        for column in columns {
            let column = column.into();
            if ordered.contains(&column) {
                return Err(Error::InvalidMetadata(format!(
                    "column `{column}` declared twice on `{table_name}`"
                )));
            }
            ordered.push(column);
        }
        if !ordered.contains(&primary_key) {
            return Err(Error::InvalidMetadata(format!(
                "primary key `{primary_key}` is not a column of `{table_name}`"
            )));
        }
        Ok(Self {
            table_name,
            columns: ordered,
            primary_key,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Resolve `column` to the declared spelling, or fail with `AttributeNotFound`.
    pub(crate) fn require_column(&self, column: &str) -> Result<&str> {
        self.columns
            .iter()
            .find(|c| c.as_str() == column)
            .map(String::as_str)
            .ok_or_else(|| Error::attribute_not_found(&self.table_name, column))
    }
}

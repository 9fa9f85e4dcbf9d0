//! Schema introspection over an `Executor`.
//!
//! Tables come from `sqlite_master` (internal `sqlite_%` tables excluded),
//! columns from `PRAGMA table_info`.

use crate::error::Result;
use crate::table::{ColumnDefinition, TableDefinition};
use rowkeeper::{ExecError, Executor, Row, Value};

const LIST_TABLES: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

/// Names of all user tables, sorted.
pub fn list_tables(db: &dyn Executor) -> Result<Vec<String>> {
    let rows = db.query_all(LIST_TABLES, &[])?;
    rows.iter().map(|row| text(row, "name")).collect()
}

/// Columns of `table_name` in declaration order.
pub fn describe_table(db: &dyn Executor, table_name: &str) -> Result<TableDefinition> {
    let sql = format!("PRAGMA table_info(\"{}\")", table_name.replace('"', "\"\""));
    let rows = db.query_all(&sql, &[])?;

    let columns = rows
        .iter()
        .map(|row| {
            Ok(ColumnDefinition {
                name: text(row, "name")?,
                sql_type: text(row, "type")?,
                not_null: integer(row, "notnull")? != 0,
                primary_key_position: u32::try_from(integer(row, "pk")?).unwrap_or(0),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    log::debug!("{} has {} column(s)", table_name, columns.len());

    Ok(TableDefinition {
        table_name: table_name.to_string(),
        columns,
    })
}

/// Describe every table, or only those named in `only` (in schema order).
pub fn introspect(db: &dyn Executor, only: Option<&[String]>) -> Result<Vec<TableDefinition>> {
    list_tables(db)?
        .into_iter()
        .filter(|name| only.map_or(true, |allowed| allowed.iter().any(|a| a == name)))
        .map(|name| describe_table(db, &name))
        .collect()
}

fn text(row: &Row, column: &str) -> Result<String> {
    match row.get(column) {
        Some(Value::String(Some(s))) => Ok(s.to_string()),
        Some(Value::String(None)) => Ok(String::new()),
        other => Err(ExecError::Parse(format!("expected text in `{column}`, got {other:?}")).into()),
    }
}

fn integer(row: &Row, column: &str) -> Result<i64> {
    match row.get(column) {
        Some(Value::BigInt(Some(i))) => Ok(*i),
        other => Err(ExecError::Parse(format!("expected integer in `{column}`, got {other:?}")).into()),
    }
}

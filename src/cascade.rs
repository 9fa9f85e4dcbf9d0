//! Dependent-row cleanup on destroy.
//!
//! An owner entity lists its dependents as `(child table, foreign key)` pairs.
//! Destroying an owner issues one `DELETE FROM child WHERE fk = ?` per rule.
//! Child rows are removed with plain SQL, so the child entity's own hooks do
//! not run.

use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::metadata::Metadata;
use crate::statement;
use sea_query::Value;

/// One cascade rule: rows of `table` whose `foreign_key` equals the owner's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependent {
    table: String,
    foreign_key: String,
}

impl Dependent {
    /// Declare a dependent table, checking the foreign key against its metadata.
    ///
    /// # Errors
    ///
    /// Returns `Error::AttributeNotFound` when `foreign_key` is not a column of
    /// `child`.
    pub fn new(child: &Metadata, foreign_key: &str) -> Result<Self> {
        let foreign_key = child.require_column(foreign_key)?;
        Ok(Self {
            table: child.table_name().to_string(),
            foreign_key: foreign_key.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }

    /// Delete every row of the dependent table pointing at `owner_key`.
    pub(crate) fn delete_for(&self, db: &dyn Executor, owner_key: &Value) -> Result<u64> {
        let stmt = statement::delete_where(&self.table, &self.foreign_key, owner_key.clone());
        let affected = db.execute(&stmt.sql, &stmt.values).map_err(Error::from)?;
        log::debug!(
            "cascade removed {} row(s) from {} where {} = {:?}",
            affected,
            self.table,
            self.foreign_key,
            owner_key
        );
        Ok(affected)
    }
}

/// Run every rule in declaration order; returns the total rows removed.
pub(crate) fn cascade_delete(
    db: &dyn Executor,
    dependents: &[Dependent],
    owner_key: &Value,
) -> Result<u64> {
    let mut total = 0;
    for dependent in dependents {
        total += dependent.delete_for(db, owner_key)?;
    }
    Ok(total)
}

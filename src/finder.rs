//! Finder queries.
//!
//! `SelectQuery` is returned by [`Entity::find`](crate::Entity::find) and
//! [`Entity::find_by_id`](crate::Entity::find_by_id). It selects every declared
//! column of the entity's table and materializes rows as persisted records.
//!
//! # Example
//!
//! ```no_run
//! use rowkeeper::{Condition, Entity, Metadata, Order, SqliteExecutor};
//!
//! # fn main() -> rowkeeper::Result<()> {
//! let db = SqliteExecutor::open_in_memory()?;
//! let posts = Entity::plain(Metadata::new("posts", ["id", "title"], "id")?);
//!
//! let recent = posts
//!     .find()
//!     .filter(Condition::positional("title LIKE ?", ["Hello%"]))
//!     .order_by("id", Order::Desc)
//!     .limit(10)
//!     .all(&db)?;
//! # Ok(())
//! # }
//! ```

use crate::condition::Condition;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::record::Record;
use crate::statement::{self, Fragment, SelectParts, Statement};
use sea_query::{Order, Value};
use std::sync::Arc;

#[cfg(feature = "tracing")]
use crate::tracing_helpers;

#[derive(Debug, Clone)]
pub struct SelectQuery {
    entity: Arc<Entity>,
    primary_key: Option<Value>,
    conditions: Vec<Condition>,
    order: Vec<(String, Order)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQuery {
    pub(crate) fn new(entity: Arc<Entity>) -> Self {
        Self {
            entity,
            primary_key: None,
            conditions: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub(crate) fn primary_key(mut self, id: Value) -> Self {
        self.primary_key = Some(id);
        self
    }

    /// Add a condition; several filters are ANDed in the order given.
    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, order: Order) -> Self {
        self.order.push((column.into(), order));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// The SELECT this query would run.
    ///
    /// # Errors
    ///
    /// - `Error::AttributeNotFound` if a column condition or ordering names an
    ///   undeclared column
    /// - `Error::UnboundParameter` if a named placeholder has no value
    pub fn to_statement(&self) -> Result<Statement> {
        let metadata = self.entity.metadata();

        let mut filter = match &self.primary_key {
            Some(id) => Fragment::column_eq(metadata.primary_key(), id.clone()),
            None => Fragment::default(),
        };
        for condition in &self.conditions {
            condition.check_columns(metadata)?;
            filter = filter.and(condition.to_fragment()?);
        }
        for (column, _) in &self.order {
            metadata.require_column(column)?;
        }

        Ok(statement::select(
            metadata.table_name(),
            metadata.columns(),
            SelectParts {
                filter: Some(filter),
                order: self.order.clone(),
                limit: self.limit,
                offset: self.offset,
            },
        ))
    }

    /// Every matching record, in backend order unless ordered explicitly.
    ///
    /// # Errors
    ///
    /// Returns statement-building errors from [`to_statement`](Self::to_statement)
    /// and `Error::Executor` if the query fails.
    pub fn all(&self, db: &dyn Executor) -> Result<Vec<Record>> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::find_span(self.entity.table_name()).entered();

        let stmt = self.to_statement()?;
        let rows = db.query_all(&stmt.sql, &stmt.values)?;
        log::trace!("{} {} row(s) matched", self.entity.table_name(), rows.len());

        Ok(rows
            .into_iter()
            .map(|row| Record::from_row(&self.entity, row))
            .collect())
    }

    /// The first matching record, if any.
    ///
    /// # Errors
    ///
    /// Same as [`all`](Self::all).
    pub fn first(&self, db: &dyn Executor) -> Result<Option<Record>> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::find_span(self.entity.table_name()).entered();

        let stmt = self.to_statement()?;
        let row = db.query_first(&stmt.sql, &stmt.values)?;
        Ok(row.map(|row| Record::from_row(&self.entity, row)))
    }

    /// The first matching record.
    ///
    /// # Errors
    ///
    /// Returns `Error::RecordNotFound` when nothing matches, otherwise the same
    /// errors as [`all`](Self::all).
    pub fn one(&self, db: &dyn Executor) -> Result<Record> {
        self.first(db)?.ok_or_else(|| Error::RecordNotFound {
            table: self.entity.table_name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    fn posts() -> Arc<Entity> {
        Entity::plain(Metadata::new("posts", ["id", "title", "body"], "id").unwrap())
    }

    #[test]
    fn test_find_selects_declared_columns() {
        let stmt = posts().find().to_statement().unwrap();
        assert_eq!(stmt.sql, r#"SELECT "id", "title", "body" FROM "posts""#);
        assert!(stmt.values.is_empty());
    }

    #[test]
    fn test_find_by_id_binds_key_first() {
        let stmt = posts()
            .find_by_id(5)
            .filter(Condition::positional("title = ?", ["x"]))
            .to_statement()
            .unwrap();
        assert!(stmt.sql.contains(r#"("id" = ?) AND (title = ?)"#));
        assert_eq!(stmt.values, vec![Value::from(5), Value::from("x")]);
    }

    #[test]
    fn test_unknown_condition_column_rejected_before_sql() {
        let err = posts()
            .find()
            .filter(Condition::columns([("author", "x")]))
            .to_statement()
            .unwrap_err();
        assert!(matches!(err, Error::AttributeNotFound { .. }));
    }

    #[test]
    fn test_unknown_order_column_rejected() {
        let err = posts()
            .find()
            .order_by("author", Order::Asc)
            .to_statement()
            .unwrap_err();
        assert!(matches!(err, Error::AttributeNotFound { .. }));
    }

    #[test]
    fn test_order_and_limit() {
        let stmt = posts()
            .find()
            .order_by("id", Order::Desc)
            .limit(2)
            .to_statement()
            .unwrap();
        assert!(stmt.sql.contains(r#"ORDER BY "id" DESC"#));
        assert!(stmt.sql.contains("LIMIT"));
    }
}

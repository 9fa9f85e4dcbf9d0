//! SQL statement construction.
//!
//! INSERT/UPDATE/DELETE/SELECT text comes from `sea-query`'s SQLite builder, so
//! identifiers are always quoted and every value travels as a `?` bind.
//! Condition fragments produced by the condition builder are spliced in with
//! `Expr::cust_with_values`, which keeps their binds in fragment order.

use sea_query::{
    DeleteStatement, Expr, ExprTrait, Iden, InsertStatement, Order, SelectStatement,
    SqliteQueryBuilder, UpdateStatement, Value,
};

/// Runtime identifier (table or column name taken from metadata).
#[derive(Debug, Clone)]
pub(crate) struct Name(String);

impl Name {
    pub(crate) fn new(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl Iden for Name {
    fn unquoted(&self) -> &str {
        &self.0
    }
}

/// SQL text plus its positional binds.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub values: Vec<Value>,
}

impl Statement {
    fn built((sql, values): (String, sea_query::Values)) -> Self {
        Self {
            sql,
            values: values.iter().cloned().collect(),
        }
    }
}

/// Quote an identifier the way the SQLite builder does.
pub(crate) fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// A WHERE fragment with its binds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    pub sql: String,
    pub values: Vec<Value>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            values,
        }
    }

    /// `"column" = ?`
    pub(crate) fn column_eq(column: &str, value: Value) -> Self {
        Self::new(format!("{} = ?", quote(column)), vec![value])
    }

    /// Conjoin two fragments; `self`'s binds come first.
    pub fn and(self, other: Fragment) -> Fragment {
        if self.sql.is_empty() {
            return other;
        }
        if other.sql.is_empty() {
            return self;
        }
        let mut values = self.values;
        values.extend(other.values);
        Fragment {
            sql: format!("({}) AND ({})", self.sql, other.sql),
            values,
        }
    }

    fn into_expr(self) -> Expr {
        if self.values.is_empty() {
            Expr::cust(self.sql)
        } else {
            Expr::cust_with_values(self.sql, self.values)
        }
    }
}

pub(crate) fn insert(table: &str, assignments: Vec<(String, Value)>) -> Statement {
    if assignments.is_empty() {
        return Statement {
            sql: format!("INSERT INTO {} DEFAULT VALUES", quote(table)),
            values: Vec::new(),
        };
    }

    let mut query = InsertStatement::default();
    query.into_table(Name::new(table));

    let mut columns = Vec::with_capacity(assignments.len());
    let mut values = Vec::with_capacity(assignments.len());
    for (column, value) in assignments {
        columns.push(Name(column));
        values.push(Expr::val(value));
    }
    query.columns(columns);
    // columns and values are pushed in lockstep above
    query.values_panic(values);

    Statement::built(query.build(SqliteQueryBuilder))
}

pub(crate) fn update(
    table: &str,
    assignments: Vec<(String, Value)>,
    primary_key: &str,
    key: Value,
) -> Statement {
    let mut query = UpdateStatement::default();
    query.table(Name::new(table));
    for (column, value) in assignments {
        query.value(Name(column), Expr::val(value));
    }
    query.and_where(Expr::col(Name::new(primary_key)).eq(key));

    Statement::built(query.build(SqliteQueryBuilder))
}

pub(crate) fn delete_where(table: &str, column: &str, key: Value) -> Statement {
    let mut query = DeleteStatement::default();
    query
        .from_table(Name::new(table))
        .and_where(Expr::col(Name::new(column)).eq(key));

    Statement::built(query.build(SqliteQueryBuilder))
}

/// Shape of a SELECT over one table.
#[derive(Debug, Clone, Default)]
pub(crate) struct SelectParts {
    pub filter: Option<Fragment>,
    pub order: Vec<(String, Order)>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

pub(crate) fn select(table: &str, columns: &[String], parts: SelectParts) -> Statement {
    let mut query = SelectStatement::default();
    query
        .columns(columns.iter().map(|c| Name::new(c)))
        .from(Name::new(table));

    if let Some(filter) = parts.filter {
        if !filter.sql.is_empty() {
            query.and_where(filter.into_expr());
        }
    }
    for (column, order) in parts.order {
        query.order_by(Name(column), order);
    }
    if let Some(limit) = parts.limit {
        query.limit(limit);
    }
    if let Some(offset) = parts.offset {
        query.offset(offset);
    }

    Statement::built(query.build(SqliteQueryBuilder))
}

//! Span constructors used when the `tracing` feature is enabled.

use tracing::{span, Level, Span};

/// Span wrapping one statement sent to the backend.
pub(crate) fn execute_query_span(sql: &str) -> Span {
    span!(Level::DEBUG, "rowkeeper.execute_query", db.statement = sql)
}

/// Span wrapping a full `save()` call including its callbacks.
pub(crate) fn save_span(table: &str, new_record: bool) -> Span {
    span!(Level::DEBUG, "rowkeeper.save", db.table = table, new_record)
}

/// Span wrapping a full `destroy()` call including the cascade.
pub(crate) fn destroy_span(table: &str) -> Span {
    span!(Level::DEBUG, "rowkeeper.destroy", db.table = table)
}

/// Span wrapping a finder query.
pub(crate) fn find_span(table: &str) -> Span {
    span!(Level::DEBUG, "rowkeeper.find", db.table = table)
}

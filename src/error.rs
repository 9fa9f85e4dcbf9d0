//! Error types for record operations.
//!
//! Every failure surfaces to the direct caller of the triggering operation;
//! nothing is retried or swallowed at this layer.

use crate::callbacks::HookPoint;
use crate::executor::ExecError;
use std::fmt;

/// Result alias used across the runtime.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for record, finder and lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Construction or access referenced a column the entity does not declare
    #[error("attribute `{column}` not found on `{table}`")]
    AttributeNotFound { table: String, column: String },

    /// Mutation or re-destruction attempted on a destroyed record
    #[error("`{table}` record is frozen after destroy")]
    ObjectFrozen { table: String },

    /// A single-result finder matched zero rows
    #[error("no `{table}` record matched the query")]
    RecordNotFound { table: String },

    /// A lifecycle hook returned an error; the hook's own error is kept verbatim
    #[error("{hook} callback aborted: {source}")]
    CallbackAborted {
        hook: HookPoint,
        #[source]
        source: HookError,
    },

    /// A stored value could not be converted to the requested Rust type
    #[error("attribute `{column}` on `{table}` cannot be read as {expected}")]
    TypeMismatch {
        table: String,
        column: String,
        expected: String,
    },

    /// A `:name` placeholder had no matching bind value
    #[error("no value bound for named placeholder `:{name}`")]
    UnboundParameter { name: String },

    /// A positional fragment's `?` count differs from its argument count
    #[error("fragment has {placeholders} placeholder(s) but {values} value(s)")]
    BindCountMismatch { placeholders: usize, values: usize },

    /// Metadata handed to the runtime violates its own invariants
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Storage backend failure
    #[error(transparent)]
    Executor(#[from] ExecError),
}

impl Error {
    pub(crate) fn attribute_not_found(table: &str, column: &str) -> Self {
        Error::AttributeNotFound {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    /// The hook error carried by a `CallbackAborted`, if this is one.
    pub fn hook_error(&self) -> Option<&HookError> {
        match self {
            Error::CallbackAborted { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Error returned by a [`RecordBehavior`](crate::RecordBehavior) hook.
///
/// `Display` prints exactly the message the hook supplied, so callers can
/// match business-rule aborts by text.
#[derive(Debug)]
pub struct HookError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping its text as the message.
    pub fn from_source<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<Error> for HookError {
    fn from(err: Error) -> Self {
        HookError::from_source(err)
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        HookError::new(message)
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        HookError::new(message)
    }
}

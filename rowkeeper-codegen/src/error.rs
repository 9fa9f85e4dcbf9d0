//! Error types for codegen

use rowkeeper::ExecError;

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("schema introspection failed: {0}")]
    Introspection(#[from] ExecError),

    #[error("generation error: {0}")]
    Generation(String),
}

pub type Result<T> = std::result::Result<T, CodegenError>;

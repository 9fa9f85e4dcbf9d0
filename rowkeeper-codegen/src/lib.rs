//! Rowkeeper Codegen Library
//!
//! Reads a live SQLite schema and generates, per table, the metadata file the
//! runtime consumes plus an editable behavior stub. The main entry point is
//! [`Generator`].

pub mod error;
pub mod generator;
pub mod introspect;
pub mod table;
pub mod writer;

pub use error::{CodegenError, Result};
pub use generator::{GenerationReport, Generator};
pub use table::{classify, ColumnDefinition, TableDefinition};
pub use writer::EntityWriter;

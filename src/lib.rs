//! # Rowkeeper
//!
//! Synchronous active-record runtime: rows bound to in-memory records with
//! dirty tracking, lifecycle hooks around save/destroy, condition-driven
//! finders and cascading deletes, over any [`Executor`] (SQLite shipped).
//!
//! ```no_run
//! use rowkeeper::{Entity, Metadata, Record, SqliteExecutor};
//!
//! # fn main() -> rowkeeper::Result<()> {
//! let db = SqliteExecutor::open_in_memory()?;
//! db.execute_batch("CREATE TABLE posts (id INTEGER PRIMARY KEY, title TEXT)")?;
//!
//! let posts = Entity::plain(Metadata::new("posts", ["id", "title"], "id")?);
//! let mut post = Record::new(&posts, [("title", "Hello")])?;
//! post.save(&db)?;
//!
//! let id: i64 = post.get_as("id")?;
//! let found = posts.find_by_id(id).one(&db)?;
//! assert_eq!(found, post);
//! # Ok(())
//! # }
//! ```

pub mod attributes;
pub mod callbacks;
pub mod cascade;
pub mod condition;
pub mod config;
pub mod entity;
pub mod error;
pub mod executor;
pub mod finder;
mod lifecycle;
pub mod metadata;
pub mod record;
pub mod sqlite;
mod statement;
pub mod value;

#[cfg(feature = "tracing")]
mod tracing_helpers;

pub use callbacks::{HookPoint, NoCallbacks, RecordBehavior};
pub use cascade::Dependent;
pub use condition::{Condition, Operand};
pub use config::DatabaseConfig;
pub use entity::{Entity, EntityBuilder};
pub use error::{Error, HookError, Result};
pub use executor::{ExecError, Executor, Row};
pub use finder::SelectQuery;
pub use metadata::Metadata;
pub use record::Record;
pub use sqlite::SqliteExecutor;
pub use statement::{Fragment, Statement};

pub use sea_query::{Order, Value};

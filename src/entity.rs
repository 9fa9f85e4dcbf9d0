//! Entity definitions: metadata plus behavior plus cascade rules.
//!
//! An `Entity` is built once (usually from generated metadata) and shared by
//! every record of its type through an `Arc`.

use crate::callbacks::{NoCallbacks, RecordBehavior};
use crate::cascade::Dependent;
use crate::error::Result;
use crate::finder::SelectQuery;
use crate::metadata::Metadata;
use sea_query::Value;
use std::fmt;
use std::sync::Arc;

pub struct Entity {
    metadata: Metadata,
    behavior: Box<dyn RecordBehavior>,
    dependents: Vec<Dependent>,
}

impl Entity {
    /// Start building an entity over `metadata` with no hooks and no dependents.
    pub fn builder(metadata: Metadata) -> EntityBuilder {
        EntityBuilder {
            metadata,
            behavior: Box::new(NoCallbacks),
            dependents: Vec::new(),
        }
    }

    /// Shorthand for an entity with no hooks and no dependents.
    pub fn plain(metadata: Metadata) -> Arc<Self> {
        Arc::new(Self {
            metadata,
            behavior: Box::new(NoCallbacks),
            dependents: Vec::new(),
        })
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn table_name(&self) -> &str {
        self.metadata.table_name()
    }

    pub fn primary_key(&self) -> &str {
        self.metadata.primary_key()
    }

    pub fn behavior(&self) -> &dyn RecordBehavior {
        self.behavior.as_ref()
    }

    pub fn dependents(&self) -> &[Dependent] {
        &self.dependents
    }

    /// Query over every row of this entity's table.
    pub fn find(self: &Arc<Self>) -> SelectQuery {
        SelectQuery::new(Arc::clone(self))
    }

    /// Query scoped to one primary key; further filters are ANDed after it.
    pub fn find_by_id(self: &Arc<Self>, id: impl Into<Value>) -> SelectQuery {
        SelectQuery::new(Arc::clone(self)).primary_key(id.into())
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("metadata", &self.metadata)
            .field("dependents", &self.dependents)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Entity`].
///
/// Cascade rules are validated as they are added; the first invalid rule is
/// reported by [`build`](EntityBuilder::build).
pub struct EntityBuilder {
    metadata: Metadata,
    behavior: Box<dyn RecordBehavior>,
    dependents: Vec<Result<Dependent>>,
}

impl EntityBuilder {
    #[must_use]
    pub fn behavior<B: RecordBehavior + 'static>(mut self, behavior: B) -> Self {
        self.behavior = Box::new(behavior);
        self
    }

    /// Delete rows of `child` whose `foreign_key` matches this entity's primary
    /// key whenever one of its records is destroyed.
    #[must_use]
    pub fn dependent(mut self, child: &Metadata, foreign_key: &str) -> Self {
        self.dependents.push(Dependent::new(child, foreign_key));
        self
    }

    /// # Errors
    ///
    /// Returns `Error::AttributeNotFound` if a declared foreign key is not a
    /// column of its child table.
    pub fn build(self) -> Result<Arc<Entity>> {
        let dependents = self.dependents.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(Arc::new(Entity {
            metadata: self.metadata,
            behavior: self.behavior,
            dependents,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn posts() -> Metadata {
        Metadata::new("posts", ["id", "title", "body"], "id").unwrap()
    }

    fn comments() -> Metadata {
        Metadata::new("comments", ["id", "post_id", "body"], "id").unwrap()
    }

    #[test]
    fn test_builder_collects_dependents() {
        let entity = Entity::builder(posts())
            .dependent(&comments(), "post_id")
            .build()
            .unwrap();
        assert_eq!(entity.table_name(), "posts");
        assert_eq!(entity.primary_key(), "id");
        assert_eq!(entity.dependents().len(), 1);
        assert_eq!(entity.dependents()[0].table(), "comments");
    }

    #[test]
    fn test_builder_reports_bad_foreign_key() {
        let err = Entity::builder(posts())
            .dependent(&comments(), "article_id")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::AttributeNotFound { .. }));
    }

    #[test]
    fn test_debug_omits_behavior() {
        let entity = Entity::plain(posts());
        let text = format!("{entity:?}");
        assert!(text.contains("posts"));
        assert!(text.contains(".."));
    }
}

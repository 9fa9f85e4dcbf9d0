//! Lifecycle hooks.
//!
//! `RecordBehavior` lets an entity run custom logic at fixed points of
//! `save()` and `destroy()`. Every method has an empty default, so an entity
//! only overrides the hooks it needs. A hook may rewrite attributes on the
//! record it receives, issue statements through the executor, or return an
//! error to abort the operation.

use crate::error::HookError;
use crate::executor::Executor;
use crate::record::Record;
use std::fmt;

/// Named hook points, in the order a save or destroy visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    BeforeSave,
    BeforeCreate,
    BeforeUpdate,
    AfterCreate,
    AfterUpdate,
    AfterSave,
    BeforeDestroy,
    AfterDestroy,
}

impl HookPoint {
    pub const ALL: [HookPoint; 8] = [
        HookPoint::BeforeSave,
        HookPoint::BeforeCreate,
        HookPoint::BeforeUpdate,
        HookPoint::AfterCreate,
        HookPoint::AfterUpdate,
        HookPoint::AfterSave,
        HookPoint::BeforeDestroy,
        HookPoint::AfterDestroy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HookPoint::BeforeSave => "before_save",
            HookPoint::BeforeCreate => "before_create",
            HookPoint::BeforeUpdate => "before_update",
            HookPoint::AfterCreate => "after_create",
            HookPoint::AfterUpdate => "after_update",
            HookPoint::AfterSave => "after_save",
            HookPoint::BeforeDestroy => "before_destroy",
            HookPoint::AfterDestroy => "after_destroy",
        }
    }

    /// Hooks that run after the row has already been written or deleted.
    pub fn is_post_persistence(self) -> bool {
        matches!(
            self,
            HookPoint::AfterCreate
                | HookPoint::AfterUpdate
                | HookPoint::AfterSave
                | HookPoint::AfterDestroy
        )
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle hooks for one entity type
///
/// # Example
///
/// ```no_run
/// use rowkeeper::{Executor, HookError, Record, RecordBehavior};
///
/// struct SlugBehavior;
///
/// impl RecordBehavior for SlugBehavior {
///     fn before_save(&self, record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
///         let slug: String = record.get_as("slug")?;
///         record.set("slug", slug.to_lowercase())?;
///         Ok(())
///     }
/// }
/// ```
pub trait RecordBehavior: Send + Sync {
    /// Runs first on every save, before the create/update branch is chosen.
    fn before_save(&self, _record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs before the INSERT of a new record.
    fn before_create(&self, _record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs before the UPDATE of a persisted record.
    fn before_update(&self, _record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs after the INSERT. Changes made here stay in memory only.
    fn after_create(&self, _record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs after the UPDATE. Changes made here stay in memory only.
    fn after_update(&self, _record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs last on every successful save. Changes made here stay in memory only.
    fn after_save(&self, _record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs before the DELETE. An error leaves the row and the record untouched.
    fn before_destroy(&self, _record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs after the row and its dependents are gone and the record is frozen.
    fn after_destroy(&self, _record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Ok(())
    }
}

/// Behavior with no hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCallbacks;

impl RecordBehavior for NoCallbacks {}

/// Dispatch `point` to the matching trait method.
pub(crate) fn run_hook(
    behavior: &dyn RecordBehavior,
    point: HookPoint,
    record: &mut Record,
    db: &dyn Executor,
) -> Result<(), HookError> {
    match point {
        HookPoint::BeforeSave => behavior.before_save(record, db),
        HookPoint::BeforeCreate => behavior.before_create(record, db),
        HookPoint::BeforeUpdate => behavior.before_update(record, db),
        HookPoint::AfterCreate => behavior.after_create(record, db),
        HookPoint::AfterUpdate => behavior.after_update(record, db),
        HookPoint::AfterSave => behavior.after_save(record, db),
        HookPoint::BeforeDestroy => behavior.before_destroy(record, db),
        HookPoint::AfterDestroy => behavior.after_destroy(record, db),
    }
}

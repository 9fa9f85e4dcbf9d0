//! Save and destroy state machines.
//!
//! `save()` runs `before_save`, then `before_create`/`before_update`, writes the
//! row, then `after_create`/`after_update` and `after_save`. `destroy()` runs
//! `before_destroy`, deletes the row and its dependents, freezes the record,
//! then runs `after_destroy`.
//!
//! The first hook error stops the sequence. Before the write nothing has
//! reached the database; after it the write stands and the error is only
//! reported. The modified set is cleared only when every phase succeeds.

use crate::callbacks::{run_hook, HookPoint, RecordBehavior};
use crate::cascade::cascade_delete;
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::record::Record;
use crate::statement;
use crate::value::is_null;
use sea_query::Value;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use crate::tracing_helpers;

impl Record {
    /// Insert or update this record, running the save hooks around the write.
    ///
    /// # Errors
    ///
    /// - `Error::ObjectFrozen` if the record was destroyed
    /// - `Error::CallbackAborted` if a hook returns an error
    /// - `Error::Executor` if the statement fails
    pub fn save(&mut self, db: &dyn Executor) -> Result<()> {
        self.ensure_not_frozen()?;

        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::save_span(self.table_name(), self.new_record).entered();

        let entity = Arc::clone(self.entity());
        let behavior = entity.behavior();
        // WHERE key for updates, fixed before any hook can rewrite it
        let key = self.id().cloned();

        self.run_phase(behavior, HookPoint::BeforeSave, db)?;
        if self.new_record {
            self.run_phase(behavior, HookPoint::BeforeCreate, db)?;
            self.insert_row(db)?;
            self.run_phase(behavior, HookPoint::AfterCreate, db)?;
        } else {
            self.run_phase(behavior, HookPoint::BeforeUpdate, db)?;
            self.update_row(db, key)?;
            self.run_phase(behavior, HookPoint::AfterUpdate, db)?;
        }
        self.run_phase(behavior, HookPoint::AfterSave, db)?;

        self.attributes.clear_modified();
        Ok(())
    }

    /// Delete this record's row and every dependent row, then freeze it.
    ///
    /// Destroying a record that was never saved does nothing.
    ///
    /// # Errors
    ///
    /// - `Error::ObjectFrozen` if the record was already destroyed
    /// - `Error::CallbackAborted` if a hook returns an error; an
    ///   `after_destroy` failure is reported after the row is gone
    /// - `Error::Executor` if a statement fails
    pub fn destroy(&mut self, db: &dyn Executor) -> Result<()> {
        self.ensure_not_frozen()?;
        if self.new_record {
            log::debug!("destroy on unsaved {} record ignored", self.table_name());
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::destroy_span(self.table_name()).entered();

        let entity = Arc::clone(self.entity());
        let behavior = entity.behavior();
        let key = self.persisted_key(self.id().cloned())?;

        self.run_phase(behavior, HookPoint::BeforeDestroy, db)?;

        let stmt = statement::delete_where(entity.table_name(), entity.primary_key(), key.clone());
        db.execute(&stmt.sql, &stmt.values)?;
        log::debug!("deleted {} row {:?}", entity.table_name(), key);

        cascade_delete(db, entity.dependents(), &key)?;
        self.frozen = true;

        self.run_phase(behavior, HookPoint::AfterDestroy, db)
    }

    /// Assign every pair, then save.
    ///
    /// All keys are checked before any value is assigned, so an unknown column
    /// leaves the record untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::AttributeNotFound` for an undeclared column, otherwise
    /// anything [`save`](Record::save) returns.
    pub fn update_attributes<I, K, V>(&mut self, db: &dyn Executor, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.ensure_not_frozen()?;
        let pairs = attributes
            .into_iter()
            .map(|(column, val)| {
                self.metadata()
                    .require_column(column.as_ref())
                    .map(|c| (c.to_string(), val.into()))
            })
            .collect::<Result<Vec<_>>>()?;
        for (column, val) in pairs {
            self.attributes.write(&column, val);
        }
        self.save(db)
    }

    fn run_phase(
        &mut self,
        behavior: &dyn RecordBehavior,
        point: HookPoint,
        db: &dyn Executor,
    ) -> Result<()> {
        run_hook(behavior, point, self, db).map_err(|source| {
            if point.is_post_persistence() {
                log::warn!(
                    "{} hook on {} failed after the write: {}",
                    point,
                    self.table_name(),
                    source
                );
            }
            Error::CallbackAborted { hook: point, source }
        })
    }

    fn insert_row(&mut self, db: &dyn Executor) -> Result<()> {
        let entity = Arc::clone(self.entity());
        let primary_key = entity.primary_key();

        let assignments: Vec<(String, Value)> = entity
            .metadata()
            .columns()
            .iter()
            .filter_map(|column| {
                let val = self.attributes.get(column)?;
                if column == primary_key && is_null(val) {
                    return None;
                }
                Some((column.clone(), val.clone()))
            })
            .collect();
        let supplied_key = assignments.iter().any(|(c, _)| c == primary_key);

        let stmt = statement::insert(entity.table_name(), assignments);
        db.execute(&stmt.sql, &stmt.values)?;

        if !supplied_key {
            let id = db.last_insert_id()?;
            self.attributes.load(primary_key, id);
        }
        self.new_record = false;
        log::debug!("inserted {} row {:?}", entity.table_name(), self.id());
        Ok(())
    }

    fn update_row(&mut self, db: &dyn Executor, key: Option<Value>) -> Result<()> {
        let entity = Arc::clone(self.entity());
        let key = self.persisted_key(key)?;

        let assignments: Vec<(String, Value)> = self
            .attributes
            .modified()
            .iter()
            .filter_map(|column| {
                self.attributes
                    .get(column)
                    .map(|val| (column.clone(), val.clone()))
            })
            .collect();
        if assignments.is_empty() {
            log::trace!("{} row {:?} unchanged, update skipped", entity.table_name(), key);
            return Ok(());
        }

        let stmt = statement::update(entity.table_name(), assignments, entity.primary_key(), key.clone());
        let affected = db.execute(&stmt.sql, &stmt.values)?;
        log::debug!("updated {} row {:?} ({} affected)", entity.table_name(), key, affected);
        Ok(())
    }

    /// A persisted record must carry a non-null primary key.
    fn persisted_key(&self, key: Option<Value>) -> Result<Value> {
        key.filter(|k| !is_null(k))
            .ok_or_else(|| Error::RecordNotFound {
                table: self.table_name().to_string(),
            })
    }
}

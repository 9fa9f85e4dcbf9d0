//! `Record`: one in-memory row of one entity.
//!
//! A record owns its attribute store and shares its entity (metadata, hooks,
//! cascade rules) through an `Arc`. Every column name that crosses this API is
//! checked against the entity's metadata.

use crate::attributes::AttributeStore;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::executor::Row;
use crate::metadata::Metadata;
use crate::value;
use sea_query::{Value, ValueType};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Record {
    entity: Arc<Entity>,
    pub(crate) attributes: AttributeStore,
    pub(crate) new_record: bool,
    pub(crate) frozen: bool,
}

impl Record {
    /// Build an unsaved record from `(column, value)` pairs.
    ///
    /// Supplied values are the baseline, so the record starts unmodified. Any
    /// key outside the entity's columns rejects the whole construction.
    ///
    /// # Errors
    ///
    /// Returns `Error::AttributeNotFound` for an undeclared column.
    pub fn new<I, K, V>(entity: &Arc<Entity>, attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut store = AttributeStore::new();
        for (column, val) in attributes {
            let column = entity.metadata().require_column(column.as_ref())?;
            store.load(column, val.into());
        }
        Ok(Self {
            entity: Arc::clone(entity),
            attributes: store,
            new_record: true,
            frozen: false,
        })
    }

    /// An unsaved record with no attributes assigned.
    pub fn blank(entity: &Arc<Entity>) -> Self {
        Self {
            entity: Arc::clone(entity),
            attributes: AttributeStore::new(),
            new_record: true,
            frozen: false,
        }
    }

    /// Materialize a persisted record from a result row. Row columns the
    /// metadata does not declare are ignored.
    pub(crate) fn from_row(entity: &Arc<Entity>, row: Row) -> Self {
        let mut store = AttributeStore::new();
        for (column, val) in row.into_pairs() {
            if entity.metadata().has_column(&column) {
                store.load(&column, val);
            }
        }
        Self {
            entity: Arc::clone(entity),
            attributes: store,
            new_record: false,
            frozen: false,
        }
    }

    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    pub fn metadata(&self) -> &Metadata {
        self.entity.metadata()
    }

    pub fn table_name(&self) -> &str {
        self.entity.table_name()
    }

    /// Current value of `column`; `None` when it was never assigned.
    ///
    /// # Errors
    ///
    /// Returns `Error::AttributeNotFound` for an undeclared column.
    pub fn get(&self, column: &str) -> Result<Option<&Value>> {
        let column = self.metadata().require_column(column)?;
        Ok(self.attributes.get(column))
    }

    /// Read `column` as `T`. An unassigned column reads as NULL, so use
    /// `Option<T>` for nullable columns.
    ///
    /// # Errors
    ///
    /// Returns `Error::AttributeNotFound` for an undeclared column and
    /// `Error::TypeMismatch` when the value does not convert to `T`.
    pub fn get_as<T: ValueType>(&self, column: &str) -> Result<T> {
        let current = self.get(column)?.cloned().unwrap_or_else(value::null);
        value::convert::<T>(current).ok_or_else(|| Error::TypeMismatch {
            table: self.table_name().to_string(),
            column: column.to_string(),
            expected: T::type_name(),
        })
    }

    /// Assign `column` and mark it modified, even if the value is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::ObjectFrozen` once the record is destroyed, otherwise
    /// `Error::AttributeNotFound` for an undeclared column.
    pub fn set(&mut self, column: &str, val: impl Into<Value>) -> Result<()> {
        self.ensure_not_frozen()?;
        let column = self.entity.metadata().require_column(column)?;
        self.attributes.write(column, val.into());
        Ok(())
    }

    pub fn is_modified(&self) -> bool {
        self.attributes.is_modified()
    }

    /// Columns set since the last successful save, in first-set order.
    pub fn modified_columns(&self) -> &[String] {
        self.attributes.modified()
    }

    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Primary key value, if assigned.
    pub fn id(&self) -> Option<&Value> {
        self.attributes.get(self.entity.primary_key())
    }

    /// Assigned `(column, value)` pairs.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter()
    }

    /// Every declared column as a JSON object; unassigned columns are `null`.
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        for column in self.metadata().columns() {
            let rendered = self
                .attributes
                .get(column)
                .map_or(JsonValue::Null, value::to_json);
            map.insert(column.clone(), rendered);
        }
        JsonValue::Object(map)
    }

    pub(crate) fn ensure_not_frozen(&self) -> Result<()> {
        if self.frozen {
            return Err(Error::ObjectFrozen {
                table: self.table_name().to_string(),
            });
        }
        Ok(())
    }
}

impl PartialEq for Record {
    /// Same table, equivalent primary key and equivalent values for every
    /// declared column.
    fn eq(&self, other: &Self) -> bool {
        if self.table_name() != other.table_name() {
            return false;
        }
        if !value::equivalent(self.id(), other.id()) {
            return false;
        }
        self.metadata()
            .columns()
            .iter()
            .all(|c| value::equivalent(self.attributes.get(c), other.attributes.get(c)))
    }
}

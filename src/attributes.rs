//! Attribute store: current values plus the set of columns modified since the
//! last successful persistence.
//!
//! The store itself does not know which columns are legal; [`Record`](crate::Record)
//! checks every key against the entity's metadata before it reaches here.

use sea_query::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    values: Vec<(String, Value)>,
    modified: Vec<String>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a baseline value without marking it modified.
    pub fn load(&mut self, column: &str, value: Value) {
        match self.slot_mut(column) {
            Some(slot) => *slot = value,
            None => self.values.push((column.to_string(), value)),
        }
    }

    /// Overwrite a value and mark the column modified, even when unchanged.
    pub fn write(&mut self, column: &str, value: Value) {
        self.load(column, value);
        if !self.is_column_modified(column) {
            self.modified.push(column.to_string());
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn is_modified(&self) -> bool {
        !self.modified.is_empty()
    }

    pub fn is_column_modified(&self, column: &str) -> bool {
        self.modified.iter().any(|c| c == column)
    }

    /// Modified columns in the order they were first written.
    pub fn modified(&self) -> &[String] {
        &self.modified
    }

    pub fn clear_modified(&mut self) {
        self.modified.clear();
    }

    /// Assigned `(column, value)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(c, v)| (c.as_str(), v))
    }

    fn slot_mut(&mut self, column: &str) -> Option<&mut Value> {
        self.values
            .iter_mut()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }
}

//! Ordered field → value records.
//!
//! [`Record`] is both the input map for INSERT/UPDATE and the normalized shape
//! of every returned row. Column order is preserved.

use crate::error::{DbError, DbResult};
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tokio_postgres::Row;

/// An ordered mapping from field names to values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, builder style. An existing field keeps its position.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == field) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((field, value));
                None
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == field)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == field)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalize a driver row into a record, in column order.
    pub fn from_row(row: &Row) -> DbResult<Self> {
        let mut entries = Vec::with_capacity(row.len());
        for (idx, column) in row.columns().iter().enumerate() {
            let value: Value = row.try_get(idx)?;
            entries.push((column.name().to_string(), value));
        }
        Ok(Self { entries })
    }

    /// Fetch a field or fail with a descriptive error.
    pub fn require(&self, field: &str) -> DbResult<&Value> {
        self.get(field)
            .ok_or_else(|| DbError::invalid_argument(format!("record has no field '{field}'")))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Build a [`Record`] inline.
///
/// ```ignore
/// let r = pgchain::record! { "name" => "alice", "age" => 30 };
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($field:expr => $value:expr),+ $(,)?) => {
        $crate::Record::new()$(.set($field, $value))+
    };
}

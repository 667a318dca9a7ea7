//! The positional parameter vector.

use crate::value::Value;
use tokio_postgres::types::ToSql;

/// Append-only list of bound values.
///
/// The length at any point determines the next placeholder index, so clauses
/// must be rendered in statement order: SET, WHERE, LIMIT, OFFSET.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamList {
    params: Vec<Value>,
}

impl ParamList {
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based index.
    pub fn push(&mut self, value: impl Into<Value>) -> usize {
        self.params.push(value.into());
        self.params.len()
    }

    /// Add a parameter and return its `$n` placeholder.
    pub fn placeholder(&mut self, value: impl Into<Value>) -> String {
        format!("${}", self.push(value))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.params
    }

    /// Get all parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.params
    }
}

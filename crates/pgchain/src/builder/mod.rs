//! Fluent DML builders.
//!
//! Every builder is a consuming value: each chained call takes `self` and
//! returns it, and `execute(self)` finishes it exactly once. Builders borrow
//! the [`DatabaseManager`](crate::DatabaseManager) they were created from.
//!
//! - Placeholders are numbered in render order: SET, WHERE, LIMIT, OFFSET.
//! - UPDATE and DELETE require at least one condition.
//! - `build()` / `to_sql()` render without touching the connection.

pub mod clause;
pub mod delete;
pub mod insert;
pub mod select;
pub mod traits;
pub mod update;
pub mod where_builder;

pub use clause::{OrderList, SortDirection};
pub use delete::{DeleteQuery, DeleteResult};
pub use insert::{ConflictAction, InsertQuery, InsertResult, OnConflict};
pub use select::SelectQuery;
pub use traits::{BuiltQuery, Statement};
pub use update::UpdateQuery;
pub use where_builder::{FieldCondition, Filterable};

#[cfg(test)]
mod tests;

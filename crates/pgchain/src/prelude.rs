//! Convenient imports for typical `pgchain` usage.
//!
//! ```ignore
//! use pgchain::prelude::*;
//! ```

pub use crate::aggregate::{avg, count, count_all, max, min, sum, SelectField};
pub use crate::column_types;
pub use crate::record;
pub use crate::{
    DatabaseManager, DbError, DbResult, DeleteResult, InsertResult, ManagerConfig, Record,
    Statement, Value,
};

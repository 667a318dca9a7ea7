//! # pgchain
//!
//! Fluent, chainable SQL statements over a single Postgres connection.
//!
//! ## Features
//!
//! - **Parameterized**: every value travels as a `$n` placeholder
//! - **Safe defaults**: UPDATE and DELETE require WHERE
//! - **Closed value model**: [`Value`] covers every bound and returned value
//! - **Normalized rows**: results come back as ordered [`Record`]s
//! - **DDL**: CREATE / ALTER / DROP / TRUNCATE TABLE builders
//!
//! ## Example
//!
//! ```ignore
//! use pgchain::prelude::*;
//!
//! let mut db = DatabaseManager::new(ManagerConfig::from_env()?);
//! db.connect().await?;
//!
//! // SELECT
//! let adults = db
//!     .select(["id", "name"])
//!     .from("users")
//!     .where_("age").greater_than_or_equal(18)
//!     .and_where("name").contains("ann")
//!     .order_by("name").desc()
//!     .limit(10)
//!     .execute()
//!     .await?;
//!
//! // INSERT
//! db.insert_into("users")
//!     .values(record! { "name" => "alice", "age" => 30 })
//!     .on_conflict("name").do_nothing()
//!     .execute()
//!     .await?;
//!
//! // UPDATE
//! db.update("users")
//!     .set_value("age", 31)
//!     .where_("name").equals("alice")
//!     .execute()
//!     .await?;
//!
//! // DELETE
//! let removed = db.delete_from("users").where_("age").less_than(0).execute().await?;
//!
//! db.disconnect().await;
//! ```

pub mod aggregate;
pub mod builder;
pub mod column_types;
pub mod condition;
pub mod config;
pub mod ddl;
pub mod error;
pub mod ident;
pub mod manager;
pub mod param;
pub mod prelude;
pub mod record;
pub mod value;

pub use aggregate::{avg, count, count_all, max, min, sum, Aggregate, AggregateFunction, SelectField};
pub use builder::{
    BuiltQuery, ConflictAction, DeleteQuery, DeleteResult, FieldCondition, InsertQuery,
    InsertResult, OnConflict, SelectQuery, SortDirection, Statement, UpdateQuery,
};
pub use condition::{escape_like, Condition, ConditionList, Connector, Operand, Operator};
pub use config::ManagerConfig;
pub use ddl::{
    AlterOperation, AlterTable, ColumnBuilder, ColumnDefinition, ColumnModification, CreateTable,
    DropTable, TableConstraint, TruncateTable,
};
pub use error::{DbError, DbResult};
pub use manager::DatabaseManager;
pub use param::ParamList;
pub use record::Record;
pub use value::Value;

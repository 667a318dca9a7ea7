//! DELETE statement builder.

use super::traits::{BuiltQuery, Statement};
use super::where_builder::impl_filter_entry;
use crate::condition::ConditionList;
use crate::error::{DbError, DbResult};
use crate::ident::check_ident;
use crate::manager::DatabaseManager;
use crate::param::ParamList;
use serde::Serialize;

/// Outcome of a DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// DELETE builder. Refuses to run without a WHERE clause.
#[must_use = "builders do nothing until executed"]
pub struct DeleteQuery<'a> {
    manager: &'a DatabaseManager,
    table: Option<String>,
    conditions: ConditionList,
}

impl_filter_entry!(DeleteQuery);

impl<'a> DeleteQuery<'a> {
    pub(crate) fn new(manager: &'a DatabaseManager) -> Self {
        Self {
            manager,
            table: None,
            conditions: ConditionList::new(),
        }
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Run the delete and report how many rows went away.
    pub async fn execute(self) -> DbResult<DeleteResult> {
        let query = self.build()?;
        let deleted_count = self
            .manager
            .execute(&query.table, &query.sql, &query.params)
            .await?;
        Ok(DeleteResult { deleted_count })
    }
}

impl Statement for DeleteQuery<'_> {
    fn build(&self) -> DbResult<BuiltQuery> {
        let table = self
            .table
            .as_deref()
            .ok_or_else(|| DbError::configuration("Table name is required. Use from()"))?;
        check_ident("table", table)?;
        if self.conditions.is_empty() {
            return Err(DbError::unsafe_operation(format!(
                "DELETE on '{table}' without WHERE would remove every row"
            )));
        }

        let mut params = ParamList::new();
        let mut sql = format!("DELETE FROM {table}");
        if let Some(where_sql) = self.conditions.render_where(&mut params)? {
            sql.push(' ');
            sql.push_str(&where_sql);
        }

        Ok(BuiltQuery {
            table: table.to_string(),
            sql,
            params,
        })
    }
}

//! UPDATE statement builder.

use super::traits::{BuiltQuery, Statement};
use super::where_builder::impl_filter_entry;
use crate::condition::ConditionList;
use crate::error::{DbError, DbResult};
use crate::ident::check_ident;
use crate::manager::DatabaseManager;
use crate::param::ParamList;
use crate::record::Record;
use crate::value::Value;

/// UPDATE builder. Refuses to run without a WHERE clause.
#[must_use = "builders do nothing until executed"]
pub struct UpdateQuery<'a> {
    manager: &'a DatabaseManager,
    table: String,
    assignments: Record,
    conditions: ConditionList,
}

impl_filter_entry!(UpdateQuery);

impl<'a> UpdateQuery<'a> {
    pub(crate) fn new(manager: &'a DatabaseManager, table: impl Into<String>) -> Self {
        Self {
            manager,
            table: table.into(),
            assignments: Record::new(),
            conditions: ConditionList::new(),
        }
    }

    /// Merge `values` into the SET list.
    pub fn set(mut self, values: Record) -> Self {
        for (column, value) in values {
            self.assignments.insert(column, value);
        }
        self
    }

    pub fn set_value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assignments.insert(column, value);
        self
    }

    /// Run the update and return the `RETURNING *` rows.
    pub async fn execute(self) -> DbResult<Vec<Record>> {
        let query = self.build()?;
        self.manager
            .fetch(&query.table, &query.sql, &query.params)
            .await
    }
}

impl Statement for UpdateQuery<'_> {
    fn build(&self) -> DbResult<BuiltQuery> {
        check_ident("table", &self.table)?;
        if self.assignments.is_empty() {
            return Err(DbError::configuration("SET values are required. Use set()"));
        }
        if self.conditions.is_empty() {
            return Err(DbError::unsafe_operation(format!(
                "UPDATE on '{}' without WHERE would modify every row",
                self.table
            )));
        }

        let mut params = ParamList::new();
        let mut sets = Vec::with_capacity(self.assignments.len());
        for (column, value) in self.assignments.iter() {
            check_ident("column", column)?;
            sets.push(format!("{column} = {}", params.placeholder(value.clone())));
        }

        let mut sql = format!("UPDATE {} SET {}", self.table, sets.join(", "));
        if let Some(where_sql) = self.conditions.render_where(&mut params)? {
            sql.push(' ');
            sql.push_str(&where_sql);
        }
        sql.push_str(" RETURNING *");

        Ok(BuiltQuery {
            table: self.table.clone(),
            sql,
            params,
        })
    }
}

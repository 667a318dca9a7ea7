//! SELECT statement builder.

use super::clause::{render_pagination, OrderList, SortDirection};
use super::traits::{BuiltQuery, Statement};
use super::where_builder::impl_filter_entry;
use crate::aggregate::SelectField;
use crate::condition::ConditionList;
use crate::error::{DbError, DbResult};
use crate::ident::{check_field, check_ident};
use crate::manager::DatabaseManager;
use crate::param::ParamList;
use crate::record::Record;

/// SELECT builder. Created by [`DatabaseManager::select`] or
/// [`DatabaseManager::select_all`].
#[must_use = "builders do nothing until executed"]
pub struct SelectQuery<'a> {
    manager: &'a DatabaseManager,
    fields: Vec<SelectField>,
    distinct: bool,
    table: Option<String>,
    conditions: ConditionList,
    group_by: Vec<String>,
    order: OrderList,
    limit: Option<u64>,
    offset: Option<u64>,
    /// Build error (surfaced by `build`)
    build_error: Option<String>,
}

impl_filter_entry!(SelectQuery);

impl<'a> SelectQuery<'a> {
    pub(crate) fn new<I, F>(manager: &'a DatabaseManager, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<SelectField>,
    {
        let mut query = Self {
            manager,
            fields: Vec::new(),
            distinct: false,
            table: None,
            conditions: ConditionList::new(),
            group_by: Vec::new(),
            order: OrderList::new(),
            limit: None,
            offset: None,
            build_error: None,
        };
        for field in fields {
            query = query.field(field);
        }
        query
    }

    /// Append a field or aggregate.
    pub fn field(mut self, field: impl Into<SelectField>) -> Self {
        let field = field.into();
        if let Err(err) = field.validate() {
            self.record_error(err);
        }
        self.fields.push(field);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add `field ASC` (or re-select an existing entry) and make it current.
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order.order_by(field);
        self
    }

    pub fn order_by_desc(self, field: impl Into<String>) -> Self {
        self.order_by(field).desc()
    }

    pub fn asc(self) -> Self {
        self.direction(SortDirection::Asc)
    }

    pub fn desc(self) -> Self {
        self.direction(SortDirection::Desc)
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    fn direction(mut self, direction: SortDirection) -> Self {
        if let Err(err) = self.order.set_direction(direction) {
            self.record_error(err);
        }
        self
    }

    fn record_error(&mut self, err: DbError) {
        if self.build_error.is_none() {
            self.build_error = Some(match err {
                DbError::InvalidArgument(msg) => msg,
                other => other.to_string(),
            });
        }
    }

    /// Run the query and return every matching row.
    pub async fn execute(self) -> DbResult<Vec<Record>> {
        let query = self.build()?;
        self.manager
            .fetch(&query.table, &query.sql, &query.params)
            .await
    }
}

impl Statement for SelectQuery<'_> {
    fn build(&self) -> DbResult<BuiltQuery> {
        if let Some(err) = &self.build_error {
            return Err(DbError::InvalidArgument(err.clone()));
        }
        let table = self
            .table
            .as_deref()
            .ok_or_else(|| DbError::configuration("Table name is required. Use from()"))?;
        check_ident("table", table)?;

        let fields = if self.fields.is_empty() {
            "*".to_string()
        } else {
            let rendered: Vec<String> = self.fields.iter().map(SelectField::to_sql).collect();
            rendered.join(", ")
        };

        let mut params = ParamList::new();
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&fields);
        sql.push_str(" FROM ");
        sql.push_str(table);

        if let Some(where_sql) = self.conditions.render_where(&mut params)? {
            sql.push(' ');
            sql.push_str(&where_sql);
        }

        if !self.group_by.is_empty() {
            for column in &self.group_by {
                check_field("GROUP BY column", column)?;
            }
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if let Some(order_sql) = self.order.render()? {
            sql.push(' ');
            sql.push_str(&order_sql);
        }

        for clause in render_pagination(self.limit, self.offset, &mut params)? {
            sql.push(' ');
            sql.push_str(&clause);
        }

        Ok(BuiltQuery {
            table: table.to_string(),
            sql,
            params,
        })
    }
}

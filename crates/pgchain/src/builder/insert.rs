//! INSERT statement builder.

use super::traits::{BuiltQuery, Statement};
use crate::error::{DbError, DbResult};
use crate::ident::check_ident;
use crate::manager::DatabaseManager;
use crate::param::ParamList;
use crate::record::Record;
use crate::value::Value;
use tracing::warn;

/// Conflict action for ON CONFLICT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    /// Skip conflicting rows.
    DoNothing,
    /// Reconcile conflicting rows. Rejected with `NotImplemented` at build time.
    DoUpdate,
}

#[derive(Debug, Clone)]
struct ConflictClause {
    target: String,
    action: ConflictAction,
}

#[derive(Debug, Clone)]
enum Rows {
    None,
    Single(Record),
    Many(Vec<Record>),
}

/// What an INSERT returned.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertResult {
    /// Single-record insert; `None` when ON CONFLICT DO NOTHING skipped the row.
    One(Option<Record>),
    /// Bulk insert; may be shorter than the input under DO NOTHING.
    Many(Vec<Record>),
}

impl InsertResult {
    /// All returned rows, regardless of mode.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            InsertResult::One(row) => row.into_iter().collect(),
            InsertResult::Many(rows) => rows,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            InsertResult::One(row) => usize::from(row.is_some()),
            InsertResult::Many(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// INSERT builder. Created by [`DatabaseManager::insert`] or
/// [`DatabaseManager::insert_into`].
#[must_use = "builders do nothing until executed"]
pub struct InsertQuery<'a> {
    manager: &'a DatabaseManager,
    table: Option<String>,
    rows: Rows,
    conflict: Option<ConflictClause>,
}

impl<'a> InsertQuery<'a> {
    pub(crate) fn new(manager: &'a DatabaseManager) -> Self {
        Self {
            manager,
            table: None,
            rows: Rows::None,
            conflict: None,
        }
    }

    pub fn into(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Insert a single record.
    pub fn values(mut self, record: Record) -> Self {
        self.rows = Rows::Single(record);
        self
    }

    /// Insert many records in one statement. Columns come from the first record.
    pub fn values_many(mut self, records: Vec<Record>) -> Self {
        self.rows = Rows::Many(records);
        self
    }

    /// Start an `ON CONFLICT (column)` clause.
    pub fn on_conflict(self, column: impl Into<String>) -> OnConflict<'a> {
        OnConflict {
            query: self,
            target: column.into(),
        }
    }

    fn is_bulk(&self) -> bool {
        matches!(self.rows, Rows::Many(_))
    }

    /// Run the insert and return the `RETURNING *` rows.
    pub async fn execute(self) -> DbResult<InsertResult> {
        let query = self.build()?;
        let rows = self
            .manager
            .fetch(&query.table, &query.sql, &query.params)
            .await?;
        if self.is_bulk() {
            Ok(InsertResult::Many(rows))
        } else {
            Ok(InsertResult::One(rows.into_iter().next()))
        }
    }
}

/// Pending `ON CONFLICT (column)`; pick an action to return to the insert.
#[must_use = "choose do_nothing() or do_update()"]
pub struct OnConflict<'a> {
    query: InsertQuery<'a>,
    target: String,
}

impl<'a> OnConflict<'a> {
    pub fn do_nothing(self) -> InsertQuery<'a> {
        self.action(ConflictAction::DoNothing)
    }

    /// Accepted by the chain, but building the statement fails with `NotImplemented`.
    pub fn do_update(self) -> InsertQuery<'a> {
        self.action(ConflictAction::DoUpdate)
    }

    fn action(self, action: ConflictAction) -> InsertQuery<'a> {
        let mut query = self.query;
        query.conflict = Some(ConflictClause {
            target: self.target,
            action,
        });
        query
    }
}

impl Statement for InsertQuery<'_> {
    fn build(&self) -> DbResult<BuiltQuery> {
        let table = self
            .table
            .as_deref()
            .ok_or_else(|| DbError::configuration("Table name is required. Use into()"))?;
        check_ident("table", table)?;

        let mut params = ParamList::new();
        let (columns, groups) = match &self.rows {
            Rows::None => {
                return Err(DbError::configuration("Values are required. Use values()"));
            }
            Rows::Single(record) => {
                if record.is_empty() {
                    return Err(DbError::invalid_argument("Insert record cannot be empty"));
                }
                let columns: Vec<String> = record.keys().map(str::to_string).collect();
                let group = record
                    .values()
                    .map(|v| params.placeholder(v.clone()))
                    .collect::<Vec<_>>();
                (columns, vec![group])
            }
            Rows::Many(records) => bulk_groups(table, records, &mut params)?,
        };

        for column in &columns {
            check_ident("column", column)?;
        }

        let values_sql: Vec<String> = groups
            .iter()
            .map(|g| format!("({})", g.join(", ")))
            .collect();
        let mut sql = format!(
            "INSERT INTO {table} ({}) VALUES {}",
            columns.join(", "),
            values_sql.join(", ")
        );

        if let Some(conflict) = &self.conflict {
            check_ident("conflict column", &conflict.target)?;
            match conflict.action {
                ConflictAction::DoNothing => {
                    sql.push_str(&format!(" ON CONFLICT ({}) DO NOTHING", conflict.target));
                }
                ConflictAction::DoUpdate => {
                    return Err(DbError::not_implemented(
                        "ON CONFLICT DO UPDATE requires an explicit update column set",
                    ));
                }
            }
        }

        sql.push_str(" RETURNING *");

        Ok(BuiltQuery {
            table: table.to_string(),
            sql,
            params,
        })
    }
}

/// Columns from the first record; missing keys bind NULL, extra keys are dropped.
fn bulk_groups(
    table: &str,
    records: &[Record],
    params: &mut ParamList,
) -> DbResult<(Vec<String>, Vec<Vec<String>>)> {
    let first = records
        .first()
        .ok_or_else(|| DbError::configuration("Values are required. Use values_many()"))?;
    if let Some(idx) = records.iter().position(Record::is_empty) {
        return Err(DbError::invalid_argument(format!(
            "Insert record at index {idx} cannot be empty"
        )));
    }

    let columns: Vec<String> = first.keys().map(str::to_string).collect();
    let mut groups = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        let extra: Vec<&str> = record
            .keys()
            .filter(|k| !columns.iter().any(|c| c == k))
            .collect();
        if !extra.is_empty() {
            warn!(
                table,
                record = idx,
                dropped = ?extra,
                "bulk insert: dropping keys not present in the first record"
            );
        }

        let group = columns
            .iter()
            .map(|c| params.placeholder(record.get(c).cloned().unwrap_or(Value::Null)))
            .collect();
        groups.push(group);
    }

    Ok((columns, groups))
}

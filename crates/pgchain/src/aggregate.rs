//! Aggregation helpers for SELECT field lists.
//!
//! ```ignore
//! db.select([SelectField::from("team"), count_all().alias("members").into()])
//!     .from("players")
//!     .group_by(["team"]);
//! ```

use crate::error::{DbError, DbResult};
use std::fmt;

/// Supported aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    pub fn as_sql(self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }
}

/// `FUNC(column)[ AS alias]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub function: AggregateFunction,
    pub column: String,
    pub alias: Option<String>,
}

impl Aggregate {
    pub fn new(function: AggregateFunction, column: impl Into<String>) -> Self {
        Self {
            function,
            column: column.into(),
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Check column and alias. An empty column is only valid for COUNT, where it means `*`.
    pub fn validate(&self) -> DbResult<()> {
        if self.column.trim().is_empty() && self.function != AggregateFunction::Count {
            return Err(DbError::invalid_argument(format!(
                "{} requires a column",
                self.function.as_sql()
            )));
        }
        if let Some(alias) = &self.alias {
            if alias.trim().is_empty() {
                return Err(DbError::invalid_argument("Aggregate alias cannot be empty"));
            }
        }
        Ok(())
    }

    pub fn to_sql(&self) -> String {
        let column = if self.column.trim().is_empty() {
            "*"
        } else {
            self.column.as_str()
        };
        match &self.alias {
            Some(alias) => format!("{}({column}) AS {alias}", self.function.as_sql()),
            None => format!("{}({column})", self.function.as_sql()),
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

pub fn count(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Count, column)
}

/// `COUNT(*)`
pub fn count_all() -> Aggregate {
    Aggregate::new(AggregateFunction::Count, "*")
}

pub fn sum(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Sum, column)
}

pub fn avg(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Avg, column)
}

pub fn min(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Min, column)
}

pub fn max(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Max, column)
}

/// One entry of a SELECT field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectField {
    Column(String),
    Aggregate(Aggregate),
}

impl SelectField {
    pub fn validate(&self) -> DbResult<()> {
        match self {
            SelectField::Column(c) if c.trim().is_empty() => {
                Err(DbError::invalid_argument("SELECT field cannot be empty"))
            }
            SelectField::Column(_) => Ok(()),
            SelectField::Aggregate(a) => a.validate(),
        }
    }

    pub fn to_sql(&self) -> String {
        match self {
            SelectField::Column(c) => c.clone(),
            SelectField::Aggregate(a) => a.to_sql(),
        }
    }
}

impl From<&str> for SelectField {
    fn from(s: &str) -> Self {
        SelectField::Column(s.to_string())
    }
}

impl From<String> for SelectField {
    fn from(s: String) -> Self {
        SelectField::Column(s)
    }
}

impl From<Aggregate> for SelectField {
    fn from(a: Aggregate) -> Self {
        SelectField::Aggregate(a)
    }
}

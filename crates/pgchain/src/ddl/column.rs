//! Column definitions and the fluent column builder.

use crate::error::{DbError, DbResult};
use crate::value::Value;

/// One inline column constraint, kept in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    NotNull,
    Unique,
    PrimaryKey,
    Default(Value),
    Check(String),
    References { table: String, column: String },
}

impl ColumnConstraint {
    pub fn to_sql(&self) -> String {
        match self {
            ColumnConstraint::NotNull => "NOT NULL".to_string(),
            ColumnConstraint::Unique => "UNIQUE".to_string(),
            ColumnConstraint::PrimaryKey => "PRIMARY KEY".to_string(),
            ColumnConstraint::Default(value) => format!("DEFAULT {}", default_sql(value)),
            ColumnConstraint::Check(expr) => format!("CHECK ({expr})"),
            ColumnConstraint::References { table, column } => {
                format!("REFERENCES {table}({column})")
            }
        }
    }
}

/// Render a DEFAULT value.
///
/// Text ending in `()` is a function call and is emitted verbatim (`now()`);
/// other text is quoted; everything else renders as a literal.
pub fn default_sql(value: &Value) -> String {
    match value {
        Value::Text(s) if s.ends_with("()") => s.clone(),
        other => other.to_literal(),
    }
}

/// A column as it appears in CREATE TABLE or ADD COLUMN.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    /// Upper-cased type name.
    pub sql_type: Option<String>,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: None,
            constraints: Vec::new(),
        }
    }

    /// `name TYPE constraints...`
    pub fn to_sql(&self) -> DbResult<String> {
        let sql_type = self.sql_type.as_deref().ok_or_else(|| {
            DbError::configuration(format!("Column '{}' must have a type specified", self.name))
        })?;
        let mut parts = vec![self.name.clone(), sql_type.to_string()];
        parts.extend(self.constraints.iter().map(ColumnConstraint::to_sql));
        Ok(parts.join(" "))
    }
}

/// Something that collects finished column definitions.
pub trait ColumnOwner: Sized {
    fn accept_column(self, column: ColumnDefinition) -> DbResult<Self>;
}

/// Fluent builder for one column; `done()` hands it back to its owner.
#[must_use = "finish the column with done(), column() or execute()"]
pub struct ColumnBuilder<P> {
    pub(crate) owner: P,
    pub(crate) column: ColumnDefinition,
}

impl<P: ColumnOwner> ColumnBuilder<P> {
    pub(crate) fn new(owner: P, name: impl Into<String>) -> Self {
        Self {
            owner,
            column: ColumnDefinition::new(name),
        }
    }

    /// Set the column type. Stored upper-cased.
    pub fn sql_type(mut self, sql_type: impl AsRef<str>) -> Self {
        self.column.sql_type = Some(sql_type.as_ref().to_uppercase());
        self
    }

    pub fn not_null(self) -> Self {
        self.constraint(ColumnConstraint::NotNull)
    }

    pub fn unique(self) -> Self {
        self.constraint(ColumnConstraint::Unique)
    }

    pub fn primary_key(self) -> Self {
        self.constraint(ColumnConstraint::PrimaryKey)
    }

    pub fn default(self, value: impl Into<Value>) -> Self {
        self.constraint(ColumnConstraint::Default(value.into()))
    }

    pub fn check(self, expr: impl Into<String>) -> Self {
        self.constraint(ColumnConstraint::Check(expr.into()))
    }

    pub fn references(self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.constraint(ColumnConstraint::References {
            table: table.into(),
            column: column.into(),
        })
    }

    fn constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.column.constraints.push(constraint);
        self
    }

    /// Finalize the column into its owner.
    pub fn done(self) -> DbResult<P> {
        self.column.to_sql()?;
        self.owner.accept_column(self.column)
    }
}

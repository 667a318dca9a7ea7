use super::column::{ColumnBuilder, ColumnDefinition, ColumnOwner};
use crate::error::{DbError, DbResult};
use crate::ident::check_ident;
use crate::manager::DatabaseManager;
use crate::param::ParamList;

/// Table-level constraint in CREATE TABLE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableConstraint {
    PrimaryKey(Vec<String>),
    ForeignKey {
        column: String,
        ref_table: String,
        ref_column: String,
    },
    Unique(Vec<String>),
    Check {
        name: String,
        expr: String,
    },
}

impl TableConstraint {
    pub fn to_sql(&self) -> DbResult<String> {
        match self {
            TableConstraint::PrimaryKey(columns) => {
                Ok(format!("PRIMARY KEY ({})", column_list("PRIMARY KEY", columns)?))
            }
            TableConstraint::ForeignKey {
                column,
                ref_table,
                ref_column,
            } => {
                check_ident("foreign key column", column)?;
                check_ident("referenced table", ref_table)?;
                check_ident("referenced column", ref_column)?;
                Ok(format!(
                    "FOREIGN KEY ({column}) REFERENCES {ref_table}({ref_column})"
                ))
            }
            TableConstraint::Unique(columns) => {
                Ok(format!("UNIQUE ({})", column_list("UNIQUE", columns)?))
            }
            TableConstraint::Check { name, expr } => {
                check_ident("constraint", name)?;
                Ok(format!("CONSTRAINT {name} CHECK ({expr})"))
            }
        }
    }
}

fn column_list(kind: &str, columns: &[String]) -> DbResult<String> {
    if columns.is_empty() {
        return Err(DbError::invalid_argument(format!(
            "{kind} constraint needs at least one column"
        )));
    }
    for c in columns {
        check_ident("column", c)?;
    }
    Ok(columns.join(", "))
}

/// CREATE TABLE builder.
///
/// ```ignore
/// db.create_table("users")
///     .if_not_exists()
///     .column("id")?.sql_type("serial").primary_key()
///     .column("email")?.sql_type("varchar(255)").not_null().unique()
///     .column("created_at")?.sql_type("timestamptz").default("now()")
///     .execute()
///     .await?;
/// ```
#[must_use = "builders do nothing until executed"]
pub struct CreateTable<'a> {
    manager: &'a DatabaseManager,
    name: String,
    if_not_exists: bool,
    columns: Vec<ColumnDefinition>,
    constraints: Vec<TableConstraint>,
}

impl<'a> CreateTable<'a> {
    pub(crate) fn new(manager: &'a DatabaseManager, name: impl Into<String>) -> Self {
        Self {
            manager,
            name: name.into(),
            if_not_exists: false,
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Start a column. Empty, malformed or duplicate names are rejected here.
    pub fn column(self, name: impl Into<String>) -> DbResult<ColumnBuilder<Self>> {
        let name = name.into();
        check_ident("column", &name)?;
        if self.columns.iter().any(|c| c.name == name) {
            return Err(DbError::invalid_argument(format!(
                "Column '{name}' already defined on table '{}'",
                self.name
            )));
        }
        Ok(ColumnBuilder::new(self, name))
    }

    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.push(TableConstraint::PrimaryKey(
            columns.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn foreign_key(
        mut self,
        column: impl Into<String>,
        ref_table: impl Into<String>,
        ref_column: impl Into<String>,
    ) -> Self {
        self.constraints.push(TableConstraint::ForeignKey {
            column: column.into(),
            ref_table: ref_table.into(),
            ref_column: ref_column.into(),
        });
        self
    }

    pub fn unique<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.push(TableConstraint::Unique(
            columns.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn check(mut self, name: impl Into<String>, expr: impl Into<String>) -> Self {
        self.constraints.push(TableConstraint::Check {
            name: name.into(),
            expr: expr.into(),
        });
        self
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn to_sql(&self) -> DbResult<String> {
        check_ident("table", &self.name)?;
        if self.columns.is_empty() {
            return Err(DbError::configuration("At least one column is required"));
        }

        let mut parts = Vec::with_capacity(self.columns.len() + self.constraints.len());
        for column in &self.columns {
            parts.push(column.to_sql()?);
        }
        for constraint in &self.constraints {
            parts.push(constraint.to_sql()?);
        }

        let exists = if self.if_not_exists { "IF NOT EXISTS " } else { "" };
        Ok(format!(
            "CREATE TABLE {exists}{} ({})",
            self.name,
            parts.join(", ")
        ))
    }

    pub async fn execute(self) -> DbResult<()> {
        let sql = self.to_sql()?;
        self.manager
            .execute(&self.name, &sql, &ParamList::new())
            .await?;
        Ok(())
    }
}

impl ColumnOwner for CreateTable<'_> {
    fn accept_column(mut self, column: ColumnDefinition) -> DbResult<Self> {
        self.columns.push(column);
        Ok(self)
    }
}

/// Methods that finalize the pending column before continuing on the table.
impl<'a> ColumnBuilder<CreateTable<'a>> {
    pub fn column(self, name: impl Into<String>) -> DbResult<ColumnBuilder<CreateTable<'a>>> {
        self.done()?.column(name)
    }

    pub fn primary_key_constraint<I, S>(self, columns: I) -> DbResult<CreateTable<'a>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.done()?.primary_key(columns))
    }

    pub fn foreign_key_constraint(
        self,
        column: impl Into<String>,
        ref_table: impl Into<String>,
        ref_column: impl Into<String>,
    ) -> DbResult<CreateTable<'a>> {
        Ok(self.done()?.foreign_key(column, ref_table, ref_column))
    }

    pub fn unique_constraint<I, S>(self, columns: I) -> DbResult<CreateTable<'a>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.done()?.unique(columns))
    }

    pub fn check_constraint(
        self,
        name: impl Into<String>,
        expr: impl Into<String>,
    ) -> DbResult<CreateTable<'a>> {
        Ok(self.done()?.check(name, expr))
    }

    /// Render with the pending column included.
    pub fn to_sql(self) -> DbResult<String> {
        self.done()?.to_sql()
    }

    pub async fn execute(self) -> DbResult<()> {
        self.done()?.execute().await
    }
}

use super::column::{default_sql, ColumnBuilder, ColumnDefinition, ColumnOwner};
use crate::error::{DbError, DbResult};
use crate::ident::check_ident;
use crate::manager::DatabaseManager;
use crate::param::ParamList;
use crate::value::Value;
use tracing::error;

/// One ALTER TABLE action. Each runs as its own statement.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterOperation {
    AddColumn(ColumnDefinition),
    DropColumn { name: String, cascade: bool },
    SetType { column: String, sql_type: String },
    SetNotNull { column: String },
    DropNotNull { column: String },
    SetDefault { column: String, value: Value },
    DropDefault { column: String },
    RenameColumn { from: String, to: String },
    RenameTable { to: String },
    AddConstraint { name: String, kind: String, definition: String },
    DropConstraint { name: String, cascade: bool },
}

fn cascade_sql(cascade: bool) -> &'static str {
    if cascade { " CASCADE" } else { "" }
}

impl AlterOperation {
    /// The action text following `ALTER TABLE name`.
    pub fn to_sql(&self) -> DbResult<String> {
        let sql = match self {
            AlterOperation::AddColumn(column) => format!("ADD COLUMN {}", column.to_sql()?),
            AlterOperation::DropColumn { name, cascade } => {
                check_ident("column", name)?;
                format!("DROP COLUMN {name}{}", cascade_sql(*cascade))
            }
            AlterOperation::SetType { column, sql_type } => {
                check_ident("column", column)?;
                if sql_type.trim().is_empty() {
                    return Err(DbError::invalid_argument(format!(
                        "New type for column '{column}' cannot be empty"
                    )));
                }
                format!("ALTER COLUMN {column} TYPE {sql_type}")
            }
            AlterOperation::SetNotNull { column } => {
                check_ident("column", column)?;
                format!("ALTER COLUMN {column} SET NOT NULL")
            }
            AlterOperation::DropNotNull { column } => {
                check_ident("column", column)?;
                format!("ALTER COLUMN {column} DROP NOT NULL")
            }
            AlterOperation::SetDefault { column, value } => {
                check_ident("column", column)?;
                format!("ALTER COLUMN {column} SET DEFAULT {}", default_sql(value))
            }
            AlterOperation::DropDefault { column } => {
                check_ident("column", column)?;
                format!("ALTER COLUMN {column} DROP DEFAULT")
            }
            AlterOperation::RenameColumn { from, to } => {
                check_ident("column", from)?;
                check_ident("column", to)?;
                format!("RENAME COLUMN {from} TO {to}")
            }
            AlterOperation::RenameTable { to } => {
                check_ident("table", to)?;
                format!("RENAME TO {to}")
            }
            AlterOperation::AddConstraint {
                name,
                kind,
                definition,
            } => {
                check_ident("constraint", name)?;
                format!("ADD CONSTRAINT {name} {} {definition}", kind.to_uppercase())
            }
            AlterOperation::DropConstraint { name, cascade } => {
                check_ident("constraint", name)?;
                format!("DROP CONSTRAINT {name}{}", cascade_sql(*cascade))
            }
        };
        Ok(sql)
    }
}

/// ALTER TABLE builder: an ordered list of independent operations.
///
/// `execute` issues them one by one. The first failure stops the run and is
/// returned; operations before it stay applied.
#[must_use = "builders do nothing until executed"]
pub struct AlterTable<'a> {
    manager: &'a DatabaseManager,
    name: String,
    operations: Vec<AlterOperation>,
}

impl<'a> AlterTable<'a> {
    pub(crate) fn new(manager: &'a DatabaseManager, name: impl Into<String>) -> Self {
        Self {
            manager,
            name: name.into(),
            operations: Vec::new(),
        }
    }

    /// Start an `ADD COLUMN`; finish it with `done()`.
    pub fn add_column(self, name: impl Into<String>) -> DbResult<ColumnBuilder<Self>> {
        let name = name.into();
        check_ident("column", &name)?;
        Ok(ColumnBuilder::new(self, name))
    }

    pub fn drop_column(self, name: impl Into<String>, cascade: bool) -> Self {
        self.push(AlterOperation::DropColumn {
            name: name.into(),
            cascade,
        })
    }

    /// Start a sequence of `ALTER COLUMN` changes on `name`.
    pub fn modify_column(self, name: impl Into<String>) -> ColumnModification<'a> {
        ColumnModification {
            table: self,
            column: name.into(),
        }
    }

    pub fn rename_column(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.push(AlterOperation::RenameColumn {
            from: from.into(),
            to: to.into(),
        })
    }

    /// `RENAME TO`. Later operations still target the original name.
    pub fn rename_table(self, to: impl Into<String>) -> Self {
        self.push(AlterOperation::RenameTable { to: to.into() })
    }

    /// `ADD CONSTRAINT name KIND definition`, e.g. `("age_positive", "check", "(age > 0)")`.
    pub fn add_constraint(
        self,
        name: impl Into<String>,
        kind: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        self.push(AlterOperation::AddConstraint {
            name: name.into(),
            kind: kind.into(),
            definition: definition.into(),
        })
    }

    pub fn drop_constraint(self, name: impl Into<String>, cascade: bool) -> Self {
        self.push(AlterOperation::DropConstraint {
            name: name.into(),
            cascade,
        })
    }

    fn push(mut self, op: AlterOperation) -> Self {
        self.operations.push(op);
        self
    }

    pub fn operations(&self) -> &[AlterOperation] {
        &self.operations
    }

    /// One full `ALTER TABLE` statement per operation, in call order.
    pub fn statements(&self) -> DbResult<Vec<String>> {
        check_ident("table", &self.name)?;
        if self.operations.is_empty() {
            return Err(DbError::configuration("At least one operation is required"));
        }
        self.operations
            .iter()
            .map(|op| Ok(format!("ALTER TABLE {} {}", self.name, op.to_sql()?)))
            .collect()
    }

    pub async fn execute(self) -> DbResult<()> {
        let statements = self.statements()?;
        let total = statements.len();
        let params = ParamList::new();
        for (applied, sql) in statements.iter().enumerate() {
            if let Err(err) = self.manager.execute(&self.name, sql, &params).await {
                error!(table = %self.name, applied, total, "ALTER TABLE stopped part way");
                return Err(err);
            }
        }
        Ok(())
    }
}

impl ColumnOwner for AlterTable<'_> {
    fn accept_column(self, column: ColumnDefinition) -> DbResult<Self> {
        Ok(self.push(AlterOperation::AddColumn(column)))
    }
}

impl<'a> ColumnBuilder<AlterTable<'a>> {
    pub async fn execute(self) -> DbResult<()> {
        self.done()?.execute().await
    }
}

/// Pending `ALTER COLUMN` changes. Each call records its own operation.
#[must_use = "return to the table with done()"]
pub struct ColumnModification<'a> {
    table: AlterTable<'a>,
    column: String,
}

impl<'a> ColumnModification<'a> {
    fn push(mut self, op: AlterOperation) -> Self {
        self.table.operations.push(op);
        self
    }

    /// `TYPE t`; the type is upper-cased.
    pub fn set_type(self, sql_type: impl AsRef<str>) -> Self {
        let op = AlterOperation::SetType {
            column: self.column.clone(),
            sql_type: sql_type.as_ref().to_uppercase(),
        };
        self.push(op)
    }

    pub fn set_not_null(self) -> Self {
        let op = AlterOperation::SetNotNull {
            column: self.column.clone(),
        };
        self.push(op)
    }

    pub fn drop_not_null(self) -> Self {
        let op = AlterOperation::DropNotNull {
            column: self.column.clone(),
        };
        self.push(op)
    }

    pub fn set_default(self, value: impl Into<Value>) -> Self {
        let op = AlterOperation::SetDefault {
            column: self.column.clone(),
            value: value.into(),
        };
        self.push(op)
    }

    pub fn drop_default(self) -> Self {
        let op = AlterOperation::DropDefault {
            column: self.column.clone(),
        };
        self.push(op)
    }

    pub fn done(self) -> AlterTable<'a> {
        self.table
    }

    pub async fn execute(self) -> DbResult<()> {
        self.table.execute().await
    }
}

use crate::error::DbResult;
use crate::param::ParamList;

/// A rendered statement: SQL text plus its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    /// Target table, carried for error diagnostics.
    pub table: String,
    pub sql: String,
    pub params: ParamList,
}

/// Base trait for DML statement builders.
pub trait Statement {
    /// Validate the accumulated state and render SQL with parameters.
    fn build(&self) -> DbResult<BuiltQuery>;

    /// Debug helper.
    fn to_sql(&self) -> DbResult<String> {
        self.build().map(|q| q.sql)
    }
}

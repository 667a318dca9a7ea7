//! WHERE predicates and their renderer.
//!
//! A [`Condition`] is one predicate (`field`, [`Operator`], [`Operand`],
//! [`Connector`]). Conditions keep insertion order; the first condition's
//! connector is never emitted.

use crate::error::{DbError, DbResult};
use crate::param::ParamList;
use crate::value::Value;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    NotBetween,
    In,
    NotIn,
    IsNull,
    IsNotNull,
    Like,
    NotLike,
    Ilike,
    NotIlike,
}

impl Operator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::Ilike => "ILIKE",
            Operator::NotIlike => "NOT ILIKE",
        }
    }
}

/// Logical connector joining a condition to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    pub fn as_sql(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// Shape of a condition's right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// IS NULL / IS NOT NULL
    None,
    Single(Value),
    /// BETWEEN bounds
    Pair(Value, Value),
    /// IN list
    List(Vec<Value>),
}

/// A single WHERE predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub operand: Operand,
    pub connector: Connector,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        operand: Operand,
        connector: Connector,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            operand,
            connector,
        }
    }

    /// Render this predicate, appending its values to `params`.
    pub fn render(&self, params: &mut ParamList) -> DbResult<String> {
        let field = &self.field;
        if field.trim().is_empty() {
            return Err(DbError::invalid_argument(
                "Field name cannot be empty in WHERE clause",
            ));
        }
        let op = self.operator.as_sql();

        match self.operator {
            Operator::IsNull | Operator::IsNotNull => Ok(format!("{field} {op}")),
            Operator::Between | Operator::NotBetween => match &self.operand {
                Operand::Pair(start, end) => {
                    if start.is_null() || end.is_null() {
                        return Err(DbError::invalid_argument(format!(
                            "{op} values cannot be NULL (field '{field}')"
                        )));
                    }
                    let p1 = params.placeholder(start.clone());
                    let p2 = params.placeholder(end.clone());
                    Ok(format!("{field} {op} {p1} AND {p2}"))
                }
                other => Err(DbError::invalid_argument(format!(
                    "{op} requires exactly 2 values (field '{field}'), got {other:?}"
                ))),
            },
            Operator::In | Operator::NotIn => match &self.operand {
                Operand::List(values) if values.is_empty() => {
                    // IN () matches nothing, NOT IN () matches everything.
                    Ok(if self.operator == Operator::In {
                        "FALSE".to_string()
                    } else {
                        "TRUE".to_string()
                    })
                }
                Operand::List(values) => {
                    if values.iter().any(Value::is_null) {
                        return Err(DbError::invalid_argument(format!(
                            "{op} values cannot contain NULL (field '{field}')"
                        )));
                    }
                    let placeholders: Vec<String> = values
                        .iter()
                        .map(|v| params.placeholder(v.clone()))
                        .collect();
                    Ok(format!("{field} {op} ({})", placeholders.join(", ")))
                }
                other => Err(DbError::invalid_argument(format!(
                    "{op} requires a list of values (field '{field}'), got {other:?}"
                ))),
            },
            _ => match &self.operand {
                Operand::Single(value) => {
                    let p = params.placeholder(value.clone());
                    Ok(format!("{field} {op} {p}"))
                }
                other => Err(DbError::invalid_argument(format!(
                    "{op} requires a single value (field '{field}'), got {other:?}"
                ))),
            },
        }
    }
}

/// Ordered list of conditions owned by a statement builder.
#[derive(Debug, Clone, Default)]
pub struct ConditionList {
    conditions: Vec<Condition>,
}

impl ConditionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition. Validation happens at render time.
    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub fn add(
        &mut self,
        field: impl Into<String>,
        operator: Operator,
        operand: Operand,
        connector: Connector,
    ) {
        self.push(Condition::new(field, operator, operand, connector));
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    /// Render the full `WHERE ...` clause, or `None` when there are no conditions.
    pub fn render_where(&self, params: &mut ParamList) -> DbResult<Option<String>> {
        if self.conditions.is_empty() {
            return Ok(None);
        }

        let mut sql = String::from("WHERE ");
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                sql.push(' ');
                sql.push_str(condition.connector.as_sql());
                sql.push(' ');
            }
            sql.push_str(&condition.render(params)?);
        }
        Ok(Some(sql))
    }
}

/// Escape the LIKE metacharacters (`\`, `%`, `_`) so `s` matches literally.
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

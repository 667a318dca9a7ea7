//! Shared WHERE entry points for SELECT, UPDATE, DELETE.

use crate::condition::{escape_like, ConditionList, Connector, Operand, Operator};
use crate::value::Value;

/// A builder that owns a condition list.
pub trait Filterable: Sized {
    fn conditions_mut(&mut self) -> &mut ConditionList;
}

/// Pending condition on one field.
///
/// Obtained from `where_`, `and_where` or `or_where`; every operator method
/// records the condition and hands the owning builder back.
#[must_use = "a field condition does nothing until an operator is applied"]
pub struct FieldCondition<B> {
    builder: B,
    field: String,
    connector: Connector,
}

impl<B: Filterable> FieldCondition<B> {
    pub(crate) fn new(builder: B, field: impl Into<String>, connector: Connector) -> Self {
        Self {
            builder,
            field: field.into(),
            connector,
        }
    }

    fn push(mut self, operator: Operator, operand: Operand) -> B {
        self.builder
            .conditions_mut()
            .add(self.field, operator, operand, self.connector);
        self.builder
    }

    fn single(self, operator: Operator, value: impl Into<Value>) -> B {
        self.push(operator, Operand::Single(value.into()))
    }

    // ==================== Comparison ====================

    pub fn equals(self, value: impl Into<Value>) -> B {
        self.single(Operator::Eq, value)
    }

    pub fn not_equals(self, value: impl Into<Value>) -> B {
        self.single(Operator::Ne, value)
    }

    pub fn greater_than(self, value: impl Into<Value>) -> B {
        self.single(Operator::Gt, value)
    }

    pub fn greater_than_or_equal(self, value: impl Into<Value>) -> B {
        self.single(Operator::Gte, value)
    }

    pub fn less_than(self, value: impl Into<Value>) -> B {
        self.single(Operator::Lt, value)
    }

    pub fn less_than_or_equal(self, value: impl Into<Value>) -> B {
        self.single(Operator::Lte, value)
    }

    // ==================== Ranges and sets ====================

    pub fn between(self, start: impl Into<Value>, end: impl Into<Value>) -> B {
        self.push(Operator::Between, Operand::Pair(start.into(), end.into()))
    }

    pub fn not_between(self, start: impl Into<Value>, end: impl Into<Value>) -> B {
        self.push(Operator::NotBetween, Operand::Pair(start.into(), end.into()))
    }

    /// `field IN (...)`. An empty list matches no rows.
    pub fn in_list<I, V>(self, values: I) -> B
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.push(Operator::In, Operand::List(values))
    }

    /// `field NOT IN (...)`. An empty list matches every row.
    pub fn not_in<I, V>(self, values: I) -> B
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.push(Operator::NotIn, Operand::List(values))
    }

    pub fn is_null(self) -> B {
        self.push(Operator::IsNull, Operand::None)
    }

    pub fn is_not_null(self) -> B {
        self.push(Operator::IsNotNull, Operand::None)
    }

    // ==================== Raw patterns ====================

    /// `field LIKE pattern`; the pattern is passed through unescaped.
    pub fn like(self, pattern: impl Into<String>) -> B {
        self.single(Operator::Like, pattern.into())
    }

    pub fn not_like(self, pattern: impl Into<String>) -> B {
        self.single(Operator::NotLike, pattern.into())
    }

    /// `field ILIKE pattern`; the pattern is passed through unescaped.
    pub fn ilike(self, pattern: impl Into<String>) -> B {
        self.single(Operator::Ilike, pattern.into())
    }

    pub fn not_ilike(self, pattern: impl Into<String>) -> B {
        self.single(Operator::NotIlike, pattern.into())
    }

    // ==================== Literal substring matches ====================

    /// Case-insensitive substring match. `%`, `_` and `\` in `text` match literally.
    pub fn contains(self, text: &str) -> B {
        self.single(Operator::Ilike, format!("%{}%", escape_like(text)))
    }

    pub fn not_contains(self, text: &str) -> B {
        self.single(Operator::NotIlike, format!("%{}%", escape_like(text)))
    }

    pub fn starts_with(self, text: &str) -> B {
        self.single(Operator::Ilike, format!("{}%", escape_like(text)))
    }

    pub fn ends_with(self, text: &str) -> B {
        self.single(Operator::Ilike, format!("%{}", escape_like(text)))
    }
}

/// Implement [`Filterable`] and the `where_` / `and_where` / `or_where`
/// entry points for a builder with a `conditions: ConditionList` field.
macro_rules! impl_filter_entry {
    ($ty:ident) => {
        impl<'a> $crate::builder::where_builder::Filterable for $ty<'a> {
            fn conditions_mut(&mut self) -> &mut $crate::condition::ConditionList {
                &mut self.conditions
            }
        }

        impl<'a> $ty<'a> {
            /// Start a condition joined with AND.
            pub fn where_(
                self,
                field: impl Into<String>,
            ) -> $crate::builder::where_builder::FieldCondition<Self> {
                $crate::builder::where_builder::FieldCondition::new(
                    self,
                    field,
                    $crate::condition::Connector::And,
                )
            }

            /// Alias of `where_`.
            pub fn and_where(
                self,
                field: impl Into<String>,
            ) -> $crate::builder::where_builder::FieldCondition<Self> {
                self.where_(field)
            }

            /// Start a condition joined with OR.
            pub fn or_where(
                self,
                field: impl Into<String>,
            ) -> $crate::builder::where_builder::FieldCondition<Self> {
                $crate::builder::where_builder::FieldCondition::new(
                    self,
                    field,
                    $crate::condition::Connector::Or,
                )
            }
        }
    };
}

pub(crate) use impl_filter_entry;

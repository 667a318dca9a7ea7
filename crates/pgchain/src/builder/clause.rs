//! ORDER BY and LIMIT/OFFSET helpers.

use crate::error::{DbError, DbResult};
use crate::param::ParamList;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// ORDER BY entries with a "current" field that `asc` / `desc` act on.
///
/// A field appears at most once. Referencing it again makes it current;
/// setting a direction moves it to the end of the list.
#[derive(Debug, Clone, Default)]
pub struct OrderList {
    items: Vec<(String, SortDirection)>,
    current: Option<usize>,
}

impl OrderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_by(&mut self, field: impl Into<String>) {
        let field = field.into();
        match self.items.iter().position(|(f, _)| *f == field) {
            Some(idx) => self.current = Some(idx),
            None => {
                self.items.push((field, SortDirection::Asc));
                self.current = Some(self.items.len() - 1);
            }
        }
    }

    /// Set the direction of the current field and move it last.
    pub fn set_direction(&mut self, direction: SortDirection) -> DbResult<()> {
        let idx = self.current.ok_or_else(|| {
            DbError::invalid_argument(format!(
                "{}() requires a preceding order_by()",
                direction.as_sql().to_ascii_lowercase()
            ))
        })?;
        let (field, _) = self.items.remove(idx);
        self.items.push((field, direction));
        self.current = Some(self.items.len() - 1);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.items.iter().map(|(f, d)| (f.as_str(), *d))
    }

    /// Render `ORDER BY ...`, or `None` when empty.
    pub fn render(&self) -> DbResult<Option<String>> {
        if self.items.is_empty() {
            return Ok(None);
        }
        let mut parts = Vec::with_capacity(self.items.len());
        for (field, direction) in &self.items {
            if field.trim().is_empty() {
                return Err(DbError::invalid_argument("ORDER BY field cannot be empty"));
            }
            parts.push(format!("{field} {}", direction.as_sql()));
        }
        Ok(Some(format!("ORDER BY {}", parts.join(", "))))
    }
}

/// Render `LIMIT $n` / `OFFSET $m`, binding the values. Must run after WHERE.
pub fn render_pagination(
    limit: Option<u64>,
    offset: Option<u64>,
    params: &mut ParamList,
) -> DbResult<Vec<String>> {
    let mut out = Vec::new();
    if let Some(n) = limit {
        out.push(format!("LIMIT {}", params.placeholder(to_i64("LIMIT", n)?)));
    }
    if let Some(n) = offset {
        out.push(format!("OFFSET {}", params.placeholder(to_i64("OFFSET", n)?)));
    }
    Ok(out)
}

fn to_i64(clause: &str, n: u64) -> DbResult<i64> {
    i64::try_from(n).map_err(|_| DbError::invalid_argument(format!("{clause} {n} is out of range")))
}

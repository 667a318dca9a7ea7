//! Bare SQL identifier checks.
//!
//! Table and column names are interpolated into SQL text, so the builders only
//! accept bare, optionally dotted identifiers:
//!
//! - each part matches `[A-Za-z_][A-Za-z0-9_$]*`
//! - parts are separated by a single `.` (`information_schema.tables`)
//!
//! Field expressions in WHERE / SELECT / ORDER BY are not checked here; they
//! only have to be non-empty.

use crate::error::{DbError, DbResult};

/// Validate a bare identifier. `kind` names the role for the error message.
pub fn check_ident(kind: &str, name: &str) -> DbResult<()> {
    if name.is_empty() {
        return Err(DbError::invalid_argument(format!("{kind} name cannot be empty")));
    }

    for part in name.split('.') {
        let mut chars = part.chars();
        match chars.next() {
            None => {
                return Err(DbError::invalid_argument(format!(
                    "{kind} name '{name}' has an empty part"
                )));
            }
            Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
            Some(c) => {
                return Err(DbError::invalid_argument(format!(
                    "invalid {kind} name '{name}': invalid start character '{c}'"
                )));
            }
        }
        if let Some(c) = chars.find(|c| !(*c == '_' || *c == '$' || c.is_ascii_alphanumeric())) {
            return Err(DbError::invalid_argument(format!(
                "invalid {kind} name '{name}': invalid character '{c}'"
            )));
        }
    }

    Ok(())
}

/// Validate that a field expression is non-empty.
pub fn check_field(kind: &str, field: &str) -> DbResult<()> {
    if field.trim().is_empty() {
        return Err(DbError::invalid_argument(format!("{kind} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_and_dotted() {
        assert!(check_ident("table", "users").is_ok());
        assert!(check_ident("table", "_t$1").is_ok());
        assert!(check_ident("table", "information_schema.tables").is_ok());
    }

    #[test]
    fn rejects_injection_and_malformed_names() {
        for bad in ["", "1users", "users; DROP TABLE x", "a..b", "a.", "\"quoted\"", "a b"] {
            assert!(
                matches!(check_ident("table", bad), Err(DbError::InvalidArgument(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn field_only_needs_content() {
        assert!(check_field("field", "lower(name)").is_ok());
        assert!(check_field("field", "  ").is_err());
    }
}

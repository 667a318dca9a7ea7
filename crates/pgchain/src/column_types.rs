//! Postgres column type names for DDL builders.

// Integers
pub const SMALLINT: &str = "SMALLINT";
pub const INTEGER: &str = "INTEGER";
pub const BIGINT: &str = "BIGINT";
pub const SMALLSERIAL: &str = "SMALLSERIAL";
pub const SERIAL: &str = "SERIAL";
pub const BIGSERIAL: &str = "BIGSERIAL";

// Arbitrary precision and floating point
pub const DECIMAL: &str = "DECIMAL";
pub const NUMERIC: &str = "NUMERIC";
pub const REAL: &str = "REAL";
pub const DOUBLE_PRECISION: &str = "DOUBLE PRECISION";

// Character and binary
pub const CHAR: &str = "CHAR";
pub const VARCHAR: &str = "VARCHAR";
pub const TEXT: &str = "TEXT";
pub const BYTEA: &str = "BYTEA";

// Date and time
pub const TIMESTAMP: &str = "TIMESTAMP";
pub const TIMESTAMPTZ: &str = "TIMESTAMPTZ";
pub const DATE: &str = "DATE";
pub const TIME: &str = "TIME";
pub const TIMETZ: &str = "TIMETZ";
pub const INTERVAL: &str = "INTERVAL";

pub const BOOLEAN: &str = "BOOLEAN";
pub const UUID: &str = "UUID";
pub const JSON: &str = "JSON";
pub const JSONB: &str = "JSONB";

/// `base[]`
pub fn array(base: &str) -> String {
    format!("{base}[]")
}

/// `VARCHAR(n)`
pub fn varchar(n: u32) -> String {
    format!("{VARCHAR}({n})")
}

/// `CHAR(n)`
pub fn char(n: u32) -> String {
    format!("{CHAR}({n})")
}

/// `DECIMAL(p, s)`
pub fn decimal(precision: u32, scale: u32) -> String {
    format!("{DECIMAL}({precision}, {scale})")
}

/// `NUMERIC(p, s)`
pub fn numeric(precision: u32, scale: u32) -> String {
    format!("{NUMERIC}({precision}, {scale})")
}

//! Closed value model for bound parameters and decoded columns.
//!
//! [`Value`] is what flows through every builder: WHERE operands, INSERT/UPDATE
//! maps, LIMIT/OFFSET and the cells of returned rows. Encoding adapts to the
//! parameter type the server inferred for each placeholder, so an `Int` bound
//! against an `INT4` column is sent as a 4-byte integer.

mod numeric;
mod wire;

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::error::Error;
use tokio_postgres::types::{FromSql, IsNull, Kind, ToSql, Type, to_sql_checked};
use uuid::Uuid;

type BoxError = Box<dyn Error + Sync + Send>;

/// A bound parameter or a decoded column value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Uuid(Uuid),
    Json(serde_json::Value),
    /// Postgres array
    List(Vec<Value>),
}

impl Value {
    /// Build a `List` from anything convertible into values.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Render this value as an inline SQL literal.
    ///
    /// Only used for DDL (`DEFAULT ...`), where placeholders are not allowed.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Text(s) => quote_literal(s),
            Value::Bytes(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02x}")).collect();
                format!("'\\x{hex}'")
            }
            Value::Timestamp(ts) => quote_literal(&ts.to_rfc3339()),
            Value::Date(d) => quote_literal(&d.to_string()),
            Value::Uuid(u) => quote_literal(&u.to_string()),
            Value::Json(j) => quote_literal(&j.to_string()),
            Value::List(items) => {
                let inner: Vec<String> = items.iter().map(Value::to_literal).collect();
                format!("ARRAY[{}]", inner.join(", "))
            }
        }
    }
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Encode with `T`'s own encoder after checking it accepts `ty`.
fn encode<T: ToSql>(value: &T, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if !T::accepts(ty) {
        return Err(format!(
            "cannot encode Rust type {} as Postgres type {}",
            std::any::type_name::<T>(),
            ty
        )
        .into());
    }
    value.to_sql(ty, out)
}

fn encode_int(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => encode(&i16::try_from(v)?, ty, out),
        Type::INT4 => encode(&i32::try_from(v)?, ty, out),
        Type::OID => encode(&u32::try_from(v)?, ty, out),
        Type::FLOAT4 => encode(&(v as f32), ty, out),
        Type::FLOAT8 => encode(&(v as f64), ty, out),
        Type::NUMERIC => numeric::encode(&v.to_string(), out),
        _ => encode(&v, ty, out),
    }
}

fn encode_float(v: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT4 => encode(&(v as f32), ty, out),
        Type::NUMERIC => {
            if !v.is_finite() {
                return Err(format!("cannot encode {v} as numeric").into());
            }
            numeric::encode(&v.to_string(), out)
        }
        _ => encode(&v, ty, out),
    }
}

fn encode_text(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::UUID => encode(&Uuid::parse_str(s)?, ty, out),
        Type::JSON | Type::JSONB => {
            let json: serde_json::Value = serde_json::from_str(s)?;
            encode(&json, ty, out)
        }
        Type::NUMERIC => numeric::encode(s, out),
        _ => match ty.kind() {
            // Enum labels travel as plain text.
            Kind::Enum(_) => {
                out.extend_from_slice(s.as_bytes());
                Ok(IsNull::No)
            }
            _ => encode(&s, ty, out),
        },
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        if let Kind::Domain(base) = ty.kind() {
            return self.to_sql(base, out);
        }
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => encode(v, ty, out),
            Value::Int(v) => encode_int(*v, ty, out),
            Value::Float(v) => encode_float(*v, ty, out),
            Value::Text(s) => encode_text(s, ty, out),
            Value::Bytes(b) => encode(&b.as_slice(), ty, out),
            Value::Timestamp(ts) => match *ty {
                Type::TIMESTAMP => encode(&ts.naive_utc(), ty, out),
                Type::DATE => encode(&ts.date_naive(), ty, out),
                _ => encode(ts, ty, out),
            },
            Value::Date(d) => encode(d, ty, out),
            Value::Uuid(u) => match *ty {
                Type::UUID => encode(u, ty, out),
                _ => encode_text(&u.to_string(), ty, out),
            },
            Value::Json(j) => encode(j, ty, out),
            Value::List(items) => encode(&items.as_slice(), ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// Types whose binary send format is their text form.
fn sends_text(ty: &Type) -> bool {
    matches!(ty.kind(), Kind::Enum(_)) || ty.name() == "citext"
}

impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        match ty.kind() {
            Kind::Array(_) => return Ok(Value::List(Vec::<Value>::from_sql(ty, raw)?)),
            Kind::Domain(base) => return Value::from_sql(base, raw),
            _ => {}
        }

        let value = match *ty {
            Type::BOOL => Value::Bool(bool::from_sql(ty, raw)?),
            Type::INT2 => Value::Int(i16::from_sql(ty, raw)?.into()),
            Type::INT4 => Value::Int(i32::from_sql(ty, raw)?.into()),
            Type::INT8 => Value::Int(i64::from_sql(ty, raw)?),
            Type::OID => Value::Int(u32::from_sql(ty, raw)?.into()),
            Type::FLOAT4 => Value::Float(f32::from_sql(ty, raw)?.into()),
            Type::FLOAT8 => Value::Float(f64::from_sql(ty, raw)?),
            Type::NUMERIC => Value::Text(numeric::decode(raw)?),
            Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
                Value::Text(String::from_sql(ty, raw)?)
            }
            Type::BYTEA => Value::Bytes(Vec::<u8>::from_sql(ty, raw)?),
            Type::TIMESTAMPTZ => Value::Timestamp(DateTime::<Utc>::from_sql(ty, raw)?),
            Type::TIMESTAMP => Value::Timestamp(NaiveDateTime::from_sql(ty, raw)?.and_utc()),
            Type::DATE => Value::Date(NaiveDate::from_sql(ty, raw)?),
            Type::TIME => Value::Text(NaiveTime::from_sql(ty, raw)?.to_string()),
            Type::UUID => Value::Uuid(Uuid::from_sql(ty, raw)?),
            Type::JSON | Type::JSONB => Value::Json(serde_json::Value::from_sql(ty, raw)?),
            Type::TIMETZ => Value::Text(wire::decode_timetz(raw)?),
            Type::INTERVAL => Value::Text(wire::decode_interval(raw)?),
            Type::INET | Type::CIDR => Value::Text(wire::decode_inet(raw)?),
            Type::CHAR => Value::Text(char::from(i8::from_sql(ty, raw)? as u8).to_string()),
            Type::XML => Value::Text(String::from_utf8(raw.to_vec())?),
            _ if sends_text(ty) => Value::Text(String::from_utf8(raw.to_vec())?),
            _ => return Err(format!("cannot decode column of Postgres type {ty}").into()),
        };
        Ok(value)
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(Value::Null)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Timestamp(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            Value::Date(d) => serializer.collect_str(d),
            Value::Uuid(u) => serializer.collect_str(u),
            Value::Json(j) => j.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v.and_utc())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

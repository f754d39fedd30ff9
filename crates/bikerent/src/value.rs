//! Scalar values bound as positional parameters.
//!
//! A [`Value`] carries whatever scalar a request body supplied (string, number,
//! boolean or null). It does not know the column type up front; when the
//! statement is executed it adapts to the parameter type the server inferred
//! for its placeholder, so `"2025-09-30"` binds as a `date` and `29.9` binds as
//! a `numeric` without the caller spelling out a cast.

use crate::column::ColumnKind;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

type BoxError = Box<dyn Error + Sync + Send>;

/// An opaque scalar forwarded as a bind parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "number",
            Value::Text(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a JSON scalar. Arrays and objects have no scalar form and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Value::Int(i)),
                None => n.as_f64().map(Value::Float),
            },
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// Normalize the value for a column of the given kind.
    ///
    /// A float with no fractional part (JSON `5.0`) becomes an integer for
    /// integer columns; every other value is returned unchanged.
    pub fn coerce_to(self, kind: ColumnKind) -> Self {
        match (kind, self) {
            (ColumnKind::Integer, Value::Float(x))
                if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 =>
            {
                Value::Int(x as i64)
            }
            (_, v) => v,
        }
    }

    /// Check that this value can be stored in a column of the given kind.
    ///
    /// `Null` fits every kind; nullability is the database's call.
    pub fn check_kind(&self, kind: ColumnKind) -> Result<(), String> {
        let ok = match (kind, self) {
            (_, Value::Null) => true,
            (ColumnKind::Integer, Value::Int(_)) => true,
            (ColumnKind::Decimal, Value::Int(_) | Value::Float(_)) => true,
            (ColumnKind::Decimal, Value::Text(s)) => Decimal::from_str(s).is_ok(),
            (ColumnKind::Text, Value::Text(_)) => true,
            (ColumnKind::Boolean, Value::Bool(_)) => true,
            (ColumnKind::Date, Value::Text(s)) => parse_date(s).is_some(),
            (ColumnKind::Time, Value::Text(s)) => parse_time(s).is_some(),
            (ColumnKind::Timestamp, Value::Text(s)) => parse_timestamp(s).is_some(),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(format!("expected {}, got {} {}", kind, self.kind_name(), self))
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
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

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub(crate) fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| parse_timestamptz(s).map(|dt| dt.naive_utc()))
}

fn parse_timestamptz(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn is_text_type(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN
    )
}

fn mismatch(value: &Value, ty: &Type) -> BoxError {
    format!("cannot bind {} value {} to parameter of type {}", value.kind_name(), value, ty).into()
}

fn int_to_sql(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::INT8 => v.to_sql(ty, out),
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => (v as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(v).to_sql(ty, out),
        _ if is_text_type(ty) => v.to_string().to_sql(ty, out),
        _ => Err(mismatch(&Value::Int(v), ty)),
    }
}

fn float_to_sql(v: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => v.to_sql(ty, out),
        Type::NUMERIC => Decimal::from_f64(v)
            .ok_or_else(|| mismatch(&Value::Float(v), ty))?
            .to_sql(ty, out),
        _ if is_text_type(ty) => v.to_string().to_sql(ty, out),
        _ => Err(mismatch(&Value::Float(v), ty)),
    }
}

fn text_to_sql(v: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    let unparsable = || mismatch(&Value::Text(v.to_string()), ty);
    match *ty {
        Type::INT2 => v.parse::<i16>()?.to_sql(ty, out),
        Type::INT4 => v.parse::<i32>()?.to_sql(ty, out),
        Type::INT8 => v.parse::<i64>()?.to_sql(ty, out),
        Type::NUMERIC => Decimal::from_str(v)?.to_sql(ty, out),
        Type::DATE => parse_date(v).ok_or_else(unparsable)?.to_sql(ty, out),
        Type::TIME => parse_time(v).ok_or_else(unparsable)?.to_sql(ty, out),
        Type::TIMESTAMP => parse_timestamp(v).ok_or_else(unparsable)?.to_sql(ty, out),
        Type::TIMESTAMPTZ => parse_timestamptz(v)
            .or_else(|| parse_timestamp(v).map(|naive| naive.and_utc()))
            .ok_or_else(unparsable)?
            .to_sql(ty, out),
        _ if is_text_type(ty) => v.to_sql(ty, out),
        _ => Err(unparsable()),
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) if *ty == Type::BOOL => b.to_sql(ty, out),
            Value::Bool(_) => Err(mismatch(self, ty)),
            Value::Int(i) => int_to_sql(*i, ty, out),
            Value::Float(f) => float_to_sql(*f, ty, out),
            Value::Text(s) => text_to_sql(s, ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        is_text_type(ty)
            || matches!(
                *ty,
                Type::BOOL
                    | Type::INT2
                    | Type::INT4
                    | Type::INT8
                    | Type::FLOAT4
                    | Type::FLOAT8
                    | Type::NUMERIC
                    | Type::DATE
                    | Type::TIME
                    | Type::TIMESTAMP
                    | Type::TIMESTAMPTZ
            )
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(value: &Value, ty: &Type) -> Result<(IsNull, BytesMut), BoxError> {
        let mut buf = BytesMut::new();
        let is_null = value.to_sql_checked(ty, &mut buf)?;
        Ok((is_null, buf))
    }

    #[test]
    fn json_scalars_convert() {
        assert_eq!(Value::from_json(&serde_json::json!(5)), Some(Value::Int(5)));
        assert_eq!(
            Value::from_json(&serde_json::json!(10.5)),
            Some(Value::Float(10.5))
        );
        assert_eq!(
            Value::from_json(&serde_json::json!("a@x.com")),
            Some(Value::Text("a@x.com".into()))
        );
        assert_eq!(Value::from_json(&serde_json::json!(null)), Some(Value::Null));
        assert_eq!(Value::from_json(&serde_json::json!([1, 2])), None);
        assert_eq!(Value::from_json(&serde_json::json!({"a": 1})), None);
    }

    #[test]
    fn deserializes_untagged() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 3, 1.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(3),
                Value::Float(1.5),
                Value::Text("x".into()),
            ]
        );
    }

    #[test]
    fn int_narrows_to_int4() {
        let (is_null, buf) = bind(&Value::Int(5), &Type::INT4).unwrap();
        assert!(matches!(is_null, IsNull::No));
        assert_eq!(&buf[..], &5i32.to_be_bytes());
    }

    #[test]
    fn int_out_of_range_for_int2() {
        assert!(bind(&Value::Int(70_000), &Type::INT2).is_err());
    }

    #[test]
    fn null_binds_to_any_accepted_type() {
        let (is_null, buf) = bind(&Value::Null, &Type::DATE).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(buf.is_empty());
    }

    #[test]
    fn bool_rejects_integer_parameter() {
        assert!(bind(&Value::Bool(true), &Type::INT4).is_err());
    }

    #[test]
    fn text_parses_date_parameter() {
        assert!(bind(&Value::from("2025-09-30"), &Type::DATE).is_ok());
        assert!(bind(&Value::from("30/09/2025"), &Type::DATE).is_err());
    }

    #[test]
    fn text_parses_time_and_timestamp() {
        assert!(bind(&Value::from("16:30"), &Type::TIME).is_ok());
        assert!(bind(&Value::from("2025-09-30 16:30:00"), &Type::TIMESTAMP).is_ok());
        assert!(bind(&Value::from("2024-10-01T12:00:00Z"), &Type::TIMESTAMPTZ).is_ok());
    }

    #[test]
    fn float_binds_numeric() {
        assert!(bind(&Value::Float(29.99), &Type::NUMERIC).is_ok());
        assert!(bind(&Value::Float(1.5), &Type::INT4).is_err());
    }

    #[test]
    fn unsupported_type_is_rejected_before_encoding() {
        assert!(!<Value as ToSql>::accepts(&Type::BYTEA));
        assert!(bind(&Value::from("x"), &Type::BYTEA).is_err());
    }

    #[test]
    fn coerce_to_accepts_whole_floats_for_integers() {
        assert_eq!(Value::Float(5.0).coerce_to(ColumnKind::Integer), Value::Int(5));
        assert_eq!(Value::Float(5.5).coerce_to(ColumnKind::Integer), Value::Float(5.5));
        assert_eq!(Value::Float(1e300).coerce_to(ColumnKind::Integer), Value::Float(1e300));
        assert_eq!(Value::Float(5.0).coerce_to(ColumnKind::Decimal), Value::Float(5.0));
    }

    #[test]
    fn check_kind_matches_column_shape() {
        assert!(Value::Int(1).check_kind(ColumnKind::Integer).is_ok());
        assert!(Value::from("1").check_kind(ColumnKind::Integer).is_err());
        assert!(Value::Float(10.5).check_kind(ColumnKind::Decimal).is_ok());
        assert!(Value::from("10.50").check_kind(ColumnKind::Decimal).is_ok());
        assert!(Value::from("2025-09-30").check_kind(ColumnKind::Date).is_ok());
        assert!(Value::Bool(false).check_kind(ColumnKind::Text).is_err());
        assert!(Value::Null.check_kind(ColumnKind::Boolean).is_ok());
    }

    #[test]
    fn display_quotes_text() {
        assert_eq!(Value::from("Bob").to_string(), "\"Bob\"");
        assert_eq!(Value::Int(5).to_string(), "5");
        assert_eq!(Value::Null.to_string(), "null");
    }
}

//! Bind values for PostgreSQL upserts.
//!
//! Seed sheets do not know the exact column types of the target schema (an
//! `age` may be `INTEGER`, a `balance` `NUMERIC`, a `role` a custom enum), so
//! [`SqlValue`] resolves its wire encoding against the type the server
//! reports for each placeholder. Values that cannot be represented in the
//! declared type fail with [`SqlValueError`] at bind time.

use bytes::BytesMut;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use postgres_types::{to_sql_checked, IsNull, Kind, ToSql, Type};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::error::Error;
use thiserror::Error;

/// A column-ordered parameter value produced by the record transformer.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL
    Null,
    /// Boolean flag
    Bool(bool),
    /// Free text, categorical labels and enum labels
    Text(String),
    /// Any numeric value; encoded as integer, float or numeric per column
    Number(Decimal),
    /// Timestamp without timezone
    Timestamp(NaiveDateTime),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Ordered list of text values (PostgreSQL text[])
    TextList(Vec<String>),
}

/// Errors raised while encoding a [`SqlValue`] for a specific column type.
#[derive(Error, Debug)]
pub enum SqlValueError {
    /// The value kind has no encoding for the column type.
    #[error("cannot bind {value} value to a column of type {column_type}")]
    TypeMismatch {
        value: &'static str,
        column_type: String,
    },

    /// The value is representable in principle but does not fit the column.
    #[error("value {value} does not fit a column of type {column_type}")]
    OutOfRange { value: String, column_type: String },
}

impl SqlValue {
    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::Text(_) => "text",
            SqlValue::Number(_) => "number",
            SqlValue::Timestamp(_) => "timestamp",
            SqlValue::Date(_) => "date",
            SqlValue::Time(_) => "time",
            SqlValue::TextList(_) => "text list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    fn mismatch(&self, ty: &Type) -> Box<dyn Error + Sync + Send> {
        Box::new(SqlValueError::TypeMismatch {
            value: self.kind(),
            column_type: ty.name().to_string(),
        })
    }
}

fn out_of_range(value: impl ToString, ty: &Type) -> Box<dyn Error + Sync + Send> {
    Box::new(SqlValueError::OutOfRange {
        value: value.to_string(),
        column_type: ty.name().to_string(),
    })
}

fn is_text_type(ty: &Type) -> bool {
    <&str as ToSql>::accepts(ty)
}

fn encode_number(
    d: &Decimal,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        Type::INT2 | Type::INT4 | Type::INT8 if !d.fract().is_zero() => Err(out_of_range(d, ty)),
        Type::INT2 => d.to_i16().ok_or_else(|| out_of_range(d, ty))?.to_sql(ty, out),
        Type::INT4 => d.to_i32().ok_or_else(|| out_of_range(d, ty))?.to_sql(ty, out),
        Type::INT8 => d.to_i64().ok_or_else(|| out_of_range(d, ty))?.to_sql(ty, out),
        Type::FLOAT4 => d.to_f32().ok_or_else(|| out_of_range(d, ty))?.to_sql(ty, out),
        Type::FLOAT8 => d.to_f64().ok_or_else(|| out_of_range(d, ty))?.to_sql(ty, out),
        Type::NUMERIC => d.to_sql(ty, out),
        _ if is_text_type(ty) => d.normalize().to_string().as_str().to_sql(ty, out),
        _ => Err(SqlValue::Number(*d).mismatch(ty)),
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(b) if *ty == Type::BOOL => b.to_sql(ty, out),
            SqlValue::Text(s) => match ty.kind() {
                // Enum labels share the text wire format.
                Kind::Enum(_) => {
                    out.extend_from_slice(s.as_bytes());
                    Ok(IsNull::No)
                }
                _ if is_text_type(ty) => s.as_str().to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            SqlValue::Number(d) => encode_number(d, ty, out),
            SqlValue::Timestamp(ts) => match *ty {
                Type::TIMESTAMP => ts.to_sql(ty, out),
                Type::TIMESTAMPTZ => Utc.from_utc_datetime(ts).to_sql(ty, out),
                Type::DATE => ts.date().to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            SqlValue::Date(d) => match *ty {
                Type::DATE => d.to_sql(ty, out),
                Type::TIMESTAMP => d.and_time(NaiveTime::MIN).to_sql(ty, out),
                Type::TIMESTAMPTZ => Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)).to_sql(ty, out),
                _ if is_text_type(ty) => d.format("%Y-%m-%d").to_string().as_str().to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            SqlValue::Time(t) => match *ty {
                Type::TIME => t.to_sql(ty, out),
                _ if is_text_type(ty) => t.format("%H:%M:%S").to_string().as_str().to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            SqlValue::TextList(items) => match *ty {
                Type::TEXT_ARRAY | Type::VARCHAR_ARRAY => items.to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            _ => Err(self.mismatch(ty)),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // Compatibility depends on the value, so it is decided in to_sql.
        true
    }

    to_sql_checked!();
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        SqlValue::Number(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(value: NaiveTime) -> Self {
        SqlValue::Time(value)
    }
}

impl From<Vec<String>> for SqlValue {
    fn from(value: Vec<String>) -> Self {
        SqlValue::TextList(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

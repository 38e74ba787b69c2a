use crate::common::{Value, ValueType, TIMESTAMP_FORMAT};
use crate::errors::{ErrorKind, RowMapError, RowMapResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Conversion between a Rust field type and a column [Value].
///
/// Every non-excluded entity field must implement this trait. `from_value` first accepts
/// the matching variant directly, then falls back to parsing the value's textual form,
/// so a store that hands back text or a wider integer still maps cleanly.
pub trait Convertible: Sized {
    /// Column type this field maps to.
    const VALUE_TYPE: ValueType;
    /// Whether the field accepts NULL.
    const NULLABLE: bool = false;

    fn to_value(&self) -> RowMapResult<Value>;
    fn from_value(value: &Value) -> RowMapResult<Self>;
}

// logged by the caller that surfaces it
fn mapping_error(value: &Value, target: &str) -> RowMapError {
    RowMapError::new(
        &format!("Value {:?} cannot be converted to {}", value, target),
        ErrorKind::ObjectMapping,
    )
}

fn parse_text<T: std::str::FromStr>(value: &Value, target: &str) -> RowMapResult<T> {
    match value {
        Value::Null => Err(mapping_error(value, target)),
        other => other
            .to_string()
            .trim()
            .parse::<T>()
            .map_err(|_| mapping_error(value, target)),
    }
}

impl Convertible for String {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn to_value(&self) -> RowMapResult<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_value(value: &Value) -> RowMapResult<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Err(mapping_error(value, "String")),
            other => Ok(other.to_string()),
        }
    }
}

impl Convertible for i32 {
    const VALUE_TYPE: ValueType = ValueType::Integer;

    fn to_value(&self) -> RowMapResult<Value> {
        Ok(Value::I32(*self))
    }

    fn from_value(value: &Value) -> RowMapResult<Self> {
        match value {
            Value::I32(i) => Ok(*i),
            Value::I64(i) => i32::try_from(*i).map_err(|_| mapping_error(value, "i32")),
            _ => parse_text(value, "i32"),
        }
    }
}

impl Convertible for i64 {
    const VALUE_TYPE: ValueType = ValueType::Long;

    fn to_value(&self) -> RowMapResult<Value> {
        Ok(Value::I64(*self))
    }

    fn from_value(value: &Value) -> RowMapResult<Self> {
        match value {
            Value::I64(i) => Ok(*i),
            Value::I32(i) => Ok(*i as i64),
            _ => parse_text(value, "i64"),
        }
    }
}

impl Convertible for f64 {
    const VALUE_TYPE: ValueType = ValueType::Double;

    fn to_value(&self) -> RowMapResult<Value> {
        Ok(Value::F64(*self))
    }

    fn from_value(value: &Value) -> RowMapResult<Self> {
        match value {
            Value::F64(f) => Ok(*f),
            Value::I32(i) => Ok(*i as f64),
            Value::I64(i) => Ok(*i as f64),
            _ => parse_text(value, "f64"),
        }
    }
}

impl Convertible for bool {
    const VALUE_TYPE: ValueType = ValueType::Boolean;

    fn to_value(&self) -> RowMapResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: &Value) -> RowMapResult<Self> {
        if let Value::Bool(b) = value {
            return Ok(*b);
        }
        if value.is_null() {
            return Err(mapping_error(value, "bool"));
        }

        let text = value.to_string();
        match text.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            t if t.eq_ignore_ascii_case("true") => Ok(true),
            t if t.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(mapping_error(value, "bool")),
        }
    }
}

impl Convertible for NaiveDateTime {
    const VALUE_TYPE: ValueType = ValueType::Timestamp;

    fn to_value(&self) -> RowMapResult<Value> {
        Ok(Value::Timestamp(*self))
    }

    fn from_value(value: &Value) -> RowMapResult<Self> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            Value::I32(_) | Value::I64(_) => value
                .as_integer()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| mapping_error(value, "timestamp")),
            Value::String(s) => parse_timestamp(s).ok_or_else(|| mapping_error(value, "timestamp")),
            _ => Err(mapping_error(value, "timestamp")),
        }
    }
}

/// Parses the textual timestamp layouts a store is likely to return.
///
/// Accepts `2024-03-05 14:30:00[.fff]`, the `T`-separated ISO form, a bare date (midnight),
/// and integer epoch milliseconds.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT) {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    text.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.naive_utc())
}

impl<T> Convertible for Option<T>
where
    T: Convertible,
{
    const VALUE_TYPE: ValueType = T::VALUE_TYPE;
    const NULLABLE: bool = true;

    fn to_value(&self) -> RowMapResult<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: &Value) -> RowMapResult<Self> {
        match value {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(value)?)),
        }
    }
}

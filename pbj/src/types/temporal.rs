//! Date and time kinds.

use super::scalar::check_range;
use super::{is_empty_string, mismatch, plain_to_i64, undecodable, Type, TypeName};
use crate::errors::{PbjError, Result};
use crate::field::Field;
use crate::utils::{format_iso8601, now_microtime, now_unix_seconds, parse_iso8601, MAX_UNIX_SECONDS};
use crate::value::{PlainValue, Value};
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar date, plain form `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateType;

impl Type for DateType {
    fn name(&self) -> TypeName {
        TypeName::Date
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        match value {
            Value::Date(_) => Ok(()),
            other => Err(mismatch(field, "a date", other)),
        }
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        match value {
            Value::Date(d) => Ok(PlainValue::String(d.format(DATE_FORMAT).to_string())),
            other => Err(mismatch(field, "a date", other)),
        }
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        if is_empty_string(plain) {
            return Ok(field.single_default());
        }
        let raw = plain
            .as_str()
            .ok_or_else(|| undecodable(field, "a date", plain))?;
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map(|d| Some(Value::Date(d)))
            .map_err(|e| PbjError::guard(field.name(), format!("invalid date [{raw}]: {e}")))
    }

    fn is_date(&self) -> bool {
        true
    }
}

/// UTC date-time, plain form ISO-8601 with microseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeType;

impl Type for DateTimeType {
    fn name(&self) -> TypeName {
        TypeName::DateTime
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        match value {
            Value::DateTime(_) => Ok(()),
            other => Err(mismatch(field, "a date-time", other)),
        }
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        match value {
            Value::DateTime(dt) => Ok(PlainValue::String(format_iso8601(dt))),
            other => Err(mismatch(field, "a date-time", other)),
        }
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        if is_empty_string(plain) {
            return Ok(field.single_default());
        }
        let raw = plain
            .as_str()
            .ok_or_else(|| undecodable(field, "a date-time", plain))?;
        parse_iso8601(raw)
            .map(|dt| Some(Value::DateTime(dt)))
            .map_err(|e| PbjError::guard(field.name(), e.to_string()))
    }

    fn is_date(&self) -> bool {
        true
    }
}

/// Unix timestamp in whole seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampType;

impl Type for TimestampType {
    fn name(&self) -> TypeName {
        TypeName::Timestamp
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        match value {
            Value::Int(i) => check_range(field, *i, 0, MAX_UNIX_SECONDS),
            other => Err(mismatch(field, "a unix timestamp", other)),
        }
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        value
            .as_int()
            .map(PlainValue::from)
            .ok_or_else(|| mismatch(field, "a unix timestamp", value))
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        if is_empty_string(plain) {
            return Ok(field.single_default());
        }
        plain_to_i64(plain)
            .map(|i| Some(Value::Int(i)))
            .ok_or_else(|| undecodable(field, "a unix timestamp", plain))
    }

    fn default_value(&self) -> Option<Value> {
        Some(Value::Int(now_unix_seconds()))
    }

    fn is_numeric(&self) -> bool {
        true
    }

    fn is_date(&self) -> bool {
        true
    }
}

/// Microseconds since the unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrotimeType;

impl Type for MicrotimeType {
    fn name(&self) -> TypeName {
        TypeName::Microtime
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        match value {
            Value::Int(i) => check_range(field, *i, 0, i64::MAX),
            other => Err(mismatch(field, "a microtime", other)),
        }
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        value
            .as_int()
            .map(PlainValue::from)
            .ok_or_else(|| mismatch(field, "a microtime", value))
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        if is_empty_string(plain) {
            return Ok(field.single_default());
        }
        plain_to_i64(plain)
            .map(|i| Some(Value::Int(i)))
            .ok_or_else(|| undecodable(field, "a microtime", plain))
    }

    fn default_value(&self) -> Option<Value> {
        Some(Value::Int(now_microtime()))
    }

    fn is_numeric(&self) -> bool {
        true
    }

    fn is_date(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn field(kind: TypeName) -> Field {
        Field::builder("at", kind).build().unwrap()
    }

    #[test]
    fn test_date_round_trip() {
        let f = field(TypeName::Date);
        let date = NaiveDate::from_ymd_opt(2014, 12, 25).unwrap();
        let plain = DateType.encode(&Value::Date(date), &f).unwrap();
        assert_eq!(plain, json!("2014-12-25"));
        assert_eq!(DateType.decode(&plain, &f).unwrap(), Some(Value::Date(date)));
        assert!(DateType.decode(&json!("25/12/2014"), &f).is_err());
    }

    #[test]
    fn test_date_time_plain_has_microseconds() {
        let f = field(TypeName::DateTime);
        let dt = Utc.timestamp_opt(1_419_509_520, 123_456_000).unwrap();
        let plain = DateTimeType.encode(&Value::DateTime(dt), &f).unwrap();
        assert_eq!(plain, json!("2014-12-25T12:12:00.123456+00:00"));
        assert_eq!(DateTimeType.decode(&plain, &f).unwrap(), Some(Value::DateTime(dt)));
    }

    #[test]
    fn test_timestamp_range() {
        let f = field(TypeName::Timestamp);
        assert!(TimestampType.guard(&Value::Int(1_419_509_520), &f).is_ok());
        assert!(TimestampType.guard(&Value::Int(-1), &f).is_err());
        assert!(TimestampType.guard(&Value::Int(MAX_UNIX_SECONDS + 1), &f).is_err());
    }

    #[test]
    fn test_defaults_are_now() {
        let before = now_microtime();
        let Some(Value::Int(micros)) = MicrotimeType.default_value() else {
            panic!("microtime default must be an int");
        };
        assert!(micros >= before);

        let Some(Value::Int(seconds)) = TimestampType.default_value() else {
            panic!("timestamp default must be an int");
        };
        assert!(seconds > 1_400_000_000);
    }

    #[test]
    fn test_empty_string_decodes_to_field_default() {
        let f = Field::builder("at", TypeName::Microtime)
            .default_value(Value::Int(42))
            .build()
            .unwrap();
        assert_eq!(MicrotimeType.decode(&json!(""), &f).unwrap(), Some(Value::Int(42)));
    }
}

//! Boolean, numeric, string and binary kinds.

use super::{is_empty_string, mismatch, plain_to_i64, undecodable, Type, TypeName};
use crate::errors::{PbjError, Result};
use crate::field::Field;
use crate::value::{PlainValue, Value};
use base64::{engine::general_purpose::STANDARD, Engine};

const INT_MAX: i64 = 4_294_967_295;
const SIGNED_INT_MIN: i64 = -2_147_483_648;
const SIGNED_INT_MAX: i64 = 2_147_483_647;
const STRING_MAX_BYTES: usize = 255;
const TEXT_MAX_BYTES: usize = 65_535;

/// Checks an integer against the kind range and the field's own `min`/`max`.
pub(super) fn check_range(field: &Field, value: i64, lo: i64, hi: i64) -> Result<()> {
    let lo = field.min().map_or(lo, |m| m.max(lo));
    let hi = field.max().map_or(hi, |m| m.min(hi));
    if value < lo || value > hi {
        return Err(PbjError::guard(
            field.name(),
            format!("{value} is outside the range {lo}..={hi}"),
        ));
    }
    Ok(())
}

/// Checks a byte length against the kind limit and the field's own limits.
fn check_length(field: &Field, len: usize, kind_max: usize) -> Result<()> {
    let max = field.max_length().map_or(kind_max, |m| m.min(kind_max));
    if len > max {
        return Err(PbjError::guard(
            field.name(),
            format!("length {len} exceeds the maximum of {max}"),
        ));
    }
    if let Some(min) = field.min_length() {
        if len < min {
            return Err(PbjError::guard(
                field.name(),
                format!("length {len} is below the minimum of {min}"),
            ));
        }
    }
    Ok(())
}

fn decode_string(plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
    match plain {
        PlainValue::String(s) => Ok(Some(Value::String(s.clone()))),
        PlainValue::Number(n) => Ok(Some(Value::String(n.to_string()))),
        PlainValue::Bool(b) => Ok(Some(Value::String(b.to_string()))),
        other => Err(undecodable(field, "a string", other)),
    }
}

fn encode_string(value: &Value, field: &Field) -> Result<PlainValue> {
    value
        .as_str()
        .map(|s| PlainValue::String(s.to_string()))
        .ok_or_else(|| mismatch(field, "a string", value))
}

/// `true` or `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

impl Type for BooleanType {
    fn name(&self) -> TypeName {
        TypeName::Boolean
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        match value {
            Value::Bool(_) => Ok(()),
            other => Err(mismatch(field, "a boolean", other)),
        }
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        value
            .as_bool()
            .map(PlainValue::Bool)
            .ok_or_else(|| mismatch(field, "a boolean", value))
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        if is_empty_string(plain) {
            return Ok(field.single_default());
        }
        let decoded = match plain {
            PlainValue::Bool(b) => Some(*b),
            PlainValue::Number(n) => n.as_i64().map(|i| i != 0),
            PlainValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        };
        decoded
            .map(|b| Some(Value::Bool(b)))
            .ok_or_else(|| undecodable(field, "a boolean", plain))
    }

    fn default_value(&self) -> Option<Value> {
        Some(Value::Bool(false))
    }

    fn is_boolean(&self) -> bool {
        true
    }

    fn allowed_in_set(&self) -> bool {
        false
    }
}

macro_rules! integer_type {
    ($ty:ident, $name:expr, $lo:expr, $hi:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl Type for $ty {
            fn name(&self) -> TypeName {
                $name
            }

            fn guard(&self, value: &Value, field: &Field) -> Result<()> {
                match value {
                    Value::Int(i) => check_range(field, *i, $lo, $hi),
                    other => Err(mismatch(field, "an integer", other)),
                }
            }

            fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
                value
                    .as_int()
                    .map(PlainValue::from)
                    .ok_or_else(|| mismatch(field, "an integer", value))
            }

            fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
                if is_empty_string(plain) {
                    return Ok(field.single_default());
                }
                plain_to_i64(plain)
                    .map(|i| Some(Value::Int(i)))
                    .ok_or_else(|| undecodable(field, "an integer", plain))
            }

            fn default_value(&self) -> Option<Value> {
                Some(Value::Int(0))
            }

            fn is_numeric(&self) -> bool {
                true
            }
        }
    };
}

integer_type!(IntType, TypeName::Int, 0, INT_MAX, "Unsigned 32-bit integer.");
integer_type!(
    SignedIntType,
    TypeName::SignedInt,
    SIGNED_INT_MIN,
    SIGNED_INT_MAX,
    "Signed 32-bit integer."
);

/// Unsigned 64-bit integer; the plain form is a decimal string so it survives
/// transports limited to doubles.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntType;

impl Type for BigIntType {
    fn name(&self) -> TypeName {
        TypeName::BigInt
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        match value {
            Value::BigInt(_) => Ok(()),
            other => Err(mismatch(field, "a big-int", other)),
        }
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        match value {
            Value::BigInt(i) => Ok(PlainValue::String(i.to_string())),
            other => Err(mismatch(field, "a big-int", other)),
        }
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        if is_empty_string(plain) {
            return Ok(field.single_default());
        }
        let decoded = match plain {
            PlainValue::String(s) => s.trim().parse::<u64>().ok(),
            PlainValue::Number(n) => n.as_u64(),
            _ => None,
        };
        decoded
            .map(|i| Some(Value::BigInt(i)))
            .ok_or_else(|| undecodable(field, "a big-int", plain))
    }

    fn default_value(&self) -> Option<Value> {
        Some(Value::BigInt(0))
    }

    fn is_numeric(&self) -> bool {
        true
    }
}

/// Finite double.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatType;

impl Type for FloatType {
    fn name(&self) -> TypeName {
        TypeName::Float
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        match value {
            Value::Float(f) if f.is_finite() => Ok(()),
            Value::Float(f) => Err(PbjError::guard(field.name(), format!("{f} is not finite"))),
            other => Err(mismatch(field, "a float", other)),
        }
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        value
            .as_float()
            .and_then(serde_json::Number::from_f64)
            .map(PlainValue::Number)
            .ok_or_else(|| mismatch(field, "a finite float", value))
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        if is_empty_string(plain) {
            return Ok(field.single_default());
        }
        let decoded = match plain {
            PlainValue::Number(n) => n.as_f64(),
            PlainValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        decoded
            .map(|f| Some(Value::Float(f)))
            .ok_or_else(|| undecodable(field, "a float", plain))
    }

    fn default_value(&self) -> Option<Value> {
        Some(Value::Float(0.0))
    }

    fn is_numeric(&self) -> bool {
        true
    }

    fn allowed_in_set(&self) -> bool {
        false
    }
}

/// String of at most 255 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl Type for StringType {
    fn name(&self) -> TypeName {
        TypeName::String
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        match value {
            Value::String(s) => check_length(field, s.len(), STRING_MAX_BYTES),
            other => Err(mismatch(field, "a string", other)),
        }
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        encode_string(value, field)
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        decode_string(plain, field)
    }

    fn is_string(&self) -> bool {
        true
    }
}

/// String of at most 65535 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextType;

impl Type for TextType {
    fn name(&self) -> TypeName {
        TypeName::Text
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        match value {
            Value::String(s) => check_length(field, s.len(), TEXT_MAX_BYTES),
            other => Err(mismatch(field, "a string", other)),
        }
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        encode_string(value, field)
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        decode_string(plain, field)
    }

    fn is_string(&self) -> bool {
        true
    }
}

/// Raw bytes carried as standard base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryType;

impl Type for BinaryType {
    fn name(&self) -> TypeName {
        TypeName::Binary
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        match value {
            Value::Bytes(b) => check_length(field, b.len(), TEXT_MAX_BYTES),
            other => Err(mismatch(field, "bytes", other)),
        }
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        match value {
            Value::Bytes(b) => Ok(PlainValue::String(STANDARD.encode(b))),
            other => Err(mismatch(field, "bytes", other)),
        }
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        if is_empty_string(plain) {
            return Ok(field.single_default());
        }
        let encoded = plain
            .as_str()
            .ok_or_else(|| undecodable(field, "a base64 string", plain))?;
        STANDARD
            .decode(encoded.trim())
            .map(|b| Some(Value::Bytes(b)))
            .map_err(|e| PbjError::guard(field.name(), format!("invalid base64: {e}")))
    }

    fn is_binary(&self) -> bool {
        true
    }

    fn allowed_in_set(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(kind: TypeName) -> Field {
        Field::builder("value", kind).build().unwrap()
    }

    #[test]
    fn test_int_range() {
        let f = field(TypeName::Int);
        assert!(IntType.guard(&Value::Int(0), &f).is_ok());
        assert!(IntType.guard(&Value::Int(INT_MAX), &f).is_ok());
        assert!(IntType.guard(&Value::Int(-1), &f).is_err());
        assert!(IntType.guard(&Value::Int(INT_MAX + 1), &f).is_err());
        assert!(IntType.guard(&Value::String("1".into()), &f).is_err());
    }

    #[test]
    fn test_field_min_max_narrow_range() {
        let f = Field::builder("age", TypeName::Int).min(18).max(99).build().unwrap();
        assert!(IntType.guard(&Value::Int(18), &f).is_ok());
        assert!(IntType.guard(&Value::Int(17), &f).is_err());
        assert!(IntType.guard(&Value::Int(100), &f).is_err());
    }

    #[test]
    fn test_signed_int_accepts_negatives() {
        let f = field(TypeName::SignedInt);
        assert!(SignedIntType.guard(&Value::Int(-5), &f).is_ok());
        assert!(SignedIntType.guard(&Value::Int(SIGNED_INT_MAX + 1), &f).is_err());
    }

    #[test]
    fn test_int_decode_accepts_numeric_strings() {
        let f = field(TypeName::Int);
        assert_eq!(IntType.decode(&json!("12"), &f).unwrap(), Some(Value::Int(12)));
        assert_eq!(IntType.decode(&json!(""), &f).unwrap(), None);
        assert!(IntType.decode(&json!("twelve"), &f).is_err());
    }

    #[test]
    fn test_big_int_plain_is_string() {
        let f = field(TypeName::BigInt);
        let value = Value::BigInt(u64::MAX);
        let plain = BigIntType.encode(&value, &f).unwrap();
        assert_eq!(plain, json!("18446744073709551615"));
        assert_eq!(BigIntType.decode(&plain, &f).unwrap(), Some(value));
    }

    #[test]
    fn test_float_rejects_non_finite() {
        let f = field(TypeName::Float);
        assert!(FloatType.guard(&Value::Float(1.5), &f).is_ok());
        assert!(FloatType.guard(&Value::Float(f64::NAN), &f).is_err());
        assert!(FloatType.guard(&Value::Float(f64::INFINITY), &f).is_err());
        assert_eq!(FloatType.default_value(), Some(Value::Float(0.0)));
    }

    #[test]
    fn test_string_length_limits() {
        let f = field(TypeName::String);
        assert!(StringType.guard(&Value::from("a".repeat(255)), &f).is_ok());
        assert!(StringType.guard(&Value::from("a".repeat(256)), &f).is_err());

        let bounded = Field::builder("code", TypeName::String)
            .min_length(2)
            .max_length(4)
            .build()
            .unwrap();
        assert!(StringType.guard(&Value::from("ab"), &bounded).is_ok());
        assert!(StringType.guard(&Value::from("a"), &bounded).is_err());
        assert!(StringType.guard(&Value::from("abcde"), &bounded).is_err());
    }

    #[test]
    fn test_text_allows_long_strings() {
        let f = field(TypeName::Text);
        assert!(TextType.guard(&Value::from("a".repeat(1000)), &f).is_ok());
    }

    #[test]
    fn test_boolean_decode() {
        let f = field(TypeName::Boolean);
        assert_eq!(BooleanType.decode(&json!(true), &f).unwrap(), Some(Value::Bool(true)));
        assert_eq!(BooleanType.decode(&json!("false"), &f).unwrap(), Some(Value::Bool(false)));
        assert_eq!(BooleanType.decode(&json!(1), &f).unwrap(), Some(Value::Bool(true)));
        assert!(BooleanType.decode(&json!("maybe"), &f).is_err());
    }

    #[test]
    fn test_binary_base64() {
        let f = field(TypeName::Binary);
        let value = Value::Bytes(b"hello".to_vec());
        let plain = BinaryType.encode(&value, &f).unwrap();
        assert_eq!(plain, json!("aGVsbG8="));
        assert_eq!(BinaryType.decode(&plain, &f).unwrap(), Some(value));
        assert!(BinaryType.decode(&json!("!!!"), &f).is_err());
    }
}

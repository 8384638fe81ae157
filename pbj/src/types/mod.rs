//! The per-kind type contract and the built-in kinds.
//!
//! Every field has a [`TypeName`]; the name resolves to a static [`Type`]
//! implementation that guards, encodes and decodes values of that kind.
//! Classification predicates (`is_numeric`, `is_string`, ...) exist for
//! metadata consumers such as [`crate::mapping::MappingBuilder`]; the
//! message container never branches on them.

mod enums;
mod identifier;
mod message;
mod scalar;
mod temporal;

pub use enums::{EnumClass, EnumMembers, IntEnumType, StringEnumType};
pub use identifier::{TimeUuidType, UuidType};
pub use message::MessageKind;
pub use scalar::{
    BigIntType, BinaryType, BooleanType, FloatType, IntType, SignedIntType, StringType, TextType,
};
pub use temporal::{DateTimeType, DateType, MicrotimeType, TimestampType};

use crate::errors::{PbjError, Result};
use crate::field::Field;
use crate::registry::MessageResolver;
use crate::value::{PlainValue, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavior shared by every field kind.
pub trait Type: Send + Sync + fmt::Debug {
    /// The kind's name.
    fn name(&self) -> TypeName;

    /// Fails with `TypeGuardViolation` when `value` is not a valid value of
    /// this kind for `field`. Never has side effects.
    fn guard(&self, value: &Value, field: &Field) -> Result<()>;

    /// Produces the plain form of a guarded value.
    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue>;

    /// Rebuilds a typed value from a non-null plain form. Empty input yields
    /// the field default (which may be `None`).
    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>>;

    /// [`Type::decode`] with nested payloads on fields bound to no class
    /// resolved through `resolver`. Only the message kind consults it.
    fn decode_with(
        &self,
        plain: &PlainValue,
        field: &Field,
        _resolver: &MessageResolver,
    ) -> Result<Option<Value>> {
        self.decode(plain, field)
    }

    /// The kind's zero value, returned when an absent single value is read.
    fn default_value(&self) -> Option<Value> {
        None
    }

    /// True for numeric kinds.
    fn is_numeric(&self) -> bool {
        false
    }

    /// True for kinds whose plain form is a string of text.
    fn is_string(&self) -> bool {
        false
    }

    /// True for the boolean kind.
    fn is_boolean(&self) -> bool {
        false
    }

    /// True for binary kinds.
    fn is_binary(&self) -> bool {
        false
    }

    /// True for kinds representing a point in time.
    fn is_date(&self) -> bool {
        false
    }

    /// True for the nested message kind.
    fn is_message(&self) -> bool {
        false
    }

    /// Whether a SET-ruled field may use this kind.
    fn allowed_in_set(&self) -> bool {
        true
    }
}

/// Names of the built-in kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeName {
    /// `true`/`false`.
    Boolean,
    /// Unsigned 32-bit integer.
    Int,
    /// Signed 32-bit integer.
    SignedInt,
    /// Unsigned 64-bit integer, carried as a decimal string.
    BigInt,
    /// Finite double.
    Float,
    /// Short string (255 bytes).
    String,
    /// Long string (65535 bytes).
    Text,
    /// Raw bytes, carried as base64.
    Binary,
    /// Calendar date.
    Date,
    /// UTC date-time.
    DateTime,
    /// Unix timestamp in seconds.
    Timestamp,
    /// Unix time in microseconds.
    Microtime,
    /// Any UUID.
    Uuid,
    /// Time-based UUID.
    TimeUuid,
    /// Member of an int-backed enum.
    IntEnum,
    /// Member of a string-backed enum.
    StringEnum,
    /// Nested message.
    Message,
}

impl TypeName {
    /// Every built-in kind.
    pub const ALL: [Self; 17] = [
        Self::Boolean,
        Self::Int,
        Self::SignedInt,
        Self::BigInt,
        Self::Float,
        Self::String,
        Self::Text,
        Self::Binary,
        Self::Date,
        Self::DateTime,
        Self::Timestamp,
        Self::Microtime,
        Self::Uuid,
        Self::TimeUuid,
        Self::IntEnum,
        Self::StringEnum,
        Self::Message,
    ];

    /// Resolves the name to its implementation.
    #[must_use]
    pub fn as_type(self) -> &'static dyn Type {
        match self {
            Self::Boolean => &BooleanType,
            Self::Int => &IntType,
            Self::SignedInt => &SignedIntType,
            Self::BigInt => &BigIntType,
            Self::Float => &FloatType,
            Self::String => &StringType,
            Self::Text => &TextType,
            Self::Binary => &BinaryType,
            Self::Date => &DateType,
            Self::DateTime => &DateTimeType,
            Self::Timestamp => &TimestampType,
            Self::Microtime => &MicrotimeType,
            Self::Uuid => &UuidType,
            Self::TimeUuid => &TimeUuidType,
            Self::IntEnum => &IntEnumType,
            Self::StringEnum => &StringEnumType,
            Self::Message => &MessageKind,
        }
    }

    /// True for the enum kinds.
    #[must_use]
    pub fn is_enum(self) -> bool {
        matches!(self, Self::IntEnum | Self::StringEnum)
    }

    /// True for kinds backed by a signed integer with range limits.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Int | Self::SignedInt | Self::Timestamp | Self::Microtime)
    }

    /// The kebab-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::SignedInt => "signed-int",
            Self::BigInt => "big-int",
            Self::Float => "float",
            Self::String => "string",
            Self::Text => "text",
            Self::Binary => "binary",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Timestamp => "timestamp",
            Self::Microtime => "microtime",
            Self::Uuid => "uuid",
            Self::TimeUuid => "time-uuid",
            Self::IntEnum => "int-enum",
            Self::StringEnum => "string-enum",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the guard error for a value of the wrong variant.
pub(crate) fn mismatch(field: &Field, expected: &str, value: &Value) -> PbjError {
    PbjError::guard(
        field.name(),
        format!("expected {expected}, got {}", value.kind()),
    )
}

/// Builds the guard error for an undecodable plain value.
pub(crate) fn undecodable(field: &Field, expected: &str, plain: &PlainValue) -> PbjError {
    PbjError::guard(
        field.name(),
        format!("cannot decode {plain} as {expected}"),
    )
}

/// True for the empty string.
pub(crate) fn is_empty_string(plain: &PlainValue) -> bool {
    plain.as_str().is_some_and(|s| s.trim().is_empty())
}

/// Reads an integer from a number or a numeric string.
pub(crate) fn plain_to_i64(plain: &PlainValue) -> Option<i64> {
    match plain {
        PlainValue::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .and_then(|f| format!("{f:.0}").parse().ok())
        }),
        PlainValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_serde() {
        for name in TypeName::ALL {
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, format!("\"{}\"", name.as_str()));
            assert_eq!(name.as_type().name(), name);
        }
    }

    #[test]
    fn test_classification() {
        assert!(TypeName::Float.as_type().is_numeric());
        assert!(!TypeName::Float.as_type().allowed_in_set());
        assert!(TypeName::String.as_type().is_string());
        assert!(TypeName::Message.as_type().is_message());
        assert!(TypeName::Timestamp.as_type().is_date());
        assert!(TypeName::Boolean.as_type().is_boolean());
        assert!(TypeName::Binary.as_type().is_binary());
    }

    #[test]
    fn test_plain_to_i64() {
        assert_eq!(plain_to_i64(&serde_json::json!(42)), Some(42));
        assert_eq!(plain_to_i64(&serde_json::json!(" 42 ")), Some(42));
        assert_eq!(plain_to_i64(&serde_json::json!(42.0)), Some(42));
        assert_eq!(plain_to_i64(&serde_json::json!(4.2)), None);
        assert_eq!(plain_to_i64(&serde_json::json!(true)), None);
    }
}

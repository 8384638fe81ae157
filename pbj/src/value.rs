//! Runtime field values.
//!
//! [`Value`] is the typed form a message stores; [`PlainValue`] is the
//! primitive/string/sequence/object form used for transport.

use crate::message::Message;
use crate::utils::format_iso8601;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use uuid::Uuid;

/// The plain representation: primitives, strings, arrays and objects.
pub type PlainValue = serde_json::Value;

/// The raw value of an enum member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumRepr {
    /// A string-backed member.
    Str(&'static str),
    /// An integer-backed member.
    Int(i64),
}

/// A member of a named enumeration (see [`crate::types::EnumClass`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumValue {
    class: &'static str,
    repr: EnumRepr,
}

impl EnumValue {
    pub(crate) const fn new(class: &'static str, repr: EnumRepr) -> Self {
        Self { class, repr }
    }

    /// Name of the enumeration this member belongs to.
    pub fn class(&self) -> &'static str {
        self.class
    }

    /// The raw member value.
    pub fn repr(&self) -> EnumRepr {
        self.repr
    }

    /// The member value as a string, if string-backed.
    pub fn as_str(&self) -> Option<&'static str> {
        match self.repr {
            EnumRepr::Str(s) => Some(s),
            EnumRepr::Int(_) => None,
        }
    }

    /// The member value as an integer, if int-backed.
    pub fn as_int(&self) -> Option<i64> {
        match self.repr {
            EnumRepr::Int(i) => Some(i),
            EnumRepr::Str(_) => None,
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            EnumRepr::Str(s) => write!(f, "{s}"),
            EnumRepr::Int(i) => write!(f, "{i}"),
        }
    }
}

/// A typed value stored in a message field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// A signed integer (int, signed-int, timestamp and microtime kinds).
    Int(i64),
    /// An unsigned 64-bit integer (big-int kind).
    BigInt(u64),
    /// A floating point number.
    Float(f64),
    /// A string (string and text kinds).
    String(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// A calendar date.
    Date(NaiveDate),
    /// A UTC date-time.
    DateTime(DateTime<Utc>),
    /// A UUID (uuid and time-uuid kinds).
    Uuid(Uuid),
    /// An enum member.
    Enum(EnumValue),
    /// A nested message.
    Message(Box<Message>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::BigInt(_) => "big-int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::DateTime(_) => "date-time",
            Self::Uuid(_) => "uuid",
            Self::Enum(_) => "enum",
            Self::Message(_) => "message",
        }
    }

    /// Key used to de-duplicate set members: trimmed and lower-cased.
    #[must_use]
    pub fn set_key(&self) -> String {
        let raw = match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::BigInt(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => s.clone(),
            Self::Bytes(b) => STANDARD.encode(b),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::DateTime(dt) => format_iso8601(dt),
            Self::Uuid(u) => u.hyphenated().to_string(),
            Self::Enum(e) => e.to_string(),
            Self::Message(m) => m.schema().id().to_string(),
        };
        raw.trim().to_lowercase()
    }

    /// Returns the boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float, if this is one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the uuid, if this is one.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Returns the enum member, if this is one.
    pub fn as_enum(&self) -> Option<EnumValue> {
        match self {
            Self::Enum(e) => Some(*e),
            _ => None,
        }
    }

    /// Returns the nested message, if this is one.
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the nested message mutably, if this is one.
    pub fn as_message_mut(&mut self) -> Option<&mut Message> {
        match self {
            Self::Message(m) => Some(m),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::BigInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Self::Enum(v)
    }
}

impl From<Message> for Value {
    fn from(v: Message) -> Self {
        Self::Message(Box::new(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_key_normalizes_strings() {
        assert_eq!(Value::from("  Chicken ").set_key(), "chicken");
        assert_eq!(Value::from("CHICKEN").set_key(), Value::from("chicken").set_key());
    }

    #[test]
    fn test_set_key_for_non_strings() {
        assert_eq!(Value::Int(42).set_key(), "42");
        let id = Uuid::parse_str("6F9619FF-8B86-D011-B42D-00C04FC964FF").unwrap();
        assert_eq!(Value::Uuid(id).set_key(), "6f9619ff-8b86-d011-b42d-00c04fc964ff");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(7_u32), Value::Int(7));
        assert_eq!(Value::from(7_u64), Value::BigInt(7));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::from(1.5).as_int().is_none());
    }

    #[test]
    fn test_enum_value_display() {
        let member = EnumValue::new("Provider", EnumRepr::Str("gmail"));
        assert_eq!(member.to_string(), "gmail");
        assert_eq!(member.as_str(), Some("gmail"));
        assert_eq!(member.as_int(), None);
    }
}

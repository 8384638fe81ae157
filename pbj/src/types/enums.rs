//! Enum kinds and the [`EnumClass`] tag that binds a field to one enumeration.

use super::{is_empty_string, mismatch, plain_to_i64, undecodable, Type, TypeName};
use crate::errors::{PbjError, Result};
use crate::field::Field;
use crate::value::{EnumRepr, EnumValue, PlainValue, Value};

/// The member set of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumMembers {
    /// String-backed members.
    Strings(&'static [&'static str]),
    /// Integer-backed members.
    Ints(&'static [i64]),
}

/// A named enumeration, usually declared as a `const`:
///
/// ```
/// use pbj::types::EnumClass;
///
/// const PRIORITY: EnumClass = EnumClass::ints("Priority", &[1, 2, 3]);
/// assert_eq!(PRIORITY.int_member(2).unwrap().as_int(), Some(2));
/// assert!(PRIORITY.int_member(9).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumClass {
    name: &'static str,
    members: EnumMembers,
}

impl EnumClass {
    /// Declares a string-backed enumeration.
    #[must_use]
    pub const fn strings(name: &'static str, members: &'static [&'static str]) -> Self {
        Self {
            name,
            members: EnumMembers::Strings(members),
        }
    }

    /// Declares an int-backed enumeration.
    #[must_use]
    pub const fn ints(name: &'static str, members: &'static [i64]) -> Self {
        Self {
            name,
            members: EnumMembers::Ints(members),
        }
    }

    /// The enumeration name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The member set.
    pub fn members(&self) -> EnumMembers {
        self.members
    }

    /// True for int-backed enumerations.
    pub fn is_int_backed(&self) -> bool {
        matches!(self.members, EnumMembers::Ints(_))
    }

    /// Looks up a string member (exact match).
    #[must_use]
    pub fn member(&self, raw: &str) -> Option<EnumValue> {
        match self.members {
            EnumMembers::Strings(members) => members
                .iter()
                .find(|m| **m == raw)
                .map(|m| EnumValue::new(self.name, EnumRepr::Str(m))),
            EnumMembers::Ints(_) => None,
        }
    }

    /// Looks up an int member.
    #[must_use]
    pub fn int_member(&self, raw: i64) -> Option<EnumValue> {
        match self.members {
            EnumMembers::Ints(members) => members
                .contains(&raw)
                .then(|| EnumValue::new(self.name, EnumRepr::Int(raw))),
            EnumMembers::Strings(_) => None,
        }
    }

    /// True when `value` is a member of this enumeration.
    #[must_use]
    pub fn contains(&self, value: &EnumValue) -> bool {
        if value.class() != self.name {
            return false;
        }
        match value.repr() {
            EnumRepr::Str(s) => self.member(s).is_some(),
            EnumRepr::Int(i) => self.int_member(i).is_some(),
        }
    }

    /// Every member, in declaration order.
    #[must_use]
    pub fn values(&self) -> Vec<EnumValue> {
        match self.members {
            EnumMembers::Strings(members) => members
                .iter()
                .map(|m| EnumValue::new(self.name, EnumRepr::Str(m)))
                .collect(),
            EnumMembers::Ints(members) => members
                .iter()
                .map(|m| EnumValue::new(self.name, EnumRepr::Int(*m)))
                .collect(),
        }
    }
}

fn bound_class(field: &Field) -> Result<&EnumClass> {
    field
        .enum_class()
        .ok_or_else(|| PbjError::guard(field.name(), "no enum class is bound to the field"))
}

fn guard_member(value: &Value, field: &Field) -> Result<()> {
    let class = bound_class(field)?;
    match value {
        Value::Enum(member) if class.contains(member) => Ok(()),
        Value::Enum(member) => Err(PbjError::guard(
            field.name(),
            format!("[{member}] of {} is not a member of {}", member.class(), class.name()),
        )),
        other => Err(mismatch(field, class.name(), other)),
    }
}

/// Member of an int-backed enumeration.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntEnumType;

impl Type for IntEnumType {
    fn name(&self) -> TypeName {
        TypeName::IntEnum
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        guard_member(value, field)
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        value
            .as_enum()
            .and_then(|e| e.as_int())
            .map(PlainValue::from)
            .ok_or_else(|| mismatch(field, "an int enum", value))
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        if is_empty_string(plain) {
            return Ok(field.single_default());
        }
        let class = bound_class(field)?;
        plain_to_i64(plain)
            .and_then(|i| class.int_member(i))
            .map(|e| Some(Value::Enum(e)))
            .ok_or_else(|| undecodable(field, class.name(), plain))
    }

    fn is_numeric(&self) -> bool {
        true
    }
}

/// Member of a string-backed enumeration.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringEnumType;

impl Type for StringEnumType {
    fn name(&self) -> TypeName {
        TypeName::StringEnum
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        guard_member(value, field)
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        value
            .as_enum()
            .and_then(|e| e.as_str())
            .map(|s| PlainValue::String(s.to_string()))
            .ok_or_else(|| mismatch(field, "a string enum", value))
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        if is_empty_string(plain) {
            return Ok(field.single_default());
        }
        let class = bound_class(field)?;
        plain
            .as_str()
            .and_then(|s| class.member(s))
            .map(|e| Some(Value::Enum(e)))
            .ok_or_else(|| undecodable(field, class.name(), plain))
    }

    fn is_string(&self) -> bool {
        true
    }
}

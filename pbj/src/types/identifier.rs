//! UUID kinds.

use super::{is_empty_string, mismatch, undecodable, Type, TypeName};
use crate::errors::{PbjError, Result};
use crate::field::Field;
use crate::utils::is_time_uuid;
use crate::value::{PlainValue, Value};
use uuid::Uuid;

fn encode_uuid(value: &Value, field: &Field) -> Result<PlainValue> {
    value
        .as_uuid()
        .map(|u| PlainValue::String(u.hyphenated().to_string()))
        .ok_or_else(|| mismatch(field, "a uuid", value))
}

fn decode_uuid(plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
    if is_empty_string(plain) {
        return Ok(field.single_default());
    }
    let raw = plain
        .as_str()
        .ok_or_else(|| undecodable(field, "a uuid", plain))?;
    Uuid::parse_str(raw.trim())
        .map(|u| Some(Value::Uuid(u)))
        .map_err(|e| PbjError::guard(field.name(), format!("invalid uuid [{raw}]: {e}")))
}

/// Any UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidType;

impl Type for UuidType {
    fn name(&self) -> TypeName {
        TypeName::Uuid
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        match value {
            Value::Uuid(_) => Ok(()),
            other => Err(mismatch(field, "a uuid", other)),
        }
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        encode_uuid(value, field)
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        decode_uuid(plain, field)
    }

    fn is_string(&self) -> bool {
        true
    }
}

/// A time-based UUID (version 1 or 7).
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeUuidType;

impl Type for TimeUuidType {
    fn name(&self) -> TypeName {
        TypeName::TimeUuid
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        match value {
            Value::Uuid(u) if is_time_uuid(u) => Ok(()),
            Value::Uuid(u) => Err(PbjError::guard(
                field.name(),
                format!("{u} is a version {} uuid, not time based", u.get_version_num()),
            )),
            other => Err(mismatch(field, "a time-uuid", other)),
        }
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        encode_uuid(value, field)
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        decode_uuid(plain, field)
    }

    fn is_string(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{generate_time_uuid, generate_uuid};

    #[test]
    fn test_time_uuid_rejects_random_uuids() {
        let f = Field::builder("id", TypeName::TimeUuid).build().unwrap();
        assert!(TimeUuidType.guard(&Value::Uuid(generate_time_uuid()), &f).is_ok());
        assert!(TimeUuidType.guard(&Value::Uuid(generate_uuid()), &f).is_err());
    }

    #[test]
    fn test_uuid_decode() {
        let f = Field::builder("id", TypeName::Uuid).build().unwrap();
        let id = generate_uuid();
        let plain = UuidType.encode(&Value::Uuid(id), &f).unwrap();
        assert_eq!(UuidType.decode(&plain, &f).unwrap(), Some(Value::Uuid(id)));
        assert!(UuidType.decode(&serde_json::json!("not-a-uuid"), &f).is_err());
    }
}

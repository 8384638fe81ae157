//! The nested message kind.

use super::{mismatch, undecodable, Type, TypeName};
use crate::errors::{PbjError, Result};
use crate::field::Field;
use crate::message::{Message, MessageClass};
use crate::registry::MessageResolver;
use crate::schema::SCHEMA_FIELD_NAME;
use crate::schema_id::SchemaId;
use crate::value::{PlainValue, Value};
use tracing::trace;

/// A nested message, optionally restricted to the field's bound classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageKind;

/// Picks the class a nested plain payload decodes into.
fn resolve_class(
    plain: &PlainValue,
    field: &Field,
    resolver: &MessageResolver,
) -> Result<MessageClass> {
    let bound = field.any_of();
    let Some(raw_id) = plain.get(SCHEMA_FIELD_NAME).and_then(PlainValue::as_str) else {
        return match bound {
            [only] => Ok(*only),
            _ => Err(PbjError::guard(
                field.name(),
                format!("nested message has no [{SCHEMA_FIELD_NAME}] entry"),
            )),
        };
    };

    let id = SchemaId::parse(raw_id)?;
    if let Some(class) = field.bound_class(id.curie())? {
        return Ok(class);
    }
    if !bound.is_empty() {
        return Err(PbjError::guard(
            field.name(),
            format!("[{id}] is not one of the allowed message types"),
        ));
    }

    trace!(field = field.name(), schema_id = %id, "resolving nested message through registry");
    resolver.resolve_by_schema_id(&id)
}

impl Type for MessageKind {
    fn name(&self) -> TypeName {
        TypeName::Message
    }

    fn guard(&self, value: &Value, field: &Field) -> Result<()> {
        let Value::Message(message) = value else {
            return Err(mismatch(field, "a message", value));
        };
        if field.any_of().is_empty() || field.bound_class(message.schema().curie())?.is_some() {
            return Ok(());
        }
        Err(PbjError::guard(
            field.name(),
            format!("[{}] is not one of the allowed message types", message.schema().id()),
        ))
    }

    fn encode(&self, value: &Value, field: &Field) -> Result<PlainValue> {
        value
            .as_message()
            .map(Message::to_plain)
            .ok_or_else(|| mismatch(field, "a message", value))?
    }

    fn decode(&self, plain: &PlainValue, field: &Field) -> Result<Option<Value>> {
        self.decode_with(plain, field, MessageResolver::global())
    }

    fn decode_with(
        &self,
        plain: &PlainValue,
        field: &Field,
        resolver: &MessageResolver,
    ) -> Result<Option<Value>> {
        if !plain.is_object() {
            return Err(undecodable(field, "a message object", plain));
        }
        let class = resolve_class(plain, field, resolver)?;
        let message = Message::from_plain_with_resolver(class.schema()?, plain, resolver)?;
        Ok(Some(Value::Message(Box::new(message))))
    }

    fn is_message(&self) -> bool {
        true
    }

    fn allowed_in_set(&self) -> bool {
        false
    }
}

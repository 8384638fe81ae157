//! Built-in capability mixins and their accessor traits.
//!
//! A mixin contributes fields to a schema and advertises a capability tag the
//! registry can query. The accessor traits are implemented for [`Message`] and
//! check the tag at runtime: calling them on a message whose schema does not
//! declare the mixin fails with `MixinNotDeclared`.

mod command;
mod event;
mod request;
mod response;

pub use command::{Command, CommandMixin, COMMAND_ID_FIELD_NAME};
pub use event::{Event, EventMixin, EVENT_ID_FIELD_NAME};
pub use request::{Request, RequestMixin, REQUEST_ID_FIELD_NAME};
pub use response::{Response, ResponseMixin, RESPONSE_ID_FIELD_NAME};

use crate::errors::{PbjError, Result};
use crate::field::Field;
use crate::message::Message;
use crate::schema::Mixin;
use crate::types::TypeName;
use crate::utils::now_microtime;
use crate::value::Value;
use uuid::Uuid;

/// Name of the microtime field shared by every built-in mixin.
pub const MICROTIME_FIELD_NAME: &str = "microtime";

/// Every built-in mixin, for bulk schema declarations and lookups.
#[must_use]
pub fn builtin() -> [&'static dyn Mixin; 4] {
    [&CommandMixin, &EventMixin, &RequestMixin, &ResponseMixin]
}

fn microtime_field() -> Result<Field> {
    Field::builder(MICROTIME_FIELD_NAME, TypeName::Microtime)
        .required()
        .generated_default(|| Value::Int(now_microtime()))
        .build()
}

fn ensure_mixin(message: &Message, curie: &str) -> Result<()> {
    if message.schema().has_mixin(curie) {
        return Ok(());
    }
    Err(PbjError::MixinNotDeclared {
        schema: message.schema().id().to_string(),
        mixin: curie.to_string(),
    })
}

fn read_uuid(message: &Message, curie: &str, field: &str) -> Result<Option<Uuid>> {
    ensure_mixin(message, curie)?;
    Ok(message.get_single(field)?.and_then(|v| v.as_uuid()))
}

fn write_uuid(message: &mut Message, curie: &str, field: &str, id: Uuid) -> Result<()> {
    ensure_mixin(message, curie)?;
    message.set_single_value(field, id)?;
    Ok(())
}

/// Access to the `microtime` field of any built-in mixin.
pub trait HasMicrotime {
    /// Microseconds since the epoch at which the message was created.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared` when the schema has no microtime field.
    fn microtime(&self) -> Result<i64>;

    /// Overwrites the microtime.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared`, `FrozenMessageIsImmutable` or
    /// `TypeGuardViolation`.
    fn set_microtime(&mut self, micros: i64) -> Result<&mut Self>;
}

impl HasMicrotime for Message {
    fn microtime(&self) -> Result<i64> {
        ensure_microtime(self)?;
        Ok(self
            .get_single(MICROTIME_FIELD_NAME)?
            .and_then(|v| v.as_int())
            .unwrap_or_default())
    }

    fn set_microtime(&mut self, micros: i64) -> Result<&mut Self> {
        ensure_microtime(self)?;
        self.set_single_value(MICROTIME_FIELD_NAME, micros)
    }
}

fn ensure_microtime(message: &Message) -> Result<()> {
    let declared = builtin()
        .iter()
        .any(|m| message.schema().has_mixin(&m.id().curie().to_string()));
    if declared {
        return Ok(());
    }
    Err(PbjError::MixinNotDeclared {
        schema: message.schema().id().to_string(),
        mixin: MICROTIME_FIELD_NAME.to_string(),
    })
}

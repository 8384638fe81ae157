//! The event mixin: a time-uuid `event_id` and a `microtime`.

use super::{microtime_field, read_uuid, write_uuid};
use crate::errors::Result;
use crate::field::Field;
use crate::message::Message;
use crate::schema::Mixin;
use crate::schema_id::SchemaId;
use crate::types::TypeName;
use crate::utils::generate_time_uuid;
use crate::value::Value;
use uuid::Uuid;

/// Name of the event id field.
pub const EVENT_ID_FIELD_NAME: &str = "event_id";

/// Events: facts that already happened, identified by a time-uuid.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventMixin;

impl EventMixin {
    /// Capability tag checked by [`crate::schema::Schema::has_mixin`].
    pub const CURIE: &'static str = "gdbots:pbj:mixin:event";
}

impl Mixin for EventMixin {
    fn id(&self) -> SchemaId {
        SchemaId::from_parts("gdbots", "pbj", "mixin", "event", (1, 0, 0))
    }

    fn fields(&self) -> Result<Vec<Field>> {
        Ok(vec![
            Field::builder(EVENT_ID_FIELD_NAME, TypeName::TimeUuid)
                .required()
                .generated_default(|| Value::Uuid(generate_time_uuid()))
                .build()?,
            microtime_field()?,
        ])
    }
}

/// Accessors for messages declaring [`EventMixin`].
pub trait Event {
    /// The event id.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared` when the schema is not an event.
    fn event_id(&self) -> Result<Option<Uuid>>;

    /// Overwrites the event id.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared`, `FrozenMessageIsImmutable` or
    /// `TypeGuardViolation` for a non time-based uuid.
    fn set_event_id(&mut self, id: Uuid) -> Result<&mut Self>;
}

impl Event for Message {
    fn event_id(&self) -> Result<Option<Uuid>> {
        read_uuid(self, EventMixin::CURIE, EVENT_ID_FIELD_NAME)
    }

    fn set_event_id(&mut self, id: Uuid) -> Result<&mut Self> {
        write_uuid(self, EventMixin::CURIE, EVENT_ID_FIELD_NAME, id)?;
        Ok(self)
    }
}

//! The request mixin: a random `request_id` and a `microtime`.

use super::{ensure_mixin, microtime_field, read_uuid, write_uuid};
use crate::errors::{PbjError, Result};
use crate::field::Field;
use crate::message::Message;
use crate::message_ref::MessageRef;
use crate::schema::Mixin;
use crate::schema_id::SchemaId;
use crate::types::TypeName;
use crate::utils::generate_uuid;
use crate::value::Value;
use uuid::Uuid;

/// Name of the request id field.
pub const REQUEST_ID_FIELD_NAME: &str = "request_id";

/// Requests: queries answered by a response.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestMixin;

impl RequestMixin {
    /// Capability tag checked by [`crate::schema::Schema::has_mixin`].
    pub const CURIE: &'static str = "gdbots:pbj:mixin:request";
}

impl Mixin for RequestMixin {
    fn id(&self) -> SchemaId {
        SchemaId::from_parts("gdbots", "pbj", "mixin", "request", (1, 0, 0))
    }

    fn fields(&self) -> Result<Vec<Field>> {
        Ok(vec![
            Field::builder(REQUEST_ID_FIELD_NAME, TypeName::Uuid)
                .required()
                .generated_default(|| Value::Uuid(generate_uuid()))
                .build()?,
            microtime_field()?,
        ])
    }
}

/// Accessors for messages declaring [`RequestMixin`].
pub trait Request {
    /// The request id.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared` when the schema is not a request.
    fn request_id(&self) -> Result<Option<Uuid>>;

    /// Overwrites the request id.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared` or `FrozenMessageIsImmutable`.
    fn set_request_id(&mut self, id: Uuid) -> Result<&mut Self>;

    /// Resets the request id to a freshly generated one.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared` or `FrozenMessageIsImmutable`.
    fn clear_request_id(&mut self) -> Result<&mut Self>;

    /// A reference to this request: its curie and request id, plus `tag`.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared`, or `RequiredFieldMissing` when the
    /// request id is unset.
    fn generate_message_ref(&self, tag: Option<&str>) -> Result<MessageRef>;
}

impl Request for Message {
    fn request_id(&self) -> Result<Option<Uuid>> {
        read_uuid(self, RequestMixin::CURIE, REQUEST_ID_FIELD_NAME)
    }

    fn set_request_id(&mut self, id: Uuid) -> Result<&mut Self> {
        write_uuid(self, RequestMixin::CURIE, REQUEST_ID_FIELD_NAME, id)?;
        Ok(self)
    }

    fn clear_request_id(&mut self) -> Result<&mut Self> {
        ensure_mixin(self, RequestMixin::CURIE)?;
        self.clear(REQUEST_ID_FIELD_NAME)?;
        Ok(self)
    }

    fn generate_message_ref(&self, tag: Option<&str>) -> Result<MessageRef> {
        let id = self.request_id()?.ok_or_else(|| PbjError::RequiredFieldMissing {
            schema: self.schema().id().to_string(),
            field: REQUEST_ID_FIELD_NAME.to_string(),
        })?;
        Ok(MessageRef::new(self.schema().curie().clone(), id.to_string(), tag))
    }
}

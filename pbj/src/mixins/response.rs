//! The response mixin: a `response_id`, a `microtime` and the optional id of
//! the request being answered.

use super::{microtime_field, read_uuid, write_uuid, REQUEST_ID_FIELD_NAME};
use crate::errors::Result;
use crate::field::Field;
use crate::message::Message;
use crate::schema::Mixin;
use crate::schema_id::SchemaId;
use crate::types::TypeName;
use crate::utils::generate_uuid;
use crate::value::Value;
use uuid::Uuid;

/// Name of the response id field.
pub const RESPONSE_ID_FIELD_NAME: &str = "response_id";

/// Responses to requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseMixin;

impl ResponseMixin {
    /// Capability tag checked by [`crate::schema::Schema::has_mixin`].
    pub const CURIE: &'static str = "gdbots:pbj:mixin:response";
}

impl Mixin for ResponseMixin {
    fn id(&self) -> SchemaId {
        SchemaId::from_parts("gdbots", "pbj", "mixin", "response", (1, 0, 0))
    }

    fn fields(&self) -> Result<Vec<Field>> {
        Ok(vec![
            Field::builder(RESPONSE_ID_FIELD_NAME, TypeName::Uuid)
                .required()
                .generated_default(|| Value::Uuid(generate_uuid()))
                .build()?,
            microtime_field()?,
            Field::builder(REQUEST_ID_FIELD_NAME, TypeName::Uuid).build()?,
        ])
    }
}

/// Accessors for messages declaring [`ResponseMixin`].
pub trait Response {
    /// The response id.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared` when the schema is not a response.
    fn response_id(&self) -> Result<Option<Uuid>>;

    /// Overwrites the response id.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared` or `FrozenMessageIsImmutable`.
    fn set_response_id(&mut self, id: Uuid) -> Result<&mut Self>;

    /// Id of the request this response answers, if recorded.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared` when the schema is not a response.
    fn in_reply_to(&self) -> Result<Option<Uuid>>;

    /// Records the id of the request this response answers.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared` or `FrozenMessageIsImmutable`.
    fn set_in_reply_to(&mut self, request_id: Uuid) -> Result<&mut Self>;
}

impl Response for Message {
    fn response_id(&self) -> Result<Option<Uuid>> {
        read_uuid(self, ResponseMixin::CURIE, RESPONSE_ID_FIELD_NAME)
    }

    fn set_response_id(&mut self, id: Uuid) -> Result<&mut Self> {
        write_uuid(self, ResponseMixin::CURIE, RESPONSE_ID_FIELD_NAME, id)?;
        Ok(self)
    }

    fn in_reply_to(&self) -> Result<Option<Uuid>> {
        read_uuid(self, ResponseMixin::CURIE, REQUEST_ID_FIELD_NAME)
    }

    fn set_in_reply_to(&mut self, request_id: Uuid) -> Result<&mut Self> {
        write_uuid(self, ResponseMixin::CURIE, REQUEST_ID_FIELD_NAME, request_id)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageType;
    use crate::mixins::Request;
    use crate::schema::Schema;

    struct GetArticleResponse;

    impl MessageType for GetArticleResponse {
        fn define_schema() -> Result<Schema> {
            Schema::create_with_mixins(
                "GetArticleResponse",
                "pbj:acme:blog:request:get-article-response:1-0-0",
                &[&ResponseMixin],
                vec![],
            )
        }
    }

    #[test]
    fn test_request_id_is_optional() {
        let mut response = GetArticleResponse::create().unwrap();
        assert!(response.response_id().unwrap().is_some());
        assert_eq!(response.in_reply_to().unwrap(), None);

        let request_id = generate_uuid();
        response.set_in_reply_to(request_id).unwrap();
        assert_eq!(response.in_reply_to().unwrap(), Some(request_id));
        response.clear(REQUEST_ID_FIELD_NAME).unwrap();
        assert_eq!(response.in_reply_to().unwrap(), None);
    }

    #[test]
    fn test_request_accessor_needs_request_mixin() {
        let response = GetArticleResponse::create().unwrap();
        let err = response.request_id().unwrap_err();
        assert_eq!(err.code(), "MixinNotDeclared");
    }
}

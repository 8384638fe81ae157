//! JSON text encoding for messages.

use crate::config::SerializerConfig;
use crate::errors::{PbjError, Result};
use crate::message::Message;
use crate::registry::MessageResolver;
use crate::schema::SCHEMA_FIELD_NAME;
use crate::schema_id::SchemaId;
use crate::value::PlainValue;
use tracing::debug;

/// Converts messages to and from JSON text.
///
/// Decoding reads the payload's `_schema` entry and asks a
/// [`MessageResolver`] for the class to build.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    config: SerializerConfig,
}

impl JsonSerializer {
    /// Creates a serializer.
    #[must_use]
    pub fn new(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// The serializer configuration.
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Encodes a message as JSON.
    pub fn serialize(&self, message: &Message) -> Result<String> {
        let plain = message.to_plain()?;
        let text = if self.config.pretty {
            serde_json::to_string_pretty(&plain)?
        } else {
            serde_json::to_string(&plain)?
        };
        Ok(text)
    }

    /// Decodes JSON text into the message type registered for its `_schema`.
    /// Nested messages on fields bound to no class resolve through the same
    /// `resolver`.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` for malformed JSON or a missing `_schema`,
    /// `InvalidSchemaId`, `NoMessageForSchemaId` and any decode error.
    pub fn deserialize(&self, text: &str, resolver: &MessageResolver) -> Result<Message> {
        let plain: PlainValue = serde_json::from_str(text)?;
        let raw_id = plain
            .get(SCHEMA_FIELD_NAME)
            .and_then(PlainValue::as_str)
            .ok_or_else(|| PbjError::Serialization(format!("payload has no [{SCHEMA_FIELD_NAME}] entry")))?;

        let id = SchemaId::parse(raw_id)?;
        let class = resolver.resolve_by_schema_id(&id)?;
        debug!(schema_id = %id, class = class.name(), "deserializing message");
        class.from_plain_with_resolver(&plain, resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::message::MessageType;
    use crate::schema::Schema;
    use crate::testing::{EmailMessage, NestedMessage, PROVIDER};
    use crate::types::TypeName;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn resolver() -> MessageResolver {
        let resolver = MessageResolver::new();
        resolver.register_schema::<EmailMessage>().unwrap();
        resolver
    }

    /// Carries any message in a field bound to no class.
    struct Envelope;

    impl MessageType for Envelope {
        fn define_schema() -> Result<Schema> {
            Schema::create("Envelope", "pbj:acme:mail:node:envelope:1-0-0", vec![
                Field::builder("payload", TypeName::Message).build()?,
            ])
        }
    }

    #[test]
    fn test_round_trip() {
        let mut email = EmailMessage::with_sender("homer@thesimpsons.com").unwrap();
        email
            .set_single_value("from_name", "homer")
            .unwrap()
            .set_single_value("provider", PROVIDER.member("gmail").unwrap())
            .unwrap();

        let serializer = JsonSerializer::default();
        let text = serializer.serialize(&email).unwrap();
        assert!(!text.contains('\n'));

        let back = serializer.deserialize(&text, &resolver()).unwrap();
        assert_eq!(back, email);
        assert_eq!(
            back.get_single("from_name").unwrap().as_deref(),
            Some(&Value::from("homer"))
        );
    }

    #[test]
    fn test_unbound_nested_message_uses_given_resolver() {
        let resolver = MessageResolver::new();
        resolver.register_schema::<Envelope>().unwrap();
        resolver.register_schema::<NestedMessage>().unwrap();

        let mut payload = NestedMessage::create().unwrap();
        payload.set_single_value("test1", "inside").unwrap();
        let mut envelope = Envelope::create().unwrap();
        envelope.set_single_value("payload", payload).unwrap();

        let serializer = JsonSerializer::default();
        let text = serializer.serialize(&envelope).unwrap();
        let back = serializer.deserialize(&text, &resolver).unwrap();

        assert_eq!(back, envelope);
        let inner = back.get_message("payload").unwrap().unwrap();
        assert_eq!(inner.schema().curie(), NestedMessage::schema().unwrap().curie());

        let plain: PlainValue = serde_json::from_str(&text).unwrap();
        let err = Envelope::from_plain(&plain).unwrap_err();
        assert_eq!(err.code(), "NoMessageForSchemaId");
    }

    #[test]
    fn test_pretty_output() {
        let email = EmailMessage::with_sender("bart@thesimpsons.com").unwrap();
        let text = JsonSerializer::new(SerializerConfig::new().with_pretty(true))
            .serialize(&email)
            .unwrap();
        assert!(text.contains("\n  \"_schema\""));
    }

    #[test]
    fn test_missing_schema_entry() {
        let err = JsonSerializer::default()
            .deserialize(r#"{"from_name": "bart"}"#, &resolver())
            .unwrap_err();
        assert_eq!(err.code(), "Serialization");
    }

    #[test]
    fn test_malformed_json() {
        let err = JsonSerializer::default().deserialize("{", &resolver()).unwrap_err();
        assert_eq!(err.code(), "Serialization");
    }

    #[test]
    fn test_unregistered_schema() {
        let err = JsonSerializer::default()
            .deserialize(r#"{"_schema": "pbj:acme:blog:node:unknown:1-0-0"}"#, &resolver())
            .unwrap_err();
        assert_eq!(err.code(), "NoMessageForSchemaId");
    }
}

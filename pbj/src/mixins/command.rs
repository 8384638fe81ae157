//! The command mixin: a time-uuid `command_id` and a `microtime`.

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

/// Name of the command id field.
pub const COMMAND_ID_FIELD_NAME: &str = "command_id";

/// Commands: requests to change state, identified by a time-uuid.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandMixin;

impl CommandMixin {
    /// Capability tag checked by [`crate::schema::Schema::has_mixin`].
    pub const CURIE: &'static str = "gdbots:pbj:mixin:command";
}

impl Mixin for CommandMixin {
    fn id(&self) -> SchemaId {
        SchemaId::from_parts("gdbots", "pbj", "mixin", "command", (1, 0, 0))
    }

    fn fields(&self) -> Result<Vec<Field>> {
        Ok(vec![
            Field::builder(COMMAND_ID_FIELD_NAME, TypeName::TimeUuid)
                .required()
                .generated_default(|| Value::Uuid(generate_time_uuid()))
                .build()?,
            microtime_field()?,
        ])
    }
}

/// Accessors for messages declaring [`CommandMixin`].
pub trait Command {
    /// The command id.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared` when the schema is not a command.
    fn command_id(&self) -> Result<Option<Uuid>>;

    /// Overwrites the command id.
    ///
    /// # Errors
    ///
    /// Returns `MixinNotDeclared`, `FrozenMessageIsImmutable` or
    /// `TypeGuardViolation` for a non time-based uuid.
    fn set_command_id(&mut self, id: Uuid) -> Result<&mut Self>;
}

impl Command for Message {
    fn command_id(&self) -> Result<Option<Uuid>> {
        read_uuid(self, CommandMixin::CURIE, COMMAND_ID_FIELD_NAME)
    }

    fn set_command_id(&mut self, id: Uuid) -> Result<&mut Self> {
        write_uuid(self, CommandMixin::CURIE, COMMAND_ID_FIELD_NAME, id)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageType;
    use crate::schema::Schema;
    use crate::utils::{generate_uuid, is_time_uuid};

    struct PublishArticle;

    impl MessageType for PublishArticle {
        fn define_schema() -> Result<Schema> {
            Schema::create_with_mixins(
                "PublishArticle",
                "pbj:acme:blog:command:publish-article:1-0-0",
                &[&CommandMixin],
                vec![],
            )
        }
    }

    #[test]
    fn test_mixin_id() {
        assert_eq!(CommandMixin.id().to_string(), "pbj:gdbots:pbj:mixin:command:1-0-0");
        assert_eq!(CommandMixin.id().curie().to_string(), CommandMixin::CURIE);
    }

    #[test]
    fn test_command_id_generated() {
        let command = PublishArticle::create().unwrap();
        let id = command.command_id().unwrap().unwrap();
        assert!(is_time_uuid(&id));

        let other = PublishArticle::create().unwrap();
        assert_ne!(other.command_id().unwrap(), Some(id));
    }

    #[test]
    fn test_set_command_id_requires_time_uuid() {
        let mut command = PublishArticle::create().unwrap();
        assert!(command.set_command_id(generate_uuid()).is_err());

        let id = generate_time_uuid();
        command.set_command_id(id).unwrap();
        assert_eq!(command.command_id().unwrap(), Some(id));
    }
}

//! Message types used by the crate's own tests and benchmarks.

use crate::errors::Result;
use crate::field::{Field, Format};
use crate::message::{Message, MessageType};
use crate::schema::Schema;
use crate::types::{EnumClass, TypeName};
use crate::utils::generate_time_uuid;
use crate::value::{EnumRepr, EnumValue, Value};

/// Int-backed message priority.
pub const PRIORITY: EnumClass = EnumClass::ints("Priority", &[1, 2, 3]);

/// Priority `1`, the default for [`EmailMessage`].
pub const PRIORITY_NORMAL: EnumValue = EnumValue::new("Priority", EnumRepr::Int(1));

/// Priority `2`.
pub const PRIORITY_HIGH: EnumValue = EnumValue::new("Priority", EnumRepr::Int(2));

/// String-backed mail provider.
pub const PROVIDER: EnumClass = EnumClass::strings("Provider", &["aol", "gmail", "hotmail"]);

/// The `gmail` provider, the default for [`EmailMessage`].
pub const PROVIDER_GMAIL: EnumValue = EnumValue::new("Provider", EnumRepr::Str("gmail"));

fn new_time_uuid() -> Value {
    Value::Uuid(generate_time_uuid())
}

/// An email with one field of most kinds and every cardinality rule.
///
/// `from_email` is required with no default.
#[derive(Debug)]
pub struct EmailMessage;

impl EmailMessage {
    /// A new email with only the required sender populated.
    pub fn with_sender(from_email: &str) -> Result<Message> {
        Self::from_plain(&serde_json::json!({ "from_email": from_email }))
    }
}

impl MessageType for EmailMessage {
    fn define_schema() -> Result<Schema> {
        Schema::create("EmailMessage", "pbj:gdbots:tests.pbj:fixtures:email-message:1-0-0", vec![
            Field::builder("id", TypeName::TimeUuid)
                .required()
                .generated_default(new_time_uuid)
                .build()?,
            Field::builder("from_name", TypeName::String).build()?,
            Field::builder("from_email", TypeName::String)
                .required()
                .format(Format::Email)
                .build()?,
            Field::builder("subject", TypeName::String).max_length(100).build()?,
            Field::builder("body", TypeName::Text).build()?,
            Field::builder("priority", TypeName::IntEnum)
                .required()
                .enum_class(PRIORITY)
                .default_value(PRIORITY_NORMAL)
                .build()?,
            Field::builder("sent", TypeName::Boolean).build()?,
            Field::builder("date_sent", TypeName::DateTime).build()?,
            Field::builder("microtime_sent", TypeName::Microtime).build()?,
            Field::builder("provider", TypeName::StringEnum)
                .enum_class(PROVIDER)
                .default_value(PROVIDER_GMAIL)
                .build()?,
            Field::builder("labels", TypeName::String)
                .as_a_set()
                .pattern(r"^[\w\s-]+$")
                .build()?,
            Field::builder("nested", TypeName::Message)
                .any_of([NestedMessage::class()])
                .build()?,
            Field::builder("enum_in_set", TypeName::StringEnum)
                .as_a_set()
                .enum_class(PROVIDER)
                .build()?,
            Field::builder("enum_in_list", TypeName::StringEnum)
                .as_a_list()
                .enum_class(PROVIDER)
                .build()?,
            Field::builder("any_of_message", TypeName::Message)
                .as_a_list()
                .any_of([MapsMessage::class(), NestedMessage::class()])
                .build()?,
            Field::builder("a_big_int", TypeName::BigInt).build()?,
        ])
    }
}

/// A small message nested inside [`EmailMessage`].
#[derive(Debug)]
pub struct NestedMessage;

impl MessageType for NestedMessage {
    fn define_schema() -> Result<Schema> {
        Schema::create("NestedMessage", "pbj:gdbots:tests.pbj:fixtures:nested-message:1-0-0", vec![
            Field::builder("test1", TypeName::String).build()?,
            Field::builder("test2", TypeName::Int).as_a_set().build()?,
            Field::builder("location", TypeName::Float).as_a_list().build()?,
        ])
    }
}

/// One map field per scalar kind, named after the kind.
#[derive(Debug)]
pub struct MapsMessage;

impl MessageType for MapsMessage {
    fn define_schema() -> Result<Schema> {
        Schema::create("MapsMessage", "pbj:gdbots:tests.pbj:fixtures:maps-message:1-0-0", vec![
            Field::builder("String", TypeName::String).as_a_map().build()?,
            Field::builder("Int", TypeName::Int).as_a_map().build()?,
            Field::builder("Boolean", TypeName::Boolean).as_a_map().build()?,
            Field::builder("Microtime", TypeName::Microtime).as_a_map().build()?,
            Field::builder("Uuid", TypeName::Uuid).as_a_map().build()?,
            Field::builder("DateTime", TypeName::DateTime).as_a_map().build()?,
        ])
    }
}

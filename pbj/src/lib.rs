//! # pbj
//!
//! Strongly-typed, self-describing messages.
//!
//! A message type owns a [`Schema`]: an ordered set of named, typed
//! [`Field`]s, each with a cardinality rule (single value, set, list or
//! map), a required flag, defaults and validation. [`Message`] values are
//! checked against their schema on every mutation, can be frozen, deep
//! cloned, and encoded to a plain JSON-compatible form. A
//! [`MessageResolver`] maps schema ids and curies back to message types and
//! answers "which types declare this mixin" queries.
//!
//! ## Quick Start
//!
//! ```rust
//! use pbj::prelude::*;
//!
//! struct Note;
//!
//! impl MessageType for Note {
//!     fn define_schema() -> pbj::Result<Schema> {
//!         Schema::create("Note", "pbj:acme:notes:node:note:1-0-0", vec![
//!             Field::builder("title", TypeName::String).required().build()?,
//!             Field::builder("tags", TypeName::String).as_a_set().build()?,
//!         ])
//!     }
//! }
//!
//! let mut note = Note::from_plain(&serde_json::json!({"title": "Groceries"}))?;
//! note.add_values_to_set("tags", ["Food", "food"])?;
//! assert_eq!(note.get_set("tags")?.len(), 1);
//!
//! let resolver = MessageResolver::new();
//! resolver.register_schema::<Note>()?;
//! let text = JsonSerializer::default().serialize(&note)?;
//! let back = JsonSerializer::default().deserialize(&text, &resolver)?;
//! assert_eq!(back, note);
//! # Ok::<(), pbj::PbjError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod errors;
pub mod field;
pub mod mapping;
pub mod message;
pub mod message_ref;
pub mod mixins;
pub mod registry;
pub mod schema;
pub mod schema_id;
pub mod serializer;
pub mod testing;
pub mod types;
pub mod utils;
pub mod value;

mod integration_tests;

pub use config::{PbjConfig, RegistryConfig, SerializerConfig};
pub use errors::{PbjError, Result};
pub use field::{Field, FieldBuilder, FieldRule, Format};
pub use mapping::MappingBuilder;
pub use message::{FieldValue, Message, MessageClass, MessageType};
pub use message_ref::MessageRef;
pub use registry::MessageResolver;
pub use schema::{Mixin, Schema};
pub use schema_id::{SchemaCurie, SchemaId};
pub use serializer::JsonSerializer;
pub use types::{EnumClass, TypeName};
pub use value::{EnumValue, PlainValue, Value};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{PbjConfig, RegistryConfig, SerializerConfig};
    pub use crate::errors::{PbjError, Result};
    pub use crate::field::{Field, FieldRule, Format};
    pub use crate::mapping::MappingBuilder;
    pub use crate::message::{FieldValue, Message, MessageClass, MessageType};
    pub use crate::message_ref::MessageRef;
    pub use crate::mixins::{
        Command, CommandMixin, Event, EventMixin, HasMicrotime, Request, RequestMixin, Response,
        ResponseMixin,
    };
    pub use crate::registry::MessageResolver;
    pub use crate::schema::{Mixin, Schema};
    pub use crate::schema_id::{SchemaCurie, SchemaId};
    pub use crate::serializer::JsonSerializer;
    pub use crate::types::{EnumClass, TypeName};
    pub use crate::value::{EnumValue, PlainValue, Value};
}

//! Binding Rust types to schemas.
//!
//! A [`MessageType`] defines its schema once; [`MessageClass`] is the
//! copyable handle stored by message fields and the registry. Schemas are
//! memoized per Rust type behind a `OnceLock` cell, so concurrent first
//! access runs `define_schema` exactly once.

use super::Message;
use crate::errors::Result;
use crate::registry::MessageResolver;
use crate::schema::Schema;
use crate::value::PlainValue;
use dashmap::DashMap;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock, OnceLock};
use tracing::debug;

type SchemaCell = Arc<OnceLock<Result<Arc<Schema>>>>;

static SCHEMAS: LazyLock<DashMap<TypeId, SchemaCell>> = LazyLock::new(DashMap::new);

fn schema_for<T: MessageType>() -> Result<Arc<Schema>> {
    // The shard guard is released before init so a schema whose definition
    // touches other types cannot deadlock on the map.
    let cell = SCHEMAS.entry(TypeId::of::<T>()).or_default().clone();
    cell.get_or_init(|| {
        let schema = T::define_schema().map(Arc::new);
        match &schema {
            Ok(s) => debug!(schema_id = %s.id(), owner = short_type_name::<T>(), "schema memoized"),
            Err(e) => debug!(owner = short_type_name::<T>(), error = %e, "schema definition failed"),
        }
        schema
    })
    .clone()
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// A Rust type that owns a message schema.
///
/// ```
/// use pbj::prelude::*;
///
/// struct Ping;
///
/// impl MessageType for Ping {
///     fn define_schema() -> pbj::Result<Schema> {
///         Schema::create("Ping", "pbj:acme:ops:request:ping:1-0-0", vec![
///             Field::builder("note", TypeName::String).build()?,
///         ])
///     }
/// }
///
/// let ping = Ping::create().unwrap();
/// assert_eq!(ping.schema().curie().to_string(), "acme:ops:request:ping");
/// ```
pub trait MessageType: 'static {
    /// Builds the schema. Called at most once per type.
    ///
    /// # Errors
    ///
    /// Returns definition errors such as `FieldAlreadyDefined`.
    fn define_schema() -> Result<Schema>;

    /// The memoized schema.
    ///
    /// # Errors
    ///
    /// Returns the (memoized) definition error.
    fn schema() -> Result<Arc<Schema>>
    where
        Self: Sized,
    {
        schema_for::<Self>()
    }

    /// A new message populated with defaults.
    ///
    /// # Errors
    ///
    /// Returns `RequiredFieldMissing` when a required field has no default.
    fn create() -> Result<Message>
    where
        Self: Sized,
    {
        Message::new(Self::schema()?)
    }

    /// A message decoded from its plain form.
    ///
    /// # Errors
    ///
    /// Returns decode, guard and required-field errors.
    fn from_plain(plain: &PlainValue) -> Result<Message>
    where
        Self: Sized,
    {
        Message::from_plain_with_schema(Self::schema()?, plain)
    }

    /// The type's handle.
    fn class() -> MessageClass
    where
        Self: Sized,
    {
        MessageClass::of::<Self>()
    }
}

/// Copyable handle to a [`MessageType`].
#[derive(Clone, Copy)]
pub struct MessageClass {
    name: &'static str,
    type_id: TypeId,
    schema_fn: fn() -> Result<Arc<Schema>>,
}

impl MessageClass {
    /// The handle for `T`.
    #[must_use]
    pub fn of<T: MessageType>() -> Self {
        Self {
            name: short_type_name::<T>(),
            type_id: TypeId::of::<T>(),
            schema_fn: schema_for::<T>,
        }
    }

    /// The type's short name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type's `TypeId`.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// True when the handle refers to `T`.
    pub fn is<T: MessageType>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// The memoized schema.
    ///
    /// # Errors
    ///
    /// Returns the type's definition error.
    pub fn schema(&self) -> Result<Arc<Schema>> {
        (self.schema_fn)()
    }

    /// A new message of this type populated with defaults.
    ///
    /// # Errors
    ///
    /// See [`MessageType::create`].
    pub fn create(&self) -> Result<Message> {
        Message::new(self.schema()?)
    }

    /// A message of this type decoded from its plain form.
    ///
    /// # Errors
    ///
    /// See [`MessageType::from_plain`].
    pub fn from_plain(&self, plain: &PlainValue) -> Result<Message> {
        Message::from_plain_with_schema(self.schema()?, plain)
    }

    /// A message of this type decoded from its plain form, with nested
    /// payloads on unbound fields resolved through `resolver`.
    ///
    /// # Errors
    ///
    /// See [`Message::from_plain_with_resolver`].
    pub fn from_plain_with_resolver(
        &self,
        plain: &PlainValue,
        resolver: &MessageResolver,
    ) -> Result<Message> {
        Message::from_plain_with_resolver(self.schema()?, plain, resolver)
    }
}

impl PartialEq for MessageClass {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for MessageClass {}

impl Hash for MessageClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for MessageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageClass").field(&self.name).finish()
    }
}

impl fmt::Display for MessageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

//! The message container.
//!
//! A [`Message`] holds field values keyed by name, shaped by each field's
//! rule. Every successful construction or mutation leaves all required fields
//! populated; failing operations leave the message unchanged. Freezing is
//! one-way and reaches every nested message. Cloning is deep and yields an
//! unfrozen copy.

mod class;
mod storage;


pub use class::{MessageClass, MessageType};

use crate::errors::{PbjError, Result};
use crate::field::{Field, FieldRule};
use crate::registry::MessageResolver;
use crate::schema::{Schema, SCHEMA_FIELD_NAME};
use crate::schema_id::SchemaId;
use crate::value::{PlainValue, Value};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use storage::{Keyed, Stored};
use tracing::trace;

/// A field's value as read through [`Message::get`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// A single value: the stored one, else the field or type default.
    Single(Option<Cow<'a, Value>>),
    /// Set members in first-insertion order.
    Set(Vec<&'a Value>),
    /// List items in order.
    List(&'a [Value]),
    /// Map entries in first-insertion order.
    Map(Vec<(&'a str, &'a Value)>),
}

/// A schema-bound record of field values.
pub struct Message {
    schema: Arc<Schema>,
    data: HashMap<String, Stored>,
    frozen: bool,
}

impl Message {
    /// Creates a message holding only defaults.
    ///
    /// # Errors
    ///
    /// Returns `RequiredFieldMissing` when a required field has no default.
    pub fn new(schema: Arc<Schema>) -> Result<Self> {
        let mut message = Self {
            schema,
            data: HashMap::new(),
            frozen: false,
        };
        message.populate_defaults();
        message.check_required()?;
        Ok(message)
    }

    /// Decodes a message from its plain form.
    ///
    /// Each supplied value is decoded through its field; a `_schema` entry
    /// must name the same curie as `schema` and is otherwise ignored. Fields
    /// left empty receive their defaults, then required fields are checked.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` for unknown names, `TypeGuardViolation` for
    /// undecodable or invalid values and `RequiredFieldMissing`.
    pub fn from_plain_with_schema(schema: Arc<Schema>, plain: &PlainValue) -> Result<Self> {
        Self::from_plain_with_resolver(schema, plain, MessageResolver::global())
    }

    /// [`Message::from_plain_with_schema`] resolving nested payloads on
    /// fields bound to no class through `resolver`.
    ///
    /// # Errors
    ///
    /// As [`Message::from_plain_with_schema`], plus `NoMessageForSchemaId`
    /// when a nested `_schema` is unknown to `resolver`.
    pub fn from_plain_with_resolver(
        schema: Arc<Schema>,
        plain: &PlainValue,
        resolver: &MessageResolver,
    ) -> Result<Self> {
        let object = plain.as_object().ok_or_else(|| {
            PbjError::guard(SCHEMA_FIELD_NAME, format!("expected an object for [{}]", schema.id()))
        })?;

        let mut message = Self {
            schema: Arc::clone(&schema),
            data: HashMap::new(),
            frozen: false,
        };

        for (name, value) in object {
            if name == SCHEMA_FIELD_NAME {
                check_payload_schema(&schema, value)?;
                continue;
            }
            let field = schema.field(name)?;
            if let Some(stored) = decode_stored(field, value, resolver)? {
                message.data.insert(name.clone(), stored);
            }
        }

        message.populate_defaults();
        message.check_required()?;
        trace!(schema_id = %schema.id(), fields = message.data.len(), "message decoded");
        Ok(message)
    }

    /// The message's schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// True once [`Message::freeze`] was called.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Makes this message and every nested message immutable.
    pub fn freeze(&mut self) -> &mut Self {
        if !self.frozen {
            self.frozen = true;
            for stored in self.data.values_mut() {
                for value in stored.values_mut() {
                    if let Value::Message(nested) = value {
                        nested.freeze();
                    }
                }
            }
            trace!(schema_id = %self.schema.id(), "message frozen");
        }
        self
    }

    /// An independent, unfrozen deep copy.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        self.clone()
    }

    /// True when the field holds a value (single) or is non-empty (collections).
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` for unknown names.
    pub fn has(&self, name: &str) -> Result<bool> {
        self.schema.field(name)?;
        Ok(self.data.get(name).is_some_and(|s| !s.is_empty()))
    }

    /// Reads a field according to its rule.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` for unknown names.
    pub fn get(&self, name: &str) -> Result<FieldValue<'_>> {
        let field = self.schema.field(name)?;
        Ok(match field.rule() {
            FieldRule::Single => FieldValue::Single(self.single_or_default(field)),
            FieldRule::Set => FieldValue::Set(self.set_values(name)),
            FieldRule::List => FieldValue::List(self.list_values(name)),
            FieldRule::Map => FieldValue::Map(self.map_entries(name)),
        })
    }

    /// Reads a single-value field: the stored value, else the field default,
    /// else the type default.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` or `InvalidFieldRuleUsage`.
    pub fn get_single(&self, name: &str) -> Result<Option<Cow<'_, Value>>> {
        let field = self.field_with_rule(name, FieldRule::Single)?;
        Ok(self.single_or_default(field))
    }

    /// Reads set members in first-insertion order.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` or `InvalidFieldRuleUsage`.
    pub fn get_set(&self, name: &str) -> Result<Vec<&Value>> {
        self.field_with_rule(name, FieldRule::Set)?;
        Ok(self.set_values(name))
    }

    /// Reads list items.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` or `InvalidFieldRuleUsage`.
    pub fn get_list(&self, name: &str) -> Result<&[Value]> {
        self.field_with_rule(name, FieldRule::List)?;
        Ok(self.list_values(name))
    }

    /// Reads map entries in first-insertion order.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` or `InvalidFieldRuleUsage`.
    pub fn get_map(&self, name: &str) -> Result<Vec<(&str, &Value)>> {
        self.field_with_rule(name, FieldRule::Map)?;
        Ok(self.map_entries(name))
    }

    /// Reads one map entry.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` or `InvalidFieldRuleUsage`.
    pub fn get_from_map(&self, name: &str, key: &str) -> Result<Option<&Value>> {
        self.field_with_rule(name, FieldRule::Map)?;
        Ok(match self.data.get(name) {
            Some(Stored::Map(map)) => map.get(key),
            _ => None,
        })
    }

    /// Reads a nested message stored in a single-value field.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` or `InvalidFieldRuleUsage`.
    pub fn get_message(&self, name: &str) -> Result<Option<&Message>> {
        self.field_with_rule(name, FieldRule::Single)?;
        Ok(match self.data.get(name) {
            Some(Stored::Single(value)) => value.as_message(),
            _ => None,
        })
    }

    /// Mutable access to a nested message stored in a single-value field.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMessageIsImmutable`, `FieldNotDefined` or
    /// `InvalidFieldRuleUsage`.
    pub fn get_message_mut(&mut self, name: &str) -> Result<Option<&mut Message>> {
        self.ensure_mutable()?;
        self.field_with_rule(name, FieldRule::Single)?;
        Ok(match self.data.get_mut(name) {
            Some(Stored::Single(value)) => value.as_message_mut(),
            _ => None,
        })
    }

    /// True when the set holds a member equal to `value` under the set key.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` or `InvalidFieldRuleUsage`.
    pub fn is_in_set(&self, name: &str, value: impl Into<Value>) -> Result<bool> {
        self.field_with_rule(name, FieldRule::Set)?;
        let key = value.into().set_key();
        Ok(matches!(self.data.get(name), Some(Stored::Set(set)) if set.contains_key(&key)))
    }

    /// True when the list contains `value`.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` or `InvalidFieldRuleUsage`.
    pub fn is_in_list(&self, name: &str, value: impl Into<Value>) -> Result<bool> {
        self.field_with_rule(name, FieldRule::List)?;
        let value = value.into();
        Ok(self.list_values(name).contains(&value))
    }

    /// True when the map has an entry for `key`.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` or `InvalidFieldRuleUsage`.
    pub fn is_in_map(&self, name: &str, key: &str) -> Result<bool> {
        self.field_with_rule(name, FieldRule::Map)?;
        Ok(matches!(self.data.get(name), Some(Stored::Map(map)) if map.contains_key(key)))
    }

    /// Removes a field's value and restores its default.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMessageIsImmutable`, `FieldNotDefined`, or
    /// `RequiredFieldMissing` (leaving the value intact) when the field is
    /// required and has no default.
    pub fn clear(&mut self, name: &str) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let field = self.schema.field(name)?;
        let restored = default_stored(field).filter(|s| !s.is_empty());
        if restored.is_none() && field.is_required() {
            return Err(self.required_missing(field));
        }
        match restored {
            Some(stored) => self.data.insert(name.to_string(), stored),
            None => self.data.remove(name),
        };
        Ok(self)
    }

    /// Sets a single-value field.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMessageIsImmutable`, `FieldNotDefined`,
    /// `InvalidFieldRuleUsage` or `TypeGuardViolation`.
    pub fn set_single_value(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let value = value.into();
        let field = self.field_with_rule(name, FieldRule::Single)?;
        field.guard(&value)?;
        self.data.insert(name.to_string(), Stored::Single(value));
        Ok(self)
    }

    /// Sets a single-value field, clearing it for `None`.
    ///
    /// # Errors
    ///
    /// See [`Message::set_single_value`] and [`Message::clear`].
    pub fn set_single_value_opt(&mut self, name: &str, value: Option<Value>) -> Result<&mut Self> {
        match value {
            Some(value) => self.set_single_value(name, value),
            None => {
                self.ensure_mutable()?;
                self.field_with_rule(name, FieldRule::Single)?;
                self.clear(name)
            }
        }
    }

    /// Adds members to a set. Every value is guarded before any is stored;
    /// a member whose set key is already present keeps its original casing.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMessageIsImmutable`, `FieldNotDefined`,
    /// `InvalidFieldRuleUsage` or `TypeGuardViolation`.
    pub fn add_values_to_set<I, V>(&mut self, name: &str, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.ensure_mutable()?;
        let field = self.field_with_rule(name, FieldRule::Set)?;
        let values = guard_all(field, values)?;
        if values.is_empty() {
            return Ok(self);
        }

        let slot = self
            .data
            .entry(name.to_string())
            .or_insert_with(|| Stored::Set(Keyed::default()));
        if let Stored::Set(set) = slot {
            for value in values {
                set.insert_member(value);
            }
        }
        Ok(self)
    }

    /// Removes members from a set by set key.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMessageIsImmutable`, `FieldNotDefined`,
    /// `InvalidFieldRuleUsage`, or `RequiredFieldMissing` (leaving the set
    /// intact) when a required set would become empty.
    pub fn remove_values_from_set<I, V>(&mut self, name: &str, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.ensure_mutable()?;
        let schema = Arc::clone(&self.schema);
        let field = rule_field(&schema, name, FieldRule::Set)?;
        let keys: Vec<String> = values.into_iter().map(|v| v.into().set_key()).collect();
        let removed: HashSet<&str> = keys.iter().map(String::as_str).collect();
        let remaining = match self.data.get(name) {
            Some(Stored::Set(set)) => set.len_without(&removed),
            _ => 0,
        };
        self.shrink_collection(field, remaining, |stored| {
            if let Stored::Set(set) = stored {
                set.remove_keys(&removed);
            }
        })?;
        Ok(self)
    }

    /// Appends items to a list, keeping duplicates and order. Every value is
    /// guarded before any is stored.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMessageIsImmutable`, `FieldNotDefined`,
    /// `InvalidFieldRuleUsage` or `TypeGuardViolation`.
    pub fn add_values_to_list<I, V>(&mut self, name: &str, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.ensure_mutable()?;
        let field = self.field_with_rule(name, FieldRule::List)?;
        let values = guard_all(field, values)?;
        if values.is_empty() {
            return Ok(self);
        }

        let slot = self
            .data
            .entry(name.to_string())
            .or_insert_with(|| Stored::List(Vec::new()));
        if let Stored::List(list) = slot {
            list.extend(values);
        }
        Ok(self)
    }

    /// Removes every occurrence of each given value from a list.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMessageIsImmutable`, `FieldNotDefined`,
    /// `InvalidFieldRuleUsage`, or `RequiredFieldMissing` (leaving the list
    /// intact) when a required list would become empty.
    pub fn remove_values_from_list<I, V>(&mut self, name: &str, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.ensure_mutable()?;
        let schema = Arc::clone(&self.schema);
        let field = rule_field(&schema, name, FieldRule::List)?;
        let removed: Vec<Value> = values.into_iter().map(Into::into).collect();
        let remaining = self
            .list_values(name)
            .iter()
            .filter(|v| !removed.contains(v))
            .count();
        self.shrink_collection(field, remaining, |stored| {
            if let Stored::List(list) = stored {
                list.retain(|v| !removed.contains(v));
            }
        })?;
        Ok(self)
    }

    /// Adds or replaces one map entry.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMessageIsImmutable`, `FieldNotDefined`,
    /// `InvalidFieldRuleUsage` or `TypeGuardViolation`.
    pub fn add_to_map(
        &mut self,
        name: &str,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let value = value.into();
        let field = self.field_with_rule(name, FieldRule::Map)?;
        field.guard(&value)?;

        let slot = self
            .data
            .entry(name.to_string())
            .or_insert_with(|| Stored::Map(Keyed::default()));
        if let Stored::Map(map) = slot {
            map.upsert(key.into(), value);
        }
        Ok(self)
    }

    /// Removes one map entry.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMessageIsImmutable`, `FieldNotDefined`,
    /// `InvalidFieldRuleUsage`, or `RequiredFieldMissing` (leaving the map
    /// intact) when a required map would become empty.
    pub fn remove_from_map(&mut self, name: &str, key: &str) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let schema = Arc::clone(&self.schema);
        let field = rule_field(&schema, name, FieldRule::Map)?;
        let removed = HashSet::from([key]);
        let remaining = match self.data.get(name) {
            Some(Stored::Map(map)) => map.len_without(&removed),
            _ => 0,
        };
        self.shrink_collection(field, remaining, |stored| {
            if let Stored::Map(map) = stored {
                map.remove_keys(&removed);
            }
        })?;
        Ok(self)
    }

    /// Encodes the message to its plain form: an object whose first entry is
    /// `_schema`, followed by every populated field in schema order.
    ///
    /// # Errors
    ///
    /// Returns an error when a stored value cannot be encoded.
    pub fn to_plain(&self) -> Result<PlainValue> {
        let mut out = serde_json::Map::new();
        for field in self.schema.fields() {
            let Some(stored) = self.data.get(field.name()) else {
                continue;
            };
            if stored.is_empty() {
                continue;
            }
            let plain = match stored {
                Stored::Single(value) => field.encode_value(value)?,
                Stored::Set(set) => PlainValue::Array(
                    set.values()
                        .map(|v| field.encode_value(v))
                        .collect::<Result<_>>()?,
                ),
                Stored::List(list) => PlainValue::Array(
                    list.iter()
                        .map(|v| field.encode_value(v))
                        .collect::<Result<_>>()?,
                ),
                Stored::Map(map) => PlainValue::Object(
                    map.entries()
                        .iter()
                        .map(|(k, v)| Ok((k.clone(), field.encode_value(v)?)))
                        .collect::<Result<_>>()?,
                ),
            };
            out.insert(field.name().to_string(), plain);
        }
        Ok(PlainValue::Object(out))
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.frozen {
            return Err(PbjError::FrozenMessageIsImmutable {
                schema: self.schema.id().to_string(),
            });
        }
        Ok(())
    }

    fn field_with_rule(&self, name: &str, rule: FieldRule) -> Result<&Field> {
        rule_field(&self.schema, name, rule)
    }

    fn required_missing(&self, field: &Field) -> PbjError {
        PbjError::RequiredFieldMissing {
            schema: self.schema.id().to_string(),
            field: field.name().to_string(),
        }
    }

    /// Removes entries in place once `remaining` shows a required field
    /// keeps at least one. Surviving values are never copied, so nested
    /// messages keep their frozen state.
    fn shrink_collection(
        &mut self,
        field: &Field,
        remaining: usize,
        shrink: impl FnOnce(&mut Stored),
    ) -> Result<()> {
        if remaining == 0 {
            if field.is_required() {
                return Err(self.required_missing(field));
            }
            self.data.remove(field.name());
        } else if let Some(stored) = self.data.get_mut(field.name()) {
            shrink(stored);
        }
        Ok(())
    }

    fn populate_defaults(&mut self) {
        let schema = Arc::clone(&self.schema);
        for field in schema.fields() {
            if self.data.get(field.name()).is_some_and(|s| !s.is_empty()) {
                continue;
            }
            match default_stored(field).filter(|s| !s.is_empty()) {
                Some(stored) => {
                    self.data.insert(field.name().to_string(), stored);
                }
                None => {
                    self.data.remove(field.name());
                }
            }
        }
    }

    fn check_required(&self) -> Result<()> {
        for field in self.schema.required_fields() {
            if !self.data.get(field.name()).is_some_and(|s| !s.is_empty()) {
                return Err(self.required_missing(field));
            }
        }
        Ok(())
    }

    fn single_or_default(&self, field: &Field) -> Option<Cow<'_, Value>> {
        match self.data.get(field.name()) {
            Some(Stored::Single(value)) => Some(Cow::Borrowed(value)),
            _ => field
                .single_default()
                .or_else(|| field.kind().default_value())
                .map(Cow::Owned),
        }
    }

    fn set_values(&self, name: &str) -> Vec<&Value> {
        match self.data.get(name) {
            Some(Stored::Set(set)) => set.values().collect(),
            _ => Vec::new(),
        }
    }

    fn list_values(&self, name: &str) -> &[Value] {
        match self.data.get(name) {
            Some(Stored::List(list)) => list,
            _ => &[],
        }
    }

    fn map_entries(&self, name: &str) -> Vec<(&str, &Value)> {
        match self.data.get(name) {
            Some(Stored::Map(map)) => map.entries().iter().map(|(k, v)| (k.as_str(), v)).collect(),
            _ => Vec::new(),
        }
    }
}

fn rule_field<'s>(schema: &'s Schema, name: &str, rule: FieldRule) -> Result<&'s Field> {
    let field = schema.field(name)?;
    if field.rule() != rule {
        return Err(PbjError::InvalidFieldRuleUsage {
            field: name.to_string(),
            expected: rule,
            actual: field.rule(),
        });
    }
    Ok(field)
}

fn guard_all<I, V>(field: &Field, values: I) -> Result<Vec<Value>>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    for value in &values {
        field.guard(value)?;
    }
    Ok(values)
}

/// The storage a field's default produces, if any.
fn default_stored(field: &Field) -> Option<Stored> {
    field.configured_default()?;
    Some(match field.rule() {
        FieldRule::Single => Stored::Single(field.single_default()?),
        FieldRule::Set => Stored::Set(field.default_members().into_iter().collect()),
        FieldRule::List => Stored::List(field.default_members()),
        FieldRule::Map => {
            let mut map = Keyed::default();
            for (key, value) in field.default_entries() {
                map.upsert(key, value);
            }
            Stored::Map(map)
        }
    })
}

fn check_payload_schema(schema: &Schema, value: &PlainValue) -> Result<()> {
    let raw = value.as_str().ok_or_else(|| {
        PbjError::guard(SCHEMA_FIELD_NAME, format!("expected a schema id string, got {value}"))
    })?;
    let id = SchemaId::parse(raw)?;
    if id.curie() != schema.curie() {
        return Err(PbjError::guard(
            SCHEMA_FIELD_NAME,
            format!("[{id}] does not match schema [{}]", schema.id()),
        ));
    }
    Ok(())
}

/// Decodes one payload entry into rule-shaped storage. `None` means nothing
/// was supplied (null or an empty collection).
fn decode_stored(
    field: &Field,
    plain: &PlainValue,
    resolver: &MessageResolver,
) -> Result<Option<Stored>> {
    if plain.is_null() {
        return Ok(None);
    }
    let not_a = |what: &str| {
        PbjError::guard(field.name(), format!("expected {what} for [{}], got {plain}", field.rule()))
    };

    let stored = match field.rule() {
        FieldRule::Single => field.decode_value_with(plain, resolver)?.map(Stored::Single),
        FieldRule::Set => {
            let items = plain.as_array().ok_or_else(|| not_a("a sequence"))?;
            let mut set = Keyed::default();
            for item in items {
                if let Some(value) = field.decode_value_with(item, resolver)? {
                    set.insert_member(value);
                }
            }
            Some(Stored::Set(set))
        }
        FieldRule::List => {
            let items = plain.as_array().ok_or_else(|| not_a("a sequence"))?;
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                if let Some(value) = field.decode_value_with(item, resolver)? {
                    list.push(value);
                }
            }
            Some(Stored::List(list))
        }
        FieldRule::Map => {
            let entries = plain.as_object().ok_or_else(|| not_a("a key-value object"))?;
            let mut map = Keyed::default();
            for (key, item) in entries {
                if let Some(value) = field.decode_value_with(item, resolver)? {
                    map.upsert(key.clone(), value);
                }
            }
            Some(Stored::Map(map))
        }
    };
    Ok(stored.filter(|s| !s.is_empty()))
}

impl Clone for Message {
    /// Deep copy; the copy and every nested copy are unfrozen.
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            data: self.data.clone(),
            frozen: false,
        }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.schema.id() == other.schema.id() && self.data == other.data
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("schema", &self.schema.id().to_string())
            .field("frozen", &self.frozen)
            .field("data", &self.data)
            .finish()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_plain() {
            Ok(plain) => write!(f, "{plain}"),
            Err(_) => write!(f, "{}", self.schema.id()),
        }
    }
}

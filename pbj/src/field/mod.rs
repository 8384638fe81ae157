//! Field definitions.
//!
//! A [`Field`] is immutable once built by a [`FieldBuilder`]. It knows its
//! kind, cardinality rule, default and the extra constraints (pattern, format,
//! lengths, ranges, custom validators) applied on top of the kind's guard.

mod builder;
mod format;

pub use builder::FieldBuilder;
pub use format::Format;

use crate::errors::{PbjError, Result};
use crate::message::MessageClass;
use crate::registry::MessageResolver;
use crate::schema_id::SchemaCurie;
use crate::types::{EnumClass, Type, TypeName};
use crate::value::{PlainValue, Value};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Cardinality of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldRule {
    /// One value or none.
    #[default]
    #[serde(rename = "a-single-value")]
    Single,
    /// Unique values, de-duplicated case and whitespace insensitively.
    #[serde(rename = "a-set")]
    Set,
    /// Ordered values, duplicates allowed.
    #[serde(rename = "a-list")]
    List,
    /// Values keyed by a caller supplied string.
    #[serde(rename = "a-map")]
    Map,
}

impl FieldRule {
    /// The rule's wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "a-single-value",
            Self::Set => "a-set",
            Self::List => "a-list",
            Self::Map => "a-map",
        }
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces a fresh default on every use (ids, "now" timestamps).
pub type DefaultFn = fn() -> Value;

/// A field's default.
#[derive(Debug, Clone)]
pub enum FieldDefault {
    /// A constant single value.
    Single(Value),
    /// Constant members of a set or list.
    Many(Vec<Value>),
    /// Constant entries of a map.
    Keyed(Vec<(String, Value)>),
    /// A single value produced on demand.
    Generated(DefaultFn),
}

impl FieldDefault {
    /// Whether this default shape fits `rule`.
    #[must_use]
    pub fn fits(&self, rule: FieldRule) -> bool {
        matches!(
            (self, rule),
            (Self::Single(_) | Self::Generated(_), FieldRule::Single)
                | (Self::Many(_), FieldRule::Set | FieldRule::List)
                | (Self::Keyed(_), FieldRule::Map)
        )
    }
}

type ValidatorFn = dyn Fn(&Value) -> anyhow::Result<()> + Send + Sync;

/// A custom per-value check run after the kind guard.
#[derive(Clone)]
pub struct Validator {
    name: String,
    check: Arc<ValidatorFn>,
}

impl Validator {
    /// Wraps a check function.
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// The validator's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the check.
    ///
    /// # Errors
    ///
    /// Whatever the check returns.
    pub fn check(&self, value: &Value) -> anyhow::Result<()> {
        (self.check)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").field("name", &self.name).finish_non_exhaustive()
    }
}

/// An immutable field definition.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) type_name: TypeName,
    pub(crate) rule: FieldRule,
    pub(crate) required: bool,
    pub(crate) default: Option<FieldDefault>,
    pub(crate) pattern: Option<Regex>,
    pub(crate) format: Option<Format>,
    pub(crate) min_length: Option<usize>,
    pub(crate) max_length: Option<usize>,
    pub(crate) min: Option<i64>,
    pub(crate) max: Option<i64>,
    pub(crate) enum_class: Option<EnumClass>,
    pub(crate) any_of: Vec<MessageClass>,
    /// Curie to bound class, built on first lookup.
    pub(crate) any_of_index: OnceLock<HashMap<SchemaCurie, MessageClass>>,
    pub(crate) validators: Vec<Validator>,
    pub(crate) description: Option<String>,
}

impl Field {
    /// Starts building a single-value, optional field.
    #[must_use]
    pub fn builder(name: impl Into<String>, type_name: TypeName) -> FieldBuilder {
        FieldBuilder::new(name, type_name)
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind name.
    pub fn type_name(&self) -> TypeName {
        self.type_name
    }

    /// The kind implementation.
    pub fn kind(&self) -> &'static dyn Type {
        self.type_name.as_type()
    }

    /// The cardinality rule.
    pub fn rule(&self) -> FieldRule {
        self.rule
    }

    /// True for single-value fields.
    pub fn is_single(&self) -> bool {
        self.rule == FieldRule::Single
    }

    /// True for set fields.
    pub fn is_a_set(&self) -> bool {
        self.rule == FieldRule::Set
    }

    /// True for list fields.
    pub fn is_a_list(&self) -> bool {
        self.rule == FieldRule::List
    }

    /// True for map fields.
    pub fn is_a_map(&self) -> bool {
        self.rule == FieldRule::Map
    }

    /// True when every valid message must hold a value for this field.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The configured default.
    pub fn configured_default(&self) -> Option<&FieldDefault> {
        self.default.as_ref()
    }

    /// True when a default is configured.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The value pattern, if any.
    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// The string format, if any.
    pub fn format(&self) -> Option<Format> {
        self.format
    }

    /// Minimum byte length for string kinds.
    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Maximum byte length for string kinds.
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Lower bound for integer kinds.
    pub fn min(&self) -> Option<i64> {
        self.min
    }

    /// Upper bound for integer kinds.
    pub fn max(&self) -> Option<i64> {
        self.max
    }

    /// The enumeration bound to an enum field.
    pub fn enum_class(&self) -> Option<&EnumClass> {
        self.enum_class.as_ref()
    }

    /// The message classes a message field accepts; empty means any.
    pub fn any_of(&self) -> &[MessageClass] {
        &self.any_of
    }

    /// The bound class whose schema has `curie`. The first class listed
    /// wins when two share a curie.
    ///
    /// The curie index is built on the first call rather than at build time,
    /// since a message type may bind itself and its schema is still being
    /// defined while its fields are built.
    ///
    /// # Errors
    ///
    /// Returns a bound class's schema definition error; nothing is cached
    /// in that case.
    pub fn bound_class(&self, curie: &SchemaCurie) -> Result<Option<MessageClass>> {
        if let Some(index) = self.any_of_index.get() {
            return Ok(index.get(curie).copied());
        }
        let mut index = HashMap::with_capacity(self.any_of.len());
        for class in &self.any_of {
            index.entry(class.schema()?.curie().clone()).or_insert(*class);
        }
        Ok(self.any_of_index.get_or_init(|| index).get(curie).copied())
    }

    /// The custom validators, in run order.
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Free-form description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The default for a single-value field, evaluating generated defaults.
    #[must_use]
    pub fn single_default(&self) -> Option<Value> {
        match &self.default {
            Some(FieldDefault::Single(value)) => Some(value.clone()),
            Some(FieldDefault::Generated(generate)) => Some(generate()),
            _ => None,
        }
    }

    /// Default members of a set or list field.
    #[must_use]
    pub fn default_members(&self) -> Vec<Value> {
        match &self.default {
            Some(FieldDefault::Many(values)) => values.clone(),
            _ => Vec::new(),
        }
    }

    /// Default entries of a map field.
    #[must_use]
    pub fn default_entries(&self) -> Vec<(String, Value)> {
        match &self.default {
            Some(FieldDefault::Keyed(entries)) => entries.clone(),
            _ => Vec::new(),
        }
    }

    /// Checks one value: the kind guard, then pattern and format for strings,
    /// then each custom validator in order.
    ///
    /// # Errors
    ///
    /// Returns `TypeGuardViolation` on the first failed check.
    pub fn guard(&self, value: &Value) -> Result<()> {
        self.kind().guard(value, self)?;

        if let Value::String(s) = value {
            if let Some(pattern) = &self.pattern {
                if !pattern.is_match(s) {
                    return Err(PbjError::guard(
                        &self.name,
                        format!("[{s}] does not match pattern [{}]", pattern.as_str()),
                    ));
                }
            }
            if let Some(format) = self.format {
                if !format.is_valid(s) {
                    return Err(PbjError::guard(
                        &self.name,
                        format!("[{s}] is not a valid {format}"),
                    ));
                }
            }
        }

        for validator in &self.validators {
            validator.check(value).map_err(|e| {
                PbjError::guard(&self.name, format!("{} failed: {e}", validator.name()))
            })?;
        }
        Ok(())
    }

    /// Encodes one guarded value to its plain form.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is not of the field's kind.
    pub fn encode_value(&self, value: &Value) -> Result<PlainValue> {
        self.kind().encode(value, self)
    }

    /// Decodes and guards one plain value. `null` yields the single-value
    /// default, which is `None` for collection fields.
    ///
    /// # Errors
    ///
    /// Returns `TypeGuardViolation` when the plain value cannot be decoded or
    /// the decoded value fails the guard.
    pub fn decode_value(&self, plain: &PlainValue) -> Result<Option<Value>> {
        self.decode_value_with(plain, MessageResolver::global())
    }

    /// [`Field::decode_value`] resolving nested payloads on unbound message
    /// fields through `resolver` instead of the process-wide registry.
    ///
    /// # Errors
    ///
    /// As [`Field::decode_value`], plus the resolver's lookup errors.
    pub fn decode_value_with(
        &self,
        plain: &PlainValue,
        resolver: &MessageResolver,
    ) -> Result<Option<Value>> {
        let decoded = if plain.is_null() {
            self.single_default()
        } else {
            self.kind().decode_with(plain, self, resolver)?
        };
        if let Some(value) = &decoded {
            self.guard(value)?;
        }
        Ok(decoded)
    }

    /// Metadata dump used by schema introspection.
    #[must_use]
    pub fn to_plain(&self) -> PlainValue {
        let mut out = serde_json::Map::new();
        out.insert("name".into(), self.name.clone().into());
        out.insert("type".into(), self.type_name.as_str().into());
        out.insert("rule".into(), self.rule.as_str().into());
        out.insert("required".into(), self.required.into());
        if let Some(pattern) = &self.pattern {
            out.insert("pattern".into(), pattern.as_str().into());
        }
        if let Some(format) = self.format {
            out.insert("format".into(), format.as_str().into());
        }
        if let Some(min_length) = self.min_length {
            out.insert("min_length".into(), min_length.into());
        }
        if let Some(max_length) = self.max_length {
            out.insert("max_length".into(), max_length.into());
        }
        if let Some(min) = self.min {
            out.insert("min".into(), min.into());
        }
        if let Some(max) = self.max {
            out.insert("max".into(), max.into());
        }
        if let Some(class) = &self.enum_class {
            out.insert("enum".into(), class.name().into());
        }
        if !self.any_of.is_empty() {
            let names: Vec<PlainValue> = self.any_of.iter().map(|c| c.name().into()).collect();
            out.insert("any_of".into(), names.into());
        }
        if let Some(description) = &self.description {
            out.insert("description".into(), description.clone().into());
        }
        PlainValue::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_rule_display_and_serde() {
        assert_eq!(FieldRule::Single.to_string(), "a-single-value");
        assert_eq!(FieldRule::Map.to_string(), "a-map");
        assert_eq!(serde_json::to_string(&FieldRule::Set).unwrap(), "\"a-set\"");
    }

    #[test]
    fn test_default_shape_fits_rule() {
        assert!(FieldDefault::Single(Value::Int(1)).fits(FieldRule::Single));
        assert!(FieldDefault::Many(vec![]).fits(FieldRule::List));
        assert!(!FieldDefault::Many(vec![]).fits(FieldRule::Map));
        assert!(FieldDefault::Keyed(vec![]).fits(FieldRule::Map));
        assert!(!FieldDefault::Generated(|| Value::Int(1)).fits(FieldRule::Set));
    }

    #[test]
    fn test_guard_runs_pattern_then_validators() {
        let field = Field::builder("code", TypeName::String)
            .pattern("^[a-z]+$")
            .validator("not-reserved", |v| {
                anyhow::ensure!(v.as_str() != Some("admin"), "reserved word");
                Ok(())
            })
            .build()
            .unwrap();

        assert!(field.guard(&Value::from("abc")).is_ok());
        assert!(matches!(
            field.guard(&Value::from("ABC")),
            Err(PbjError::TypeGuardViolation { .. })
        ));
        let err = field.guard(&Value::from("admin")).unwrap_err();
        assert!(err.to_string().contains("reserved word"));
    }

    #[test]
    fn test_decode_null_uses_default() {
        let field = Field::builder("count", TypeName::Int)
            .default_value(5_i64)
            .build()
            .unwrap();
        assert_eq!(field.decode_value(&PlainValue::Null).unwrap(), Some(Value::Int(5)));
        assert_eq!(field.decode_value(&json!(7)).unwrap(), Some(Value::Int(7)));
        assert!(field.decode_value(&json!(-7)).is_err());
    }

    #[test]
    fn test_to_plain_metadata() {
        let field = Field::builder("email", TypeName::String)
            .format(Format::Email)
            .required()
            .build()
            .unwrap();
        assert_eq!(
            field.to_plain(),
            json!({"name": "email", "type": "string", "rule": "a-single-value", "required": true, "format": "email"})
        );
    }

    #[test]
    fn test_bound_class_index_built_on_first_lookup() {
        use crate::message::MessageType;
        use crate::testing::{MapsMessage, NestedMessage};

        let field = Field::builder("attachment", TypeName::Message)
            .any_of([MapsMessage::class(), NestedMessage::class()])
            .build()
            .unwrap();
        assert!(field.any_of_index.get().is_none());

        let nested = NestedMessage::schema().unwrap();
        assert_eq!(field.bound_class(nested.curie()).unwrap(), Some(NestedMessage::class()));
        assert_eq!(field.any_of_index.get().map(HashMap::len), Some(2));

        let other = SchemaCurie::parse("acme:blog:node:article").unwrap();
        assert_eq!(field.bound_class(&other).unwrap(), None);
    }

    #[test]
    fn test_self_bound_field_resolves_after_definition() {
        use crate::message::MessageType;
        use crate::schema::Schema;

        struct Comment;

        impl MessageType for Comment {
            fn define_schema() -> Result<Schema> {
                Schema::create("Comment", "pbj:acme:blog:node:comment:1-0-0", vec![
                    Field::builder("body", TypeName::String).build()?,
                    Field::builder("replies", TypeName::Message)
                        .as_a_list()
                        .any_of([Comment::class()])
                        .build()?,
                ])
            }
        }

        let mut reply = Comment::create().unwrap();
        reply.set_single_value("body", "me too").unwrap();
        let mut comment = Comment::create().unwrap();
        comment.add_values_to_list("replies", [reply]).unwrap();

        let back = Comment::from_plain(&comment.to_plain().unwrap()).unwrap();
        assert_eq!(back, comment);
    }
}

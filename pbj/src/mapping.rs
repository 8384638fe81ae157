//! Search-index mapping generation from schema metadata.
//!
//! Only reads [`Schema`] and [`Field`] metadata; never touches messages.

use crate::errors::Result;
use crate::field::{Field, Format};
use crate::schema::{Schema, SCHEMA_FIELD_NAME};
use crate::schema_id::SchemaId;
use crate::types::TypeName;
use crate::value::PlainValue;
use serde_json::json;
use std::collections::HashSet;
use tracing::trace;

/// Builds Elasticsearch-style index mappings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingBuilder;

impl MappingBuilder {
    /// Creates a builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The mapping for a schema: `{"properties": {field: mapping, ...}}`.
    ///
    /// # Errors
    ///
    /// Returns the definition error of a nested message type.
    pub fn build(&self, schema: &Schema) -> Result<PlainValue> {
        let mut seen = HashSet::new();
        Ok(json!({ "properties": self.map_schema(schema, &mut seen)? }))
    }

    fn map_schema(&self, schema: &Schema, seen: &mut HashSet<SchemaId>) -> Result<PlainValue> {
        seen.insert(schema.id().clone());
        let mut properties = serde_json::Map::new();
        for field in schema.fields() {
            let mapping = if field.name() == SCHEMA_FIELD_NAME {
                json!({"type": "string", "index": "not_analyzed"})
            } else {
                self.map_field(field, seen)?
            };
            properties.insert(field.name().to_string(), mapping);
        }
        seen.remove(schema.id());
        trace!(schema_id = %schema.id(), fields = properties.len(), "mapping built");
        Ok(PlainValue::Object(properties))
    }

    fn map_field(&self, field: &Field, seen: &mut HashSet<SchemaId>) -> Result<PlainValue> {
        Ok(match field.type_name() {
            TypeName::String | TypeName::Text => map_string(field),
            TypeName::Message => self.map_message(field, seen)?,
            other => type_mapping(other),
        })
    }

    /// Nested messages bound to exactly one class get that class's
    /// properties; anything else (or a recursive reference) maps as bare
    /// `nested`.
    fn map_message(&self, field: &Field, seen: &mut HashSet<SchemaId>) -> Result<PlainValue> {
        if let [class] = field.any_of() {
            let schema = class.schema()?;
            if !seen.contains(schema.id()) {
                return Ok(json!({
                    "type": "nested",
                    "properties": self.map_schema(&schema, seen)?,
                }));
            }
        }
        Ok(type_mapping(TypeName::Message))
    }
}

fn not_analyzed() -> PlainValue {
    json!({"type": "string", "index": "not_analyzed"})
}

fn map_string(field: &Field) -> PlainValue {
    match field.format() {
        Some(Format::Date | Format::DateTime) => type_mapping(TypeName::DateTime),
        Some(Format::Ipv4) => json!({"type": "ip"}),
        Some(_) => not_analyzed(),
        None => json!({"type": "string"}),
    }
}

fn type_mapping(type_name: TypeName) -> PlainValue {
    match type_name {
        TypeName::BigInt | TypeName::Int | TypeName::Microtime => json!({"type": "long"}),
        TypeName::Binary => json!({"type": "binary"}),
        TypeName::Boolean => json!({"type": "boolean"}),
        TypeName::Date | TypeName::DateTime | TypeName::Timestamp => {
            json!({"type": "dateOptionalTime"})
        }
        TypeName::Float => json!({"type": "float"}),
        TypeName::IntEnum | TypeName::SignedInt => json!({"type": "integer"}),
        TypeName::Message => json!({"type": "nested"}),
        TypeName::String | TypeName::Text => json!({"type": "string"}),
        TypeName::StringEnum | TypeName::TimeUuid | TypeName::Uuid => not_analyzed(),
    }
}

//! Schemas: the ordered field definitions and mixins of one message type.

use crate::errors::{PbjError, Result};
use crate::field::Field;
use crate::schema_id::{SchemaCurie, SchemaId, SCHEMA_ID_PATTERN};
use crate::types::TypeName;
use crate::value::PlainValue;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// Name of the synthetic field holding a message's own schema id.
pub const SCHEMA_FIELD_NAME: &str = "_schema";

/// A reusable bundle of fields advertised as a capability tag.
pub trait Mixin: Send + Sync {
    /// The mixin's own schema id.
    fn id(&self) -> SchemaId;

    /// The fields the mixin contributes.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a field fails to build.
    fn fields(&self) -> Result<Vec<Field>>;
}

/// Immutable description of a message type.
#[derive(Clone)]
pub struct Schema {
    id: SchemaId,
    owner: String,
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    required: Vec<usize>,
    mixins: Vec<SchemaId>,
    mixin_keys: HashSet<String>,
}

impl Schema {
    /// Builds a schema without mixins.
    ///
    /// # Errors
    ///
    /// See [`Schema::create_with_mixins`].
    pub fn create(owner: impl Into<String>, id: &str, fields: Vec<Field>) -> Result<Self> {
        Self::create_with_mixins(owner, id, &[], fields)
    }

    /// Builds a schema. Field order is the synthetic `_schema` field, then
    /// each mixin's fields in mixin order, then `fields`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchemaId` for a malformed id and `FieldAlreadyDefined`
    /// when two fields share a name.
    pub fn create_with_mixins(
        owner: impl Into<String>,
        id: &str,
        mixins: &[&dyn Mixin],
        fields: Vec<Field>,
    ) -> Result<Self> {
        let id = SchemaId::parse(id)?;
        let mut schema = Self {
            owner: owner.into(),
            fields: Vec::new(),
            index: HashMap::new(),
            required: Vec::new(),
            mixins: Vec::new(),
            mixin_keys: HashSet::new(),
            id,
        };

        schema.add_field(schema_field(&schema.id)?)?;
        for mixin in mixins {
            let mixin_id = mixin.id();
            for field in mixin.fields()? {
                schema.add_field(field)?;
            }
            schema.mixin_keys.insert(mixin_id.curie().to_string());
            schema.mixin_keys.insert(mixin_id.curie_with_major_rev());
            schema.mixins.push(mixin_id);
        }
        for field in fields {
            schema.add_field(field)?;
        }

        debug!(
            schema_id = %schema.id,
            owner = %schema.owner,
            fields = schema.fields.len(),
            mixins = schema.mixins.len(),
            "schema created"
        );
        Ok(schema)
    }

    fn add_field(&mut self, field: Field) -> Result<()> {
        if self.index.contains_key(field.name()) {
            return Err(PbjError::FieldAlreadyDefined {
                schema: self.id.to_string(),
                field: field.name().to_string(),
            });
        }
        let position = self.fields.len();
        if field.is_required() {
            self.required.push(position);
        }
        self.index.insert(field.name().to_string(), position);
        self.fields.push(field);
        Ok(())
    }

    /// The schema id.
    pub fn id(&self) -> &SchemaId {
        &self.id
    }

    /// The curie of the schema id.
    pub fn curie(&self) -> &SchemaCurie {
        self.id.curie()
    }

    /// The owning message type name.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The owner's short name with a lower-cased first letter, e.g.
    /// `createArticle` for `CreateArticle`.
    #[must_use]
    pub fn handler_method_name(&self) -> String {
        let short = self.owner.rsplit("::").next().unwrap_or(&self.owner);
        let mut chars = short.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by name.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotDefined` for unknown names.
    pub fn field(&self, name: &str) -> Result<&Field> {
        self.index
            .get(name)
            .map(|i| &self.fields[*i])
            .ok_or_else(|| PbjError::FieldNotDefined {
                schema: self.id.to_string(),
                field: name.to_string(),
            })
    }

    /// True when the schema defines `name`.
    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Required fields in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.required.iter().map(|i| &self.fields[*i])
    }

    /// Ids of the declared mixins, in declaration order.
    pub fn mixins(&self) -> &[SchemaId] {
        &self.mixins
    }

    /// True when the schema declares the mixin, given as a curie or a curie
    /// with major revision.
    pub fn has_mixin(&self, mixin: &str) -> bool {
        self.mixin_keys.contains(mixin)
    }

    /// Metadata dump of the schema.
    #[must_use]
    pub fn to_plain(&self) -> PlainValue {
        serde_json::json!({
            "id": self.id.to_string(),
            "curie": self.curie().to_string(),
            "curie_major": self.id.curie_with_major_rev(),
            "owner": self.owner,
            "mixins": self.mixins.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "fields": self.fields.iter().map(Field::to_plain).collect::<Vec<_>>(),
        })
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("id", &self.id.to_string())
            .field("owner", &self.owner)
            .field("fields", &self.fields.len())
            .field("mixins", &self.mixins)
            .finish()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

fn schema_field(id: &SchemaId) -> Result<Field> {
    let own_id = id.to_string();
    let expected = own_id.clone();
    Field::builder(SCHEMA_FIELD_NAME, TypeName::String)
        .required()
        .pattern(SCHEMA_ID_PATTERN)
        .default_value(own_id)
        .validator("own-schema-id", move |value| {
            anyhow::ensure!(
                value.as_str() == Some(expected.as_str()),
                "expected [{expected}]"
            );
            Ok(())
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct Tagged;

    impl Mixin for Tagged {
        fn id(&self) -> SchemaId {
            SchemaId::parse("pbj:acme:blog:mixin:tagged:1-0-0").unwrap()
        }

        fn fields(&self) -> Result<Vec<Field>> {
            Ok(vec![Field::builder("tags", TypeName::String).as_a_set().build()?])
        }
    }

    fn title() -> Field {
        Field::builder("title", TypeName::String).required().build().unwrap()
    }

    #[test]
    fn test_schema_field_first() {
        let schema = Schema::create("Article", "pbj:acme:blog:node:article:1-0-0", vec![title()]).unwrap();
        let names: Vec<_> = schema.fields().iter().map(Field::name).collect();
        assert_eq!(names, vec!["_schema", "title"]);

        let field = schema.field(SCHEMA_FIELD_NAME).unwrap();
        assert!(field.is_required());
        assert_eq!(field.single_default(), Some(Value::from("pbj:acme:blog:node:article:1-0-0")));
        assert!(field.guard(&Value::from("pbj:acme:blog:node:article:1-0-0")).is_ok());
        assert!(field.guard(&Value::from("pbj:acme:blog:node:page:1-0-0")).is_err());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = Schema::create("Article", "pbj:acme:blog:node:article:1-0-0", vec![title(), title()]).unwrap_err();
        assert!(matches!(err, PbjError::FieldAlreadyDefined { ref field, .. } if field == "title"));

        let shadow = Field::builder("_schema", TypeName::String).build().unwrap();
        let err = Schema::create("Article", "pbj:acme:blog:node:article:1-0-0", vec![shadow]).unwrap_err();
        assert_eq!(err.code(), "FieldAlreadyDefined");
    }

    #[test]
    fn test_invalid_id_rejected() {
        let err = Schema::create("Article", "acme:blog:node:article", vec![]).unwrap_err();
        assert!(matches!(err, PbjError::InvalidSchemaId(_)));
    }

    #[test]
    fn test_mixins() {
        let schema = Schema::create_with_mixins(
            "Article",
            "pbj:acme:blog:node:article:1-0-0",
            &[&Tagged],
            vec![title()],
        )
        .unwrap();

        let names: Vec<_> = schema.fields().iter().map(Field::name).collect();
        assert_eq!(names, vec!["_schema", "tags", "title"]);
        assert!(schema.has_mixin("acme:blog:mixin:tagged"));
        assert!(schema.has_mixin("acme:blog:mixin:tagged:v1"));
        assert!(!schema.has_mixin("acme:blog:mixin:other"));
        assert_eq!(schema.mixins().len(), 1);
    }

    #[test]
    fn test_lookup_and_required() {
        let schema = Schema::create("Article", "pbj:acme:blog:node:article:1-0-0", vec![title()]).unwrap();
        assert!(schema.has_field("title"));
        assert!(matches!(schema.field("nope"), Err(PbjError::FieldNotDefined { .. })));
        let required: Vec<_> = schema.required_fields().map(Field::name).collect();
        assert_eq!(required, vec!["_schema", "title"]);
    }

    #[test]
    fn test_handler_method_name() {
        let schema = Schema::create("blog::CreateArticle", "pbj:acme:blog:command:create-article:1-0-0", vec![]).unwrap();
        assert_eq!(schema.handler_method_name(), "createArticle");
    }

    #[test]
    fn test_to_plain() {
        let schema = Schema::create("Article", "pbj:acme:blog:node:article:1-0-0", vec![title()]).unwrap();
        let plain = schema.to_plain();
        assert_eq!(plain["curie_major"], "acme:blog:node:article:v1");
        assert_eq!(plain["fields"][1]["name"], "title");
    }
}

//! Error types for pbj.
//!
//! Every error is a synchronous precondition failure: a schema definition
//! mistake, a failed lookup, or a rejected construction/mutation. Nothing
//! here is transient, so callers never retry.

use crate::field::FieldRule;
use std::collections::HashMap;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = PbjError> = std::result::Result<T, E>;

/// The main error type for pbj operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PbjError {
    /// A field name was declared twice on the same schema.
    #[error("Field [{field}] can only be defined once on schema [{schema}]")]
    FieldAlreadyDefined {
        /// The schema id.
        schema: String,
        /// The duplicated field name.
        field: String,
    },

    /// A field name is not part of the schema.
    #[error("Field [{field}] is not defined on schema [{schema}]")]
    FieldNotDefined {
        /// The schema id.
        schema: String,
        /// The unknown field name.
        field: String,
    },

    /// A schema id string does not match the structural pattern.
    #[error("Schema id [{0}] is invalid")]
    InvalidSchemaId(String),

    /// A curie string does not match the structural pattern.
    #[error("Curie [{0}] is invalid")]
    InvalidCurie(String),

    /// A field builder was configured with contradictory options.
    #[error("Field [{field}] is misconfigured: {reason}")]
    InvalidFieldConfiguration {
        /// The field name.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No message type is registered for the schema id.
    #[error("No message is registered for schema id [{0}]")]
    NoMessageForSchemaId(String),

    /// No message type is registered for the curie.
    #[error("No message is registered for curie [{0}]")]
    NoMessageForCurie(String),

    /// No registered message declares the mixin.
    #[error("No message is using mixin [{0}]")]
    NoMessageForMixin(String),

    /// More (or fewer) than one registered message declares the mixin.
    #[error("Expected exactly one message using mixin [{mixin}], found [{}]", schemas.join(", "))]
    MoreThanOneMessageForMixin {
        /// The mixin id.
        mixin: String,
        /// Ids of the schemas that matched.
        schemas: Vec<String>,
    },

    /// A value failed a type, pattern, format or validator check.
    #[error("Field [{field}] rejected value: {reason}")]
    TypeGuardViolation {
        /// The field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A required field would be left without a value.
    #[error("Field [{field}] is required on schema [{schema}]")]
    RequiredFieldMissing {
        /// The schema id.
        schema: String,
        /// The required field name.
        field: String,
    },

    /// A rule-specific operation was called on a field with another rule.
    #[error("Field [{field}] must be {expected} but is {actual}")]
    InvalidFieldRuleUsage {
        /// The field name.
        field: String,
        /// The rule the operation needs.
        expected: FieldRule,
        /// The rule the field declares.
        actual: FieldRule,
    },

    /// A mutation was attempted on a frozen message.
    #[error("Message [{schema}] is frozen and cannot be modified")]
    FrozenMessageIsImmutable {
        /// The schema id of the frozen message.
        schema: String,
    },

    /// A mixin accessor was used on a message whose schema lacks the mixin.
    #[error("Schema [{schema}] does not use mixin [{mixin}]")]
    MixinNotDeclared {
        /// The schema id.
        schema: String,
        /// The mixin id.
        mixin: String,
    },

    /// A registration was attempted after the registry was sealed.
    #[error("Message registry is sealed, cannot register [{0}]")]
    RegistrySealed(String),

    /// Text encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PbjError {
    /// Creates a type guard violation.
    #[must_use]
    pub fn guard(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TypeGuardViolation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a field configuration error.
    #[must_use]
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFieldConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns a stable, machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::FieldAlreadyDefined { .. } => "FieldAlreadyDefined",
            Self::FieldNotDefined { .. } => "FieldNotDefined",
            Self::InvalidSchemaId(_) => "InvalidSchemaId",
            Self::InvalidCurie(_) => "InvalidCurie",
            Self::InvalidFieldConfiguration { .. } => "InvalidFieldConfiguration",
            Self::NoMessageForSchemaId(_) => "NoMessageForSchemaId",
            Self::NoMessageForCurie(_) => "NoMessageForCurie",
            Self::NoMessageForMixin(_) => "NoMessageForMixin",
            Self::MoreThanOneMessageForMixin { .. } => "MoreThanOneMessageForMixin",
            Self::TypeGuardViolation { .. } => "TypeGuardViolation",
            Self::RequiredFieldMissing { .. } => "RequiredFieldMissing",
            Self::InvalidFieldRuleUsage { .. } => "InvalidFieldRuleUsage",
            Self::FrozenMessageIsImmutable { .. } => "FrozenMessageIsImmutable",
            Self::MixinNotDeclared { .. } => "MixinNotDeclared",
            Self::RegistrySealed(_) => "RegistrySealed",
            Self::Serialization(_) => "Serialization",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.code()));

        match self {
            Self::FieldAlreadyDefined { schema, field }
            | Self::FieldNotDefined { schema, field }
            | Self::RequiredFieldMissing { schema, field } => {
                map.insert("schema".to_string(), serde_json::json!(schema));
                map.insert("field".to_string(), serde_json::json!(field));
            }
            Self::InvalidFieldConfiguration { field, reason }
            | Self::TypeGuardViolation { field, reason } => {
                map.insert("field".to_string(), serde_json::json!(field));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
            Self::InvalidFieldRuleUsage { field, expected, actual } => {
                map.insert("field".to_string(), serde_json::json!(field));
                map.insert("expected".to_string(), serde_json::json!(expected.to_string()));
                map.insert("actual".to_string(), serde_json::json!(actual.to_string()));
            }
            Self::MoreThanOneMessageForMixin { mixin, schemas } => {
                map.insert("mixin".to_string(), serde_json::json!(mixin));
                map.insert("schemas".to_string(), serde_json::json!(schemas));
            }
            Self::MixinNotDeclared { schema, mixin } => {
                map.insert("schema".to_string(), serde_json::json!(schema));
                map.insert("mixin".to_string(), serde_json::json!(mixin));
            }
            Self::FrozenMessageIsImmutable { schema } => {
                map.insert("schema".to_string(), serde_json::json!(schema));
            }
            Self::InvalidSchemaId(_)
            | Self::InvalidCurie(_)
            | Self::NoMessageForSchemaId(_)
            | Self::NoMessageForCurie(_)
            | Self::NoMessageForMixin(_)
            | Self::RegistrySealed(_)
            | Self::Serialization(_) => {}
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

impl From<serde_json::Error> for PbjError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_violation_display() {
        let err = PbjError::guard("email", "not a valid email");
        assert_eq!(err.to_string(), "Field [email] rejected value: not a valid email");
        assert_eq!(err.code(), "TypeGuardViolation");
    }

    #[test]
    fn test_more_than_one_lists_schemas() {
        let err = PbjError::MoreThanOneMessageForMixin {
            mixin: "acme:blog:mixin:publishable:v1".to_string(),
            schemas: vec!["pbj:acme:blog:node:article:1-0-0".to_string(), "pbj:acme:blog:node:page:1-0-0".to_string()],
        };
        assert!(err.to_string().contains("article:1-0-0, pbj:acme:blog:node:page"));
    }

    #[test]
    fn test_rule_usage_to_dict() {
        let err = PbjError::InvalidFieldRuleUsage {
            field: "labels".to_string(),
            expected: FieldRule::List,
            actual: FieldRule::Set,
        };
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "InvalidFieldRuleUsage");
        assert_eq!(dict.get("expected").unwrap(), "a-list");
        assert_eq!(dict.get("actual").unwrap(), "a-set");
    }

    #[test]
    fn test_serde_json_error_converts() {
        let err: PbjError = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err().into();
        assert_eq!(err.code(), "Serialization");
    }
}

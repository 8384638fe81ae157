//! Fluent, validating construction of [`Field`]s.

use super::{DefaultFn, Field, FieldDefault, FieldRule, Format, Validator};
use crate::errors::{PbjError, Result};
use crate::message::MessageClass;
use crate::types::{EnumClass, TypeName};
use crate::value::Value;
use regex::Regex;
use std::sync::{LazyLock, OnceLock};

static FIELD_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("field name pattern compiles")
});

/// Builder for [`Field`]. Every configuration mistake is reported by
/// [`FieldBuilder::build`], never later at runtime.
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    name: String,
    type_name: TypeName,
    rule: FieldRule,
    required: bool,
    default: Option<FieldDefault>,
    pattern: Option<String>,
    format: Option<Format>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    min: Option<i64>,
    max: Option<i64>,
    enum_class: Option<EnumClass>,
    any_of: Vec<MessageClass>,
    validators: Vec<Validator>,
    description: Option<String>,
}

impl FieldBuilder {
    /// Creates a builder for an optional single-value field.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: TypeName) -> Self {
        Self {
            name: name.into(),
            type_name,
            rule: FieldRule::Single,
            required: false,
            default: None,
            pattern: None,
            format: None,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            enum_class: None,
            any_of: Vec::new(),
            validators: Vec::new(),
            description: None,
        }
    }

    /// Sets the cardinality rule.
    #[must_use]
    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rule = rule;
        self
    }

    /// Shorthand for `rule(FieldRule::Set)`.
    #[must_use]
    pub fn as_a_set(self) -> Self {
        self.rule(FieldRule::Set)
    }

    /// Shorthand for `rule(FieldRule::List)`.
    #[must_use]
    pub fn as_a_list(self) -> Self {
        self.rule(FieldRule::List)
    }

    /// Shorthand for `rule(FieldRule::Map)`.
    #[must_use]
    pub fn as_a_map(self) -> Self {
        self.rule(FieldRule::Map)
    }

    /// Marks the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets whether the field is required.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets a constant single-value default.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(FieldDefault::Single(value.into()));
        self
    }

    /// Sets constant default members for a set or list.
    #[must_use]
    pub fn default_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.default = Some(FieldDefault::Many(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Sets constant default entries for a map.
    #[must_use]
    pub fn default_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.default = Some(FieldDefault::Keyed(
            entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ));
        self
    }

    /// Sets a default produced on every use.
    #[must_use]
    pub fn generated_default(mut self, generate: DefaultFn) -> Self {
        self.default = Some(FieldDefault::Generated(generate));
        self
    }

    /// Requires string values to match `pattern`.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Requires string values to satisfy `format`.
    #[must_use]
    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Minimum byte length for string values.
    #[must_use]
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Maximum byte length for string values.
    #[must_use]
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Lower bound for integer values.
    #[must_use]
    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Upper bound for integer values.
    #[must_use]
    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Binds the enumeration of an enum field.
    #[must_use]
    pub fn enum_class(mut self, class: EnumClass) -> Self {
        self.enum_class = Some(class);
        self
    }

    /// Restricts a message field to the given classes.
    #[must_use]
    pub fn any_of(mut self, classes: impl IntoIterator<Item = MessageClass>) -> Self {
        self.any_of.extend(classes);
        self
    }

    /// Appends a custom validator.
    #[must_use]
    pub fn validator<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.validators.push(Validator::new(name, check));
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn reject(&self, reason: impl Into<String>) -> PbjError {
        PbjError::config(&self.name, reason)
    }

    fn check_options(&self) -> Result<()> {
        if !FIELD_NAME_RE.is_match(&self.name) {
            return Err(self.reject(format!(
                "name must match {}",
                FIELD_NAME_RE.as_str()
            )));
        }

        let kind = self.type_name.as_type();
        if self.rule == FieldRule::Set && !kind.allowed_in_set() {
            return Err(self.reject(format!("type [{}] cannot be used in a set", self.type_name)));
        }

        if self.type_name.is_enum() && self.enum_class.is_none() {
            return Err(self.reject("enum fields need an enum class"));
        }
        if let Some(class) = &self.enum_class {
            if !self.type_name.is_enum() {
                return Err(self.reject("enum class given for a non-enum type"));
            }
            let int_backed = self.type_name == TypeName::IntEnum;
            if class.is_int_backed() != int_backed {
                return Err(self.reject(format!(
                    "enum [{}] does not back a [{}] field",
                    class.name(),
                    self.type_name
                )));
            }
        }

        if !self.any_of.is_empty() && self.type_name != TypeName::Message {
            return Err(self.reject("message classes given for a non-message type"));
        }

        let is_string = matches!(self.type_name, TypeName::String | TypeName::Text);
        let has_string_options = self.pattern.is_some()
            || self.format.is_some()
            || self.min_length.is_some()
            || self.max_length.is_some();
        if has_string_options && !is_string {
            return Err(self.reject("pattern, format and lengths apply only to string types"));
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(self.reject(format!("min_length {min} exceeds max_length {max}")));
            }
        }

        if (self.min.is_some() || self.max.is_some()) && !self.type_name.is_integer() {
            return Err(self.reject("min and max apply only to integer types"));
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(self.reject(format!("min {min} exceeds max {max}")));
            }
        }
        Ok(())
    }

    fn check_default(&self, field: &Field) -> Result<()> {
        let Some(default) = &self.default else {
            return Ok(());
        };
        if !default.fits(self.rule) {
            return Err(self.reject(format!("default does not fit rule [{}]", self.rule)));
        }

        let guard = |value: &Value| {
            field
                .guard(value)
                .map_err(|e| self.reject(format!("invalid default: {e}")))
        };
        match default {
            FieldDefault::Single(value) => guard(value)?,
            FieldDefault::Generated(generate) => guard(&generate())?,
            FieldDefault::Many(values) => {
                if self.required && values.is_empty() {
                    return Err(self.reject("required collection has an empty default"));
                }
                values.iter().try_for_each(guard)?;
            }
            FieldDefault::Keyed(entries) => {
                if self.required && entries.is_empty() {
                    return Err(self.reject("required map has an empty default"));
                }
                entries.iter().try_for_each(|(_, v)| guard(v))?;
            }
        }
        Ok(())
    }

    /// Validates the configuration and produces the field.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFieldConfiguration` when the options contradict each
    /// other or a default fails the field's own guard.
    pub fn build(self) -> Result<Field> {
        self.check_options()?;

        let pattern = self
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| self.reject(format!("invalid pattern: {e}")))?;

        let field = Field {
            name: self.name.clone(),
            type_name: self.type_name,
            rule: self.rule,
            required: self.required,
            default: self.default.clone(),
            pattern,
            format: self.format,
            min_length: self.min_length,
            max_length: self.max_length,
            min: self.min,
            max: self.max,
            enum_class: self.enum_class,
            any_of: self.any_of.clone(),
            any_of_index: OnceLock::new(),
            validators: self.validators.clone(),
            description: self.description.clone(),
        };
        self.check_default(&field)?;
        Ok(field)
    }
}

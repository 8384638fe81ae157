//! References from one message to another.

use crate::schema_id::SchemaCurie;
use serde::Serialize;
use std::fmt;

/// Points at a message by its curie and an id, with an optional tag.
///
/// Renders as `vendor:package:category:message:id` followed by `#tag` when
/// tagged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct MessageRef {
    curie: SchemaCurie,
    id: String,
    tag: Option<String>,
}

impl MessageRef {
    /// Creates a reference. The tag is lowercased, characters outside
    /// `[a-z0-9_.-]` become `-`, and an empty tag means untagged.
    pub fn new(curie: SchemaCurie, id: impl Into<String>, tag: Option<&str>) -> Self {
        let tag = tag.map(normalize_tag).filter(|t| !t.is_empty());
        Self {
            curie,
            id: id.into(),
            tag,
        }
    }

    /// The referenced message's curie.
    pub fn curie(&self) -> &SchemaCurie {
        &self.curie
    }

    /// The referenced message's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.curie, self.id)?;
        if let Some(tag) = &self.tag {
            write!(f, "#{tag}")?;
        }
        Ok(())
    }
}

impl From<MessageRef> for String {
    fn from(value: MessageRef) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn curie() -> SchemaCurie {
        SchemaCurie::parse("acme:blog:request:get-article").unwrap()
    }

    #[test]
    fn test_display_with_and_without_tag() {
        let untagged = MessageRef::new(curie(), "123", None);
        assert_eq!(untagged.to_string(), "acme:blog:request:get-article:123");

        let tagged = MessageRef::new(curie(), "123", Some("Home Page"));
        assert_eq!(tagged.tag(), Some("home-page"));
        assert_eq!(tagged.to_string(), "acme:blog:request:get-article:123#home-page");
        assert_eq!(serde_json::to_value(&tagged).unwrap(), serde_json::json!(tagged.to_string()));
    }

    #[test]
    fn test_blank_tag_means_untagged() {
        assert_eq!(MessageRef::new(curie(), "123", Some("  ")).tag(), None);
    }
}

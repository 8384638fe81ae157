//! Schema identifiers and curies.
//!
//! A schema id looks like `pbj:vendor:package:category:message:1-2-3`. The
//! curie drops the `pbj:` prefix and the revision (`vendor:package:category:message`)
//! and is used for version-tolerant lookups. The curie with major revision
//! (`vendor:package:category:message:v1`) is the primary registry key.

use crate::errors::{PbjError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Pattern every schema id must match. The category segment may be empty.
pub const SCHEMA_ID_PATTERN: &str =
    r"^pbj:([a-z0-9-]+):([a-z0-9\.-]+):([a-z0-9-]*):([a-z0-9-]+):([0-9]+)-([0-9]+)-([0-9]+)$";

/// Pattern every curie must match, optionally followed by `:vMAJOR`.
pub const CURIE_PATTERN: &str = r"^([a-z0-9-]+):([a-z0-9\.-]+):([a-z0-9-]*):([a-z0-9-]+)(?::v([0-9]+))?$";

static SCHEMA_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SCHEMA_ID_PATTERN).expect("schema id pattern compiles"));

static CURIE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CURIE_PATTERN).expect("curie pattern compiles"));

/// The `vendor:package:category:message` part of a schema id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaCurie {
    vendor: String,
    package: String,
    category: String,
    message: String,
}

impl SchemaCurie {
    /// Parses a curie. A trailing `:vMAJOR` segment is accepted and discarded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurie` when the string does not match [`CURIE_PATTERN`].
    pub fn parse(curie: &str) -> Result<Self> {
        let caps = CURIE_RE
            .captures(curie)
            .ok_or_else(|| PbjError::InvalidCurie(curie.to_string()))?;

        Ok(Self {
            vendor: caps[1].to_string(),
            package: caps[2].to_string(),
            category: caps[3].to_string(),
            message: caps[4].to_string(),
        })
    }

    /// The vendor segment.
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// The package segment.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The category segment (may be empty).
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The message segment.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SchemaCurie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.vendor, self.package, self.category, self.message)
    }
}

impl FromStr for SchemaCurie {
    type Err = PbjError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SchemaCurie {
    type Error = PbjError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SchemaCurie> for String {
    fn from(curie: SchemaCurie) -> Self {
        curie.to_string()
    }
}

/// A fully qualified, versioned schema identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaId {
    curie: SchemaCurie,
    major: u32,
    minor: u32,
    patch: u32,
}

impl SchemaId {
    /// Parses a schema id string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchemaId` when the string does not match
    /// [`SCHEMA_ID_PATTERN`] or a revision part overflows.
    pub fn parse(id: &str) -> Result<Self> {
        let invalid = || PbjError::InvalidSchemaId(id.to_string());
        let caps = SCHEMA_ID_RE.captures(id).ok_or_else(invalid)?;

        let revision = |idx: usize| caps[idx].parse::<u32>().map_err(|_| invalid());

        Ok(Self {
            curie: SchemaCurie {
                vendor: caps[1].to_string(),
                package: caps[2].to_string(),
                category: caps[3].to_string(),
                message: caps[4].to_string(),
            },
            major: revision(5)?,
            minor: revision(6)?,
            patch: revision(7)?,
        })
    }

    /// Builds an id from segments already known to be valid.
    pub(crate) fn from_parts(
        vendor: &str,
        package: &str,
        category: &str,
        message: &str,
        (major, minor, patch): (u32, u32, u32),
    ) -> Self {
        Self {
            curie: SchemaCurie {
                vendor: vendor.to_string(),
                package: package.to_string(),
                category: category.to_string(),
                message: message.to_string(),
            },
            major,
            minor,
            patch,
        }
    }

    /// Returns true when the string is a structurally valid schema id.
    #[must_use]
    pub fn is_valid(id: &str) -> bool {
        Self::parse(id).is_ok()
    }

    /// The curie (identifier without revision).
    pub fn curie(&self) -> &SchemaCurie {
        &self.curie
    }

    /// The curie with the major revision appended, e.g. `acme:blog:node:article:v1`.
    #[must_use]
    pub fn curie_with_major_rev(&self) -> String {
        format!("{}:v{}", self.curie, self.major)
    }

    /// The vendor segment.
    pub fn vendor(&self) -> &str {
        self.curie.vendor()
    }

    /// The package segment.
    pub fn package(&self) -> &str {
        self.curie.package()
    }

    /// The category segment.
    pub fn category(&self) -> &str {
        self.curie.category()
    }

    /// The message segment.
    pub fn message(&self) -> &str {
        self.curie.message()
    }

    /// Major revision.
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor revision.
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Patch revision.
    pub fn patch(&self) -> u32 {
        self.patch
    }

    /// The revision as `MAJOR-MINOR-PATCH`.
    #[must_use]
    pub fn version_string(&self) -> String {
        format!("{}-{}-{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pbj:{}:{}-{}-{}", self.curie, self.major, self.minor, self.patch)
    }
}

impl FromStr for SchemaId {
    type Err = PbjError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SchemaId {
    type Error = PbjError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SchemaId> for String {
    fn from(id: SchemaId) -> Self {
        id.to_string()
    }
}

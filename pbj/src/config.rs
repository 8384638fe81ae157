//! Configuration for the registry and the JSON serializer.

use crate::errors::Result;
use serde::{Deserialize, Serialize};

/// Configuration for [`crate::registry::MessageResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Whether a schema id may resolve through its bare curie when no type
    /// is registered for its curie with major revision.
    #[serde(default = "default_version_tolerant")]
    pub version_tolerant: bool,
}

fn default_version_tolerant() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            version_tolerant: default_version_tolerant(),
        }
    }
}

impl RegistryConfig {
    /// Creates a registry configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets version tolerance.
    #[must_use]
    pub fn with_version_tolerant(mut self, version_tolerant: bool) -> Self {
        self.version_tolerant = version_tolerant;
        self
    }
}

/// Configuration for [`crate::serializer::JsonSerializer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Pretty-print JSON output.
    #[serde(default)]
    pub pretty: bool,
}

impl SerializerConfig {
    /// Creates a serializer configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables pretty printing.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PbjConfig {
    /// Registry settings.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Serializer settings.
    #[serde(default)]
    pub serializer: SerializerConfig,
}

impl PbjConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the registry configuration.
    #[must_use]
    pub fn with_registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the serializer configuration.
    #[must_use]
    pub fn with_serializer(mut self, serializer: SerializerConfig) -> Self {
        self.serializer = serializer;
        self
    }
}

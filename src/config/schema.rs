//! Configuration schema types.
//!
//! Only the parts of `craftdesk.json` the registry client reads are modeled
//! here; unknown fields are ignored so the file can carry other sections.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Alias that must be configured for resolve and search.
pub const DEFAULT_ALIAS: &str = "default";

/// The project manifest, `craftdesk.json`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CraftDeskJson {
    /// Named registries, keyed by alias.
    #[serde(default)]
    pub registries: BTreeMap<String, RegistryEntry>,
}

/// A configured registry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Base URL of the registry.
    pub url: String,

    /// Craft scope served by this registry (e.g., `@acme`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl CraftDeskJson {
    /// Look up a registry by alias.
    pub fn registry(&self, alias: &str) -> Option<&RegistryEntry> {
        self.registries.get(alias)
    }

    /// The `default` registry, if configured.
    pub fn default_registry(&self) -> Option<&RegistryEntry> {
        self.registry(DEFAULT_ALIAS)
    }

    /// First registry whose scope matches `scope` exactly.
    pub fn registry_for_scope(&self, scope: &str) -> Option<&RegistryEntry> {
        self.registries
            .values()
            .find(|entry| entry.scope.as_deref() == Some(scope))
    }
}

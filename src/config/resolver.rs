//! Registry reference resolution.
//!
//! A registry reference is one of:
//! 1. A full URL (`http://` or `https://`), returned unchanged
//! 2. An alias from `craftdesk.json`, returned as its configured URL
//! 3. A bare hostname, prefixed with `https://`
//!
//! The first match wins. Resolution never fails.

use super::schema::CraftDeskJson;
use crate::error::{RegistryError, Result};

/// Turn a registry reference into a base URL.
///
/// # Example
///
/// ```
/// use craft_registry::config::resolve_registry_url;
///
/// assert_eq!(
///     resolve_registry_url("registry.example.com", None),
///     "https://registry.example.com"
/// );
/// ```
pub fn resolve_registry_url(reference: &str, config: Option<&CraftDeskJson>) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }

    if let Some(entry) = config.and_then(|c| c.registry(reference)) {
        return entry.url.clone();
    }

    format!("https://{}", reference)
}

/// URL of the configured `default` registry.
///
/// Resolve and search need an explicit default; there is no guessing.
pub fn default_registry_url(config: Option<&CraftDeskJson>) -> Result<String> {
    config
        .and_then(|c| c.default_registry())
        .map(|entry| entry.url.clone())
        .ok_or(RegistryError::NoRegistryConfigured)
}

//! File-backed configuration.
//!
//! Reads `craftdesk.json` from the project root and takes auth tokens from
//! environment variables:
//!
//! - `CRAFTDESK_AUTH_<HOST>` for one registry (host upper-cased, every
//!   non-alphanumeric character replaced by `_`)
//! - `CRAFTDESK_AUTH_TOKEN` for any registry
//!
//! The host-specific variable wins. Empty values are treated as unset.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::schema::CraftDeskJson;
use super::source::{ConfigSource, DEFAULT_REGISTRY_URL};
use crate::error::{RegistryError, Result};

/// Project manifest file name.
pub const CRAFTDESK_JSON: &str = "craftdesk.json";

/// Token used for every registry without a host-specific token.
pub const GLOBAL_TOKEN_VAR: &str = "CRAFTDESK_AUTH_TOKEN";

const HOST_TOKEN_PREFIX: &str = "CRAFTDESK_AUTH_";

/// Configuration loaded from a project directory.
///
/// # Example
///
/// ```
/// use craft_registry::config::{ConfigSource, ProjectConfig};
/// use tempfile::TempDir;
/// use std::fs;
///
/// let temp = TempDir::new().unwrap();
/// fs::write(
///     temp.path().join("craftdesk.json"),
///     r#"{"registries": {"default": {"url": "https://craftdesk.ai"}}}"#,
/// ).unwrap();
///
/// let config = ProjectConfig::load(temp.path()).unwrap();
/// assert_eq!(config.registry_for_craft("john/rails-api"), "https://craftdesk.ai");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    craftdesk: Option<CraftDeskJson>,
    env: HashMap<String, String>,
}

impl ProjectConfig {
    /// Load `craftdesk.json` from `project_root` and capture the process
    /// environment for token lookup.
    ///
    /// A missing manifest is not an error; a malformed one is.
    pub fn load(project_root: &Path) -> Result<Self> {
        let craftdesk = load_craftdesk_json(&project_root.join(CRAFTDESK_JSON))?;
        Ok(Self {
            craftdesk,
            env: std::env::vars().collect(),
        })
    }

    /// Build a config from an already-parsed manifest.
    pub fn new(craftdesk: Option<CraftDeskJson>) -> Self {
        Self {
            craftdesk,
            env: HashMap::new(),
        }
    }

    /// Replace the environment used for token lookup.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    fn env_value(&self, key: &str) -> Option<String> {
        self.env
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
    }
}

impl ConfigSource for ProjectConfig {
    fn auth_token(&self, registry_url: &str) -> Option<String> {
        host_token_var(registry_url)
            .and_then(|var| self.env_value(&var))
            .or_else(|| self.env_value(GLOBAL_TOKEN_VAR))
    }

    fn registry_for_craft(&self, craft_name: &str) -> String {
        let Some(config) = &self.craftdesk else {
            return DEFAULT_REGISTRY_URL.to_string();
        };

        if craft_name.starts_with('@') {
            if let Some((scope, _)) = craft_name.split_once('/') {
                if let Some(entry) = config.registry_for_scope(scope) {
                    return entry.url.clone();
                }
            }
        }

        config
            .default_registry()
            .map(|entry| entry.url.clone())
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string())
    }

    fn craftdesk_json(&self) -> Option<CraftDeskJson> {
        self.craftdesk.clone()
    }
}

/// Read and parse a `craftdesk.json` file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_craftdesk_json(path: &Path) -> Result<Option<CraftDeskJson>> {
    if !path.exists() {
        tracing::debug!("No {} at {}", CRAFTDESK_JSON, path.display());
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let parsed = serde_json::from_str(&content).map_err(|e| RegistryError::ConfigParse {
        path: PathBuf::from(path),
        message: e.to_string(),
    })?;

    Ok(Some(parsed))
}

/// Environment variable holding the token for one registry host.
fn host_token_var(registry_url: &str) -> Option<String> {
    let url = reqwest::Url::parse(registry_url).ok()?;
    let host = url.host_str()?;
    let sanitized: String = host
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    Some(format!("{}{}", HOST_TOKEN_PREFIX, sanitized))
}

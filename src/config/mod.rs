//! Registry configuration.
//!
//! This module covers everything the client needs to pick a registry and
//! authenticate against it:
//! - The [`ConfigSource`] collaborator trait in [`source`]
//! - `craftdesk.json` schema types in [`schema`]
//! - The file-backed [`ProjectConfig`] in [`loader`]
//! - Registry reference resolution in [`resolver`]
//!
//! # Example
//!
//! ```
//! use craft_registry::config::{resolve_registry_url, CraftDeskJson};
//!
//! let config: CraftDeskJson = serde_json::from_str(
//!     r#"{"registries": {"company": {"url": "https://crafts.acme.dev"}}}"#,
//! ).unwrap();
//!
//! assert_eq!(resolve_registry_url("company", Some(&config)), "https://crafts.acme.dev");
//! assert_eq!(resolve_registry_url("https://x.dev", Some(&config)), "https://x.dev");
//! ```

pub mod loader;
pub mod resolver;
pub mod schema;
pub mod source;

pub use loader::{load_craftdesk_json, ProjectConfig, CRAFTDESK_JSON, GLOBAL_TOKEN_VAR};
pub use resolver::{default_registry_url, resolve_registry_url};
pub use schema::{CraftDeskJson, RegistryEntry, DEFAULT_ALIAS};
pub use source::{ConfigSource, DEFAULT_REGISTRY_URL};

//! Library integration tests.

use craft_registry::config::{ConfigSource, CraftDeskJson, ProjectConfig};
use craft_registry::{CraftIdentifier, RegistryClient, RegistryError};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn error_types_are_public() {
    let err = RegistryError::InvalidNameFormat {
        input: "test".into(),
    };
    assert!(err.to_string().contains("test"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> craft_registry::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn identifier_parsing_is_public() {
    let id: CraftIdentifier = "@john/rails-api".parse().unwrap();
    assert_eq!((id.author(), id.name()), ("john", "rails-api"));
}

#[test]
fn client_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RegistryClient>();
}

/// A collaborator that is not file-backed.
struct FixedConfig;

impl ConfigSource for FixedConfig {
    fn auth_token(&self, _registry_url: &str) -> Option<String> {
        Some("fixed".to_string())
    }

    fn registry_for_craft(&self, _craft_name: &str) -> String {
        "registry.example.com".to_string()
    }

    fn craftdesk_json(&self) -> Option<CraftDeskJson> {
        None
    }
}

#[test]
fn custom_config_source_plugs_in() {
    let client = RegistryClient::new(Arc::new(FixedConfig));
    assert_eq!(client.config().auth_token("https://x"), Some("fixed".into()));
    assert!(matches!(
        client.search_crafts("anything", None),
        Err(RegistryError::NoRegistryConfigured)
    ));
}

#[test]
fn project_config_from_directory() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("craftdesk.json"),
        r#"{
  "name": "my-project",
  "registries": {
    "default": { "url": "https://craftdesk.ai" },
    "company": { "url": "https://crafts.acme.dev", "scope": "@acme" }
  }
}"#,
    )
    .unwrap();

    let config = ProjectConfig::load(temp.path()).unwrap();

    assert_eq!(config.registry_for_craft("john/x"), "https://craftdesk.ai");
    assert_eq!(
        config.registry_for_craft("@acme/deploy"),
        "https://crafts.acme.dev"
    );
}

//! Registry wire types.
//!
//! Field names follow the registry's JSON (camelCase). Optional fields
//! default when absent so older registries remain readable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::checksum::Checksum;

/// Kind of craft a package provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CraftType {
    Skill,
    Agent,
    Command,
    Hook,
    Plugin,
}

impl CraftType {
    /// Wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            CraftType::Skill => "skill",
            CraftType::Agent => "agent",
            CraftType::Command => "command",
            CraftType::Hook => "hook",
            CraftType::Plugin => "plugin",
        }
    }
}

impl fmt::Display for CraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry metadata for one craft version.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftInfo {
    pub name: String,
    pub author: String,
    pub version: String,

    #[serde(rename = "type")]
    pub craft_type: CraftType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Craft name to version range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    /// Declared SHA-256 of the archive at `download_url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
}

impl CraftInfo {
    /// Declared integrity digest, if present and well-formed.
    pub fn checksum(&self) -> Option<Checksum> {
        self.integrity.as_deref().and_then(Checksum::from_hex)
    }
}

/// Craft-info endpoints return the record either wrapped or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CraftEnvelope {
    Wrapped { craft: CraftInfo },
    Bare(CraftInfo),
}

impl CraftEnvelope {
    pub(crate) fn into_inner(self) -> CraftInfo {
        match self {
            CraftEnvelope::Wrapped { craft } => craft,
            CraftEnvelope::Bare(craft) => craft,
        }
    }
}

/// `GET .../versions` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct VersionsResponse {
    #[serde(default)]
    pub versions: Vec<String>,
}

/// `GET /api/v1/crafts?q=` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub crafts: Vec<CraftInfo>,
}

/// `POST /api/v1/resolve` request body.
#[derive(Debug, Serialize)]
pub(crate) struct ResolveRequest<'a> {
    pub dependencies: &'a BTreeMap<String, String>,
}

/// A single resolved dependency.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCraft {
    pub version: String,

    /// Download URL of the resolved archive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub craft_type: Option<CraftType>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
}

/// Result of dependency resolution.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResolveResponse {
    /// Craft name to resolved record.
    #[serde(default)]
    pub resolved: BTreeMap<String, ResolvedCraft>,

    /// Lockfile document, passed through untouched.
    #[serde(default)]
    pub lockfile: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn craft_json() -> serde_json::Value {
        json!({
            "name": "rails-api",
            "author": "john",
            "version": "1.2.0",
            "type": "skill",
            "description": "Rails API conventions",
            "dependencies": { "john/ruby-style": "^2.0.0" },
            "downloadUrl": "https://cdn.example/rails-api-1.2.0.tgz",
            "integrity": "B94D27B9934D3E08A52E52D7DA7DABFAC484EFE37A5380EE9088F7ACE2EFCDE9"
        })
    }

    #[test]
    fn craft_type_wire_names() {
        for (ty, name) in [
            (CraftType::Skill, "skill"),
            (CraftType::Agent, "agent"),
            (CraftType::Command, "command"),
            (CraftType::Hook, "hook"),
            (CraftType::Plugin, "plugin"),
        ] {
            assert_eq!(ty.as_str(), name);
            assert_eq!(serde_json::to_value(ty).unwrap(), json!(name));
        }
    }

    #[test]
    fn unknown_craft_type_is_rejected() {
        assert!(serde_json::from_value::<CraftType>(json!("theme")).is_err());
    }

    #[test]
    fn parses_full_craft_info() {
        let info: CraftInfo = serde_json::from_value(craft_json()).unwrap();

        assert_eq!(info.name, "rails-api");
        assert_eq!(info.craft_type, CraftType::Skill);
        assert_eq!(
            info.download_url.as_deref(),
            Some("https://cdn.example/rails-api-1.2.0.tgz")
        );
        assert_eq!(
            info.dependencies.unwrap().get("john/ruby-style").unwrap(),
            "^2.0.0"
        );
    }

    #[test]
    fn minimal_craft_info() {
        let info: CraftInfo = serde_json::from_value(json!({
            "name": "x", "author": "a", "version": "0.1.0", "type": "hook"
        }))
        .unwrap();

        assert!(info.description.is_none());
        assert!(info.dependencies.is_none());
        assert!(info.checksum().is_none());
    }

    #[test]
    fn checksum_normalizes_declared_integrity() {
        let info: CraftInfo = serde_json::from_value(craft_json()).unwrap();
        assert_eq!(
            info.checksum().unwrap().as_str(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn envelope_accepts_wrapped_and_bare() {
        let wrapped: CraftEnvelope =
            serde_json::from_value(json!({ "craft": craft_json() })).unwrap();
        let bare: CraftEnvelope = serde_json::from_value(craft_json()).unwrap();

        assert_eq!(wrapped.into_inner(), bare.into_inner());
    }

    #[test]
    fn resolve_request_shape() {
        let mut deps = BTreeMap::new();
        deps.insert("john/rails-api".to_string(), "^1.0.0".to_string());

        let body = serde_json::to_value(ResolveRequest {
            dependencies: &deps,
        })
        .unwrap();

        assert_eq!(
            body,
            json!({ "dependencies": { "john/rails-api": "^1.0.0" } })
        );
    }

    #[test]
    fn resolve_response_passes_lockfile_through() {
        let lockfile = json!({ "lockfileVersion": 1, "crafts": { "a/b": { "version": "1.0.0" } } });
        let response: ResolveResponse = serde_json::from_value(json!({
            "resolved": {
                "a/b": {
                    "version": "1.0.0",
                    "resolved": "https://cdn.example/b.tgz",
                    "type": "agent"
                }
            },
            "lockfile": lockfile
        }))
        .unwrap();

        assert_eq!(response.lockfile, lockfile);
        let entry = &response.resolved["a/b"];
        assert_eq!(entry.version, "1.0.0");
        assert_eq!(entry.craft_type, Some(CraftType::Agent));
        assert!(entry.dependencies.is_empty());
    }
}

//! The configuration and credential collaborator.

use super::schema::CraftDeskJson;

/// Registry used when nothing more specific is configured.
pub const DEFAULT_REGISTRY_URL: &str = "https://craftdesk.ai";

/// Supplies registry configuration and auth tokens to the client.
///
/// Implementations must be cheap to call: the client asks again on every
/// request, so rotated tokens and edited config are picked up without
/// rebuilding anything.
pub trait ConfigSource: Send + Sync {
    /// Bearer token for a resolved registry URL, if one is stored.
    fn auth_token(&self, registry_url: &str) -> Option<String>;

    /// Registry reference (URL, alias, or host) that serves `craft_name`.
    fn registry_for_craft(&self, craft_name: &str) -> String;

    /// The parsed project manifest, if the project has one.
    fn craftdesk_json(&self) -> Option<CraftDeskJson>;
}

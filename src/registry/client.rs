//! Craft registry HTTP client.
//!
//! Implements the registry API:
//! - GET /api/v1/crafts/{author}/{name} - Craft metadata
//! - GET /api/v1/crafts/{author}/{name}/versions/{version} - Versioned metadata
//! - GET /api/v1/crafts/{author}/{name}/versions - Version listing
//! - POST /api/v1/resolve - Dependency resolution
//! - GET /api/v1/crafts?q={query}&type={type} - Search
//!
//! Every call resolves its own registry and asks the [`ConfigSource`] for a
//! token, so nothing per-call is shared between operations. Requests without
//! a token go out unauthenticated.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::download::download_to_file;
use super::lookup::Lookup;
use super::pool::{ClientPool, ClientSettings};
use super::types::{
    CraftEnvelope, CraftInfo, CraftType, ResolveRequest, ResolveResponse, SearchResponse,
    VersionsResponse,
};
use crate::checksum::{ensure_file_checksum, Checksum};
use crate::config::{default_registry_url, resolve_registry_url, ConfigSource};
use crate::error::{RegistryError, Result};
use crate::name::CraftIdentifier;

/// Options for building a [`RegistryClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Timeout for API calls.
    pub request_timeout: Duration,
    /// Timeout for artifact downloads. `None` lets large downloads run.
    pub download_timeout: Option<Duration>,
    /// Redirects followed by every request.
    pub max_redirects: usize,
    /// How long a pooled per-registry client is reused.
    pub client_ttl: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            download_timeout: None,
            max_redirects: 5,
            client_ttl: Duration::from_secs(300),
            user_agent: format!("craft-registry/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Client for craft registries.
///
/// # Example
///
/// ```no_run
/// use craft_registry::config::ProjectConfig;
/// use craft_registry::{Lookup, RegistryClient};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let config = ProjectConfig::load(Path::new(".")).unwrap();
/// let client = RegistryClient::new(Arc::new(config));
///
/// match client.get_craft_info("john/rails-api", None, None).unwrap() {
///     Lookup::Found(info) => println!("{} {}", info.name, info.version),
///     Lookup::NotFound => println!("not in registry, try git"),
///     Lookup::Failed(reason) => println!("registry unavailable: {}", reason),
/// }
/// ```
pub struct RegistryClient {
    config: Arc<dyn ConfigSource>,
    api: ClientPool,
    downloads: ClientPool,
}

impl RegistryClient {
    /// Create a client with default options.
    pub fn new(config: Arc<dyn ConfigSource>) -> Self {
        Self::with_options(config, ClientOptions::default())
    }

    /// Create a client with custom options.
    pub fn with_options(config: Arc<dyn ConfigSource>, options: ClientOptions) -> Self {
        let api = ClientPool::new(
            ClientSettings {
                timeout: Some(options.request_timeout),
                max_redirects: options.max_redirects,
                user_agent: options.user_agent.clone(),
            },
            options.client_ttl,
        );
        let downloads = ClientPool::new(
            ClientSettings {
                timeout: options.download_timeout,
                max_redirects: options.max_redirects,
                user_agent: options.user_agent,
            },
            options.client_ttl,
        );

        Self {
            config,
            api,
            downloads,
        }
    }

    /// The configuration collaborator.
    pub fn config(&self) -> &dyn ConfigSource {
        self.config.as_ref()
    }

    /// Fetch metadata for a craft, optionally at a specific version.
    ///
    /// `registry` overrides the craft's configured registry and may be a URL,
    /// an alias, or a bare host. Only a malformed `name` is an error; a 404
    /// or request failure is logged and returned as a [`Lookup`] miss.
    pub fn get_craft_info(
        &self,
        name: &str,
        version: Option<&str>,
        registry: Option<&str>,
    ) -> Result<Lookup<CraftInfo>> {
        let id = CraftIdentifier::parse(name)?;
        let base_url = self.registry_for(name, registry);

        let mut segments = id.api_segments().to_vec();
        if let Some(version) = version {
            segments.extend(["versions", version]);
        }

        let lookup = self
            .send::<CraftEnvelope>(&base_url, Method::GET, &segments, |_| {}, None)
            .map(CraftEnvelope::into_inner);

        match &lookup {
            Lookup::Found(info) => {
                tracing::debug!("Found {}@{} on {}", id, info.version, base_url);
            }
            Lookup::NotFound => match version {
                Some(v) => tracing::error!("Craft not found: {}@{} on {}", id, v, base_url),
                None => tracing::error!("Craft not found: {} on {}", id, base_url),
            },
            Lookup::Failed(reason) => {
                tracing::error!("Failed to fetch craft info for {}: {}", id, reason);
            }
        }

        Ok(lookup)
    }

    /// List published versions of a craft, in registry order.
    ///
    /// Any request failure yields an empty list.
    pub fn list_versions(&self, name: &str) -> Result<Vec<String>> {
        let id = CraftIdentifier::parse(name)?;
        let base_url = self.registry_for(name, None);

        let mut segments = id.api_segments().to_vec();
        segments.push("versions");

        match self.send::<VersionsResponse>(&base_url, Method::GET, &segments, |_| {}, None) {
            Lookup::Found(response) => Ok(response.versions),
            Lookup::NotFound => {
                tracing::error!("Craft not found: {} on {}", id, base_url);
                Ok(Vec::new())
            }
            Lookup::Failed(reason) => {
                tracing::error!("Failed to list versions for {}: {}", id, reason);
                Ok(Vec::new())
            }
        }
    }

    /// Resolve a dependency set against the `default` registry.
    ///
    /// Fails with [`NoRegistryConfigured`](crate::RegistryError::NoRegistryConfigured)
    /// when no default is set. Request failures are logged and returned as a
    /// [`Lookup`] miss.
    pub fn resolve_dependencies(
        &self,
        dependencies: &BTreeMap<String, String>,
    ) -> Result<Lookup<ResolveResponse>> {
        let base_url = self.default_registry()?;

        let body = match serde_json::to_value(ResolveRequest { dependencies }) {
            Ok(body) => body,
            Err(e) => return Ok(Lookup::Failed(format!("Invalid request body: {}", e))),
        };

        tracing::debug!(
            "Resolving {} dependencies on {}",
            dependencies.len(),
            base_url
        );

        let lookup = self.send::<ResolveResponse>(
            &base_url,
            Method::POST,
            &["api", "v1", "resolve"],
            |_| {},
            Some(body),
        );

        match &lookup {
            Lookup::Found(response) => {
                tracing::debug!("Resolved {} crafts", response.resolved.len());
            }
            Lookup::NotFound => {
                tracing::error!(
                    "Failed to resolve dependencies: {} has no resolve endpoint",
                    base_url
                );
            }
            Lookup::Failed(reason) => {
                tracing::error!("Failed to resolve dependencies: {}", reason);
            }
        }

        Ok(lookup)
    }

    /// Search the `default` registry.
    ///
    /// Requires a configured default like [`resolve_dependencies`](Self::resolve_dependencies),
    /// but request failures only yield an empty list.
    pub fn search_crafts(
        &self,
        query: &str,
        craft_type: Option<CraftType>,
    ) -> Result<Vec<CraftInfo>> {
        let base_url = self.default_registry()?;

        let lookup = self.send::<SearchResponse>(
            &base_url,
            Method::GET,
            &["api", "v1", "crafts"],
            |url| {
                let mut pairs = url.query_pairs_mut();
                pairs.append_pair("q", query);
                if let Some(craft_type) = craft_type {
                    pairs.append_pair("type", craft_type.as_str());
                }
            },
            None,
        );

        match lookup {
            Lookup::Found(response) => Ok(response.crafts),
            Lookup::NotFound => {
                tracing::error!("Search failed: {} has no search endpoint", base_url);
                Ok(Vec::new())
            }
            Lookup::Failed(reason) => {
                tracing::error!("Search failed: {}", reason);
                Ok(Vec::new())
            }
        }
    }

    /// Stream an artifact to `output`, creating parent directories.
    ///
    /// Returns the number of bytes written. On failure, any partial file is
    /// left in place for the caller to remove.
    pub fn download_craft(&self, url: &str, output: &Path) -> Result<u64> {
        let origin = origin_key(url);

        let client = self
            .downloads
            .get(&origin)
            .map_err(|e| RegistryError::download(url, e))?;
        let token = self.config.auth_token(&origin);

        download_to_file(&client, url, token.as_deref(), output).inspect_err(|e| {
            tracing::error!("{}", e);
        })
    }

    /// Download an artifact and check it against the declared digest.
    ///
    /// A mismatching file is left on disk, like any failed download.
    pub fn download_and_verify(
        &self,
        url: &str,
        output: &Path,
        expected: &str,
    ) -> Result<Checksum> {
        self.download_craft(url, output)?;
        ensure_file_checksum(output, expected)
    }

    /// Drop the pooled HTTP clients for a registry, e.g. after a config change.
    ///
    /// Covers both the API client for `base_url` and the download client for
    /// its origin. Returns whether anything was pooled.
    pub fn invalidate_registry(&self, base_url: &str) -> bool {
        let api = self.api.invalidate(base_url);
        let downloads = self.downloads.invalidate(&origin_key(base_url));
        api || downloads
    }

    /// Base URL for a craft: the override if given, else the craft's registry.
    fn registry_for(&self, name: &str, registry: Option<&str>) -> String {
        let reference = match registry {
            Some(reference) => reference.to_string(),
            None => self.config.registry_for_craft(name),
        };
        resolve_registry_url(&reference, self.config.craftdesk_json().as_ref())
    }

    fn default_registry(&self) -> Result<String> {
        default_registry_url(self.config.craftdesk_json().as_ref()).inspect_err(|e| {
            tracing::error!("{}", e);
        })
    }

    /// Issue one JSON request and classify the outcome.
    fn send<T: DeserializeOwned>(
        &self,
        base_url: &str,
        method: Method,
        segments: &[&str],
        customize: impl FnOnce(&mut Url),
        body: Option<serde_json::Value>,
    ) -> Lookup<T> {
        let mut url = match api_url(base_url, segments) {
            Ok(url) => url,
            Err(reason) => return Lookup::Failed(reason),
        };
        customize(&mut url);

        let client = match self.api.get(base_url) {
            Ok(client) => client,
            Err(e) => return Lookup::Failed(format!("Failed to create HTTP client: {}", e)),
        };

        tracing::debug!("{} {}", method, url);

        let mut request = client
            .request(method, url.clone())
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.config.auth_token(base_url) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = match request.send() {
            Ok(response) => response,
            Err(e) => return Lookup::Failed(format!("Request to {} failed: {}", url, e)),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Lookup::NotFound;
        }
        if !status.is_success() {
            return Lookup::Failed(format!("HTTP {} from {}", status, url));
        }

        match response.json::<T>() {
            Ok(value) => Lookup::Found(value),
            Err(e) => Lookup::Failed(format!("Invalid response from {}: {}", url, e)),
        }
    }
}

/// Pool key and token host for a download URL.
fn origin_key(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.origin().ascii_serialization())
        .unwrap_or_else(|_| url.to_string())
}

/// Append API path segments to a registry base URL.
fn api_url(base_url: &str, segments: &[&str]) -> std::result::Result<Url, String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| format!("Invalid registry URL '{}': {}", base_url, e))?;

    url.path_segments_mut()
        .map_err(|_| format!("Invalid registry URL '{}': cannot be a base", base_url))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

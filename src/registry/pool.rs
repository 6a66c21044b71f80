//! Per-registry HTTP client pool.
//!
//! One `reqwest` client is kept per key (a registry base URL, or a download
//! origin) so sockets are reused across calls. Entries expire after a TTL;
//! an expired entry is rebuilt on next use, and any expired entries are
//! dropped whenever a new client is added. Tokens are never stored here.

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// How clients in a pool are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Whole-request timeout. `None` means unbounded.
    pub timeout: Option<Duration>,
    /// Redirects followed before giving up.
    pub max_redirects: usize,
    pub user_agent: String,
}

impl ClientSettings {
    fn build(&self) -> reqwest::Result<Client> {
        Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .redirect(Policy::limited(self.max_redirects))
            .build()
    }
}

/// A pooled client with its creation time.
struct PooledClient {
    client: Client,
    created_at: Instant,
}

impl PooledClient {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

/// Clients keyed by base URL, rebuilt once older than the TTL.
pub struct ClientPool {
    settings: ClientSettings,
    ttl: Duration,
    clients: Mutex<HashMap<String, PooledClient>>,
}

impl ClientPool {
    /// Create an empty pool.
    pub fn new(settings: ClientSettings, ttl: Duration) -> Self {
        Self {
            settings,
            ttl,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Settings used for new clients.
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Get the client for `key`, building one if missing or expired.
    ///
    /// Clients are built without holding the pool lock, so first calls for
    /// different keys do not wait on each other.
    pub fn get(&self, key: &str) -> reqwest::Result<Client> {
        if let Some(pooled) = self.lock().get(key) {
            if !pooled.is_expired(self.ttl) {
                return Ok(pooled.client.clone());
            }
            tracing::debug!("HTTP client for {} expired, rebuilding", key);
        }

        let client = self.settings.build()?;

        let mut clients = self.lock();
        // Another caller may have filled the slot while we were building.
        if let Some(pooled) = clients.get(key) {
            if !pooled.is_expired(self.ttl) {
                return Ok(pooled.client.clone());
            }
        }
        let ttl = self.ttl;
        clients.retain(|_, pooled| !pooled.is_expired(ttl));
        clients.insert(
            key.to_string(),
            PooledClient {
                client: client.clone(),
                created_at: Instant::now(),
            },
        );
        Ok(client)
    }

    /// Drop the client for `key`. Returns whether one was pooled.
    pub fn invalidate(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Drop every pooled client.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Whether a client for `key` is pooled and still fresh.
    pub fn is_pooled(&self, key: &str) -> bool {
        self.lock()
            .get(key)
            .is_some_and(|pooled| !pooled.is_expired(self.ttl))
    }

    /// Number of pooled clients, fresh or expired.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Poisoning leaves the map intact.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, PooledClient>> {
        self.clients.lock().unwrap_or_else(|e| e.into_inner())
    }
}

//! Error types for craft registry operations.
//!
//! This module defines [`RegistryError`], the error type returned by every
//! fallible operation in the crate, and a [`Result`] type alias.
//!
//! # Error Handling Strategy
//!
//! - Malformed input and missing configuration are always errors; they are
//!   caller mistakes that need fixing, not routing around
//! - Remote lookup misses (404, network failures) are *not* errors here;
//!   they surface as [`Lookup`](crate::registry::Lookup) outcomes so callers
//!   can fall back to another dependency source
//! - Download and checksum failures wrap the underlying cause

use std::path::PathBuf;
use thiserror::Error;

/// Configuration snippet shown when no default registry is configured.
pub const DEFAULT_REGISTRY_EXAMPLE: &str = r#"{
  "registries": {
    "default": {
      "url": "https://your-registry.com"
    }
  }
}"#;

/// Boxed cause carried by [`RegistryError::DownloadFailed`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type for craft registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Craft identifier is not `author/name` or `@author/name`.
    #[error("Invalid craft name format: '{input}'. Expected 'author/name' or '@author/name'")]
    InvalidNameFormat { input: String },

    /// An operation needs a `default` registry and none is configured.
    #[error(
        "No registry configured. Add a default registry to craftdesk.json:\n{}",
        DEFAULT_REGISTRY_EXAMPLE
    )]
    NoRegistryConfigured,

    /// `craftdesk.json` exists but could not be parsed.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Streaming a download to disk failed on the network or the write side.
    #[error("Download failed for {url}: {source}")]
    DownloadFailed {
        url: String,
        #[source]
        source: BoxError,
    },

    /// A file's digest does not match the registry-declared checksum.
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    /// Wrap a download-side failure with the URL being fetched.
    pub(crate) fn download(url: &str, source: impl Into<BoxError>) -> Self {
        Self::DownloadFailed {
            url: url.to_string(),
            source: source.into(),
        }
    }
}

/// Result type alias for craft registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

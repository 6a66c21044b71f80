//! Craft registry - resolution and integrity verification for craft packages.
//!
//! Crafts are distributable skills, agents, commands, hooks, and plugins.
//! This crate resolves craft metadata and dependency sets against remote
//! registries, streams artifacts to disk, and verifies them by SHA-256.
//!
//! # Modules
//!
//! - [`checksum`] - Streaming SHA-256 computation and verification
//! - [`config`] - Registry configuration, credentials, and reference resolution
//! - [`error`] - Error types and result aliases
//! - [`name`] - Craft identifier parsing
//! - [`registry`] - Registry HTTP client and artifact downloads
//!
//! # Example
//!
//! ```
//! use craft_registry::checksum::{compute_checksum, format_for_display};
//! use craft_registry::CraftIdentifier;
//! use std::io::Cursor;
//!
//! let id = CraftIdentifier::parse("@john/rails-api").unwrap();
//! assert_eq!(id.to_string(), "john/rails-api");
//!
//! let checksum = compute_checksum(Cursor::new(b"hello world")).unwrap();
//! assert_eq!(format_for_display(checksum.as_str()), "b94d27b9934d");
//! ```
//!
//! For registry calls against a live server, see the integration tests.

pub mod checksum;
pub mod config;
pub mod error;
pub mod name;
pub mod registry;

pub use checksum::Checksum;
pub use error::{RegistryError, Result};
pub use name::CraftIdentifier;
pub use registry::{ClientOptions, CraftInfo, CraftType, Lookup, RegistryClient, ResolveResponse};

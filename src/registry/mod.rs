//! Craft registry client.
//!
//! This module talks to remote craft registries:
//! - Metadata, version listing, and search via [`RegistryClient`]
//! - Dependency resolution against the `default` registry
//! - Streaming artifact downloads in [`download`]
//!
//! # Failure policy
//!
//! Lookup-style calls (craft info, versions, search) degrade to a
//! [`Lookup`] miss or an empty list on remote failure, after logging, so
//! callers can fall back to another source. Malformed craft names and a
//! missing `default` registry are always returned as errors.

pub mod client;
pub mod download;
pub mod lookup;
pub mod pool;
pub mod types;

// Re-exports
pub use client::{ClientOptions, RegistryClient};
pub use lookup::Lookup;
pub use pool::{ClientPool, ClientSettings};
pub use types::{CraftInfo, CraftType, ResolveResponse, ResolvedCraft};

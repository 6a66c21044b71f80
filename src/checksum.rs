//! SHA-256 integrity verification for downloaded craft artifacts.
//!
//! Digests are computed over a byte stream in fixed-size chunks, so memory
//! use is bounded regardless of artifact size. Read failures are returned as
//! [`RegistryError::Io`] and are never reported as a mismatch.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::error::{RegistryError, Result};

/// Bytes read per hashing step.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Hex characters kept by [`format_for_display`].
pub const DISPLAY_LEN: usize = 12;

/// A lowercase hex-encoded SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// Parse a 64-character hex digest in any case.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(hex.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// The full lowercase hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `other` names the same digest, ignoring case.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// Abbreviated form for terminal output.
    pub fn short(&self) -> &str {
        format_for_display(&self.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Checksum {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compute the SHA-256 digest of everything `reader` yields.
pub fn compute_checksum<R: Read>(mut reader: R) -> Result<Checksum> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Checksum(hex::encode(hasher.finalize())))
}

/// Compute the digest of `reader` and compare it to `expected`, ignoring case.
pub fn verify_checksum<R: Read>(reader: R, expected: &str) -> Result<bool> {
    let actual = compute_checksum(reader)?;
    Ok(actual.matches(expected))
}

/// Truncate a checksum to its first 12 characters for display.
///
/// Never use the result for comparison.
pub fn format_for_display(checksum: &str) -> &str {
    match checksum.char_indices().nth(DISPLAY_LEN) {
        Some((idx, _)) => &checksum[..idx],
        None => checksum,
    }
}

/// Compute the digest of a file on disk.
pub fn compute_file_checksum(path: &Path) -> Result<Checksum> {
    let file = File::open(path)?;
    compute_checksum(file)
}

/// Check a file on disk against an expected digest.
pub fn verify_file_checksum(path: &Path, expected: &str) -> Result<bool> {
    let file = File::open(path)?;
    verify_checksum(file, expected)
}

/// Fail with [`RegistryError::ChecksumMismatch`] unless the file matches.
pub fn ensure_file_checksum(path: &Path, expected: &str) -> Result<Checksum> {
    let actual = compute_file_checksum(path)?;
    if !actual.matches(expected) {
        tracing::error!(
            path = %path.display(),
            "Checksum mismatch: expected {}, got {}",
            format_for_display(expected),
            actual.short()
        );
        return Err(RegistryError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: format_for_display(expected).to_string(),
            actual: actual.short().to_string(),
        });
    }
    tracing::debug!(path = %path.display(), "Checksum verified: {}", actual.short());
    Ok(actual)
}

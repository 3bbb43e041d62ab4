//! Optional checksum verification (SHA-256) of a retrieved file.
//!
//! The expected digest comes from the locator's `checksum=sha256:<hex>` query
//! parameter and is checked after the file is in place, never inline with the copy.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::GetError;

const BUF_SIZE: usize = 64 * 1024;
const SHA256_HEX_LEN: usize = 64;

/// Expected digest of a retrieved file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChecksum {
    /// Lowercase hex SHA-256.
    pub sha256: String,
}

impl FileChecksum {
    /// Parses `sha256:<hex>`. Any other algorithm or a malformed digest is an invalid locator.
    pub fn parse(value: &str) -> Result<Self, GetError> {
        let (kind, digest) = value.split_once(':').ok_or_else(|| {
            GetError::InvalidLocator(format!(
                "checksum must be of the form <type>:<value>, got {:?}",
                value
            ))
        })?;
        if !kind.eq_ignore_ascii_case("sha256") {
            return Err(GetError::InvalidLocator(format!(
                "unsupported checksum type {:?} (only sha256 is supported)",
                kind
            )));
        }
        let digest = digest.to_ascii_lowercase();
        if digest.len() != SHA256_HEX_LEN || hex::decode(&digest).is_err() {
            return Err(GetError::InvalidLocator(format!(
                "invalid sha256 checksum {:?}",
                digest
            )));
        }
        Ok(FileChecksum { sha256: digest })
    }

    /// Hashes `path` and compares it with the expected digest.
    pub fn verify(&self, path: &Path) -> Result<(), GetError> {
        let actual = sha256_path(path).map_err(|source| GetError::ChecksumRead {
            path: path.to_path_buf(),
            source,
        })?;
        if actual != self.sha256 {
            return Err(GetError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected: self.sha256.clone(),
                actual,
            });
        }
        tracing::debug!(path = %path.display(), "checksum verified");
        Ok(())
    }
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha256_path(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

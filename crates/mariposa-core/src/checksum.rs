//! Git blob SHA-1 content identity for migration files.
//!
//! The digest covers a `blob <len>\0` header followed by the raw bytes, so a
//! value recorded in the ledger can be looked up directly in version control
//! history (`git log --find-object=<sha1>`).

use crate::error::{CoreError, CoreResult};
use sha1::{Digest, Sha1};
use std::path::Path;

/// Compute the git blob SHA-1 of raw bytes as 40 lowercase hex characters
pub fn blob_sha1(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("blob {}\0", bytes.len()).as_bytes());
    hasher.update(bytes);
    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Read a file and compute its git blob SHA-1
pub fn file_blob_sha1(path: &Path) -> CoreResult<String> {
    let bytes = read_file(path)?;
    Ok(blob_sha1(&bytes))
}

pub(crate) fn read_file(path: &Path) -> CoreResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "checksum_test.rs"]
mod tests;

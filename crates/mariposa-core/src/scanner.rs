//! Migration directory scanning
//!
//! Lists every regular, non-hidden file directly inside the migration
//! directory. Nothing is filtered by extension: `.sql` files become SQL
//! units, everything else is treated as an executable.

use crate::checksum::file_blob_sha1;
use crate::error::{CoreError, CoreResult};
use crate::migration::MigrationDescriptor;
use std::path::Path;

/// Scan a directory (non-recursively) for migration files.
///
/// The returned descriptors are in directory order, which is unspecified;
/// callers that need an order must sort.
pub fn scan_directory(dir: &Path) -> CoreResult<Vec<MigrationDescriptor>> {
    if !dir.is_dir() {
        return Err(CoreError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut migrations = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
            log::warn!("Skipping migration with non UTF-8 name: {}", path.display());
            continue;
        };

        if filename.starts_with('.') {
            continue;
        }

        let sha1 = file_blob_sha1(&path)?;
        log::debug!("Found migration {} sha1 {}", filename, sha1);
        migrations.push(MigrationDescriptor::new(filename, sha1));
    }

    Ok(migrations)
}

#[cfg(test)]
#[path = "scanner_test.rs"]
mod tests;

//! Writing new migration files

use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use mariposa_core::scaffold::{migration_filename, template_for};
use mariposa_core::{CoreError, MigrationKind};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Outcome of [`create_migration`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedMigration {
    pub path: PathBuf,
    /// False for a dry run
    pub written: bool,
}

impl CreatedMigration {
    /// One-line summary for the user
    pub fn message(&self) -> String {
        if self.written {
            format!("Created {}", self.path.display())
        } else {
            format!("Would create {}", self.path.display())
        }
    }
}

/// Create `<timestamp>-<slug>.<ext>` in `dir` with a template body.
///
/// Existing files are never overwritten. Non-SQL migrations are made
/// executable.
pub fn create_migration(
    dir: &Path,
    slug: &str,
    ext: &str,
    now: DateTime<Utc>,
    dry_run: bool,
) -> EngineResult<CreatedMigration> {
    if !dir.is_dir() {
        return Err(CoreError::DirectoryNotFound {
            path: dir.display().to_string(),
        }
        .into());
    }

    let filename = migration_filename(slug, ext, now)?;
    let path = dir.join(&filename);

    if dry_run {
        if path.exists() {
            return Err(CoreError::MigrationExists {
                path: path.display().to_string(),
            }
            .into());
        }
        return Ok(CreatedMigration {
            path,
            written: false,
        });
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|source| match source.kind() {
            ErrorKind::AlreadyExists => EngineError::Core(CoreError::MigrationExists {
                path: path.display().to_string(),
            }),
            _ => EngineError::CreateFile {
                path: path.display().to_string(),
                source,
            },
        })?;
    file.write_all(template_for(&filename).as_bytes())
        .map_err(|source| EngineError::CreateFile {
            path: path.display().to_string(),
            source,
        })?;

    if MigrationKind::from_filename(&filename) == MigrationKind::Command {
        make_executable(&path)?;
    }

    log::debug!("Created migration {}", path.display());
    Ok(CreatedMigration {
        path,
        written: true,
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> EngineResult<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|source| {
        EngineError::CreateFile {
            path: path.display().to_string(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> EngineResult<()> {
    Ok(())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;

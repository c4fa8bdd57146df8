//! Error types for mariposa-core

use thiserror::Error;

/// Core error type for Mariposa
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Migration directory not found
    #[error("[E004] Migration directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// E005: Migration file is not valid UTF-8 text
    #[error("[E005] Migration file '{path}' is not valid UTF-8")]
    InvalidUtf8 { path: String },

    /// E006: Migration file changed between scan and plan
    #[error("[E006] Migration '{filename}' changed on disk while planning (expected sha1 {expected}, found {found})")]
    ChangedDuringRun {
        filename: String,
        expected: String,
        found: String,
    },

    /// E007: Slug for a new migration is unusable
    #[error("[E007] Invalid migration slug '{slug}': {reason}")]
    InvalidSlug { slug: String, reason: String },

    /// E008: Refusing to overwrite an existing migration
    #[error("[E008] Migration file already exists: {path}")]
    MigrationExists { path: String },

    /// R001: Unapplied migrations sort before the latest applied one
    #[error("[R001] [{files}] older than the latest performed migration")]
    OutOfOrder { files: String },

    /// R002: Applied migrations whose content changed on disk
    #[error("[R002] [{files}] migrations were modified since they were run on this database.")]
    ModifiedMigration { files: String },

    /// R003: Applied migrations missing from disk
    #[error("[R003] [{files}] migrations were deleted since they were run on this database.")]
    DeletedMigration { files: String },

    /// E009: IO error
    #[error("[E009] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E010: IO error with file path context
    #[error("[E010] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Join filenames the way reconciliation errors and warnings present them.
pub(crate) fn join_filenames<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names.into_iter().collect::<Vec<_>>().join(",")
}

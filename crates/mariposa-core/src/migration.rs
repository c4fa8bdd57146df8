//! Migration descriptors and ledger entries
//!
//! A [`MigrationDescriptor`] is what the scanner found on disk; a
//! [`LedgerEntry`] is what the backend says has already been applied. Both
//! are plain values compared by `(filename, sha1)`.

use std::fmt;
use std::path::Path;

/// How a migration file is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationKind {
    /// `.sql` file whose statements run inside the plan transaction
    Sql,
    /// Any other file, run as an external executable
    Command,
}

impl MigrationKind {
    /// Derive the kind from a filename's extension
    pub fn from_filename(filename: &str) -> Self {
        if Path::new(filename).extension().is_some_and(|e| e == "sql") {
            MigrationKind::Sql
        } else {
            MigrationKind::Command
        }
    }
}

impl fmt::Display for MigrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationKind::Sql => write!(f, "sql"),
            MigrationKind::Command => write!(f, "command"),
        }
    }
}

/// A migration file found on disk
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MigrationDescriptor {
    /// Basename of the file, conventionally timestamp-prefixed
    pub filename: String,

    /// Git blob SHA-1 of the file contents
    pub sha1: String,
}

impl MigrationDescriptor {
    pub fn new(filename: impl Into<String>, sha1: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            sha1: sha1.into(),
        }
    }

    /// Kind derived from the file extension
    pub fn kind(&self) -> MigrationKind {
        MigrationKind::from_filename(&self.filename)
    }

    /// True when this descriptor and the ledger entry name the same applied migration
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        self.filename == entry.filename && self.sha1 == entry.sha1
    }
}

impl fmt::Display for MigrationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.filename, self.sha1)
    }
}

/// A row of the `dbmigration` ledger table
///
/// The `date` column is never read back; reconciliation only needs the pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerEntry {
    pub filename: String,
    pub sha1: String,
}

impl LedgerEntry {
    pub fn new(filename: impl Into<String>, sha1: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            sha1: sha1.into(),
        }
    }
}

impl From<&MigrationDescriptor> for LedgerEntry {
    fn from(descriptor: &MigrationDescriptor) -> Self {
        Self::new(descriptor.filename.clone(), descriptor.sha1.clone())
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;

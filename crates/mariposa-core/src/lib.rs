//! mariposa-core - Core library for Mariposa
//!
//! This crate holds everything that does not talk to a database: content
//! hashing, directory scanning, reconciliation of disk against the ledger,
//! execution plan building, rename detection, ledger SQL text, scaffolding,
//! and project configuration.

pub mod checksum;
pub mod config;
pub mod error;
pub mod ledger;
pub mod migration;
pub mod plan;
pub mod reconcile;
pub mod rename;
pub mod scaffold;
pub mod scanner;

pub use checksum::{blob_sha1, file_blob_sha1};
pub use config::{Config, Engine, Settings, SettingsOverrides};
pub use error::{CoreError, CoreResult};
pub use migration::{LedgerEntry, MigrationDescriptor, MigrationKind};
pub use plan::{
    transaction_batch, CommandUnit, ExecutionPlan, PlanSegment, PlanUnit, SqlUnit, SqlUnitKind,
};
pub use reconcile::Reconciliation;
pub use rename::{find_renames, rename_batch, Rename};
pub use scanner::scan_directory;

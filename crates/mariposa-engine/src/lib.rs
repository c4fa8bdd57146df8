//! mariposa-engine - Migration engine for Mariposa
//!
//! Ties scanning and planning from `mariposa-core` to a live backend from
//! `mariposa-db`: reads the ledger, executes plans, and runs command units.

pub mod create;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod migrator;

pub use create::{create_migration, CreatedMigration};
pub use error::{EngineError, EngineResult};
pub use executor::PlanExecutor;
pub use ledger::Ledger;
pub use migrator::{MigrateOptions, MigrateReport, Migrator, RenameReport};

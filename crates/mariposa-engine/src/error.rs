//! Error types for mariposa-engine

use mariposa_core::CoreError;
use mariposa_db::DbError;
use thiserror::Error;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Reconciliation, planning, scanning or configuration failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Backend rejected a statement or could not be reached
    #[error(transparent)]
    Db(#[from] DbError),

    /// X001: Command unit exited unsuccessfully
    #[error("[X001] Migration command '{filename}' failed with {status}")]
    ExternalCommand { filename: String, status: String },

    /// X002: Command unit could not be started
    #[error("[X002] Failed to run migration command '{filename}': {source}")]
    CommandSpawn {
        filename: String,
        source: std::io::Error,
    },

    /// X003: Ledger row with a NULL or missing column
    #[error("[X003] Malformed ledger row: {0}")]
    InvalidLedgerRow(String),

    /// X004: Failed to write a new migration file
    #[error("[X004] Failed to create '{path}': {source}")]
    CreateFile {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;

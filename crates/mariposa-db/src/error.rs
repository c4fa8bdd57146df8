//! Error types for mariposa-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement rejected by the backend (D002)
    #[error("[D002] SQL execution failed: {0}")]
    SqlError(String),

    /// Table not found (D003)
    #[error("[D003] Table not found: {0}")]
    TableNotFound(String),

    /// Table already exists (D004)
    #[error("[D004] Table already exists: {0}")]
    AlreadyExists(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

// Driver errors from arbitrary statements are SQL (or connection) failures.
// Only the ledger operations classify further, see the `ledger_*_error`
// functions below.

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::SqlError(err.to_string())
    }
}

impl From<tokio_postgres::Error> for DbError {
    fn from(err: tokio_postgres::Error) -> Self {
        let msg = postgres_message(&err);
        if err.is_closed() {
            DbError::ConnectionError(msg)
        } else {
            DbError::SqlError(msg)
        }
    }
}

impl From<mysql_async::Error> for DbError {
    fn from(err: mysql_async::Error) -> Self {
        let msg = err.to_string();
        match &err {
            mysql_async::Error::Io(_) | mysql_async::Error::Url(_) => {
                DbError::ConnectionError(msg)
            }
            _ => DbError::SqlError(msg),
        }
    }
}

fn postgres_message(err: &tokio_postgres::Error) -> String {
    err.as_db_error()
        .map(|db| db.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Classify a DuckDB error from creating or reading the ledger table.
///
/// duckdb::Error carries no structured code for catalog failures, so this
/// inspects the message.
pub(crate) fn ledger_duckdb_error(err: duckdb::Error) -> DbError {
    let msg = err.to_string();
    if !msg.contains("Catalog Error") {
        return DbError::SqlError(msg);
    }
    if msg.contains("already exists") {
        DbError::AlreadyExists(msg)
    } else if msg.contains("does not exist") || msg.contains("not found") {
        DbError::TableNotFound(msg)
    } else {
        DbError::SqlError(msg)
    }
}

/// Classify a PostgreSQL error from creating or reading the ledger table
pub(crate) fn ledger_postgres_error(err: tokio_postgres::Error) -> DbError {
    use tokio_postgres::error::SqlState;

    match err.code() {
        Some(code) if *code == SqlState::DUPLICATE_TABLE => {
            DbError::AlreadyExists(postgres_message(&err))
        }
        Some(code) if *code == SqlState::UNDEFINED_TABLE => {
            DbError::TableNotFound(postgres_message(&err))
        }
        _ => DbError::from(err),
    }
}

/// MySQL server error codes
const ER_TABLE_EXISTS_ERROR: u16 = 1050;
const ER_NO_SUCH_TABLE: u16 = 1146;

/// Classify a MySQL error from creating or reading the ledger table
pub(crate) fn ledger_mysql_error(err: mysql_async::Error) -> DbError {
    match &err {
        mysql_async::Error::Server(server) if server.code == ER_TABLE_EXISTS_ERROR => {
            DbError::AlreadyExists(err.to_string())
        }
        mysql_async::Error::Server(server) if server.code == ER_NO_SUCH_TABLE => {
            DbError::TableNotFound(err.to_string())
        }
        _ => DbError::from(err),
    }
}

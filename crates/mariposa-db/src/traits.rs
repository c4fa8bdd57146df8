//! Backend adapter trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// One result row, every column as text (`None` for SQL NULL)
pub type Row = Vec<Option<String>>;

/// Capability set every backend provides to the migration engine
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a batch of statements.
    ///
    /// On failure any open transaction is rolled back before the error is
    /// returned.
    async fn execute(&self, sql: &str) -> DbResult<()>;

    /// Run a query and return its rows in backend order, as text
    async fn query(&self, sql: &str) -> DbResult<Vec<Row>>;

    /// Expression producing the current timestamp in an INSERT
    fn now_expression(&self) -> &'static str;

    /// Column type used for the ledger's `date` column
    fn timestamp_type(&self) -> &'static str;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;

    /// Create the ledger table.
    ///
    /// Not idempotent on its own: an existing table surfaces as
    /// [`DbError::AlreadyExists`](crate::DbError::AlreadyExists), which the
    /// caller is expected to swallow.
    async fn create_ledger_table(&self) -> DbResult<()>;

    /// Applied `(filename, sha1)` rows ordered by filename.
    ///
    /// A missing ledger table surfaces as
    /// [`DbError::TableNotFound`](crate::DbError::TableNotFound).
    async fn query_ledger(&self) -> DbResult<Vec<Row>>;
}

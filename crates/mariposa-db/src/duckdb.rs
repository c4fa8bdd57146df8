//! DuckDB database backend implementation

use crate::error::{ledger_duckdb_error, DbError, DbResult};
use crate::traits::{Database, Row};
use async_trait::async_trait;
use duckdb::Connection;
use mariposa_core::ledger::{create_table_sql, select_performed_sql};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", e, path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn execute_sync(&self, sql: &str, classify: fn(duckdb::Error) -> DbError) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(|e| {
            // Fails harmlessly when no transaction is open.
            if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                log::debug!("DuckDB rollback after failed batch: {}", rollback);
            }
            classify(e)
        })
    }

    fn query_sync(&self, sql: &str, classify: fn(duckdb::Error) -> DbError) -> DbResult<Vec<Row>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(classify)?;
        let rows = stmt.query_map([], |row| {
            let columns = row.as_ref().column_count();
            (0..columns)
                .map(|i| row.get::<_, Option<String>>(i))
                .collect::<Result<Row, _>>()
        })
        .map_err(classify)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(classify)?);
        }
        Ok(result)
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<()> {
        self.execute_sync(sql, DbError::from)
    }

    async fn query(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.query_sync(sql, DbError::from)
    }

    fn now_expression(&self) -> &'static str {
        "current_timestamp"
    }

    fn timestamp_type(&self) -> &'static str {
        "timestamp"
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }

    async fn create_ledger_table(&self) -> DbResult<()> {
        self.execute_sync(&create_table_sql(self.timestamp_type()), ledger_duckdb_error)
    }

    async fn query_ledger(&self) -> DbResult<Vec<Row>> {
        self.query_sync(&select_performed_sql(), ledger_duckdb_error)
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;

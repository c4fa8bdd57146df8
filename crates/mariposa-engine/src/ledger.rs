//! Ledger reads and setup against a backend

use crate::error::{EngineError, EngineResult};
use mariposa_core::LedgerEntry;
use mariposa_db::{Database, DbError, Row};

/// Reader for the `dbmigration` table
pub struct Ledger<'a> {
    db: &'a dyn Database,
}

impl<'a> Ledger<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Create the ledger table, treating "already exists" as success.
    ///
    /// Any other failure propagates.
    pub async fn ensure_table(&self) -> EngineResult<()> {
        match self.db.create_ledger_table().await {
            Ok(()) => {
                log::debug!("Created ledger table on {}", self.db.db_type());
                Ok(())
            }
            Err(DbError::AlreadyExists(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// All applied migrations, ordered by filename
    pub async fn performed(&self) -> EngineResult<Vec<LedgerEntry>> {
        let rows = self.db.query_ledger().await?;
        rows.into_iter().map(entry_from_row).collect()
    }

    /// Like [`performed`](Self::performed), but a missing ledger table reads
    /// as empty. Used by dry runs, which never create the table.
    pub async fn performed_or_empty(&self) -> EngineResult<Vec<LedgerEntry>> {
        match self.performed().await {
            Err(EngineError::Db(DbError::TableNotFound(msg))) => {
                log::debug!("No ledger table yet, treating as empty: {}", msg);
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

fn entry_from_row(row: Row) -> EngineResult<LedgerEntry> {
    let mut columns = row.into_iter();
    match (columns.next(), columns.next()) {
        (Some(Some(filename)), Some(Some(sha1))) => Ok(LedgerEntry::new(filename, sha1)),
        other => Err(EngineError::InvalidLedgerRow(format!("{:?}", other))),
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;

//! PostgreSQL database backend implementation

use crate::error::{ledger_postgres_error, DbError, DbResult};
use crate::traits::{Database, Row};
use async_trait::async_trait;
use mariposa_core::ledger::{create_table_sql, select_performed_sql};
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};

/// PostgreSQL database backend
///
/// Statements go through the simple query protocol so a whole migration
/// batch can be sent at once and every value comes back as text.
pub struct PostgresBackend {
    client: Client,
}

impl PostgresBackend {
    /// Connect with a libpq key/value string or a `postgres://` URL.
    ///
    /// When `schema` is given it is placed on the search path for the
    /// session, so the ledger and unqualified migration objects live there.
    pub async fn connect(connection: &str, schema: Option<&str>) -> DbResult<Self> {
        let (client, connection) = tokio_postgres::connect(connection, NoTls)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("PostgreSQL connection error: {}", e);
            }
        });

        let backend = Self { client };
        if let Some(schema) = schema {
            backend
                .client
                .batch_execute(&format!("SET search_path = {}", quote_ident(schema)))
                .await?;
            log::debug!("PostgreSQL search_path set to {}", schema);
        }
        Ok(backend)
    }

    async fn execute_with(
        &self,
        sql: &str,
        classify: fn(tokio_postgres::Error) -> DbError,
    ) -> DbResult<()> {
        match self.client.batch_execute(sql).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if let Err(rollback) = self.client.batch_execute("ROLLBACK").await {
                    log::debug!("PostgreSQL rollback after failed batch: {}", rollback);
                }
                Err(classify(e))
            }
        }
    }

    async fn query_with(
        &self,
        sql: &str,
        classify: fn(tokio_postgres::Error) -> DbError,
    ) -> DbResult<Vec<Row>> {
        let messages = self.client.simple_query(sql).await.map_err(classify)?;
        let rows = messages
            .iter()
            .filter_map(|message| match message {
                SimpleQueryMessage::Row(row) => Some(
                    (0..row.len())
                        .map(|i| row.get(i).map(str::to_string))
                        .collect(),
                ),
                _ => None,
            })
            .collect();
        Ok(rows)
    }
}

/// Quote a SQL identifier, doubling embedded double quotes
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[async_trait]
impl Database for PostgresBackend {
    async fn execute(&self, sql: &str) -> DbResult<()> {
        self.execute_with(sql, DbError::from).await
    }

    async fn query(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.query_with(sql, DbError::from).await
    }

    fn now_expression(&self) -> &'static str {
        "now()"
    }

    fn timestamp_type(&self) -> &'static str {
        "timestamp"
    }

    fn db_type(&self) -> &'static str {
        "postgres"
    }

    async fn create_ledger_table(&self) -> DbResult<()> {
        self.execute_with(&create_table_sql(self.timestamp_type()), ledger_postgres_error)
            .await
    }

    async fn query_ledger(&self) -> DbResult<Vec<Row>> {
        self.query_with(&select_performed_sql(), ledger_postgres_error)
            .await
    }
}

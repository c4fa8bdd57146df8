//! Backend selection from resolved settings

use crate::duckdb::DuckDbBackend;
use crate::error::DbResult;
use crate::mysql::MysqlBackend;
use crate::postgres::PostgresBackend;
use crate::traits::Database;
use mariposa_core::Engine;
use std::sync::Arc;

/// Open a backend for `engine` using its connection descriptor.
///
/// `schema` only applies to PostgreSQL; other engines ignore it with a warning.
pub async fn connect(
    engine: Engine,
    connection: &str,
    schema: Option<&str>,
) -> DbResult<Arc<dyn Database>> {
    if schema.is_some() && engine != Engine::Postgres {
        log::warn!("Ignoring schema setting: only used by postgres, engine is {}", engine);
    }

    let db: Arc<dyn Database> = match engine {
        Engine::DuckDb => Arc::new(DuckDbBackend::new(connection)?),
        Engine::Postgres => Arc::new(PostgresBackend::connect(connection, schema).await?),
        Engine::Mysql => Arc::new(MysqlBackend::connect(connection).await?),
    };
    log::debug!("Connected to {} backend", db.db_type());
    Ok(db)
}

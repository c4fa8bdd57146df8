//! mariposa-db - Database abstraction layer for Mariposa
//!
//! This crate provides the `Database` trait the migration engine runs
//! against, with implementations for DuckDB (embedded, file-backed),
//! PostgreSQL and MySQL.

pub mod connect;
pub mod duckdb;
pub mod error;
pub mod mysql;
pub mod postgres;
pub mod traits;

pub use crate::connect::connect;
pub use crate::duckdb::DuckDbBackend;
pub use crate::error::{DbError, DbResult};
pub use crate::mysql::MysqlBackend;
pub use crate::postgres::PostgresBackend;
pub use crate::traits::{Database, Row};

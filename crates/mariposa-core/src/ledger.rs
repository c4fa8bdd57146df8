//! SQL text for the `dbmigration` ledger table
//!
//! Statements are rendered as plain text so the exact same SQL can be shown
//! in a dry run and sent to the backend.

/// Name of the ledger table
pub const LEDGER_TABLE: &str = "dbmigration";

/// Escape a SQL string literal value by doubling single quotes.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// `CREATE TABLE` for the ledger, parameterized by the backend's timestamp type
pub fn create_table_sql(timestamp_type: &str) -> String {
    format!(
        "CREATE TABLE {} (filename varchar(255), sha1 varchar(40), date {});",
        LEDGER_TABLE, timestamp_type
    )
}

/// Query returning `(filename, sha1)` rows ordered by filename
pub fn select_performed_sql() -> String {
    format!(
        "SELECT filename, sha1 FROM {} ORDER BY filename",
        LEDGER_TABLE
    )
}

/// Insert recording one applied migration; `now_expr` is the backend's current-timestamp expression
pub fn insert_sql(filename: &str, sha1: &str, now_expr: &str) -> String {
    format!(
        "INSERT INTO {} (filename, sha1, date) VALUES ('{}', '{}', {});",
        LEDGER_TABLE,
        escape_sql_string(filename),
        escape_sql_string(sha1),
        now_expr
    )
}

/// Update correcting the recorded filename of an unchanged migration
pub fn rename_sql(old_filename: &str, new_filename: &str, sha1: &str) -> String {
    format!(
        "UPDATE {} SET filename = '{}' WHERE filename = '{}' AND sha1 = '{}';",
        LEDGER_TABLE,
        escape_sql_string(new_filename),
        escape_sql_string(old_filename),
        escape_sql_string(sha1)
    )
}

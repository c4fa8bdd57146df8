//! Integration tests for migration runs against an in-memory DuckDB
//!
//! Fixture directories come in numbered pairs: the first is migrated, then
//! the second is migrated against the same database.

use mariposa_core::{CoreError, LedgerEntry};
use mariposa_db::{Database, DbError, DuckDbBackend};
use mariposa_engine::{EngineError, Ledger, MigrateOptions, MigrateReport, Migrator};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const CREATE_USER_TABLE: &str = "20120115075349-create-user-table.sql";
const CREATE_USER_TABLE_SHA1: &str = "0187aa5e13e268fc621c894a7ac4345579cf50b7";
const AWESOME: &str = "20120603133552-awesome.sql";
const AWESOME_SHA1: &str = "6759512e1e29b60a82b4a5587c5ea18e06b7d381";

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn memory_db() -> Arc<dyn Database> {
    Arc::new(DuckDbBackend::in_memory().unwrap())
}

fn migrator(db: &Arc<dyn Database>, directory: PathBuf) -> Migrator {
    Migrator::new(
        db.clone(),
        MigrateOptions {
            directory,
            ..Default::default()
        },
    )
}

async fn migrate(db: &Arc<dyn Database>, name: &str) -> Result<MigrateReport, EngineError> {
    migrator(db, fixture(name)).migrate().await
}

async fn ledger(db: &Arc<dyn Database>) -> Vec<LedgerEntry> {
    Ledger::new(db.as_ref()).performed().await.unwrap()
}

// ── Basic runs ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_initial_run_records_git_blob_digest() {
    let db = memory_db();
    let report = migrate(&db, "initial").await.unwrap();

    assert_eq!(report.applied, vec![CREATE_USER_TABLE]);
    assert!(report.warning.is_none());
    assert_eq!(
        ledger(&db).await,
        vec![LedgerEntry::new(CREATE_USER_TABLE, CREATE_USER_TABLE_SHA1)]
    );

    db.execute("INSERT INTO users (id, name) VALUES (1, 'a');")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_second_run_is_noop() {
    let db = memory_db();
    migrate(&db, "initial").await.unwrap();
    let before = ledger(&db).await;

    let report = migrate(&db, "initial").await.unwrap();

    assert!(report.applied.is_empty());
    assert!(report.plan.is_empty());
    assert!(report.reconciliation.is_up_to_date());
    assert_eq!(ledger(&db).await, before);
}

#[tokio::test]
async fn test_second_run_applies_only_new_migration() {
    let db = memory_db();
    migrate(&db, "initial").await.unwrap();

    let report = migrate(&db, "second-run").await.unwrap();

    assert_eq!(report.applied, vec![AWESOME]);
    assert_eq!(
        ledger(&db).await,
        vec![
            LedgerEntry::new(CREATE_USER_TABLE, CREATE_USER_TABLE_SHA1),
            LedgerEntry::new(AWESOME, AWESOME_SHA1),
        ]
    );
    db.execute("INSERT INTO users (id, name, email) VALUES (1, 'a', 'a@example.com');")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_directory_creates_ledger_only() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();

    let report = migrator(&db, dir.path().to_path_buf())
        .migrate()
        .await
        .unwrap();

    assert!(report.applied.is_empty());
    assert!(ledger(&db).await.is_empty());
}

#[tokio::test]
async fn test_missing_directory() {
    let db = memory_db();
    let err = migrate(&db, "does-not-exist").await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Core(CoreError::DirectoryNotFound { .. })
    ));
}

#[tokio::test]
async fn test_rejected_migration_is_sql_error() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("001-a.sql"), "CREATE TABLE users (id int);").unwrap();
    std::fs::write(dir.path().join("002-b.sql"), "CREATE TABLE users (id int);").unwrap();

    let err = migrator(&db, dir.path().to_path_buf())
        .migrate()
        .await
        .unwrap_err();

    assert!(
        matches!(err, EngineError::Db(DbError::SqlError(_))),
        "got {err:?}"
    );
    assert!(ledger(&db).await.is_empty());
}

// ── Policy failures ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_out_of_order_fails_without_flag() {
    let db = memory_db();
    migrate(&db, "out-of-order-1").await.unwrap();
    let before = ledger(&db).await;

    let err = migrate(&db, "out-of-order-2").await.unwrap_err();

    assert!(matches!(
        err,
        EngineError::Core(CoreError::OutOfOrder { .. })
    ));
    let message = err.to_string();
    assert!(message.contains("[20120114221757-before-initial.sql]"));
    assert!(message.contains("older than the latest performed migration"));
    assert_eq!(ledger(&db).await, before);
}

#[tokio::test]
async fn test_out_of_order_runs_with_flag() {
    let db = memory_db();
    migrate(&db, "out-of-order-1").await.unwrap();

    let report = Migrator::new(
        db.clone(),
        MigrateOptions {
            directory: fixture("out-of-order-2"),
            out_of_order: true,
            dry_run: false,
        },
    )
    .migrate()
    .await
    .unwrap();

    assert_eq!(report.applied, vec!["20120114221757-before-initial.sql"]);
    assert_eq!(
        report.warning.as_deref(),
        Some("Running [20120114221757-before-initial.sql] out of order.")
    );
    assert_eq!(
        ledger(&db).await,
        vec![
            LedgerEntry::new(
                "20120114221757-before-initial.sql",
                "f1354b2accf580fa72f594e919adfa7e9194c4f4"
            ),
            LedgerEntry::new(
                "20120115221757-initial.sql",
                "fe9de9e955a273cf84106cb0ffc3bd99e03564d5"
            ),
        ]
    );
}

#[tokio::test]
async fn test_modified_migration_fails_before_any_change() {
    let db = memory_db();
    migrate(&db, "modified-1").await.unwrap();
    let before = ledger(&db).await;

    let err = Migrator::new(
        db.clone(),
        MigrateOptions {
            directory: fixture("modified-2"),
            out_of_order: true,
            dry_run: false,
        },
    )
    .migrate()
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Core(CoreError::ModifiedMigration { .. })
    ));
    assert!(err
        .to_string()
        .contains("[20120115221757-initial.sql] migrations were modified"));
    assert_eq!(
        before,
        vec![LedgerEntry::new(
            "20120115221757-initial.sql",
            "5e9bb0601679f833aad2a366d659a2a964293d15"
        )]
    );
    assert_eq!(ledger(&db).await, before);
}

#[tokio::test]
async fn test_deleted_migration_fails() {
    let db = memory_db();
    migrate(&db, "deleted-1").await.unwrap();

    let err = migrate(&db, "deleted-2").await.unwrap_err();

    assert!(matches!(
        err,
        EngineError::Core(CoreError::DeletedMigration { .. })
    ));
    assert!(err
        .to_string()
        .contains("[20120115221757-initial.sql] migrations were deleted"));
    assert_eq!(ledger(&db).await.len(), 2);
}

// ── Renames ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_renamed_fixes_ledger_then_migrate_is_noop() {
    let db = memory_db();
    migrate(&db, "sha1-update-1").await.unwrap();

    let err = migrate(&db, "sha1-update-2").await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Core(CoreError::DeletedMigration { .. })
    ));

    let report = migrator(&db, fixture("sha1-update-2"))
        .renamed()
        .await
        .unwrap();
    assert_eq!(report.renames.len(), 1);
    assert_eq!(
        report.renames[0].old_filename,
        "20120115075400-add-another-test-table.sql"
    );
    assert_eq!(
        report.renames[0].new_filename,
        "20120115075300-add-another-test-table-renamed-reordered.sql"
    );

    let report = migrate(&db, "sha1-update-2").await.unwrap();
    assert!(report.applied.is_empty());
    assert_eq!(
        ledger(&db).await,
        vec![
            LedgerEntry::new(
                "20120115075300-add-another-test-table-renamed-reordered.sql",
                "da5f635ff904cf74b63d33b1913ff35731685ef5"
            ),
            LedgerEntry::new(CREATE_USER_TABLE, CREATE_USER_TABLE_SHA1),
        ]
    );
}

#[tokio::test]
async fn test_renamed_with_nothing_to_do() {
    let db = memory_db();
    migrate(&db, "initial").await.unwrap();

    let report = migrator(&db, fixture("initial")).renamed().await.unwrap();

    assert!(report.renames.is_empty());
    assert!(report.sql.is_none());
}

// ── Dry runs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dry_run_on_fresh_database() {
    let db = memory_db();
    let report = Migrator::new(
        db.clone(),
        MigrateOptions {
            directory: fixture("initial"),
            out_of_order: false,
            dry_run: true,
        },
    )
    .migrate()
    .await
    .unwrap();

    let expected = [
        "BEGIN;",
        "-- start filename: 20120115075349-create-user-table.sql sha1: 0187aa5e13e268fc621c894a7ac4345579cf50b7",
        "-- intentionally making this imperfect so it can be migrated",
        "CREATE TABLE users (",
        "  id int PRIMARY KEY,",
        "  name varchar(255),",
        "  password_sha1 varchar(40)",
        ");",
        "INSERT INTO dbmigration (filename, sha1, date) VALUES ('20120115075349-create-user-table.sql', '0187aa5e13e268fc621c894a7ac4345579cf50b7', current_timestamp);",
        "COMMIT;",
    ]
    .join("\n");

    assert!(report.dry_run);
    assert!(report.applied.is_empty());
    assert_eq!(report.rendered_plan(), expected);

    let err = Ledger::new(db.as_ref()).performed().await.unwrap_err();
    assert!(matches!(err, EngineError::Db(DbError::TableNotFound(_))));
}

#[tokio::test]
async fn test_dry_run_renders_pending_only() {
    let db = memory_db();
    migrate(&db, "initial").await.unwrap();
    let before = ledger(&db).await;

    let report = Migrator::new(
        db.clone(),
        MigrateOptions {
            directory: fixture("second-run"),
            out_of_order: false,
            dry_run: true,
        },
    )
    .migrate()
    .await
    .unwrap();

    let plan = report.rendered_plan();
    assert!(plan.contains(&format!(
        "-- start filename: {} sha1: {}",
        AWESOME, AWESOME_SHA1
    )));
    assert!(plan.contains("ALTER TABLE users ADD COLUMN email varchar(70);"));
    assert!(!plan.contains(CREATE_USER_TABLE));
    assert_eq!(ledger(&db).await, before);
}

#[tokio::test]
async fn test_dry_run_still_enforces_policy() {
    let db = memory_db();
    migrate(&db, "out-of-order-1").await.unwrap();

    let err = Migrator::new(
        db.clone(),
        MigrateOptions {
            directory: fixture("out-of-order-2"),
            out_of_order: false,
            dry_run: true,
        },
    )
    .migrate()
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Core(CoreError::OutOfOrder { .. })
    ));
}

// ── Command migrations ──────────────────────────────────────────────────

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
fn script_project(exit_code: i32) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("20121019152409-initial.sql"),
        "CREATE TABLE script_test (id int);",
    )
    .unwrap();
    write_script(
        dir.path(),
        "20121019152410-script.sh",
        &format!("#!/bin/sh\nexit {}\n", exit_code),
    );
    std::fs::write(
        dir.path().join("20121019152411-final.sql"),
        "INSERT INTO script_test VALUES (1);",
    )
    .unwrap();
    dir
}

#[cfg(unix)]
#[tokio::test]
async fn test_passing_script_is_recorded_in_order() {
    let db = memory_db();
    let dir = script_project(0);

    let report = migrator(&db, dir.path().to_path_buf())
        .migrate()
        .await
        .unwrap();

    assert_eq!(
        report.applied,
        vec![
            "20121019152409-initial.sql",
            "20121019152410-script.sh",
            "20121019152411-final.sql",
        ]
    );
    let names: Vec<String> = ledger(&db).await.into_iter().map(|e| e.filename).collect();
    assert_eq!(names, report.applied);
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_script_stops_run() {
    let db = memory_db();
    let dir = script_project(1);

    let err = migrator(&db, dir.path().to_path_buf())
        .migrate()
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::ExternalCommand { .. }));
    assert!(err.to_string().contains("20121019152410-script.sh"));

    let names: Vec<String> = ledger(&db).await.into_iter().map(|e| e.filename).collect();
    assert_eq!(names, vec!["20121019152409-initial.sql"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_dry_run_does_not_run_scripts() {
    let db = memory_db();
    let dir = script_project(1);

    let report = Migrator::new(
        db.clone(),
        MigrateOptions {
            directory: dir.path().to_path_buf(),
            out_of_order: false,
            dry_run: true,
        },
    )
    .migrate()
    .await
    .unwrap();

    let plan = report.rendered_plan();
    assert!(plan.contains(&format!(
        "-- command: {}",
        dir.path().join("20121019152410-script.sh").display()
    )));
    assert_eq!(plan.matches("BEGIN;").count(), 3);
}

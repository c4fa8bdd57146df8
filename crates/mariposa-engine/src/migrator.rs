//! Migration runs against one backend
//!
//! A run scans the directory, reads the ledger, reconciles the two, and
//! either renders the resulting plan (dry run) or executes it.

use crate::error::EngineResult;
use crate::executor::PlanExecutor;
use crate::ledger::Ledger;
use mariposa_core::{
    find_renames, rename_batch, scan_directory, ExecutionPlan, LedgerEntry, Reconciliation,
    Rename, Settings,
};
use mariposa_db::Database;
use std::path::PathBuf;
use std::sync::Arc;

/// Options for a migration run
#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    pub directory: PathBuf,
    pub out_of_order: bool,
    pub dry_run: bool,
}

impl From<&Settings> for MigrateOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            directory: settings.directory.clone(),
            out_of_order: settings.out_of_order,
            dry_run: settings.dry_run,
        }
    }
}

/// Result of [`Migrator::migrate`]
#[derive(Debug, Clone)]
pub struct MigrateReport {
    pub reconciliation: Reconciliation,
    pub plan: ExecutionPlan,
    /// Filenames committed to the ledger; always empty for a dry run
    pub applied: Vec<String>,
    /// Out-of-order warning, set only when out-of-order was allowed
    pub warning: Option<String>,
    pub dry_run: bool,
}

impl MigrateReport {
    /// Text of the plan as it would execute
    pub fn rendered_plan(&self) -> String {
        self.plan.render()
    }
}

/// Result of [`Migrator::renamed`]
#[derive(Debug, Clone)]
pub struct RenameReport {
    pub renames: Vec<Rename>,
    /// The `UPDATE` batch, when any renames were found
    pub sql: Option<String>,
    pub dry_run: bool,
}

pub struct Migrator {
    db: Arc<dyn Database>,
    options: MigrateOptions,
}

impl Migrator {
    pub fn new(db: Arc<dyn Database>, options: MigrateOptions) -> Self {
        Self { db, options }
    }

    /// Bring the database up to date with the migration directory.
    ///
    /// Modified, deleted, and (unless allowed) out-of-order migrations fail
    /// the run before anything is executed.
    pub async fn migrate(&self) -> EngineResult<MigrateReport> {
        let dir = &self.options.directory;
        let current = scan_directory(dir)?;
        log::debug!("Found {} migration(s) in {}", current.len(), dir.display());

        let performed = self.performed().await?;
        let reconciliation = Reconciliation::compute(&performed, &current);
        let warning = reconciliation.validate(self.options.out_of_order)?;

        let plan = ExecutionPlan::build(dir, &reconciliation.to_run, self.db.now_expression())?;

        let applied = if self.options.dry_run || plan.is_empty() {
            Vec::new()
        } else {
            PlanExecutor::new(self.db.as_ref()).execute(&plan).await?
        };

        Ok(MigrateReport {
            reconciliation,
            plan,
            applied,
            warning,
            dry_run: self.options.dry_run,
        })
    }

    /// Rewrite ledger filenames for migrations renamed on disk.
    pub async fn renamed(&self) -> EngineResult<RenameReport> {
        let current = scan_directory(&self.options.directory)?;
        let performed = self.performed().await?;

        let renames = find_renames(&performed, &current);
        let sql = rename_batch(&renames);

        if let Some(batch) = &sql {
            if self.options.dry_run {
                log::debug!("Dry run, not applying {} rename(s)", renames.len());
            } else {
                self.db.execute(batch).await?;
                for rename in &renames {
                    log::info!("Renamed {} to {}", rename.old_filename, rename.new_filename);
                }
            }
        }

        Ok(RenameReport {
            renames,
            sql,
            dry_run: self.options.dry_run,
        })
    }

    /// Ledger rows, creating the table first on a real run.
    ///
    /// A dry run never creates the table and reads a missing one as empty.
    async fn performed(&self) -> EngineResult<Vec<LedgerEntry>> {
        let ledger = Ledger::new(self.db.as_ref());
        if self.options.dry_run {
            ledger.performed_or_empty().await
        } else {
            ledger.ensure_table().await?;
            ledger.performed().await
        }
    }
}

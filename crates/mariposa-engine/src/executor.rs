//! Real execution of an [`ExecutionPlan`]
//!
//! Segments run strictly in order. A failure stops the run: the failing
//! transaction is rolled back by the backend, earlier committed segments
//! stay committed, and nothing after the failure is attempted.

use crate::error::{EngineError, EngineResult};
use mariposa_core::{transaction_batch, CommandUnit, ExecutionPlan, PlanSegment};
use mariposa_db::Database;
use tokio::process::Command;

/// Executes plan segments against one backend
pub struct PlanExecutor<'a> {
    db: &'a dyn Database,
}

impl<'a> PlanExecutor<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Run every segment and return the filenames recorded in the ledger,
    /// in the order they were committed.
    pub async fn execute(&self, plan: &ExecutionPlan) -> EngineResult<Vec<String>> {
        let mut applied = Vec::new();

        for segment in plan.segments() {
            match segment {
                PlanSegment::Transaction(units) => {
                    let files: Vec<&str> = units.iter().map(|u| u.filename.as_str()).collect();
                    log::debug!("Executing transaction for [{}]", files.join(","));
                    self.db.execute(&transaction_batch(&units)).await?;
                    for file in files {
                        log::info!("Applied {}", file);
                        applied.push(file.to_string());
                    }
                }
                PlanSegment::Command(cmd) => run_command(cmd).await?,
            }
        }

        Ok(applied)
    }
}

/// Run a command unit with inherited stdio and wait for it.
async fn run_command(cmd: &CommandUnit) -> EngineResult<()> {
    log::debug!("Running command {}", cmd.path.display());

    let status = Command::new(&cmd.path)
        .status()
        .await
        .map_err(|source| EngineError::CommandSpawn {
            filename: cmd.filename.clone(),
            source,
        })?;

    if !status.success() {
        return Err(EngineError::ExternalCommand {
            filename: cmd.filename.clone(),
            status: status.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;

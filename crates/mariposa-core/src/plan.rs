//! Execution plan building and rendering
//!
//! The plan is the ordered list of units produced from the to-run set. It is
//! rendered as text for a dry run and split into transaction segments for
//! real execution; both views come from the same units so a dry run shows
//! exactly what would be sent.

use crate::checksum::{blob_sha1, read_file};
use crate::error::{CoreError, CoreResult};
use crate::ledger::insert_sql;
use crate::migration::{MigrationDescriptor, MigrationKind};
use std::path::{Path, PathBuf};

/// Where a SQL unit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlUnitKind {
    /// Statements of a `.sql` migration plus its ledger insert
    Script,
    /// Ledger insert recording a command unit that already ran
    CommandRecord,
}

/// SQL text that runs inside a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlUnit {
    pub filename: String,
    pub sha1: String,
    pub kind: SqlUnitKind,
    /// Lines of SQL, joined with `\n` when sent
    pub lines: Vec<String>,
}

impl SqlUnit {
    pub fn sql(&self) -> String {
        self.lines.join("\n")
    }
}

/// External executable that must exit successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandUnit {
    pub filename: String,
    pub sha1: String,
    pub path: PathBuf,
}

impl CommandUnit {
    /// Marker and command lines shown in a rendered plan
    pub fn render(&self) -> String {
        format!(
            "{}\n-- command: {}",
            marker(&self.filename, &self.sha1),
            self.path.display()
        )
    }
}

/// One entry of the plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanUnit {
    Sql(SqlUnit),
    Command(CommandUnit),
}

/// Unit of real execution: a transaction or a single command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSegment<'a> {
    Transaction(Vec<&'a SqlUnit>),
    Command(&'a CommandUnit),
}

impl PlanSegment<'_> {
    /// Full `BEGIN; ... COMMIT;` batch for a transaction segment
    pub fn transaction_sql(&self) -> Option<String> {
        match self {
            PlanSegment::Transaction(units) => Some(transaction_batch(units)),
            PlanSegment::Command(_) => None,
        }
    }

    /// Filenames whose ledger rows this segment writes
    pub fn recorded_filenames(&self) -> Vec<&str> {
        match self {
            PlanSegment::Transaction(units) => units.iter().map(|u| u.filename.as_str()).collect(),
            PlanSegment::Command(_) => Vec::new(),
        }
    }

    fn render(&self) -> String {
        match self {
            PlanSegment::Transaction(units) => transaction_batch(units),
            PlanSegment::Command(cmd) => cmd.render(),
        }
    }
}

/// Wrap SQL units in a single `BEGIN; ... COMMIT;` batch
pub fn transaction_batch(units: &[&SqlUnit]) -> String {
    let mut lines = vec!["BEGIN;".to_string()];
    lines.extend(units.iter().map(|u| u.sql()));
    lines.push("COMMIT;".to_string());
    lines.join("\n")
}

/// Ordered, deterministic plan for a to-run set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub units: Vec<PlanUnit>,
}

/// Audit comment preceding every unit
pub fn marker(filename: &str, sha1: &str) -> String {
    format!("-- start filename: {} sha1: {}", filename, sha1)
}

impl ExecutionPlan {
    /// Build the plan for `to_run`, reading SQL files from `dir`.
    ///
    /// Units are ordered by filename regardless of input order. Each SQL file
    /// is re-hashed; a digest that no longer matches the descriptor fails the
    /// whole plan.
    pub fn build(dir: &Path, to_run: &[MigrationDescriptor], now_expr: &str) -> CoreResult<Self> {
        let mut ordered: Vec<&MigrationDescriptor> = to_run.iter().collect();
        ordered.sort_by(|a, b| a.filename.cmp(&b.filename));

        let mut units = Vec::with_capacity(ordered.len());
        for migration in ordered {
            let path = dir.join(&migration.filename);
            let insert = insert_sql(&migration.filename, &migration.sha1, now_expr);

            match migration.kind() {
                MigrationKind::Sql => {
                    let content = read_verified(&path, migration)?;
                    let mut lines = vec![marker(&migration.filename, &migration.sha1)];
                    lines.extend(content.lines().map(str::to_string));
                    lines.push(insert);
                    units.push(PlanUnit::Sql(SqlUnit {
                        filename: migration.filename.clone(),
                        sha1: migration.sha1.clone(),
                        kind: SqlUnitKind::Script,
                        lines,
                    }));
                }
                MigrationKind::Command => {
                    units.push(PlanUnit::Command(CommandUnit {
                        filename: migration.filename.clone(),
                        sha1: migration.sha1.clone(),
                        path,
                    }));
                    units.push(PlanUnit::Sql(SqlUnit {
                        filename: migration.filename.clone(),
                        sha1: migration.sha1.clone(),
                        kind: SqlUnitKind::CommandRecord,
                        lines: vec![insert],
                    }));
                }
            }
        }

        Ok(Self { units })
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Split the plan into execution segments.
    ///
    /// Consecutive script units share one transaction. A command closes the
    /// open transaction, and the ledger insert recording it is committed on
    /// its own right after the command succeeds.
    pub fn segments(&self) -> Vec<PlanSegment<'_>> {
        let mut segments = Vec::new();
        let mut pending: Vec<&SqlUnit> = Vec::new();

        for unit in &self.units {
            match unit {
                PlanUnit::Sql(sql) if sql.kind == SqlUnitKind::Script => pending.push(sql),
                PlanUnit::Sql(sql) => {
                    if !pending.is_empty() {
                        segments.push(PlanSegment::Transaction(std::mem::take(&mut pending)));
                    }
                    segments.push(PlanSegment::Transaction(vec![sql]));
                }
                PlanUnit::Command(cmd) => {
                    if !pending.is_empty() {
                        segments.push(PlanSegment::Transaction(std::mem::take(&mut pending)));
                    }
                    segments.push(PlanSegment::Command(cmd));
                }
            }
        }
        if !pending.is_empty() {
            segments.push(PlanSegment::Transaction(pending));
        }
        segments
    }

    /// Text of the whole plan as it would execute
    pub fn render(&self) -> String {
        self.segments()
            .iter()
            .map(PlanSegment::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Filenames in execution order, one per migration
    pub fn filenames(&self) -> Vec<&str> {
        self.units
            .iter()
            .filter_map(|u| match u {
                PlanUnit::Sql(sql) if sql.kind == SqlUnitKind::Script => Some(sql.filename.as_str()),
                PlanUnit::Sql(_) => None,
                PlanUnit::Command(cmd) => Some(cmd.filename.as_str()),
            })
            .collect()
    }
}

fn read_verified(path: &Path, migration: &MigrationDescriptor) -> CoreResult<String> {
    let bytes = read_file(path)?;
    let found = blob_sha1(&bytes);
    if found != migration.sha1 {
        return Err(CoreError::ChangedDuringRun {
            filename: migration.filename.clone(),
            expected: migration.sha1.clone(),
            found,
        });
    }
    String::from_utf8(bytes).map_err(|_| CoreError::InvalidUtf8 {
        path: path.display().to_string(),
    })
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;

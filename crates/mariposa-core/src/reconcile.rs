//! Reconciliation of on-disk migrations against the applied ledger
//!
//! [`Reconciliation::compute`] diffs the two sets by exact `(filename, sha1)`
//! pairs. [`Reconciliation::validate`] enforces the policy before anything is
//! executed: modified first, then deleted, then out-of-order.

use crate::error::{join_filenames, CoreError, CoreResult};
use crate::migration::{LedgerEntry, MigrationDescriptor};
use std::collections::BTreeSet;

/// Derived sets for one invocation. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Current migrations with no exactly matching ledger row, sorted by filename
    pub to_run: Vec<MigrationDescriptor>,

    /// Filenames in `to_run` that sort before the latest applied filename
    pub out_of_order: BTreeSet<String>,

    /// Applied filenames whose on-disk content no longer matches the ledger
    pub modified: BTreeSet<String>,

    /// Applied filenames that are no longer on disk
    pub deleted: BTreeSet<String>,

    /// Greatest applied filename, if anything was applied
    pub latest_performed: Option<String>,
}

impl Reconciliation {
    /// Diff the current on-disk set against the performed ledger entries
    pub fn compute(performed: &[LedgerEntry], current: &[MigrationDescriptor]) -> Self {
        let performed_pairs: BTreeSet<(&str, &str)> = performed
            .iter()
            .map(|e| (e.filename.as_str(), e.sha1.as_str()))
            .collect();
        let performed_names: BTreeSet<&str> =
            performed.iter().map(|e| e.filename.as_str()).collect();
        let current_names: BTreeSet<&str> = current.iter().map(|d| d.filename.as_str()).collect();

        let mut to_run: Vec<MigrationDescriptor> = current
            .iter()
            .filter(|d| !performed_pairs.contains(&(d.filename.as_str(), d.sha1.as_str())))
            .cloned()
            .collect();
        to_run.sort();
        to_run.dedup();

        let latest_performed = performed_names.iter().next_back().map(|s| s.to_string());

        let out_of_order = match &latest_performed {
            Some(latest) => to_run
                .iter()
                .filter(|d| d.filename.as_str() < latest.as_str())
                .map(|d| d.filename.clone())
                .collect(),
            None => BTreeSet::new(),
        };

        let modified = to_run
            .iter()
            .filter(|d| performed_names.contains(d.filename.as_str()))
            .map(|d| d.filename.clone())
            .collect();

        let deleted = performed_names
            .iter()
            .copied()
            .chain(to_run.iter().map(|d| d.filename.as_str()))
            .filter(|name| !current_names.contains(name))
            .map(str::to_string)
            .collect();

        Self {
            to_run,
            out_of_order,
            modified,
            deleted,
            latest_performed,
        }
    }

    /// Check the invariants that must hold before any execution.
    ///
    /// Modified and deleted migrations always fail. Out-of-order migrations
    /// fail unless `allow_out_of_order` is set, in which case a warning is
    /// logged and returned.
    pub fn validate(&self, allow_out_of_order: bool) -> CoreResult<Option<String>> {
        if !self.modified.is_empty() {
            return Err(CoreError::ModifiedMigration {
                files: join_filenames(self.modified.iter().map(String::as_str)),
            });
        }

        if !self.deleted.is_empty() {
            return Err(CoreError::DeletedMigration {
                files: join_filenames(self.deleted.iter().map(String::as_str)),
            });
        }

        if self.out_of_order.is_empty() {
            return Ok(None);
        }

        let files = join_filenames(self.out_of_order.iter().map(String::as_str));
        if !allow_out_of_order {
            return Err(CoreError::OutOfOrder { files });
        }

        let warning = format!("Running [{}] out of order.", files);
        log::warn!("{}", warning);
        Ok(Some(warning))
    }

    /// True when nothing needs to run
    pub fn is_up_to_date(&self) -> bool {
        self.to_run.is_empty()
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;

//! Ledger filename correction for renamed migrations
//!
//! When a migration file is renamed (usually to fix its position in the
//! order) without changing its content, the ledger still carries the old
//! name and reconciliation would report it as deleted. The rename scan
//! matches ledger rows to on-disk files by content hash and produces the
//! `UPDATE` statements that bring the ledger in line.

use crate::ledger::rename_sql;
use crate::migration::{LedgerEntry, MigrationDescriptor};
use std::collections::{BTreeMap, BTreeSet};

/// One ledger row whose filename should change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub old_filename: String,
    pub new_filename: String,
    pub sha1: String,
}

impl Rename {
    pub fn sql(&self) -> String {
        rename_sql(&self.old_filename, &self.new_filename, &self.sha1)
    }
}

/// Find ledger rows whose content now lives on disk under a different name.
///
/// A row `(old, sha1)` is renamed when `old` is no longer on disk with that
/// hash and exactly one on-disk file with the same hash is not itself
/// already recorded. Ambiguous matches are skipped with a warning.
pub fn find_renames(performed: &[LedgerEntry], current: &[MigrationDescriptor]) -> Vec<Rename> {
    let current_pairs: BTreeSet<(&str, &str)> = current
        .iter()
        .map(|d| (d.filename.as_str(), d.sha1.as_str()))
        .collect();
    let ledger_pairs: BTreeSet<(&str, &str)> = performed
        .iter()
        .map(|e| (e.filename.as_str(), e.sha1.as_str()))
        .collect();

    let mut by_hash: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for d in current {
        by_hash
            .entry(d.sha1.as_str())
            .or_default()
            .push(d.filename.as_str());
    }

    let mut claimed: BTreeSet<&str> = BTreeSet::new();
    let mut renames = Vec::new();

    for &(old, sha1) in &ledger_pairs {
        if current_pairs.contains(&(old, sha1)) {
            continue;
        }
        let Some(files) = by_hash.get(sha1) else {
            continue;
        };

        let candidates: Vec<&str> = files
            .iter()
            .copied()
            .filter(|f| !ledger_pairs.contains(&(*f, sha1)) && !claimed.contains(f))
            .collect();

        match candidates.as_slice() {
            [] => {}
            [new] => {
                claimed.insert(*new);
                renames.push(Rename {
                    old_filename: old.to_string(),
                    new_filename: new.to_string(),
                    sha1: sha1.to_string(),
                });
            }
            many => {
                log::warn!(
                    "Not renaming {}: sha1 {} matches several files [{}]",
                    old,
                    sha1,
                    many.join(",")
                );
            }
        }
    }

    renames
}

/// All-or-nothing batch applying the renames, or `None` when there are none
pub fn rename_batch(renames: &[Rename]) -> Option<String> {
    if renames.is_empty() {
        return None;
    }
    let mut lines = vec!["BEGIN;".to_string()];
    lines.extend(renames.iter().map(Rename::sql));
    lines.push("COMMIT;".to_string());
    Some(lines.join("\n"))
}

#[cfg(test)]
#[path = "rename_test.rs"]
mod tests;

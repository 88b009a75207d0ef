//! Reconciliation: heal the audit mirror from the authoritative tables
//!
//! - Registration log: append a row for every book whose catalog number
//!   has none. Existing rows are never touched.
//! - Issue log: rewritten to exactly the open loans. Stale rows left by a
//!   failed return rewrite go, rows lost to a failed issue append come back.
//! - Return log: compared as a multiset by natural key; only the missing
//!   occurrences are appended.
//!
//! The pass is idempotent: a second run finds nothing to do.

use super::CirculationLedger;
use serde::{Deserialize, Serialize};
use stacks_core::StacksResult;
use stacks_durability::audit::{AuditRow, IssueRow, RegistrationRow, ReturnRow};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::info;

/// What one reconciliation pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Rows appended to the registration log
    pub registrations_added: usize,
    /// Rows added to the issue log
    pub issues_added: usize,
    /// Rows removed from the issue log
    pub issues_removed: usize,
    /// Rows appended to the return log
    pub returns_added: usize,
}

impl ReconcileReport {
    /// True if the mirror already matched
    pub fn is_clean(&self) -> bool {
        *self == ReconcileReport::default()
    }
}

impl CirculationLedger {
    /// Bring the audit mirror in line with the authoritative tables
    ///
    /// Runs with every other ledger operation excluded. Without a mirror
    /// (ephemeral database) there is nothing to do and the report is empty.
    pub fn reconcile(&self) -> StacksResult<ReconcileReport> {
        let _gate = self.gate.write();
        let Some(mirror) = &self.mirror else {
            return Ok(ReconcileReport::default());
        };

        let mut report = ReconcileReport::default();

        let books = self.books()?;
        report.registrations_added = mirror.registrations().extend_with(|existing| {
            let logged: HashSet<String> = existing.iter().map(AuditRow::natural_key).collect();
            books
                .iter()
                .map(RegistrationRow::from)
                .filter(|row| !logged.contains(&row.natural_key()))
                .collect()
        })?;

        let wanted: Vec<IssueRow> = self.open_loans()?.iter().map(IssueRow::from).collect();
        let wanted_keys: BTreeSet<_> = wanted.iter().map(AuditRow::natural_key).collect();
        let (mut added, mut removed) = (0, 0);
        mirror.issues().rewrite_if(|existing| {
            let existing_keys: BTreeSet<_> = existing.iter().map(AuditRow::natural_key).collect();
            added = wanted_keys.difference(&existing_keys).count();
            // Open loans have distinct keys, so the log ends with wanted.len() rows
            removed = existing.len() + added - wanted.len();
            (added > 0 || removed > 0).then_some(wanted)
        })?;
        report.issues_added = added;
        report.issues_removed = removed;

        let records = self.returns()?;
        report.returns_added = mirror.returns().extend_with(|existing| {
            let mut logged: BTreeMap<_, usize> = BTreeMap::new();
            for row in existing {
                *logged.entry(row.natural_key()).or_default() += 1;
            }
            let mut missing = Vec::new();
            for record in &records {
                let row = ReturnRow::from(record);
                match logged.get_mut(&row.natural_key()) {
                    Some(count) if *count > 0 => *count -= 1,
                    _ => missing.push(row),
                }
            }
            missing
        })?;

        info!(
            target: "stacks::ledger",
            registrations_added = report.registrations_added,
            issues_added = report.issues_added,
            issues_removed = report.issues_removed,
            returns_added = report.returns_added,
            "Audit mirror reconciled"
        );
        Ok(report)
    }
}

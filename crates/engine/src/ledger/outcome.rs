//! Results of ledger operations that touch the audit mirror

use serde::{Deserialize, Serialize};

/// Whether the audit mirror caught up with an authoritative commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MirrorStatus {
    /// Every mirror write for the operation succeeded (or there is no mirror)
    Synced,
    /// The commit stands but at least one mirror write failed
    ///
    /// `reconcile()` closes the gap.
    Degraded {
        /// What failed, in order
        reason: String,
    },
}

impl MirrorStatus {
    /// Synced if `failures` is empty, otherwise Degraded with all of them
    pub fn from_failures(failures: Vec<String>) -> Self {
        if failures.is_empty() {
            MirrorStatus::Synced
        } else {
            MirrorStatus::Degraded {
                reason: failures.join("; "),
            }
        }
    }

    /// True for `Degraded`
    pub fn is_degraded(&self) -> bool {
        matches!(self, MirrorStatus::Degraded { .. })
    }
}

/// A committed ledger record plus the state of its audit mirror write
///
/// A `Degraded` mirror is still a success: the authoritative tables hold
/// `record` and will keep it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circulated<T> {
    /// What was committed
    pub record: T,
    /// Mirror outcome
    pub mirror: MirrorStatus,
}

impl<T> Circulated<T> {
    /// True if the mirror write failed
    pub fn is_degraded(&self) -> bool {
        self.mirror.is_degraded()
    }

    /// The degradation reason, if any
    pub fn warning(&self) -> Option<&str> {
        match &self.mirror {
            MirrorStatus::Synced => None,
            MirrorStatus::Degraded { reason } => Some(reason),
        }
    }

    /// Drop the mirror status
    pub fn into_record(self) -> T {
        self.record
    }
}

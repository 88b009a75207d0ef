//! Transaction validation for OCC
//!
//! Key rules:
//! - First-committer-wins based on READ-SET, not write-set
//! - A key read as absent is recorded at version 0; if anyone creates it
//!   before we commit, that is a conflict
//! - Blind writes (write without read) do NOT conflict
//!
//! Validation runs under the transaction manager's commit lock, so no
//! other commit can change a version between validation and apply. That
//! makes every committed ledger transaction serializable.

use crate::transaction::TransactionContext;
use stacks_core::error::{StacksError, StacksResult};
use stacks_core::traits::Storage;
use stacks_core::types::Key;
use std::collections::HashMap;

/// Types of conflicts that can occur during transaction validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// Key was read at one version but the current version differs
    ReadWriteConflict {
        /// The key that has a conflict
        key: Key,
        /// Version recorded in read_set when read
        read_version: u64,
        /// Current version in storage at validation time
        current_version: u64,
    },
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictType::ReadWriteConflict {
                key,
                read_version,
                current_version,
            } => write!(
                f,
                "{} read at version {}, now at {}",
                key, read_version, current_version
            ),
        }
    }
}

/// Result of transaction validation
///
/// A transaction commits only if is_valid() returns true.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// All conflicts detected during validation
    pub conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// Create a successful validation result (no conflicts)
    pub fn ok() -> Self {
        ValidationResult {
            conflicts: Vec::new(),
        }
    }

    /// Create a validation result with a single conflict
    pub fn conflict(conflict: ConflictType) -> Self {
        ValidationResult {
            conflicts: vec![conflict],
        }
    }

    /// Check if validation passed (no conflicts)
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.conflicts.extend(other.conflicts);
    }

    /// Get the number of conflicts
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// One-line summary naming the first conflict
    pub fn summary(&self) -> String {
        match self.conflicts.first() {
            None => "no conflicts".to_string(),
            Some(first) if self.conflicts.len() == 1 => first.to_string(),
            Some(first) => format!("{} (+{} more)", first, self.conflicts.len() - 1),
        }
    }
}

/// Validate the read-set against current storage state
///
/// For each key in read_set, check that the current version still matches
/// the version read. Absent keys are version 0.
///
/// # Errors
///
/// A storage failure aborts validation; the transaction must not commit.
pub fn validate_read_set<S: Storage + ?Sized>(
    read_set: &HashMap<Key, u64>,
    store: &S,
) -> StacksResult<ValidationResult> {
    let mut result = ValidationResult::ok();

    for (key, read_version) in read_set {
        let current_version = match store.get(key) {
            Ok(Some(row)) => row.version,
            Ok(None) => 0,
            Err(e) => {
                return Err(StacksError::internal(format!(
                    "storage error during read-set validation for {}: {}",
                    key, e
                )));
            }
        };

        if current_version != *read_version {
            result.conflicts.push(ConflictType::ReadWriteConflict {
                key: key.clone(),
                read_version: *read_version,
                current_version,
            });
        }
    }

    Ok(result)
}

/// Validate a whole transaction
pub fn validate_transaction<S: Storage + ?Sized>(
    txn: &TransactionContext,
    store: &S,
) -> StacksResult<ValidationResult> {
    validate_read_set(&txn.read_set, store)
}

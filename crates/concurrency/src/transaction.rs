//! Transaction context for OCC
//!
//! TransactionContext tracks all reads, writes and deletes of one ledger
//! transaction, enabling validation at commit time.
//!
//! Reads go straight to the store's latest committed state and record the
//! version observed. Writes and deletes are buffered until commit. Because
//! validation re-checks every recorded version under the commit lock, a
//! transaction that commits saw a state nobody changed before it landed.

use crate::validation::{validate_transaction, ValidationResult};
use crate::wal_writer::TransactionWALWriter;
use stacks_core::error::{StacksError, StacksResult};
use stacks_core::traits::Storage;
use stacks_core::types::{Key, Table};
use stacks_core::value::Row;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;

/// Error type for commit failures
///
/// - All-or-nothing commit: transaction either commits or aborts entirely
/// - First-committer-wins: conflicts are detected based on read-set
#[derive(Debug, Clone, Error)]
pub enum CommitError {
    /// Transaction aborted due to validation conflicts
    #[error("commit failed: {}", .0.summary())]
    ValidationFailed(ValidationResult),

    /// Transaction was not in correct state for commit
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Storage could not be read during validation
    #[error("validation error: {0}")]
    Storage(String),

    /// WAL write failed during commit
    ///
    /// Nothing was applied; the transaction is not durable.
    #[error("WAL error: {0}")]
    WALError(String),
}

impl From<CommitError> for StacksError {
    fn from(e: CommitError) -> Self {
        match e {
            CommitError::ValidationFailed(result) => StacksError::conflict(result.summary()),
            CommitError::InvalidState(msg) => StacksError::TransactionNotActive { state: msg },
            CommitError::Storage(msg) => StacksError::storage(msg),
            CommitError::WALError(msg) => StacksError::storage(format!("WAL error: {}", msg)),
        }
    }
}

/// Result of applying transaction writes to storage
///
/// All keys in a transaction get the same commit version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    /// Version assigned to all writes in this transaction
    pub commit_version: u64,
    /// Number of puts applied
    pub puts_applied: usize,
    /// Number of deletes applied
    pub deletes_applied: usize,
}

impl ApplyResult {
    /// Total number of operations applied
    pub fn total_operations(&self) -> usize {
        self.puts_applied + self.deletes_applied
    }
}

/// Status of a transaction in its lifecycle
///
/// State transitions:
/// - `Active` → `Validating` (begin commit)
/// - `Validating` → `Committed` (validation passed)
/// - `Validating` → `Aborted` (conflict detected)
/// - `Active` → `Aborted` (abort or error)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Transaction is executing, can read/write
    Active,
    /// Transaction is being validated for conflicts
    Validating,
    /// Transaction committed successfully
    Committed,
    /// Transaction was aborted
    Aborted {
        /// Human-readable reason for abort
        reason: String,
    },
}

/// One OCC transaction over the authoritative tables
///
/// # Lifecycle
///
/// 1. **BEGIN**: `TransactionManager::begin` or `TransactionContext::new`
/// 2. **READ/WRITE**: `get()`, `scan()`, `put()`, `delete()`
/// 3. **COMMIT**: `TransactionManager::commit` validates, logs and applies
pub struct TransactionContext {
    /// Unique transaction ID
    pub txn_id: u64,

    /// Keys read and the version observed (0 = absent)
    pub read_set: HashMap<Key, u64>,

    /// Buffered writes, applied at commit
    pub write_set: BTreeMap<Key, Row>,

    /// Buffered deletes, applied at commit
    pub delete_set: BTreeSet<Key>,

    /// Current transaction status
    pub status: TransactionStatus,

    store: Arc<dyn Storage>,
}

impl TransactionContext {
    /// Create a new transaction reading from `store`
    pub fn new(txn_id: u64, store: Arc<dyn Storage>) -> Self {
        TransactionContext {
            txn_id,
            read_set: HashMap::new(),
            write_set: BTreeMap::new(),
            delete_set: BTreeSet::new(),
            status: TransactionStatus::Active,
            store,
        }
    }

    // === Read Operations ===

    /// Get a row
    ///
    /// Read-your-writes: buffered writes and deletes of this transaction
    /// win and are not tracked. Otherwise the committed row is read and its
    /// version recorded in the read set (0 if absent).
    pub fn get(&mut self, key: &Key) -> StacksResult<Option<Row>> {
        self.ensure_active()?;

        if let Some(row) = self.write_set.get(key) {
            return Ok(Some(row.clone()));
        }
        if self.delete_set.contains(key) {
            return Ok(None);
        }

        match self.store.get(key)? {
            Some(versioned) => {
                self.read_set.entry(key.clone()).or_insert(versioned.version);
                Ok(Some(versioned.row))
            }
            None => {
                self.read_set.entry(key.clone()).or_insert(0);
                Ok(None)
            }
        }
    }

    /// Check if a key exists in the transaction's view (tracked like `get`)
    pub fn exists(&mut self, key: &Key) -> StacksResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Every row of a table as this transaction sees it, sorted by key
    ///
    /// Scans are NOT tracked in the read set. Use them for reporting and
    /// for work that is already exclusive at a higher level.
    pub fn scan(&self, table: Table) -> StacksResult<Vec<(Key, Row)>> {
        self.ensure_active()?;

        let mut rows: BTreeMap<Key, Row> = self
            .store
            .scan(table)?
            .into_iter()
            .filter(|(key, _)| !self.delete_set.contains(key))
            .map(|(key, versioned)| (key, versioned.row))
            .collect();
        for (key, row) in &self.write_set {
            if key.table == table {
                rows.insert(key.clone(), row.clone());
            }
        }
        Ok(rows.into_iter().collect())
    }

    /// Version recorded for a key, if it was read
    pub fn get_read_version(&self, key: &Key) -> Option<u64> {
        self.read_set.get(key).copied()
    }

    // === Write Operations ===

    /// Buffer a write
    ///
    /// # Errors
    ///
    /// Fails if the transaction is not active or the row does not belong
    /// in the key's table.
    pub fn put(&mut self, key: Key, row: Row) -> StacksResult<()> {
        self.ensure_active()?;
        if key.table != row.table() {
            return Err(StacksError::invalid_input(format!(
                "cannot put a {} row under {}",
                row.table(),
                key
            )));
        }
        self.delete_set.remove(&key);
        self.write_set.insert(key, row);
        Ok(())
    }

    /// Buffer a delete
    pub fn delete(&mut self, key: Key) -> StacksResult<()> {
        self.ensure_active()?;
        self.write_set.remove(&key);
        self.delete_set.insert(key);
        Ok(())
    }

    // === State ===

    /// Check if transaction is active
    pub fn is_active(&self) -> bool {
        matches!(self.status, TransactionStatus::Active)
    }

    /// Check if transaction committed
    pub fn is_committed(&self) -> bool {
        matches!(self.status, TransactionStatus::Committed)
    }

    /// Check if transaction aborted
    pub fn is_aborted(&self) -> bool {
        matches!(self.status, TransactionStatus::Aborted { .. })
    }

    /// Error unless the transaction is `Active`
    pub fn ensure_active(&self) -> StacksResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(StacksError::TransactionNotActive {
                state: format!("transaction {} is {:?}", self.txn_id, self.status),
            })
        }
    }

    /// Abort and discard buffered operations
    ///
    /// The read set is kept for diagnostics.
    pub fn mark_aborted(&mut self, reason: String) -> StacksResult<()> {
        match &self.status {
            TransactionStatus::Committed => Err(StacksError::TransactionNotActive {
                state: format!("transaction {} already committed", self.txn_id),
            }),
            TransactionStatus::Aborted { .. } => Err(StacksError::TransactionNotActive {
                state: format!("transaction {} already aborted", self.txn_id),
            }),
            _ => {
                self.status = TransactionStatus::Aborted { reason };
                self.write_set.clear();
                self.delete_set.clear();
                Ok(())
            }
        }
    }

    // === Commit Operation ===

    /// Validate against current storage and transition state
    ///
    /// Performs `Active → Validating → Committed`, or `→ Aborted` on
    /// conflict. Does not write anything; the manager does that.
    /// Callers must hold the commit lock.
    pub fn commit(&mut self) -> Result<(), CommitError> {
        if !self.is_active() {
            return Err(CommitError::InvalidState(format!(
                "cannot commit transaction {} from {:?}",
                self.txn_id, self.status
            )));
        }
        self.status = TransactionStatus::Validating;

        let result = match validate_transaction(self, self.store.as_ref()) {
            Ok(result) => result,
            Err(e) => {
                self.status = TransactionStatus::Aborted {
                    reason: e.to_string(),
                };
                return Err(CommitError::Storage(e.to_string()));
            }
        };

        if !result.is_valid() {
            self.status = TransactionStatus::Aborted {
                reason: format!("{} conflict(s) detected", result.conflict_count()),
            };
            return Err(CommitError::ValidationFailed(result));
        }

        self.status = TransactionStatus::Committed;
        Ok(())
    }

    /// Apply buffered writes and deletes, all stamped `commit_version`
    pub fn apply_writes(&self, commit_version: u64) -> StacksResult<ApplyResult> {
        if !self.is_committed() {
            return Err(StacksError::TransactionNotActive {
                state: format!(
                    "cannot apply writes: transaction {} is {:?}",
                    self.txn_id, self.status
                ),
            });
        }

        for (key, row) in &self.write_set {
            self.store
                .put_with_version(key.clone(), row.clone(), commit_version)?;
        }
        for key in &self.delete_set {
            self.store.delete_with_version(key, commit_version)?;
        }

        Ok(ApplyResult {
            commit_version,
            puts_applied: self.write_set.len(),
            deletes_applied: self.delete_set.len(),
        })
    }

    /// Stage every buffered operation into `wal_writer`
    pub fn write_to_wal(
        &self,
        wal_writer: &mut TransactionWALWriter<'_>,
        commit_version: u64,
    ) -> StacksResult<()> {
        if !self.is_committed() {
            return Err(StacksError::TransactionNotActive {
                state: format!(
                    "cannot write to WAL: transaction {} is {:?}",
                    self.txn_id, self.status
                ),
            });
        }
        for (key, row) in &self.write_set {
            wal_writer.write_put(key.clone(), row.clone(), commit_version);
        }
        for key in &self.delete_set {
            wal_writer.write_delete(key.clone(), commit_version);
        }
        Ok(())
    }

    // === Introspection ===

    /// Number of keys in the read set
    pub fn read_count(&self) -> usize {
        self.read_set.len()
    }

    /// Number of buffered writes
    pub fn write_count(&self) -> usize {
        self.write_set.len()
    }

    /// Number of buffered deletes
    pub fn delete_count(&self) -> usize {
        self.delete_set.len()
    }

    /// True if nothing is buffered
    pub fn is_read_only(&self) -> bool {
        self.write_set.is_empty() && self.delete_set.is_empty()
    }

    /// Reason for abort, if aborted
    pub fn abort_reason(&self) -> Option<&str> {
        match &self.status {
            TransactionStatus::Aborted { reason } => Some(reason),
            _ => None,
        }
    }
}

impl std::fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionContext")
            .field("txn_id", &self.txn_id)
            .field("status", &self.status)
            .field("reads", &self.read_set.len())
            .field("writes", &self.write_set.len())
            .field("deletes", &self.delete_set.len())
            .finish()
    }
}

//! Transaction manager for coordinating commit operations
//!
//! Provides atomic commit by orchestrating, under one commit lock:
//! 1. Validation (first-committer-wins)
//! 2. WAL writing (durability)
//! 3. Storage application (visibility)
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. take commit lock
//! 2. validate read set; IF conflicts: abort and return error
//! 3. IF read-only: done (no version, no WAL)
//! 4. allocate commit_version
//! 5. BeginTxn / Write / Delete / CommitTxn to WAL (DURABILITY POINT)
//! 6. apply writes to storage
//! 7. release lock, return commit_version
//! ```
//!
//! If a crash occurs before step 5 completes the transaction is not
//! durable and is discarded on recovery. After step 5 it is replayed.

use crate::transaction::{CommitError, TransactionContext, TransactionStatus};
use crate::wal_writer::TransactionWALWriter;
use parking_lot::Mutex;
use stacks_core::traits::Storage;
use stacks_durability::wal::WAL;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Manages transaction lifecycle and atomic commits
///
/// The global version counter is incremented once per writing
/// transaction. All keys in a transaction get the same commit version.
pub struct TransactionManager {
    version: AtomicU64,
    next_txn_id: AtomicU64,
    commit_lock: Mutex<()>,
}

impl TransactionManager {
    /// Create a new transaction manager
    ///
    /// # Arguments
    /// * `initial_version` - Starting version (typically from recovery's final_version)
    pub fn new(initial_version: u64) -> Self {
        Self::with_txn_id(initial_version, 0)
    }

    /// Create a new transaction manager with specific starting txn_id
    ///
    /// Used after recovery so new transactions never reuse an id already
    /// present in the WAL.
    pub fn with_txn_id(initial_version: u64, max_txn_id: u64) -> Self {
        TransactionManager {
            version: AtomicU64::new(initial_version),
            next_txn_id: AtomicU64::new(max_txn_id + 1),
            commit_lock: Mutex::new(()),
        }
    }

    /// Get current global version
    pub fn current_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Allocate next transaction ID
    pub fn next_txn_id(&self) -> u64 {
        self.next_txn_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Allocate next commit version
    pub fn allocate_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Begin a transaction over `store`
    pub fn begin(&self, store: Arc<dyn Storage>) -> TransactionContext {
        TransactionContext::new(self.next_txn_id(), store)
    }

    /// Commit a transaction atomically
    ///
    /// # Arguments
    /// * `txn` - Transaction to commit (must be Active)
    /// * `wal` - WAL for durability, `None` for an in-memory database
    ///
    /// # Returns
    /// - `Ok(commit_version)` on success; for a read-only transaction, the
    ///   current version
    /// - `Err(CommitError)` if validation fails or the WAL write fails
    pub fn commit(
        &self,
        txn: &mut TransactionContext,
        wal: Option<&WAL>,
    ) -> Result<u64, CommitError> {
        let _guard = self.commit_lock.lock();

        txn.commit()?;

        if txn.is_read_only() {
            return Ok(self.current_version());
        }

        let commit_version = self.allocate_version();

        if let Some(wal) = wal {
            let mut writer = TransactionWALWriter::new(wal, txn.txn_id);
            writer.write_begin();
            let staged = txn
                .write_to_wal(&mut writer, commit_version)
                .and_then(|_| writer.write_commit());
            if let Err(e) = staged {
                txn.status = TransactionStatus::Aborted {
                    reason: format!("WAL write failed: {}", e),
                };
                return Err(CommitError::WALError(e.to_string()));
            }
        }

        // DURABILITY POINT passed: WAL is authoritative from here on
        if let Err(e) = txn.apply_writes(commit_version) {
            tracing::error!(
                txn_id = txn.txn_id,
                commit_version,
                error = %e,
                "Storage application failed after WAL commit - will be recovered on restart"
            );
        }

        Ok(commit_version)
    }

    /// Explicitly abort a transaction
    ///
    /// Nothing is written to the WAL for aborted transactions.
    pub fn abort(
        &self,
        txn: &mut TransactionContext,
        reason: String,
    ) -> stacks_core::StacksResult<()> {
        txn.mark_aborted(reason)
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new(0)
    }
}

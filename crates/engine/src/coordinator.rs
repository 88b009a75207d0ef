//! Transaction coordinator for managing transaction lifecycle
//!
//! The TransactionCoordinator wraps TransactionManager and adds:
//! - Active transaction tracking
//! - Transaction metrics (started, committed, aborted, conflicts)
//! - Conversion of commit errors into `StacksError`

use stacks_concurrency::{CommitError, RecoveryResult, TransactionContext, TransactionManager};
use stacks_core::traits::Storage;
use stacks_core::StacksResult;
use stacks_durability::wal::WAL;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Transaction coordinator for the database
///
/// The metric counters use Relaxed ordering: they are observational only
/// and do not synchronize any other memory.
pub struct TransactionCoordinator {
    manager: TransactionManager,
    active_count: AtomicU64,
    total_started: AtomicU64,
    total_committed: AtomicU64,
    total_aborted: AtomicU64,
    total_conflicts: AtomicU64,
}

impl TransactionCoordinator {
    /// Create new coordinator with initial version
    pub fn new(initial_version: u64) -> Self {
        Self::from_manager(TransactionManager::new(initial_version))
    }

    /// Create coordinator from recovery result
    ///
    /// Both final_version and max_txn_id are restored so new transactions
    /// get fresh versions and ids.
    pub fn from_recovery(result: &RecoveryResult) -> Self {
        Self::from_manager(TransactionManager::with_txn_id(
            result.stats.final_version,
            result.stats.max_txn_id,
        ))
    }

    fn from_manager(manager: TransactionManager) -> Self {
        Self {
            manager,
            active_count: AtomicU64::new(0),
            total_started: AtomicU64::new(0),
            total_committed: AtomicU64::new(0),
            total_aborted: AtomicU64::new(0),
            total_conflicts: AtomicU64::new(0),
        }
    }

    /// Start a new transaction over `storage`
    pub fn start_transaction(&self, storage: Arc<dyn Storage>) -> TransactionContext {
        self.active_count.fetch_add(1, Ordering::Relaxed);
        self.total_started.fetch_add(1, Ordering::Relaxed);
        let txn = self.manager.begin(storage);
        debug!(target: "stacks::txn", txn_id = txn.txn_id, "Transaction started");
        txn
    }

    /// Commit a transaction through the concurrency layer
    ///
    /// # Arguments
    /// * `txn` - Transaction to commit (must be in Active state)
    /// * `wal` - Optional WAL for durability. `None` for ephemeral databases.
    pub fn commit(&self, txn: &mut TransactionContext, wal: Option<&WAL>) -> StacksResult<u64> {
        match self.manager.commit(txn, wal) {
            Ok(version) => {
                self.total_committed.fetch_add(1, Ordering::Relaxed);
                Ok(version)
            }
            Err(e) => {
                if matches!(e, CommitError::ValidationFailed(_)) {
                    self.total_conflicts.fetch_add(1, Ordering::Relaxed);
                }
                self.total_aborted.fetch_add(1, Ordering::Relaxed);
                Err(e.into())
            }
        }
    }

    /// Record an abort that happened before commit (closure error)
    pub fn record_abort(&self) {
        self.total_aborted.fetch_add(1, Ordering::Relaxed);
    }

    /// Mark a transaction as finished, committed or not
    pub fn finish(&self) {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
    }

    /// Current global version
    pub fn current_version(&self) -> u64 {
        self.manager.current_version()
    }

    /// Number of transactions currently in flight
    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::Relaxed)
    }

    /// Snapshot of the counters
    pub fn metrics(&self) -> TransactionMetrics {
        let committed = self.total_committed.load(Ordering::Relaxed);
        let aborted = self.total_aborted.load(Ordering::Relaxed);
        let finished = committed + aborted;
        TransactionMetrics {
            active_count: self.active_count.load(Ordering::Relaxed),
            total_started: self.total_started.load(Ordering::Relaxed),
            total_committed: committed,
            total_aborted: aborted,
            total_conflicts: self.total_conflicts.load(Ordering::Relaxed),
            commit_rate: if finished == 0 {
                0.0
            } else {
                committed as f64 / finished as f64
            },
        }
    }
}

/// Transaction metrics for observability
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionMetrics {
    /// Transactions currently in flight
    pub active_count: u64,
    /// Transactions started since open
    pub total_started: u64,
    /// Transactions committed since open
    pub total_committed: u64,
    /// Transactions aborted since open (conflicts included)
    pub total_aborted: u64,
    /// Aborts caused by read-set validation
    pub total_conflicts: u64,
    /// committed / (committed + aborted)
    pub commit_rate: f64,
}

//! Recovery of committed state from the WAL
//!
//! - Replays do NOT re-run conflict detection
//! - Replays apply commit decisions, not re-execute logic
//! - Versions are preserved exactly
//!
//! ## Recovery Procedure
//!
//! 1. Open WAL, cut off a torn final frame, read every intact frame
//! 2. Group entries between BeginTxn and CommitTxn
//! 3. Apply COMPLETE transactions in WAL order
//! 4. DISCARD incomplete transactions
//! 5. Initialize TransactionManager with final version and max txn_id
//!
//! Commits are serialized by the manager's commit lock, so the entries of
//! one transaction are always contiguous in the log. A BeginTxn that shows
//! up while another transaction is still open means the earlier one never
//! reached its CommitTxn.

use crate::TransactionManager;
use stacks_core::error::{StacksError, StacksResult};
use stacks_core::types::Key;
use stacks_core::value::Row;
use stacks_durability::wal::{DurabilityMode, WalEntry, WAL};
use stacks_storage::ShardedStore;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Coordinates database recovery after crash or restart
pub struct RecoveryCoordinator {
    wal_path: PathBuf,
}

impl RecoveryCoordinator {
    /// Create a new recovery coordinator for the WAL at `wal_path`
    pub fn new(wal_path: PathBuf) -> Self {
        RecoveryCoordinator { wal_path }
    }

    /// Perform recovery and return initialized components
    ///
    /// A missing WAL recovers to an empty store at version 0.
    ///
    /// # Errors
    /// - If the WAL cannot be opened or is corrupt before its final frame
    /// - If a recovered write targets the wrong table
    pub fn recover(&self) -> StacksResult<RecoveryResult> {
        let wal = WAL::open(&self.wal_path, DurabilityMode::Always)?;
        wal.truncate_torn_tail()?;
        let entries = wal.read_all()?;
        drop(wal);

        let storage = ShardedStore::new();
        let mut stats = RecoveryStats::default();
        let mut open: Option<PendingTxn> = None;

        for entry in entries {
            match entry {
                WalEntry::BeginTxn { txn_id } => {
                    stats.max_txn_id = stats.max_txn_id.max(txn_id);
                    if let Some(prev) = open.take() {
                        warn!(txn_id = prev.txn_id, "Discarding transaction without CommitTxn");
                        stats.incomplete_txns += 1;
                    }
                    open = Some(PendingTxn::new(txn_id));
                }
                WalEntry::Write { key, row, version } => match open.as_mut() {
                    Some(txn) => txn.writes.push((key, row, version)),
                    None => {
                        return Err(StacksError::corruption(format!(
                            "write to {} outside any transaction",
                            key
                        )))
                    }
                },
                WalEntry::Delete { key, version } => match open.as_mut() {
                    Some(txn) => txn.deletes.push((key, version)),
                    None => {
                        return Err(StacksError::corruption(format!(
                            "delete of {} outside any transaction",
                            key
                        )))
                    }
                },
                WalEntry::CommitTxn { txn_id } => match open.take() {
                    Some(txn) if txn.txn_id == txn_id => {
                        txn.apply(&storage, &mut stats)?;
                    }
                    _ => {
                        return Err(StacksError::corruption(format!(
                            "CommitTxn {} without matching BeginTxn",
                            txn_id
                        )))
                    }
                },
            }
        }

        if let Some(txn) = open {
            warn!(txn_id = txn.txn_id, "Discarding transaction without CommitTxn");
            stats.incomplete_txns += 1;
        }

        storage.set_version(stats.final_version);
        let txn_manager = TransactionManager::with_txn_id(stats.final_version, stats.max_txn_id);

        debug!(
            txns = stats.txns_replayed,
            incomplete = stats.incomplete_txns,
            version = stats.final_version,
            "WAL replay finished"
        );

        Ok(RecoveryResult {
            storage,
            txn_manager,
            stats,
        })
    }
}

struct PendingTxn {
    txn_id: u64,
    writes: Vec<(Key, Row, u64)>,
    deletes: Vec<(Key, u64)>,
}

impl PendingTxn {
    fn new(txn_id: u64) -> Self {
        PendingTxn {
            txn_id,
            writes: Vec::new(),
            deletes: Vec::new(),
        }
    }

    fn apply(self, storage: &ShardedStore, stats: &mut RecoveryStats) -> StacksResult<()> {
        let version = self
            .writes
            .iter()
            .map(|(_, _, v)| *v)
            .chain(self.deletes.iter().map(|(_, v)| *v))
            .max()
            .unwrap_or(0);

        let puts: Vec<(Key, Row)> = self.writes.into_iter().map(|(k, r, _)| (k, r)).collect();
        let deletes: Vec<Key> = self.deletes.into_iter().map(|(k, _)| k).collect();
        storage.apply_batch(&puts, &deletes, version)?;

        stats.txns_replayed += 1;
        stats.writes_applied += puts.len();
        stats.deletes_applied += deletes.len();
        stats.final_version = stats.final_version.max(version);
        Ok(())
    }
}

/// Result of recovery operation
pub struct RecoveryResult {
    /// Recovered storage
    pub storage: ShardedStore,
    /// Manager initialized past every recovered version and txn_id
    pub txn_manager: TransactionManager,
    /// Replay statistics
    pub stats: RecoveryStats,
}

/// Statistics from recovery
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecoveryStats {
    /// Committed transactions applied
    pub txns_replayed: usize,
    /// Transactions discarded for lack of CommitTxn
    pub incomplete_txns: usize,
    /// Write entries applied
    pub writes_applied: usize,
    /// Delete entries applied
    pub deletes_applied: usize,
    /// Highest commit version seen
    pub final_version: u64,
    /// Highest transaction id seen, committed or not
    pub max_txn_id: u64,
}

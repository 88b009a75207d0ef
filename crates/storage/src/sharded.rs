//! Sharded table storage
//!
//! DashMap keyed by `Table`, FxHashMap within each shard.
//!
//! # Design
//!
//! - DashMap: one shard per table, so book lookups never contend with
//!   loan or return scans
//! - FxHashMap: O(1) lookups, fast non-crypto hash
//! - Latest row only: the concurrency layer validates read versions at
//!   commit, so older versions are never read and are not kept
//!
//! # Version Handling
//!
//! Versions are assigned by the transaction manager. The store records the
//! version each row was written at and tracks the highest version applied
//! so recovery can resume the counter.

use dashmap::DashMap;
use rustc_hash::FxHashMap;
use stacks_core::error::{StacksError, StacksResult};
use stacks_core::traits::Storage;
use stacks_core::types::{Key, Table};
use stacks_core::value::{Row, VersionedRow};
use std::sync::atomic::{AtomicU64, Ordering};

/// Rows of a single table
#[derive(Debug, Default)]
pub struct Shard {
    pub(crate) data: FxHashMap<Key, VersionedRow>,
}

impl Shard {
    /// Create a new empty shard
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in this shard
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if shard is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Sharded storage - DashMap by Table, HashMap within
///
/// # Thread Safety
///
/// All operations are thread-safe:
/// - get(): read guard on one table's shard
/// - put(): only locks the target table's shard
///
/// Cross-table atomicity is NOT provided here; the commit lock in the
/// transaction manager makes each commit's batch appear as a unit.
pub struct ShardedStore {
    shards: DashMap<Table, Shard>,
    version: AtomicU64,
}

impl ShardedStore {
    /// Create new sharded store with an empty shard per table
    pub fn new() -> Self {
        let shards = DashMap::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            shards.insert(table, Shard::new());
        }
        Self {
            shards,
            version: AtomicU64::new(0),
        }
    }

    /// Get current version
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Set version (used during recovery)
    pub fn set_version(&self, version: u64) {
        self.version.store(version, Ordering::Release);
    }

    /// Get total number of rows across all tables
    pub fn total_entries(&self) -> usize {
        self.shards.iter().map(|entry| entry.value().len()).sum()
    }

    /// Check if a key exists
    #[inline]
    pub fn contains(&self, key: &Key) -> bool {
        self.shards
            .get(&key.table)
            .map(|shard| shard.data.contains_key(key))
            .unwrap_or(false)
    }

    // ========================================================================
    // Batch Apply
    // ========================================================================

    /// Apply one commit's writes and deletes, all stamped with `version`
    ///
    /// # Errors
    ///
    /// Fails before touching anything if a row does not belong in its
    /// key's table.
    pub fn apply_batch(
        &self,
        writes: &[(Key, Row)],
        deletes: &[Key],
        version: u64,
    ) -> StacksResult<()> {
        for (key, row) in writes {
            check_table(key, row)?;
        }
        for (key, row) in writes {
            self.insert(key.clone(), VersionedRow::new(row.clone(), version));
        }
        for key in deletes {
            self.remove(key);
        }
        self.version.fetch_max(version, Ordering::AcqRel);
        Ok(())
    }

    fn insert(&self, key: Key, row: VersionedRow) {
        let mut shard = self.shards.entry(key.table).or_default();
        shard.data.insert(key, row);
    }

    fn remove(&self, key: &Key) -> Option<VersionedRow> {
        self.shards
            .get_mut(&key.table)
            .and_then(|mut shard| shard.data.remove(key))
    }
}

fn check_table(key: &Key, row: &Row) -> StacksResult<()> {
    if key.table != row.table() {
        return Err(StacksError::storage(format!(
            "row for table {} cannot be stored under key {}",
            row.table(),
            key
        )));
    }
    Ok(())
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShardedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedStore")
            .field("total_entries", &self.total_entries())
            .field("version", &self.version())
            .finish()
    }
}

// ============================================================================
// Storage Trait Implementation
// ============================================================================

impl Storage for ShardedStore {
    fn get(&self, key: &Key) -> StacksResult<Option<VersionedRow>> {
        Ok(self
            .shards
            .get(&key.table)
            .and_then(|shard| shard.data.get(key).cloned()))
    }

    fn scan(&self, table: Table) -> StacksResult<Vec<(Key, VersionedRow)>> {
        let mut rows: Vec<(Key, VersionedRow)> = self
            .shards
            .get(&table)
            .map(|shard| {
                shard
                    .data
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(rows)
    }

    fn count(&self, table: Table) -> usize {
        self.shards.get(&table).map(|shard| shard.len()).unwrap_or(0)
    }

    fn current_version(&self) -> u64 {
        self.version()
    }

    fn put_with_version(&self, key: Key, row: Row, version: u64) -> StacksResult<()> {
        check_table(&key, &row)?;
        self.insert(key, VersionedRow::new(row, version));
        self.version.fetch_max(version, Ordering::AcqRel);
        Ok(())
    }

    fn delete_with_version(&self, key: &Key, version: u64) -> StacksResult<Option<VersionedRow>> {
        let removed = self.remove(key);
        self.version.fetch_max(version, Ordering::AcqRel);
        Ok(removed)
    }
}

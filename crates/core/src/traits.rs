//! Core storage trait
//!
//! This module defines the Storage trait that lets the concurrency layer
//! commit against any table store without depending on its implementation.

use crate::error::StacksResult;
use crate::types::{Key, Table};
use crate::value::{Row, VersionedRow};

/// Storage abstraction for the authoritative tables
///
/// The store keeps the latest committed row for every key. Versions are
/// assigned by the transaction manager, not by the store: every row
/// written by one commit carries that commit's version.
///
/// Thread safety: All methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait Storage: Send + Sync {
    /// Get the latest committed row for key
    ///
    /// Returns None if the key doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, key: &Key) -> StacksResult<Option<VersionedRow>>;

    /// Scan every row of a table
    ///
    /// Returns rows sorted by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn scan(&self, table: Table) -> StacksResult<Vec<(Key, VersionedRow)>>;

    /// Number of rows in a table
    fn count(&self, table: Table) -> usize;

    /// Get current global version
    ///
    /// Returns the highest version applied so far, 0 if nothing was
    /// written yet.
    fn current_version(&self) -> u64;

    /// Put a row with a specific version
    ///
    /// Used by the commit path and by WAL replay. The row's table must
    /// match the key's table.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not belong in the key's table.
    fn put_with_version(&self, key: Key, row: Row, version: u64) -> StacksResult<()>;

    /// Delete a key as part of the commit stamped `version`
    ///
    /// Returns the removed row, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn delete_with_version(&self, key: &Key, version: u64) -> StacksResult<Option<VersionedRow>>;
}

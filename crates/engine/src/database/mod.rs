//! Database struct and open/close logic
//!
//! This module provides the main Database struct that orchestrates:
//! - Storage initialization
//! - WAL opening
//! - Automatic recovery on startup
//! - Transaction API
//!
//! ## Transaction API
//!
//! 1. **Closure API**: `db.transaction(|txn| { ... })`
//!    - Commit on success, abort on error
//!    - Returns the closure's return value
//!
//! 2. **Retry API**: `db.transaction_with_retry(config, |txn| { ... })`
//!    - Re-runs the closure on commit conflicts only
//!
//! 3. **Manual API**: `begin_transaction()` + `commit_transaction()`

pub mod config;
mod transactions;

pub use config::{StacksConfig, CONFIG_FILE_NAME};
pub use transactions::RetryConfig;

use crate::coordinator::{TransactionCoordinator, TransactionMetrics};
use stacks_concurrency::{RecoveryCoordinator, RecoveryStats, TransactionContext};
use stacks_core::{StacksError, StacksResult};
use stacks_durability::wal::{DurabilityMode, WAL};
use stacks_storage::ShardedStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// File name of the write-ahead log inside the data directory
pub const WAL_FILE_NAME: &str = "stacks.wal";

/// Lock file guarding the data directory against a second process
pub const LOCK_FILE_NAME: &str = ".lock";

/// Main database struct with transaction support
///
/// Orchestrates storage, WAL, recovery, and transactions.
///
/// # Example
///
/// ```text
/// use stacks_engine::Database;
///
/// let db = Database::open("/path/to/data")?;
/// let count = db.transaction(|txn| {
///     Ok(txn.scan(Table::Books)?.len())
/// })?;
/// ```
pub struct Database {
    /// Data directory path (empty for ephemeral databases)
    data_dir: PathBuf,
    /// Authoritative tables
    storage: Arc<ShardedStore>,
    /// `None` for ephemeral databases
    wal: Option<WAL>,
    coordinator: TransactionCoordinator,
    config: StacksConfig,
    recovery: RecoveryStats,
    /// Held for the lifetime of the database; dropping it releases the lock
    _lock_file: Option<std::fs::File>,
}

impl Database {
    /// Open database at the given path
    ///
    /// Reads `stacks.toml` from the data directory, writing the default
    /// file first if there is none.
    ///
    /// # Errors
    ///
    /// If config is invalid, or directory creation, locking, WAL opening
    /// or recovery fails.
    pub fn open<P: AsRef<Path>>(path: P) -> StacksResult<Arc<Self>> {
        let data_dir = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let config_path = data_dir.join(CONFIG_FILE_NAME);
        StacksConfig::write_default_if_missing(&config_path)?;
        let cfg = StacksConfig::from_file(&config_path)?;

        Self::open_inner(data_dir, cfg)
    }

    /// Open database at the given path with an explicit configuration
    ///
    /// The supplied config is written to `stacks.toml` so later `open()`
    /// calls pick up the same settings.
    pub fn open_with_config<P: AsRef<Path>>(path: P, cfg: StacksConfig) -> StacksResult<Arc<Self>> {
        cfg.validate()?;
        let data_dir = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        cfg.write_to_file(&data_dir.join(CONFIG_FILE_NAME))?;
        Self::open_inner(data_dir, cfg)
    }

    fn open_inner(data_dir: PathBuf, cfg: StacksConfig) -> StacksResult<Arc<Self>> {
        let mode = cfg.durability_mode()?;
        let canonical_path = data_dir.canonicalize()?;

        // A second process appending to the same WAL would interleave frames
        let lock_path = canonical_path.join(LOCK_FILE_NAME);
        let lock_file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StacksError::storage(format!("failed to open lock file: {}", e)))?;
        fs2::FileExt::try_lock_exclusive(&lock_file).map_err(|_| {
            StacksError::storage(format!(
                "database at '{}' is already in use",
                canonical_path.display()
            ))
        })?;

        let wal_path = canonical_path.join(WAL_FILE_NAME);
        let result = RecoveryCoordinator::new(wal_path.clone()).recover()?;

        info!(
            target: "stacks::db",
            path = %canonical_path.display(),
            txns_replayed = result.stats.txns_replayed,
            incomplete_txns = result.stats.incomplete_txns,
            writes_applied = result.stats.writes_applied,
            deletes_applied = result.stats.deletes_applied,
            final_version = result.stats.final_version,
            "Recovery complete"
        );

        let wal = WAL::open(&wal_path, mode)?;
        let coordinator = TransactionCoordinator::from_recovery(&result);

        Ok(Arc::new(Self {
            data_dir: canonical_path,
            storage: Arc::new(result.storage),
            wal: Some(wal),
            coordinator,
            config: cfg,
            recovery: result.stats,
            _lock_file: Some(lock_file),
        }))
    }

    /// Create an in-memory database with no files at all
    ///
    /// Nothing survives the drop. There is no WAL, no lock and no audit
    /// directory.
    pub fn ephemeral() -> Arc<Self> {
        Self::ephemeral_with_config(StacksConfig::default())
    }

    /// In-memory database with the given retry policy and settings
    pub fn ephemeral_with_config(cfg: StacksConfig) -> Arc<Self> {
        Arc::new(Self {
            data_dir: PathBuf::new(),
            storage: Arc::new(ShardedStore::new()),
            wal: None,
            coordinator: TransactionCoordinator::new(0),
            config: cfg,
            recovery: RecoveryStats::default(),
            _lock_file: None,
        })
    }

    /// True if the database has no backing files
    pub fn is_ephemeral(&self) -> bool {
        self.wal.is_none()
    }

    /// Data directory (empty for ephemeral databases)
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory of the audit CSV files, `None` for ephemeral databases
    pub fn audit_dir(&self) -> Option<PathBuf> {
        if self.is_ephemeral() {
            None
        } else {
            Some(self.data_dir.join(&self.config.audit_dir))
        }
    }

    /// Configuration this database was opened with
    pub fn config(&self) -> &StacksConfig {
        &self.config
    }

    /// Durability mode of the WAL (`None` for ephemeral databases)
    pub fn durability_mode(&self) -> Option<DurabilityMode> {
        self.wal.as_ref().map(WAL::durability_mode)
    }

    /// What recovery found when this database was opened
    pub fn recovery_stats(&self) -> &RecoveryStats {
        &self.recovery
    }

    /// Authoritative tables, for reads outside a transaction
    pub fn storage(&self) -> &Arc<ShardedStore> {
        &self.storage
    }

    /// Current global commit version
    pub fn current_version(&self) -> u64 {
        self.coordinator.current_version()
    }

    /// Transaction counters since open
    pub fn metrics(&self) -> TransactionMetrics {
        self.coordinator.metrics()
    }

    /// Force the WAL to disk
    pub fn flush(&self) -> StacksResult<()> {
        match &self.wal {
            Some(wal) => wal.fsync(),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Transaction API
    // ========================================================================

    /// Execute a transaction with the given closure
    ///
    /// - Creates a TransactionContext
    /// - Executes closure with transaction
    /// - Validates and commits on success
    /// - Aborts on error
    ///
    /// # Example
    /// ```text
    /// let result = db.transaction(|txn| {
    ///     let row = txn.get(&key)?;
    ///     txn.put(key, new_row)?;
    ///     Ok(row)
    /// })?;
    /// ```
    pub fn transaction<F, T>(&self, f: F) -> StacksResult<T>
    where
        F: FnOnce(&mut TransactionContext) -> StacksResult<T>,
    {
        let mut txn = self.begin_transaction();
        let result = f(&mut txn);
        let outcome = self.run_single_attempt(&mut txn, result);
        self.coordinator.finish();
        outcome
    }

    /// Execute a transaction with automatic retry on conflict
    ///
    /// The closure is called repeatedly until either:
    /// - The transaction commits successfully
    /// - A non-conflict error occurs (not retried)
    /// - Maximum retries are exceeded
    ///
    /// The closure must be `Fn`: each attempt starts from a fresh
    /// transaction and reads committed state again.
    pub fn transaction_with_retry<F, T>(&self, config: &RetryConfig, f: F) -> StacksResult<T>
    where
        F: Fn(&mut TransactionContext) -> StacksResult<T>,
    {
        let mut attempt = 0;
        loop {
            let mut txn = self.begin_transaction();
            let result = f(&mut txn);
            let outcome = self.run_single_attempt(&mut txn, result);
            self.coordinator.finish();

            match outcome {
                Err(e) if e.is_conflict() && attempt < config.max_retries => {
                    let delay = config.calculate_delay(attempt);
                    debug!(
                        target: "stacks::txn",
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying after conflict"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// Begin a new transaction (for manual control)
    ///
    /// Must be finished with `commit_transaction()`.
    pub fn begin_transaction(&self) -> TransactionContext {
        self.coordinator.start_transaction(self.storage.clone())
    }

    /// Commit a transaction started with `begin_transaction()`
    ///
    /// # Returns
    /// * `Ok(commit_version)` - Version stamped on every write
    /// * `Err(Conflict)` - Validation failed, transaction aborted
    pub fn commit_transaction(&self, txn: &mut TransactionContext) -> StacksResult<u64> {
        let outcome = self.coordinator.commit(txn, self.wal.as_ref());
        self.coordinator.finish();
        outcome
    }

    fn run_single_attempt<T>(
        &self,
        txn: &mut TransactionContext,
        result: StacksResult<T>,
    ) -> StacksResult<T> {
        match result {
            Ok(value) => {
                self.coordinator.commit(txn, self.wal.as_ref())?;
                Ok(value)
            }
            Err(e) => {
                let _ = txn.mark_aborted(format!("Closure error: {}", e));
                self.coordinator.record_abort();
                Err(e)
            }
        }
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("data_dir", &self.data_dir)
            .field("ephemeral", &self.is_ephemeral())
            .field("version", &self.current_version())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

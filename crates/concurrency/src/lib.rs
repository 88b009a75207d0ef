//! Concurrency layer for Stacks
//!
//! This crate implements optimistic concurrency control (OCC) with:
//! - TransactionContext: read/write set tracking with read-your-writes
//! - Conflict detection at commit time (read-set version validation)
//! - TransactionManager: commit lock, version allocation, WAL, apply
//! - RecoveryCoordinator: rebuild the tables from the WAL on open

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod recovery;
pub mod transaction;
pub mod validation;
pub mod wal_writer;

pub use manager::TransactionManager;
pub use recovery::{RecoveryCoordinator, RecoveryResult, RecoveryStats};
pub use transaction::{ApplyResult, CommitError, TransactionContext, TransactionStatus};
pub use validation::{validate_read_set, ConflictType, ValidationResult};
pub use wal_writer::TransactionWALWriter;

//! Database engine for Stacks
//!
//! This crate orchestrates all lower layers:
//! - Database: open/recover/close, config file, directory lock
//! - Transaction coordination with retry on conflict
//! - CirculationLedger: register, issue, return, queries and audit mirror
//!   reconciliation
//!
//! The engine is the only component that knows about:
//! - Cross-layer coordination (storage + WAL + recovery)
//! - The audit mirror's relationship to the authoritative tables

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coordinator;
pub mod database;
pub mod ledger;

pub use coordinator::{TransactionCoordinator, TransactionMetrics};
pub use database::{Database, RetryConfig, StacksConfig};
pub use ledger::{
    AnyBorrower, BorrowerDirectory, CirculationLedger, Circulated, InMemoryBorrowerDirectory,
    IssueError, IssueRequest, MirrorStatus, ReconcileReport, RegisterError, RegisterRequest,
    ReturnError, ReturnRequest,
};

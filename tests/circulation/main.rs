//! Circulation ledger integration tests
//!
//! Cross-crate tests through the public facade:
//! - Scenario: the issue/return lifecycle and every precondition
//! - Invariants: property tests for conservation and non-negativity
//! - Durability: reopen, torn WAL tail, mirror contents across restarts
//! - Mirror: degraded success and reconciliation
//! - Concurrency: racing issues, returns and reconciles
//! - Commands: the JSON command boundary

#[path = "../common/mod.rs"]
mod common;

mod commands;
mod concurrency;
mod durability;
mod invariants;
mod mirror;
mod scenario;

//! Durability layer for Stacks
//!
//! This crate handles everything that touches disk:
//!
//! - WAL: append-only log of committed transactions for the authoritative
//!   tables, with `Always` and `Standard` durability modes
//! - Encoding: `[len][type][payload][crc32]` framing with MessagePack payloads
//! - Audit mirror: the three human-readable CSV logs (registrations, issues,
//!   returns) with idempotent append and atomic whole-file rewrite

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod encoding;
pub mod wal;

pub use audit::{AuditLog, AuditMirror, AuditRow, IssueRow, RegistrationRow, ReturnRow};
pub use wal::{DurabilityMode, WalEntry, WAL};

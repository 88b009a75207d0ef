//! Audit mirror: human-readable CSV logs of ledger activity
//!
//! - `registrations.csv`: one row per registered book
//! - `issues.csv`: one row per currently open loan
//! - `returns.csv`: one row per closed loan
//!
//! The authoritative tables are the source of truth; these files follow
//! them after each commit and can be healed by reconciliation.

mod log;
mod mirror;
mod rows;

pub use log::AuditLog;
pub use mirror::{AuditMirror, ISSUES_FILE, REGISTRATIONS_FILE, RETURNS_FILE};
pub use rows::{AuditRow, IssueRow, RegistrationRow, ReturnRow};

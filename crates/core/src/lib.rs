//! Core types and traits for Stacks
//!
//! This crate defines the foundational types used throughout the system:
//! - CatalogNumber / BorrowerId: validated identifiers
//! - BookCopy, Loan, ReturnRecord: the three authoritative row types
//! - Table / Key: how rows are addressed in storage
//! - Row / VersionedRow: the unit stored and versioned by the store
//! - Clock: source of calendar dates
//! - StacksError: error type hierarchy
//! - Storage: trait implemented by the table store

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod error;
pub mod model;
pub mod traits;
pub mod types;
pub mod value;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{StacksError, StacksResult};
pub use model::{BookCopy, Loan, ReturnRecord};
pub use traits::Storage;
pub use types::{BorrowerId, CatalogNumber, Key, Table, DATE_FORMAT};
pub use value::{Row, VersionedRow};

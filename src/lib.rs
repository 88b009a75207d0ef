//! Stacks - circulation ledger for a library's book inventory
//!
//! Stacks tracks how many copies of each book are on the shelf, who holds
//! which book, and which loans have been closed. Every issue and return is
//! one atomic transition over the authoritative tables; a human-readable
//! CSV audit mirror follows each commit and can be healed by reconciliation.
//!
//! # Quick Start
//!
//! ```ignore
//! use stacks::{Command, Executor, Output};
//!
//! let executor = Executor::open("/path/to/data")?;
//! executor.execute(Command::RegisterBook {
//!     catalog_number: "111".into(),
//!     title: "Dune".into(),
//!     author: "Herbert".into(),
//!     initial_available: 1,
//! })?;
//! ```
//!
//! # Architecture
//!
//! Commands go through the [`Executor`], which validates raw fields and
//! calls the [`CirculationLedger`]. Embedders that want typed requests can
//! drive the ledger directly. Storage, concurrency and durability layers
//! are not exposed.

// Re-export the command API from stacks-executor
pub use stacks_executor::*;

// Ledger API for embedders
pub use stacks_engine::{
    AnyBorrower, BorrowerDirectory, CirculationLedger, Circulated, Database,
    InMemoryBorrowerDirectory, IssueError, IssueRequest, MirrorStatus, RegisterError,
    RegisterRequest, RetryConfig, ReturnError, ReturnRequest,
};

// Domain identifiers and the clock port
pub use stacks_core::{BorrowerId, CatalogNumber, Clock, FixedClock, StacksError, SystemClock};

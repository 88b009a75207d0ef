//! # Stacks Executor
//!
//! The typed request boundary of the Stacks circulation ledger.
//!
//! - [`Command`] - every operation as a serializable value with raw fields
//! - [`Output`] - one success shape per command, with degraded-success warnings
//! - [`Error`] - serializable failures naming the identifiers involved
//! - [`Executor`] - validates, dispatches and converts
//!
//! ## Quick Start
//!
//! ```text
//! use stacks_executor::{Command, Executor, Output};
//!
//! let executor = Executor::open("/path/to/data")?;
//! let out = executor.execute(Command::IssueBook {
//!     catalog_number: "111".into(),
//!     title: "Dune".into(),
//!     author: "Herbert".into(),
//!     borrower_email: "a@x.com".into(),
//!     borrower_roll: 1,
//! })?;
//! if let Some(w) = out.warning() {
//!     eprintln!("warning: {}", w);
//! }
//! ```

#![warn(missing_docs)]

mod command;
mod convert;
mod error;
mod executor;
mod output;
mod validation;

// Handler modules
mod handlers;

// Test modules
#[cfg(test)]
mod tests;

pub use command::Command;
pub use error::Error;
pub use executor::Executor;
pub use output::Output;

// Re-export the domain types that appear in outputs
pub use stacks_core::model::{BookCopy, Loan, ReturnRecord};
pub use stacks_engine::{ReconcileReport, StacksConfig};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;

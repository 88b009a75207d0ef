//! Output enum for command execution results.
//!
//! Every command produces exactly one output variant. Mutating commands
//! carry a `warning` that is `Some` only for degraded success: the ledger
//! committed but the audit mirror write failed.

use serde::{Deserialize, Serialize};
use stacks_core::model::{BookCopy, Loan, ReturnRecord};
use stacks_engine::ReconcileReport;

/// Successful command execution results.
///
/// ```text
/// match executor.execute(cmd)? {
///     Output::Issued { message, warning, .. } => {
///         println!("{}", message);
///         if let Some(w) = warning { eprintln!("warning: {}", w); }
///     }
///     other => println!("{:?}", other),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Ping response
    Pong {
        /// Crate version
        version: String,
    },

    /// Book added to the inventory
    Registered {
        /// The stored row
        book: BookCopy,
        /// Mirror failure, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
    },

    /// Loan opened
    Issued {
        /// The new loan
        loan: Loan,
        /// Human-readable confirmation
        message: String,
        /// Mirror failure, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
    },

    /// Loan closed
    Returned {
        /// The closed loan
        record: ReturnRecord,
        /// Human-readable confirmation
        message: String,
        /// Mirror failure, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
    },

    /// Optional book (GetBook)
    Book(Option<BookCopy>),

    /// List of books
    Books(Vec<BookCopy>),

    /// List of open loans
    Loans(Vec<Loan>),

    /// List of closed loans
    Returns(Vec<ReturnRecord>),

    /// What reconciliation changed
    Reconciled(ReconcileReport),
}

impl Output {
    /// Degraded-success warning, if this output carries one
    pub fn warning(&self) -> Option<&str> {
        match self {
            Output::Registered { warning, .. }
            | Output::Issued { warning, .. }
            | Output::Returned { warning, .. } => warning.as_deref(),
            _ => None,
        }
    }
}

//! Command enum defining every Stacks operation.
//!
//! Commands are the request boundary of the ledger. Fields are raw strings
//! and numbers as a client sends them; the executor validates them into
//! domain types before anything touches the store.
//!
//! Commands are:
//! - **Self-contained**: all parameters needed for execution are in the variant
//! - **Serializable**: convertible to/from JSON
//! - **Strict**: unknown fields are rejected at deserialization

use serde::{Deserialize, Serialize};

/// A self-contained, serializable ledger operation.
///
/// | Category | Commands |
/// |----------|----------|
/// | Circulation | `IssueBook`, `ReturnBook` |
/// | Inventory | `RegisterBook`, `GetBook`, `ListBooks`, `ListUnavailable` |
/// | History | `ListLoans`, `ListReturns` |
/// | Audit | `Reconcile` |
/// | Database | `Ping` |
///
/// # Example
///
/// ```ignore
/// use stacks_executor::Command;
///
/// let cmd: Command = serde_json::from_str(
///     r#"{"IssueBook":{"catalog_number":"111","title":"Dune","author":"Herbert",
///         "borrower_email":"a@x.com","borrower_roll":1}}"#,
/// )?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    /// Liveness check.
    /// Returns: `Output::Pong`
    Ping,

    /// Add a book to the inventory.
    /// Returns: `Output::Registered`
    RegisterBook {
        catalog_number: String,
        title: String,
        author: String,
        initial_available: u32,
    },

    /// Lend one copy to a borrower.
    /// Returns: `Output::Issued`
    IssueBook {
        catalog_number: String,
        title: String,
        author: String,
        borrower_email: String,
        borrower_roll: u64,
    },

    /// Close a borrower's loan of one book.
    /// Returns: `Output::Returned`
    ReturnBook {
        catalog_number: String,
        title: String,
        borrower_email: String,
        borrower_roll: u64,
    },

    /// Look up one book.
    /// Returns: `Output::Book`
    GetBook { catalog_number: String },

    /// Every registered book.
    /// Returns: `Output::Books`
    ListBooks,

    /// Books with no copy on the shelf.
    /// Returns: `Output::Books`
    ListUnavailable,

    /// Open loans, optionally of one borrower (give both fields or neither).
    /// Returns: `Output::Loans`
    ListLoans {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        borrower_email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        borrower_roll: Option<u64>,
    },

    /// Closed loans of one borrower.
    /// Returns: `Output::Returns`
    ListReturns {
        borrower_email: String,
        borrower_roll: u64,
    },

    /// Heal the audit mirror from the authoritative tables.
    /// Returns: `Output::Reconciled`
    Reconcile,
}

impl Command {
    /// Name of the variant, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "Ping",
            Command::RegisterBook { .. } => "RegisterBook",
            Command::IssueBook { .. } => "IssueBook",
            Command::ReturnBook { .. } => "ReturnBook",
            Command::GetBook { .. } => "GetBook",
            Command::ListBooks => "ListBooks",
            Command::ListUnavailable => "ListUnavailable",
            Command::ListLoans { .. } => "ListLoans",
            Command::ListReturns { .. } => "ListReturns",
            Command::Reconcile => "Reconcile",
        }
    }

    /// True for commands that change the ledger or the mirror
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::RegisterBook { .. }
                | Command::IssueBook { .. }
                | Command::ReturnBook { .. }
                | Command::Reconcile
        )
    }
}

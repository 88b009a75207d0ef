//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: each variant has typed fields naming the identifiers involved
//! - **Serializable**: can be converted to/from JSON
//! - **Lossless**: no detail of the ledger error is dropped in conversion

use serde::{Deserialize, Serialize};

/// Command execution errors.
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Precondition | `AlreadyIssued`, `UnknownBook`, `NotAvailable`, `NotIssued`, `DuplicateCatalogNumber`, `UnknownBorrower` | Refused, nothing changed |
/// | Validation | `InvalidInput` | Malformed request field |
/// | Store | `Transient` | Conflict or store failure after retries, nothing changed |
/// | System | `Io`, `Internal` | Infrastructure errors |
///
/// Degraded success is not an error: it is an `Output` with a `warning`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Precondition ====================
    /// The borrower already holds this book
    #[error("{catalog_number} is already issued to {borrower}")]
    AlreadyIssued {
        catalog_number: String,
        borrower: String,
    },

    /// No matching book (a return also matches on title)
    #[error("{}", unknown_book_message(.catalog_number, .title.as_deref()))]
    UnknownBook {
        catalog_number: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },

    /// Every copy is out
    #[error("no copy of {catalog_number} is available")]
    NotAvailable { catalog_number: String },

    /// The borrower holds no loan of this book
    #[error("{catalog_number} is not issued to {borrower}")]
    NotIssued {
        catalog_number: String,
        borrower: String,
    },

    /// Catalog number already registered
    #[error("catalog number {catalog_number} is already registered")]
    DuplicateCatalogNumber { catalog_number: String },

    /// Borrower not in the directory
    #[error("borrower {borrower} is not registered")]
    UnknownBorrower { borrower: String },

    // ==================== Validation ====================
    /// A request field failed validation
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    // ==================== Store ====================
    /// The operation did not commit; retrying later may succeed
    #[error("transient failure: {reason}")]
    Transient { reason: String },

    // ==================== System ====================
    /// I/O error
    #[error("I/O error: {reason}")]
    Io { reason: String },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal { reason: String },
}

fn unknown_book_message(catalog_number: &str, title: Option<&str>) -> String {
    match title {
        Some(title) => format!(
            "no book with catalog number {} and title {:?}",
            catalog_number, title
        ),
        None => format!("no book with catalog number {}", catalog_number),
    }
}

impl Error {
    /// Request was refused by a ledger precondition
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::AlreadyIssued { .. }
                | Error::UnknownBook { .. }
                | Error::NotAvailable { .. }
                | Error::NotIssued { .. }
                | Error::DuplicateCatalogNumber { .. }
                | Error::UnknownBorrower { .. }
        )
    }
}

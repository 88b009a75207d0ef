//! Per-operation ledger errors
//!
//! Precondition failures carry the identifiers involved. Store failures
//! that survive the retry loop become `Transient`; anything else that
//! should never happen becomes `Internal`. None of them leaves an effect
//! behind.

use stacks_core::types::{BorrowerId, CatalogNumber};
use stacks_core::StacksError;
use thiserror::Error;

/// Why an issue was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueError {
    /// The borrower directory does not know this borrower
    #[error("borrower {borrower} is not registered")]
    UnknownBorrower {
        /// Requested borrower
        borrower: BorrowerId,
    },

    /// The borrower already holds this book
    #[error("{catalog_number} is already issued to {borrower}")]
    AlreadyIssued {
        /// Requested book
        catalog_number: CatalogNumber,
        /// Requested borrower
        borrower: BorrowerId,
    },

    /// No such catalog number
    #[error("no book with catalog number {catalog_number}")]
    UnknownBook {
        /// Requested book
        catalog_number: CatalogNumber,
    },

    /// Every copy is out
    #[error("no copy of {catalog_number} is available")]
    NotAvailable {
        /// Requested book
        catalog_number: CatalogNumber,
    },

    /// The store failed or kept conflicting; nothing was applied
    #[error("issue did not commit: {reason}")]
    Transient {
        /// Underlying failure
        reason: String,
    },

    /// Unexpected store state
    #[error("internal error: {reason}")]
    Internal {
        /// Underlying failure
        reason: String,
    },
}

/// Why a return was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnError {
    /// No book with this catalog number and title
    #[error("no book with catalog number {catalog_number} and title {title:?}")]
    UnknownBook {
        /// Requested book
        catalog_number: CatalogNumber,
        /// Requested title
        title: String,
    },

    /// The borrower holds no loan of this book
    #[error("{catalog_number} is not issued to {borrower}")]
    NotIssued {
        /// Requested book
        catalog_number: CatalogNumber,
        /// Requested borrower
        borrower: BorrowerId,
    },

    /// The store failed or kept conflicting; nothing was applied
    #[error("return did not commit: {reason}")]
    Transient {
        /// Underlying failure
        reason: String,
    },

    /// Unexpected store state
    #[error("internal error: {reason}")]
    Internal {
        /// Underlying failure
        reason: String,
    },
}

/// Why a registration was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// The catalog number is taken
    #[error("catalog number {catalog_number} is already registered")]
    DuplicateCatalogNumber {
        /// Requested catalog number
        catalog_number: CatalogNumber,
    },

    /// The store failed or kept conflicting; nothing was applied
    #[error("registration did not commit: {reason}")]
    Transient {
        /// Underlying failure
        reason: String,
    },

    /// Unexpected store state
    #[error("internal error: {reason}")]
    Internal {
        /// Underlying failure
        reason: String,
    },
}

macro_rules! from_store_error {
    ($ty:ident) => {
        impl From<StacksError> for $ty {
            fn from(e: StacksError) -> Self {
                if e.is_transient() {
                    $ty::Transient {
                        reason: e.to_string(),
                    }
                } else {
                    $ty::Internal {
                        reason: e.to_string(),
                    }
                }
            }
        }
    };
}

from_store_error!(IssueError);
from_store_error!(ReturnError);
from_store_error!(RegisterError);

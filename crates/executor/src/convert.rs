//! Error conversion from internal error types.
//!
//! Ledger errors map one-to-one onto executor variants. Store errors
//! reaching the executor directly (queries, reconcile) are classified by
//! kind.

use crate::Error;
use stacks_core::StacksError;
use stacks_engine::{IssueError, RegisterError, ReturnError};

impl From<IssueError> for Error {
    fn from(err: IssueError) -> Self {
        match err {
            IssueError::UnknownBorrower { borrower } => Error::UnknownBorrower {
                borrower: borrower.to_string(),
            },
            IssueError::AlreadyIssued {
                catalog_number,
                borrower,
            } => Error::AlreadyIssued {
                catalog_number: catalog_number.to_string(),
                borrower: borrower.to_string(),
            },
            IssueError::UnknownBook { catalog_number } => Error::UnknownBook {
                catalog_number: catalog_number.to_string(),
                title: None,
            },
            IssueError::NotAvailable { catalog_number } => Error::NotAvailable {
                catalog_number: catalog_number.to_string(),
            },
            IssueError::Transient { reason } => Error::Transient { reason },
            IssueError::Internal { reason } => Error::Internal { reason },
        }
    }
}

impl From<ReturnError> for Error {
    fn from(err: ReturnError) -> Self {
        match err {
            ReturnError::UnknownBook {
                catalog_number,
                title,
            } => Error::UnknownBook {
                catalog_number: catalog_number.to_string(),
                title: Some(title),
            },
            ReturnError::NotIssued {
                catalog_number,
                borrower,
            } => Error::NotIssued {
                catalog_number: catalog_number.to_string(),
                borrower: borrower.to_string(),
            },
            ReturnError::Transient { reason } => Error::Transient { reason },
            ReturnError::Internal { reason } => Error::Internal { reason },
        }
    }
}

impl From<RegisterError> for Error {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::DuplicateCatalogNumber { catalog_number } => {
                Error::DuplicateCatalogNumber {
                    catalog_number: catalog_number.to_string(),
                }
            }
            RegisterError::Transient { reason } => Error::Transient { reason },
            RegisterError::Internal { reason } => Error::Internal { reason },
        }
    }
}

impl From<StacksError> for Error {
    fn from(err: StacksError) -> Self {
        match err {
            StacksError::Io(e) => Error::Io {
                reason: e.to_string(),
            },
            StacksError::InvalidInput { message } => Error::InvalidInput {
                field: "request".to_string(),
                reason: message,
            },
            StacksError::Conflict { reason } => Error::Transient { reason },
            StacksError::Storage { message } => Error::Transient { reason: message },
            other => Error::Internal {
                reason: other.to_string(),
            },
        }
    }
}

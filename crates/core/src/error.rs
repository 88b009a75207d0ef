//! Error types for the Stacks store
//!
//! This module defines the error type shared by the storage, durability,
//! concurrency and engine layers. We use `thiserror` for automatic
//! `Display` and `Error` trait implementations.
//!
//! Ledger-level rejections (a book that is not available, a loan that does
//! not exist) are NOT represented here; they live in the engine as
//! per-operation error types. `StacksError` covers infrastructure failures
//! and malformed input only.

use std::io;
use thiserror::Error;

/// Result type alias for Stacks operations
pub type StacksResult<T> = std::result::Result<T, StacksError>;

/// Error types for the Stacks store
#[derive(Debug, Error)]
pub enum StacksError {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// What failed to encode or decode
        message: String,
    },

    /// Input failed validation
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Which field and why
        message: String,
    },

    /// Optimistic concurrency conflict detected at commit
    ///
    /// The transaction had no effect and may be retried.
    #[error("transaction conflict: {reason}")]
    Conflict {
        /// Human-readable conflict description
        reason: String,
    },

    /// Operation attempted on a transaction that is no longer active
    #[error("transaction not active: {state}")]
    TransactionNotActive {
        /// State the transaction was found in
        state: String,
    },

    /// Storage layer error
    #[error("storage error: {message}")]
    Storage {
        /// Failure description
        message: String,
    },

    /// Data corruption detected (checksum mismatch, undecodable record)
    #[error("data corruption: {message}")]
    Corruption {
        /// What was found to be corrupt
        message: String,
    },

    /// A row of one table was found where another was expected
    #[error("wrong row type: expected {expected}, got {actual}")]
    WrongRow {
        /// Expected row kind
        expected: &'static str,
        /// Row kind actually stored
        actual: &'static str,
    },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {message}")]
    Internal {
        /// Description
        message: String,
    },
}

impl StacksError {
    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        StacksError::Serialization {
            message: message.into(),
        }
    }

    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        StacksError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(reason: impl Into<String>) -> Self {
        StacksError::Conflict {
            reason: reason.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        StacksError::Storage {
            message: message.into(),
        }
    }

    /// Create a corruption error
    pub fn corruption(message: impl Into<String>) -> Self {
        StacksError::Corruption {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        StacksError::Internal {
            message: message.into(),
        }
    }

    /// True if the failure was an OCC conflict (safe to retry)
    pub fn is_conflict(&self) -> bool {
        matches!(self, StacksError::Conflict { .. })
    }

    /// True if the operation may succeed if attempted again later
    ///
    /// Conflicts and I/O failures are transient; bad input, corruption and
    /// internal errors are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StacksError::Conflict { .. } | StacksError::Io(_) | StacksError::Storage { .. }
        )
    }
}

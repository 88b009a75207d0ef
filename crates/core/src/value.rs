//! Stored row representation
//!
//! The store is typed per table: every key maps to a `Row` whose variant
//! matches the key's table. `VersionedRow` pairs a row with the commit
//! version that wrote it.

use crate::error::{StacksError, StacksResult};
use crate::model::{BookCopy, Loan, ReturnRecord};
use crate::types::Table;
use serde::{Deserialize, Serialize};

/// A row in one of the authoritative tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Row {
    /// Inventory Store row
    Book(BookCopy),
    /// Loan Table row
    Loan(Loan),
    /// Return Log row
    Return(ReturnRecord),
}

impl Row {
    /// Table this row belongs in
    pub fn table(&self) -> Table {
        match self {
            Row::Book(_) => Table::Books,
            Row::Loan(_) => Table::Loans,
            Row::Return(_) => Table::Returns,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Row::Book(_) => "book",
            Row::Loan(_) => "loan",
            Row::Return(_) => "return",
        }
    }

    /// Unwrap a BookCopy
    pub fn into_book(self) -> StacksResult<BookCopy> {
        match self {
            Row::Book(book) => Ok(book),
            other => Err(StacksError::WrongRow {
                expected: "book",
                actual: other.kind(),
            }),
        }
    }

    /// Unwrap a Loan
    pub fn into_loan(self) -> StacksResult<Loan> {
        match self {
            Row::Loan(loan) => Ok(loan),
            other => Err(StacksError::WrongRow {
                expected: "loan",
                actual: other.kind(),
            }),
        }
    }

    /// Unwrap a ReturnRecord
    pub fn into_return(self) -> StacksResult<ReturnRecord> {
        match self {
            Row::Return(record) => Ok(record),
            other => Err(StacksError::WrongRow {
                expected: "return",
                actual: other.kind(),
            }),
        }
    }
}

/// A row with the version of the commit that wrote it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedRow {
    /// The row
    pub row: Row,
    /// Commit version (always > 0 for a stored row)
    pub version: u64,
}

impl VersionedRow {
    /// Pair a row with its version
    pub fn new(row: Row, version: u64) -> Self {
        VersionedRow { row, version }
    }
}

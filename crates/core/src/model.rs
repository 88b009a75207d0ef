//! Authoritative row types
//!
//! These are the records held by the Inventory Store, the Loan Table and
//! the Return Log. The ledger is the only writer of all three.

use crate::types::{BorrowerId, CatalogNumber};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalogued book and how many copies are on the shelf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookCopy {
    /// Unique, immutable identifier
    pub catalog_number: CatalogNumber,
    /// Title (immutable)
    pub title: String,
    /// Author (immutable)
    pub author: String,
    /// Copies currently available for issue
    pub available_count: u32,
}

impl BookCopy {
    /// True if the request title matches this book
    ///
    /// Matching is exact after trimming surrounding whitespace.
    pub fn title_matches(&self, title: &str) -> bool {
        self.title.trim() == title.trim()
    }
}

/// An open loan of one copy to one borrower
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// Book on loan
    pub catalog_number: CatalogNumber,
    /// Title copied from the BookCopy at issue time
    pub title: String,
    /// Author copied from the BookCopy at issue time
    pub author: String,
    /// Who holds it
    pub borrower: BorrowerId,
    /// Day the loan was opened
    pub issue_date: NaiveDate,
}

/// A closed loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRecord {
    /// Row id in the Return Log
    pub id: Uuid,
    /// Book that came back
    pub catalog_number: CatalogNumber,
    /// Title from the closed loan
    pub title: String,
    /// Author from the closed loan
    pub author: String,
    /// Who returned it
    pub borrower: BorrowerId,
    /// Day the loan was opened
    pub issue_date: NaiveDate,
    /// Day the loan was closed
    pub return_date: NaiveDate,
}

impl ReturnRecord {
    /// Close `loan` on `return_date` with a fresh row id
    pub fn close(loan: Loan, return_date: NaiveDate) -> Self {
        ReturnRecord {
            id: Uuid::new_v4(),
            catalog_number: loan.catalog_number,
            title: loan.title,
            author: loan.author,
            borrower: loan.borrower,
            issue_date: loan.issue_date,
            return_date,
        }
    }
}

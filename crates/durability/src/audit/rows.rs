//! Row types of the three audit logs
//!
//! Field order is the column order on disk; the header row is written
//! from `AuditRow::HEADER` and checked on read.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use stacks_core::model::{BookCopy, Loan, ReturnRecord};
use std::fmt::Debug;
use std::hash::Hash;

/// A row type that can live in an audit log
pub trait AuditRow: Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send {
    /// Fixed header row
    const HEADER: &'static [&'static str];

    /// Business key identifying the record for idempotent replay
    type NaturalKey: Eq + Hash + Ord + Clone + Debug;

    /// This row's natural key
    fn natural_key(&self) -> Self::NaturalKey;
}

/// One line of the issue log: an open loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRow {
    /// Catalog number of the book
    pub catalog_number: String,
    /// Book title
    pub title: String,
    /// Book author
    pub author: String,
    /// Borrower email
    pub borrower_email: String,
    /// Borrower roll number
    pub borrower_roll: u64,
    /// Day the loan was opened
    pub issue_date: NaiveDate,
}

impl AuditRow for IssueRow {
    const HEADER: &'static [&'static str] = &[
        "catalog_number",
        "title",
        "author",
        "borrower_email",
        "borrower_roll",
        "issue_date",
    ];

    type NaturalKey = (String, String, u64, NaiveDate);

    fn natural_key(&self) -> Self::NaturalKey {
        (
            self.catalog_number.clone(),
            self.borrower_email.clone(),
            self.borrower_roll,
            self.issue_date,
        )
    }
}

impl From<&Loan> for IssueRow {
    fn from(loan: &Loan) -> Self {
        IssueRow {
            catalog_number: loan.catalog_number.to_string(),
            title: loan.title.clone(),
            author: loan.author.clone(),
            borrower_email: loan.borrower.email().to_string(),
            borrower_roll: loan.borrower.roll(),
            issue_date: loan.issue_date,
        }
    }
}

impl IssueRow {
    /// The issue row a closed loan had while it was open
    pub fn of_closed(record: &ReturnRecord) -> Self {
        IssueRow {
            catalog_number: record.catalog_number.to_string(),
            title: record.title.clone(),
            author: record.author.clone(),
            borrower_email: record.borrower.email().to_string(),
            borrower_roll: record.borrower.roll(),
            issue_date: record.issue_date,
        }
    }
}

/// One line of the return log: a closed loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRow {
    /// Catalog number of the book
    pub catalog_number: String,
    /// Book title
    pub title: String,
    /// Borrower roll number
    pub borrower_roll: u64,
    /// Borrower email
    pub borrower_email: String,
    /// Day the loan was closed
    pub return_date: NaiveDate,
}

impl AuditRow for ReturnRow {
    const HEADER: &'static [&'static str] = &[
        "catalog_number",
        "title",
        "borrower_roll",
        "borrower_email",
        "return_date",
    ];

    type NaturalKey = (String, String, u64, NaiveDate);

    fn natural_key(&self) -> Self::NaturalKey {
        (
            self.catalog_number.clone(),
            self.borrower_email.clone(),
            self.borrower_roll,
            self.return_date,
        )
    }
}

impl From<&ReturnRecord> for ReturnRow {
    fn from(record: &ReturnRecord) -> Self {
        ReturnRow {
            catalog_number: record.catalog_number.to_string(),
            title: record.title.clone(),
            borrower_roll: record.borrower.roll(),
            borrower_email: record.borrower.email().to_string(),
            return_date: record.return_date,
        }
    }
}

/// One line of the registration log: a book as first registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRow {
    /// Catalog number of the book
    pub catalog_number: String,
    /// Book title
    pub title: String,
    /// Book author
    pub author: String,
    /// Copies available at registration
    pub available: u32,
}

impl AuditRow for RegistrationRow {
    const HEADER: &'static [&'static str] = &["catalog_number", "title", "author", "available"];

    type NaturalKey = String;

    fn natural_key(&self) -> Self::NaturalKey {
        self.catalog_number.clone()
    }
}

impl From<&BookCopy> for RegistrationRow {
    fn from(book: &BookCopy) -> Self {
        RegistrationRow {
            catalog_number: book.catalog_number.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            available: book.available_count,
        }
    }
}

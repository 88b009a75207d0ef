//! Read-only views of the authoritative tables

use super::CirculationLedger;
use stacks_core::model::{BookCopy, Loan, ReturnRecord};
use stacks_core::traits::Storage;
use stacks_core::types::{BorrowerId, CatalogNumber, Key, Table};
use stacks_core::StacksResult;

impl CirculationLedger {
    /// One book by catalog number
    pub fn book(&self, catalog_number: &CatalogNumber) -> StacksResult<Option<BookCopy>> {
        self.db
            .storage()
            .get(&Key::book(catalog_number))?
            .map(|versioned| versioned.row.into_book())
            .transpose()
    }

    /// Every registered book, by catalog number
    pub fn books(&self) -> StacksResult<Vec<BookCopy>> {
        self.db
            .storage()
            .scan(Table::Books)?
            .into_iter()
            .map(|(_, versioned)| versioned.row.into_book())
            .collect()
    }

    /// Books with no copy on the shelf
    pub fn unavailable_books(&self) -> StacksResult<Vec<BookCopy>> {
        Ok(self
            .books()?
            .into_iter()
            .filter(|book| book.available_count == 0)
            .collect())
    }

    /// Every open loan, ordered by (catalog number, borrower)
    pub fn open_loans(&self) -> StacksResult<Vec<Loan>> {
        self.db
            .storage()
            .scan(Table::Loans)?
            .into_iter()
            .map(|(_, versioned)| versioned.row.into_loan())
            .collect()
    }

    /// Open loans held by one borrower
    pub fn loans_for(&self, borrower: &BorrowerId) -> StacksResult<Vec<Loan>> {
        Ok(self
            .open_loans()?
            .into_iter()
            .filter(|loan| &loan.borrower == borrower)
            .collect())
    }

    /// Every closed loan, oldest return first
    pub fn returns(&self) -> StacksResult<Vec<ReturnRecord>> {
        let mut records = self
            .db
            .storage()
            .scan(Table::Returns)?
            .into_iter()
            .map(|(_, versioned)| versioned.row.into_return())
            .collect::<StacksResult<Vec<_>>>()?;
        records.sort_by(|a, b| {
            (a.return_date, &a.catalog_number, &a.borrower, a.issue_date)
                .cmp(&(b.return_date, &b.catalog_number, &b.borrower, b.issue_date))
        });
        Ok(records)
    }

    /// Closed loans of one borrower, oldest return first
    pub fn returns_for(&self, borrower: &BorrowerId) -> StacksResult<Vec<ReturnRecord>> {
        Ok(self
            .returns()?
            .into_iter()
            .filter(|record| &record.borrower == borrower)
            .collect())
    }
}

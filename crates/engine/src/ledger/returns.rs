//! Return: close a loan and put the copy back on the shelf

use super::{CirculationLedger, Circulated, ReturnError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stacks_concurrency::TransactionContext;
use stacks_core::model::{BookCopy, ReturnRecord};
use stacks_core::types::{BorrowerId, CatalogNumber, Key};
use stacks_core::value::Row;
use stacks_core::{StacksError, StacksResult};
use stacks_durability::audit::{AuditRow, IssueRow, ReturnRow};
use tracing::info;

/// A validated return request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRequest {
    /// Book coming back
    pub catalog_number: CatalogNumber,
    /// Title; must match the catalog
    pub title: String,
    /// Who brings it back
    pub borrower: BorrowerId,
}

impl CirculationLedger {
    /// Return a borrowed book
    ///
    /// Checks, first failure wins:
    /// 1. a book with this catalog number and title exists (`UnknownBook`)
    /// 2. this borrower holds a loan of it (`NotIssued`)
    ///
    /// The count increment, the loan delete and the return record insert
    /// commit together. Only the loan for this exact (book, borrower) pair
    /// is removed. Afterwards the return is appended to the return log and
    /// the closed loan's row is dropped from the issue log by rewriting it.
    pub fn return_book(
        &self,
        request: &ReturnRequest,
    ) -> Result<Circulated<ReturnRecord>, ReturnError> {
        let _gate = self.gate.read();

        let today = self.clock.today();
        let record = self
            .db
            .transaction_with_retry(&self.retry, |txn| return_in_txn(txn, request, today))??;

        info!(
            target: "stacks::ledger",
            catalog_number = %record.catalog_number,
            borrower = %record.borrower,
            return_date = %record.return_date,
            "Book returned"
        );

        let mirror = self.mirror_writes("return", &record.catalog_number, |mirror| {
            let mut failures = Vec::new();
            if let Err(e) = mirror.returns().append(&ReturnRow::from(&record)) {
                failures.push(format!("return log append failed: {}", e));
            }
            let closed = IssueRow::of_closed(&record).natural_key();
            if let Err(e) = mirror.issues().remove_key(&closed) {
                failures.push(format!("issue log rewrite failed: {}", e));
            }
            failures
        });

        Ok(Circulated { record, mirror })
    }
}

fn return_in_txn(
    txn: &mut TransactionContext,
    request: &ReturnRequest,
    today: NaiveDate,
) -> StacksResult<Result<ReturnRecord, ReturnError>> {
    let book_key = Key::book(&request.catalog_number);
    let book: BookCopy = match txn.get(&book_key)? {
        Some(row) => {
            let book = row.into_book()?;
            if !book.title_matches(&request.title) {
                return Ok(Err(unknown_book(request)));
            }
            book
        }
        None => return Ok(Err(unknown_book(request))),
    };

    let loan_key = Key::loan(&request.catalog_number, &request.borrower);
    let loan = match txn.get(&loan_key)? {
        Some(row) => row.into_loan()?,
        None => {
            return Ok(Err(ReturnError::NotIssued {
                catalog_number: request.catalog_number.clone(),
                borrower: request.borrower.clone(),
            }))
        }
    };

    let available_count = book.available_count.checked_add(1).ok_or_else(|| {
        StacksError::internal(format!(
            "available count of {} would overflow",
            book.catalog_number
        ))
    })?;
    let record = ReturnRecord::close(loan, today);

    txn.put(
        book_key,
        Row::Book(BookCopy {
            available_count,
            ..book
        }),
    )?;
    txn.delete(loan_key)?;
    txn.put(Key::return_record(&record.id), Row::Return(record.clone()))?;
    Ok(Ok(record))
}

fn unknown_book(request: &ReturnRequest) -> ReturnError {
    ReturnError::UnknownBook {
        catalog_number: request.catalog_number.clone(),
        title: request.title.clone(),
    }
}

//! Issue: open a loan and take one copy off the shelf

use super::{CirculationLedger, Circulated, IssueError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stacks_concurrency::TransactionContext;
use stacks_core::model::{BookCopy, Loan};
use stacks_core::types::{BorrowerId, CatalogNumber, Key};
use stacks_core::value::Row;
use stacks_core::StacksResult;
use stacks_durability::audit::IssueRow;
use tracing::{debug, info};

/// A validated issue request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRequest {
    /// Book to issue
    pub catalog_number: CatalogNumber,
    /// Title as the requester gave it
    pub title: String,
    /// Author as the requester gave it
    pub author: String,
    /// Who takes the book
    pub borrower: BorrowerId,
}

impl CirculationLedger {
    /// Issue a copy of a book to a borrower
    ///
    /// Checks, first failure wins and nothing is written before all pass:
    /// 1. the borrower exists (`UnknownBorrower`)
    /// 2. no open loan for this book and borrower (`AlreadyIssued`)
    /// 3. the book exists (`UnknownBook`)
    /// 4. a copy is available (`NotAvailable`)
    ///
    /// The loan insert and the count decrement commit together. The loan's
    /// title and author come from the stored book, not from the request.
    /// The issue log row is appended afterwards, keyed by
    /// (catalog number, borrower, issue date) so a replay adds nothing.
    pub fn issue(&self, request: &IssueRequest) -> Result<Circulated<Loan>, IssueError> {
        let _gate = self.gate.read();

        if !self.borrowers.contains(&request.borrower) {
            return Err(IssueError::UnknownBorrower {
                borrower: request.borrower.clone(),
            });
        }

        let today = self.clock.today();
        let loan = self
            .db
            .transaction_with_retry(&self.retry, |txn| issue_in_txn(txn, request, today))??;

        info!(
            target: "stacks::ledger",
            catalog_number = %loan.catalog_number,
            borrower = %loan.borrower,
            issue_date = %loan.issue_date,
            "Book issued"
        );

        let mirror = self.mirror_writes("issue", &loan.catalog_number, |mirror| {
            match mirror.issues().append_if_absent(&IssueRow::from(&loan)) {
                Ok(_) => Vec::new(),
                Err(e) => vec![format!("issue log append failed: {}", e)],
            }
        });

        Ok(Circulated {
            record: loan,
            mirror,
        })
    }
}

/// The authoritative half of an issue
///
/// The outer result is the store; the inner one is the ledger's verdict.
/// A rejection still commits (read-only), so the verdict is validated
/// against the versions it was based on.
fn issue_in_txn(
    txn: &mut TransactionContext,
    request: &IssueRequest,
    today: NaiveDate,
) -> StacksResult<Result<Loan, IssueError>> {
    let loan_key = Key::loan(&request.catalog_number, &request.borrower);
    if txn.exists(&loan_key)? {
        return Ok(Err(IssueError::AlreadyIssued {
            catalog_number: request.catalog_number.clone(),
            borrower: request.borrower.clone(),
        }));
    }

    let book_key = Key::book(&request.catalog_number);
    let book: BookCopy = match txn.get(&book_key)? {
        Some(row) => row.into_book()?,
        None => {
            return Ok(Err(IssueError::UnknownBook {
                catalog_number: request.catalog_number.clone(),
            }))
        }
    };

    if book.available_count == 0 {
        return Ok(Err(IssueError::NotAvailable {
            catalog_number: request.catalog_number.clone(),
        }));
    }

    if !book.title_matches(&request.title) || book.author.trim() != request.author.trim() {
        debug!(
            target: "stacks::ledger",
            catalog_number = %book.catalog_number,
            requested_title = %request.title,
            stored_title = %book.title,
            "Issue request details differ from catalog; using catalog"
        );
    }

    let loan = Loan {
        catalog_number: book.catalog_number.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        borrower: request.borrower.clone(),
        issue_date: today,
    };

    let shelved = BookCopy {
        available_count: book.available_count - 1,
        ..book
    };
    txn.put(book_key, Row::Book(shelved))?;
    txn.put(loan_key, Row::Loan(loan.clone()))?;
    Ok(Ok(loan))
}

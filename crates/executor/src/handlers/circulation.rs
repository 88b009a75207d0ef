//! Issue and return handlers.

use std::sync::Arc;

use stacks_engine::{CirculationLedger, IssueRequest, ReturnRequest};

use crate::validation;
use crate::{Output, Result};

/// Handle IssueBook command.
pub fn issue_book(
    ledger: &Arc<CirculationLedger>,
    catalog_number: String,
    title: String,
    author: String,
    borrower_email: String,
    borrower_roll: u64,
) -> Result<Output> {
    let request = IssueRequest {
        catalog_number: validation::catalog_number(catalog_number)?,
        title: validation::text("title", title)?,
        author: validation::text("author", author)?,
        borrower: validation::borrower(borrower_email, borrower_roll)?,
    };
    let issued = ledger.issue(&request)?;
    let warning = issued.warning().map(str::to_string);
    let loan = issued.into_record();
    let message = format!(
        "Book {} has been issued to {} successfully",
        loan.title,
        loan.borrower.email()
    );
    Ok(Output::Issued {
        loan,
        message,
        warning,
    })
}

/// Handle ReturnBook command.
pub fn return_book(
    ledger: &Arc<CirculationLedger>,
    catalog_number: String,
    title: String,
    borrower_email: String,
    borrower_roll: u64,
) -> Result<Output> {
    let request = ReturnRequest {
        catalog_number: validation::catalog_number(catalog_number)?,
        title: validation::text("title", title)?,
        borrower: validation::borrower(borrower_email, borrower_roll)?,
    };
    let returned = ledger.return_book(&request)?;
    let warning = returned.warning().map(str::to_string);
    let record = returned.into_record();
    let message = format!(
        "Book {} returned by {} successfully",
        record.title,
        record.borrower.email()
    );
    Ok(Output::Returned {
        record,
        message,
        warning,
    })
}

//! Loan and return history handlers.

use std::sync::Arc;

use stacks_engine::CirculationLedger;

use crate::validation;
use crate::{Output, Result};

/// Handle ListLoans command.
pub fn list_loans(
    ledger: &Arc<CirculationLedger>,
    borrower_email: Option<String>,
    borrower_roll: Option<u64>,
) -> Result<Output> {
    let loans = match validation::borrower_filter(borrower_email, borrower_roll)? {
        Some(borrower) => ledger.loans_for(&borrower)?,
        None => ledger.open_loans()?,
    };
    Ok(Output::Loans(loans))
}

/// Handle ListReturns command.
pub fn list_returns(
    ledger: &Arc<CirculationLedger>,
    borrower_email: String,
    borrower_roll: u64,
) -> Result<Output> {
    let borrower = validation::borrower(borrower_email, borrower_roll)?;
    Ok(Output::Returns(ledger.returns_for(&borrower)?))
}

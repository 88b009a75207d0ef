//! Inventory handlers.

use std::sync::Arc;

use stacks_engine::{CirculationLedger, RegisterRequest};

use crate::validation;
use crate::{Output, Result};

/// Handle RegisterBook command.
pub fn register_book(
    ledger: &Arc<CirculationLedger>,
    catalog_number: String,
    title: String,
    author: String,
    initial_available: u32,
) -> Result<Output> {
    let request = RegisterRequest {
        catalog_number: validation::catalog_number(catalog_number)?,
        title: validation::text("title", title)?,
        author: validation::text("author", author)?,
        initial_available,
    };
    let registered = ledger.register(&request)?;
    let warning = registered.warning().map(str::to_string);
    Ok(Output::Registered {
        book: registered.into_record(),
        warning,
    })
}

/// Handle GetBook command.
pub fn get_book(ledger: &Arc<CirculationLedger>, catalog_number: String) -> Result<Output> {
    let catalog_number = validation::catalog_number(catalog_number)?;
    Ok(Output::Book(ledger.book(&catalog_number)?))
}

/// Handle ListBooks command.
pub fn list_books(ledger: &Arc<CirculationLedger>) -> Result<Output> {
    Ok(Output::Books(ledger.books()?))
}

/// Handle ListUnavailable command.
pub fn list_unavailable(ledger: &Arc<CirculationLedger>) -> Result<Output> {
    Ok(Output::Books(ledger.unavailable_books()?))
}

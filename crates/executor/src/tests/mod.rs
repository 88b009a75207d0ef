//! Test modules for the executor crate.


use crate::{Command, Executor};

/// In-memory executor for tests.
pub(crate) fn create_test_executor() -> Executor {
    Executor::ephemeral().unwrap()
}

pub(crate) fn register(catalog: &str, available: u32) -> Command {
    Command::RegisterBook {
        catalog_number: catalog.to_string(),
        title: "Dune".to_string(),
        author: "Herbert".to_string(),
        initial_available: available,
    }
}

pub(crate) fn issue(catalog: &str, email: &str, roll: u64) -> Command {
    Command::IssueBook {
        catalog_number: catalog.to_string(),
        title: "Dune".to_string(),
        author: "Herbert".to_string(),
        borrower_email: email.to_string(),
        borrower_roll: roll,
    }
}

pub(crate) fn return_book(catalog: &str, email: &str, roll: u64) -> Command {
    Command::ReturnBook {
        catalog_number: catalog.to_string(),
        title: "Dune".to_string(),
        borrower_email: email.to_string(),
        borrower_roll: roll,
    }
}

//! Register: add a book to the inventory

use super::{CirculationLedger, Circulated, RegisterError};
use serde::{Deserialize, Serialize};
use stacks_core::model::BookCopy;
use stacks_core::types::{CatalogNumber, Key};
use stacks_core::value::Row;
use stacks_durability::audit::RegistrationRow;
use tracing::info;

/// A validated registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// New catalog number
    pub catalog_number: CatalogNumber,
    /// Title
    pub title: String,
    /// Author
    pub author: String,
    /// Copies on the shelf at registration
    pub initial_available: u32,
}

impl CirculationLedger {
    /// Register a book with its initial number of copies
    ///
    /// Fails with `DuplicateCatalogNumber` if the catalog number exists.
    /// The registration log is appended afterwards.
    pub fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<Circulated<BookCopy>, RegisterError> {
        let _gate = self.gate.read();

        let book = self.db.transaction_with_retry(&self.retry, |txn| {
            let key = Key::book(&request.catalog_number);
            if txn.exists(&key)? {
                return Ok(Err(RegisterError::DuplicateCatalogNumber {
                    catalog_number: request.catalog_number.clone(),
                }));
            }
            let book = BookCopy {
                catalog_number: request.catalog_number.clone(),
                title: request.title.clone(),
                author: request.author.clone(),
                available_count: request.initial_available,
            };
            txn.put(key, Row::Book(book.clone()))?;
            Ok(Ok(book))
        })??;

        info!(
            target: "stacks::ledger",
            catalog_number = %book.catalog_number,
            available = book.available_count,
            "Book registered"
        );

        let mirror = self.mirror_writes("register", &book.catalog_number, |mirror| {
            match mirror
                .registrations()
                .append_if_absent(&RegistrationRow::from(&book))
            {
                Ok(_) => Vec::new(),
                Err(e) => vec![format!("registration log append failed: {}", e)],
            }
        });

        Ok(Circulated {
            record: book,
            mirror,
        })
    }
}

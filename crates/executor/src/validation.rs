//! Request field validation.
//!
//! Raw command fields become domain types here, before dispatch. Each
//! failure names the offending field.

use crate::{Error, Result};
use stacks_core::types::{BorrowerId, CatalogNumber};
use stacks_core::StacksError;

fn invalid(field: &str, err: StacksError) -> Error {
    let reason = match err {
        StacksError::InvalidInput { message } => message,
        other => other.to_string(),
    };
    Error::InvalidInput {
        field: field.to_string(),
        reason,
    }
}

/// Catalog number: non-empty ASCII alphanumerics and `-`
pub(crate) fn catalog_number(raw: String) -> Result<CatalogNumber> {
    CatalogNumber::new(raw).map_err(|e| invalid("catalog_number", e))
}

/// Borrower from email and roll
pub(crate) fn borrower(email: String, roll: u64) -> Result<BorrowerId> {
    if roll == 0 {
        return Err(Error::InvalidInput {
            field: "borrower_roll".to_string(),
            reason: "must be a positive integer".to_string(),
        });
    }
    BorrowerId::new(email, roll).map_err(|e| invalid("borrower_email", e))
}

/// Optional borrower filter: both fields or neither
pub(crate) fn borrower_filter(
    email: Option<String>,
    roll: Option<u64>,
) -> Result<Option<BorrowerId>> {
    match (email, roll) {
        (None, None) => Ok(None),
        (Some(email), Some(roll)) => borrower(email, roll).map(Some),
        (Some(_), None) => Err(Error::InvalidInput {
            field: "borrower_roll".to_string(),
            reason: "required when borrower_email is given".to_string(),
        }),
        (None, Some(_)) => Err(Error::InvalidInput {
            field: "borrower_email".to_string(),
            reason: "required when borrower_roll is given".to_string(),
        }),
    }
}

/// Free text (title, author): non-blank, surrounding whitespace trimmed
pub(crate) fn text(field: &str, raw: String) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

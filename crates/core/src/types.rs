//! Identifier and addressing types
//!
//! - `CatalogNumber`: identifies a book title/edition
//! - `BorrowerId`: identifies a borrower by (email, roll)
//! - `Table` / `Key`: address a row in the authoritative store

use crate::error::{StacksError, StacksResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar date format used on every surface (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Catalog number of a book (validated)
///
/// Non-empty, ASCII alphanumerics and `-` only. Never contains `/`, which
/// keeps loan keys unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CatalogNumber(String);

impl CatalogNumber {
    /// Validate and wrap a catalog number
    pub fn new(raw: impl Into<String>) -> StacksResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(StacksError::invalid_input("catalog number must not be empty"));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
        {
            return Err(StacksError::invalid_input(format!(
                "catalog number '{}' contains invalid character '{}'",
                raw, bad
            )));
        }
        Ok(CatalogNumber(raw))
    }

    /// Borrow as string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CatalogNumber {
    type Error = StacksError;

    fn try_from(value: String) -> StacksResult<Self> {
        CatalogNumber::new(value)
    }
}

impl From<CatalogNumber> for String {
    fn from(value: CatalogNumber) -> Self {
        value.0
    }
}

/// Borrower identity: email plus roll number
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawBorrowerId")]
pub struct BorrowerId {
    email: String,
    roll: u64,
}

#[derive(Deserialize)]
struct RawBorrowerId {
    email: String,
    roll: u64,
}

impl TryFrom<RawBorrowerId> for BorrowerId {
    type Error = StacksError;

    fn try_from(raw: RawBorrowerId) -> StacksResult<Self> {
        BorrowerId::new(raw.email, raw.roll)
    }
}

impl BorrowerId {
    /// Validate and construct a borrower identity
    ///
    /// The email must contain exactly one `@` with non-empty local and
    /// domain parts and no `/` or whitespace. The roll must be positive.
    pub fn new(email: impl Into<String>, roll: u64) -> StacksResult<Self> {
        let email = email.into();
        validate_email(&email)?;
        if roll == 0 {
            return Err(StacksError::invalid_input("borrower roll must be positive"));
        }
        Ok(BorrowerId { email, roll })
    }

    /// Borrower email
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Borrower roll number
    pub fn roll(&self) -> u64 {
        self.roll
    }
}

impl fmt::Display for BorrowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (roll {})", self.email, self.roll)
    }
}

fn validate_email(email: &str) -> StacksResult<()> {
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => {
            return Err(StacksError::invalid_input(format!(
                "email '{}' must contain exactly one '@'",
                email
            )))
        }
    };
    if local.is_empty() || domain.is_empty() {
        return Err(StacksError::invalid_input(format!(
            "email '{}' has an empty local or domain part",
            email
        )));
    }
    if email.contains('/') || email.chars().any(char::is_whitespace) {
        return Err(StacksError::invalid_input(format!(
            "email '{}' contains '/' or whitespace",
            email
        )));
    }
    Ok(())
}

/// Authoritative table a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    /// Inventory Store (BookCopy rows)
    Books,
    /// Loan Table (open loans)
    Loans,
    /// Return Log (closed loans)
    Returns,
}

impl Table {
    /// All tables, in storage order
    pub const ALL: [Table; 3] = [Table::Books, Table::Loans, Table::Returns];

    /// Short lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Books => "books",
            Table::Loans => "loans",
            Table::Returns => "returns",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a row in the store
///
/// Keys order by table first, then by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    /// Table the row lives in
    pub table: Table,
    /// Row id within the table
    pub id: String,
}

impl Key {
    /// Create a key in an arbitrary table
    pub fn new(table: Table, id: impl Into<String>) -> Self {
        Key {
            table,
            id: id.into(),
        }
    }

    /// Key of a BookCopy row (its catalog number)
    pub fn book(catalog_number: &CatalogNumber) -> Self {
        Key::new(Table::Books, catalog_number.as_str())
    }

    /// Key of an open Loan row
    ///
    /// The id is the loan's natural key `catalog/email/roll`, so the
    /// one-open-loan-per-pair rule is a single-key existence check.
    pub fn loan(catalog_number: &CatalogNumber, borrower: &BorrowerId) -> Self {
        Key::new(
            Table::Loans,
            format!("{}/{}/{}", catalog_number, borrower.email(), borrower.roll()),
        )
    }

    /// Key of a ReturnRecord row
    pub fn return_record(id: &uuid::Uuid) -> Self {
        Key::new(Table::Returns, id.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_number_accepts_isbn_like() {
        let cn = CatalogNumber::new("978-0441013593").unwrap();
        assert_eq!(cn.as_str(), "978-0441013593");
        assert_eq!(cn.to_string(), "978-0441013593");
    }

    #[test]
    fn test_catalog_number_rejects_empty_and_slash() {
        assert!(CatalogNumber::new("").is_err());
        assert!(CatalogNumber::new("111/2").is_err());
        assert!(CatalogNumber::new("11 1").is_err());
    }

    #[test]
    fn test_catalog_number_serde_validates() {
        let ok: CatalogNumber = serde_json::from_str("\"111\"").unwrap();
        assert_eq!(ok.as_str(), "111");
        assert!(serde_json::from_str::<CatalogNumber>("\"a/b\"").is_err());
    }

    #[test]
    fn test_borrower_validation() {
        assert!(BorrowerId::new("a@x.com", 1).is_ok());
        assert!(BorrowerId::new("ax.com", 1).is_err());
        assert!(BorrowerId::new("a@b@x.com", 1).is_err());
        assert!(BorrowerId::new("@x.com", 1).is_err());
        assert!(BorrowerId::new("a@", 1).is_err());
        assert!(BorrowerId::new("a/b@x.com", 1).is_err());
        assert!(BorrowerId::new("a@x.com", 0).is_err());
    }

    #[test]
    fn test_loan_key_is_natural_key() {
        let cn = CatalogNumber::new("111").unwrap();
        let b = BorrowerId::new("a@x.com", 7).unwrap();
        let key = Key::loan(&cn, &b);
        assert_eq!(key.table, Table::Loans);
        assert_eq!(key.id, "111/a@x.com/7");
    }

    #[test]
    fn test_loan_keys_distinct_per_pair() {
        let cn = CatalogNumber::new("111").unwrap();
        let a = BorrowerId::new("a@x.com", 1).unwrap();
        let a2 = BorrowerId::new("a@x.com", 2).unwrap();
        assert_ne!(Key::loan(&cn, &a), Key::loan(&cn, &a2));
    }

    #[test]
    fn test_key_ordering_table_first() {
        let book = Key::new(Table::Books, "zzz");
        let loan = Key::new(Table::Loans, "aaa");
        assert!(book < loan);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn borrower() -> impl Strategy<Value = (String, u64)> {
            ("[a-z.]{1,6}@[a-z]{1,6}", 1..4u64)
        }

        proptest! {
            #[test]
            fn loan_keys_equal_only_for_same_pair(
                a in "[A-Za-z0-9-]{1,8}",
                b in "[A-Za-z0-9-]{1,8}",
                (ea, ra) in borrower(),
                (eb, rb) in borrower(),
            ) {
                let ka = Key::loan(&CatalogNumber::new(a.clone()).unwrap(), &BorrowerId::new(ea.clone(), ra).unwrap());
                let kb = Key::loan(&CatalogNumber::new(b.clone()).unwrap(), &BorrowerId::new(eb.clone(), rb).unwrap());
                prop_assert_eq!(ka == kb, (a, ea, ra) == (b, eb, rb));
            }

            #[test]
            fn catalog_number_accepts_exactly_the_allowed_alphabet(raw in "\\PC{0,10}") {
                let allowed = !raw.is_empty()
                    && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
                prop_assert_eq!(CatalogNumber::new(raw).is_ok(), allowed);
            }
        }
    }
}

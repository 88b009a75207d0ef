//! Borrower directory port
//!
//! Borrower registration lives outside the ledger. The ledger only asks
//! whether a borrower exists before it issues a book.

use parking_lot::RwLock;
use stacks_core::types::BorrowerId;
use std::collections::HashSet;

/// Source of truth for which borrowers exist
pub trait BorrowerDirectory: Send + Sync {
    /// True if `borrower` is registered
    fn contains(&self, borrower: &BorrowerId) -> bool;
}

/// Accepts every well-formed borrower id
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyBorrower;

impl BorrowerDirectory for AnyBorrower {
    fn contains(&self, _borrower: &BorrowerId) -> bool {
        true
    }
}

/// Borrowers held in memory
#[derive(Debug, Default)]
pub struct InMemoryBorrowerDirectory {
    borrowers: RwLock<HashSet<BorrowerId>>,
}

impl InMemoryBorrowerDirectory {
    /// Empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a borrower; returns false if already present
    pub fn register(&self, borrower: BorrowerId) -> bool {
        self.borrowers.write().insert(borrower)
    }

    /// Remove a borrower; open loans are unaffected
    pub fn remove(&self, borrower: &BorrowerId) -> bool {
        self.borrowers.write().remove(borrower)
    }

    /// Number of registered borrowers
    pub fn len(&self) -> usize {
        self.borrowers.read().len()
    }

    /// True if nobody is registered
    pub fn is_empty(&self) -> bool {
        self.borrowers.read().is_empty()
    }
}

impl FromIterator<BorrowerId> for InMemoryBorrowerDirectory {
    fn from_iter<I: IntoIterator<Item = BorrowerId>>(iter: I) -> Self {
        InMemoryBorrowerDirectory {
            borrowers: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl BorrowerDirectory for InMemoryBorrowerDirectory {
    fn contains(&self, borrower: &BorrowerId) -> bool {
        self.borrowers.read().contains(borrower)
    }
}

//! Command handlers organized by concern.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `circulation` | IssueBook, ReturnBook |
//! | `inventory` | RegisterBook, GetBook, ListBooks, ListUnavailable |
//! | `history` | ListLoans, ListReturns |
//! | `audit` | Reconcile |
//!
//! Handlers take raw command fields, validate them, call the ledger and
//! shape the output. They hold no state.

pub mod audit;
pub mod circulation;
pub mod history;
pub mod inventory;

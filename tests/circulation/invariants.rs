//! Property tests: the ledger agrees with a simple model and conserves copies
//!
//! For any sequence of issues and returns:
//! - every outcome matches what the model predicts
//! - available + open loans per book equals its registered count
//! - at most one open loan per (book, borrower)

use crate::common::*;
use proptest::prelude::*;
use stacks::{CirculationLedger, Database, IssueError, ReturnError};
use std::collections::{BTreeMap, BTreeSet};

const BOOKS: [&str; 4] = ["111", "222", "333", "404"];
/// Index into BOOKS that is never registered
const UNREGISTERED: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Issue { book: usize, borrower: u64 },
    Return { book: usize, borrower: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..BOOKS.len(), 1..=4u64).prop_map(|(book, borrower)| Op::Issue { book, borrower }),
        (0..BOOKS.len(), 1..=4u64).prop_map(|(book, borrower)| Op::Return { book, borrower }),
    ]
}

fn email(roll: u64) -> String {
    format!("reader{}@x.com", roll)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ledger_matches_model(
        copies in prop::collection::vec(0..3u32, 3),
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let ledger = CirculationLedger::new(Database::ephemeral()).unwrap();
        let mut available: BTreeMap<usize, u32> = BTreeMap::new();
        for (i, &n) in copies.iter().enumerate() {
            ledger.register(&register_req(BOOKS[i], "Dune", n)).unwrap();
            available.insert(i, n);
        }
        let mut loans: BTreeSet<(usize, u64)> = BTreeSet::new();
        let mut closed = 0usize;

        for op in ops {
            match op {
                Op::Issue { book, borrower } => {
                    let result = ledger.issue(&issue_req(BOOKS[book], "Dune", &email(borrower), borrower));
                    if loans.contains(&(book, borrower)) {
                        let is_already_issued = matches!(result, Err(IssueError::AlreadyIssued { .. }));
                        prop_assert!(is_already_issued);
                    } else if book == UNREGISTERED {
                        let is_unknown_book = matches!(result, Err(IssueError::UnknownBook { .. }));
                        prop_assert!(is_unknown_book);
                    } else if available[&book] == 0 {
                        let is_not_available = matches!(result, Err(IssueError::NotAvailable { .. }));
                        prop_assert!(is_not_available);
                    } else {
                        prop_assert!(result.is_ok());
                        loans.insert((book, borrower));
                        *available.get_mut(&book).unwrap() -= 1;
                    }
                }
                Op::Return { book, borrower } => {
                    let result = ledger.return_book(&return_req(BOOKS[book], "Dune", &email(borrower), borrower));
                    if book == UNREGISTERED {
                        let is_unknown_book = matches!(result, Err(ReturnError::UnknownBook { .. }));
                        prop_assert!(is_unknown_book);
                    } else if !loans.contains(&(book, borrower)) {
                        let is_not_issued = matches!(result, Err(ReturnError::NotIssued { .. }));
                        prop_assert!(is_not_issued);
                    } else {
                        prop_assert!(result.is_ok());
                        loans.remove(&(book, borrower));
                        closed += 1;
                        *available.get_mut(&book).unwrap() += 1;
                    }
                }
            }

            let open = ledger.open_loans().unwrap();
            for (i, &initial) in copies.iter().enumerate() {
                let shelf = ledger.book(&cn(BOOKS[i])).unwrap().unwrap().available_count;
                let out = open.iter().filter(|l| l.catalog_number == cn(BOOKS[i])).count() as u32;
                prop_assert_eq!(shelf, available[&i]);
                prop_assert_eq!(shelf + out, initial);
            }
            let pairs: BTreeSet<_> = open
                .iter()
                .map(|l| (l.catalog_number.clone(), l.borrower.clone()))
                .collect();
            prop_assert_eq!(pairs.len(), open.len());
            prop_assert_eq!(open.len(), loans.len());
        }

        // Every closed loan left exactly one return record
        prop_assert_eq!(ledger.returns().unwrap().len(), closed);
    }
}

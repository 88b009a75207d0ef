//! Racing ledger operations across threads

use crate::common::*;
use stacks::IssueError;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn concurrent_issues_for_last_copy_have_one_winner() {
    let t = TestLedger::new();
    t.ledger.register(&register_req("111", "Dune", 1)).unwrap();

    let n = 12;
    let barrier = Arc::new(Barrier::new(n));
    let handles: Vec<_> = (0..n as u64)
        .map(|i| {
            let ledger = Arc::clone(&t.ledger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                ledger.issue(&issue_req("111", "Dune", &format!("r{}@x.com", i), i + 1))
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(IssueError::NotAvailable { .. })))
            .count(),
        n - 1
    );
    assert_eq!(t.available("111"), 0);
    assert_eq!(t.audit_lines("issues.csv").len(), 1);
}

#[test]
fn reconcile_racing_circulation_ends_in_sync() {
    let t = TestLedger::new();
    for catalog in ["111", "222", "333"] {
        t.ledger.register(&register_req(catalog, "Dune", 2)).unwrap();
    }

    let workers = 4;
    let barrier = Arc::new(Barrier::new(workers + 1));
    let mut handles: Vec<_> = (0..workers as u64)
        .map(|i| {
            let ledger = Arc::clone(&t.ledger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let email = format!("r{}@x.com", i);
                for round in 0..15 {
                    let catalog = ["111", "222", "333"][round % 3];
                    if ledger.issue(&issue_req(catalog, "Dune", &email, i + 1)).is_ok() && round % 2 == 0 {
                        ledger
                            .return_book(&return_req(catalog, "Dune", &email, i + 1))
                            .unwrap();
                    }
                }
            })
        })
        .collect();

    let ledger = Arc::clone(&t.ledger);
    let reconciler_barrier = Arc::clone(&barrier);
    handles.push(thread::spawn(move || {
        reconciler_barrier.wait();
        for _ in 0..10 {
            ledger.reconcile().unwrap();
        }
    }));
    for handle in handles {
        handle.join().unwrap();
    }

    // Mirror writes never failed, so there is nothing to heal
    assert!(t.ledger.reconcile().unwrap().is_clean());

    let open = t.ledger.open_loans().unwrap();
    assert_eq!(t.audit_lines("issues.csv").len(), open.len());
    assert_eq!(
        t.audit_lines("returns.csv").len(),
        t.ledger.returns().unwrap().len()
    );
    for catalog in ["111", "222", "333"] {
        let out = open.iter().filter(|l| l.catalog_number == cn(catalog)).count() as u32;
        assert_eq!(t.available(catalog) + out, 2);
    }
}

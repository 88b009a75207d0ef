//! Restart behaviour: committed circulation survives, the mirror is left as is

use crate::common::*;
use std::fs::OpenOptions;
use std::io::Write;

#[test]
fn reopen_recovers_books_loans_and_returns() {
    let t = TestLedger::new();
    t.ledger.register(&register_req("111", "Dune", 2)).unwrap();
    t.ledger.register(&register_req("222", "Emma", 1)).unwrap();
    t.ledger.issue(&issue_req("111", "Dune", "a@x.com", 1)).unwrap();
    t.ledger.issue(&issue_req("222", "Emma", "a@x.com", 1)).unwrap();
    t.clock.advance_days(3);
    t.ledger
        .return_book(&return_req("222", "Emma", "a@x.com", 1))
        .unwrap();
    let version = t.ledger.database().current_version();

    let t = t.reopen();
    assert_eq!(t.ledger.database().current_version(), version);
    assert_eq!(t.available("111"), 1);
    assert_eq!(t.available("222"), 1);

    let loans = t.ledger.open_loans().unwrap();
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].catalog_number, cn("111"));

    let returns = t.ledger.returns().unwrap();
    assert_eq!(returns.len(), 1);
    assert_eq!(returns[0].return_date, date(2024, 3, 4));

    // The mirror was in sync before the restart and still is
    assert!(t.ledger.reconcile().unwrap().is_clean());
    assert_eq!(t.audit_lines("issues.csv").len(), 1);
    assert_eq!(t.audit_lines("returns.csv").len(), 1);
    assert_eq!(t.audit_lines("registrations.csv").len(), 2);
}

#[test]
fn rejected_operations_leave_no_trace_after_reopen() {
    let t = TestLedger::new_strict();
    t.ledger.register(&register_req("111", "Dune", 1)).unwrap();
    t.ledger.issue(&issue_req("111", "Dune", "a@x.com", 1)).unwrap();
    let version = t.ledger.database().current_version();

    assert!(t.ledger.issue(&issue_req("111", "Dune", "b@x.com", 2)).is_err());
    assert!(t.ledger.register(&register_req("111", "Dune", 5)).is_err());
    assert_eq!(t.ledger.database().current_version(), version);

    let t = t.reopen();
    assert_eq!(t.ledger.database().current_version(), version);
    assert_eq!(t.available("111"), 0);
    assert_eq!(t.ledger.open_loans().unwrap().len(), 1);
}

#[test]
fn torn_wal_tail_is_dropped_and_later_commits_survive() {
    let t = TestLedger::new_strict();
    t.ledger.register(&register_req("111", "Dune", 2)).unwrap();
    t.ledger.issue(&issue_req("111", "Dune", "a@x.com", 1)).unwrap();

    // A crash mid-append leaves a partial frame behind
    let t = t.reopen_after(|dir| {
        let mut wal = OpenOptions::new()
            .append(true)
            .open(dir.join("stacks.wal"))
            .unwrap();
        wal.write_all(&[0x2a, 0x00, 0x00]).unwrap();
    });
    assert_eq!(t.available("111"), 1);

    t.ledger.issue(&issue_req("111", "Dune", "b@x.com", 2)).unwrap();
    let t = t.reopen();
    assert_eq!(t.available("111"), 0);
    assert_eq!(t.ledger.open_loans().unwrap().len(), 2);
}

#[test]
fn config_survives_reopen() {
    let t = TestLedger::new_strict();
    let t = t.reopen();
    assert_eq!(t.ledger.database().config().durability, "always");
    assert!(t.path().join("stacks.toml").exists());
}

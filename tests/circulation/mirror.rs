//! Audit mirror: header rows, degraded success, reconciliation

use crate::common::*;
use stacks::MirrorStatus;
use std::fs;

#[test]
fn audit_files_carry_fixed_headers() {
    let t = TestLedger::new();
    t.ledger.register(&register_req("111", "Dune", 1)).unwrap();
    t.ledger.issue(&issue_req("111", "Dune", "a@x.com", 7)).unwrap();
    t.ledger
        .return_book(&return_req("111", "Dune", "a@x.com", 7))
        .unwrap();

    let header = |name: &str| {
        fs::read_to_string(t.audit_file(name))
            .unwrap()
            .lines()
            .next()
            .unwrap()
            .to_string()
    };
    assert_eq!(
        header("issues.csv"),
        "catalog_number,title,author,borrower_email,borrower_roll,issue_date"
    );
    assert_eq!(
        header("returns.csv"),
        "catalog_number,title,borrower_roll,borrower_email,return_date"
    );
    assert_eq!(
        t.audit_lines("returns.csv"),
        vec!["111,Dune,7,a@x.com,2024-03-01".to_string()]
    );
    assert!(t.audit_lines("issues.csv").is_empty());
}

#[test]
fn failed_issue_append_is_degraded_success() {
    let t = TestLedger::new();
    t.ledger.register(&register_req("111", "Dune", 1)).unwrap();
    fs::create_dir_all(t.audit_file("issues.csv")).unwrap();

    let issued = t.ledger.issue(&issue_req("111", "Dune", "a@x.com", 1)).unwrap();
    assert!(matches!(issued.mirror, MirrorStatus::Degraded { .. }));
    assert!(issued.warning().is_some());

    // The authoritative commit stands
    assert_eq!(t.available("111"), 0);
    assert_eq!(t.ledger.open_loans().unwrap().len(), 1);

    fs::remove_dir(t.audit_file("issues.csv")).unwrap();
    let report = t.ledger.reconcile().unwrap();
    assert_eq!(report.issues_added, 1);
    assert_eq!(t.audit_lines("issues.csv").len(), 1);
}

#[test]
fn failed_issue_log_rewrite_leaves_stale_row_until_reconcile() {
    let t = TestLedger::new();
    t.ledger.register(&register_req("111", "Dune", 1)).unwrap();
    t.ledger.issue(&issue_req("111", "Dune", "a@x.com", 1)).unwrap();

    // Block the temp file the rewrite needs
    let blocker = t.ledger.audit_dir().unwrap().join("issues.csv.tmp");
    fs::create_dir_all(blocker.join("blocker")).unwrap();
    let returned = t
        .ledger
        .return_book(&return_req("111", "Dune", "a@x.com", 1))
        .unwrap();
    assert!(returned.is_degraded());
    assert_eq!(t.available("111"), 1);
    assert_eq!(t.audit_lines("returns.csv").len(), 1);
    assert_eq!(t.audit_lines("issues.csv").len(), 1);

    fs::remove_dir_all(&blocker).unwrap();
    let report = t.ledger.reconcile().unwrap();
    assert_eq!(report.issues_removed, 1);
    assert_eq!(report.returns_added, 0);
    assert!(t.audit_lines("issues.csv").is_empty());
}

#[test]
fn reconcile_is_idempotent_and_replays_once() {
    let t = TestLedger::new();
    t.ledger.register(&register_req("111", "Dune", 2)).unwrap();
    t.ledger.issue(&issue_req("111", "Dune", "a@x.com", 1)).unwrap();

    // Lose the whole mirror
    fs::remove_dir_all(t.ledger.audit_dir().unwrap()).unwrap();
    fs::create_dir_all(t.ledger.audit_dir().unwrap()).unwrap();

    let first = t.ledger.reconcile().unwrap();
    assert_eq!(first.registrations_added, 1);
    assert_eq!(first.issues_added, 1);
    assert!(t.ledger.reconcile().unwrap().is_clean());

    assert_eq!(t.audit_lines("issues.csv").len(), 1);
    assert_eq!(t.audit_lines("registrations.csv").len(), 1);
}

//! Issue/return lifecycle and precondition ordering

use crate::common::*;
use stacks::{IssueError, RegisterError, ReturnError};

#[test]
fn issue_return_reissue_lifecycle() {
    let t = TestLedger::new();
    t.ledger.register(&register_req("111", "Dune", 1)).unwrap();

    let loan = t
        .ledger
        .issue(&issue_req("111", "Dune", "a@x.com", 1))
        .unwrap()
        .into_record();
    assert_eq!(loan.issue_date, date(2024, 3, 1));
    assert_eq!(t.available("111"), 0);

    let err = t
        .ledger
        .issue(&issue_req("111", "Dune", "b@x.com", 2))
        .unwrap_err();
    assert_eq!(err, IssueError::NotAvailable { catalog_number: cn("111") });

    t.clock.advance_days(14);
    let record = t
        .ledger
        .return_book(&return_req("111", "Dune", "a@x.com", 1))
        .unwrap()
        .into_record();
    assert_eq!(record.issue_date, date(2024, 3, 1));
    assert_eq!(record.return_date, date(2024, 3, 15));
    assert_eq!(t.available("111"), 1);

    assert!(t.ledger.issue(&issue_req("111", "Dune", "b@x.com", 2)).is_ok());
    assert_eq!(t.available("111"), 0);
}

#[test]
fn issue_preconditions_checked_in_order() {
    let t = TestLedger::new();
    t.ledger.register(&register_req("111", "Dune", 1)).unwrap();
    t.ledger.issue(&issue_req("111", "Dune", "a@x.com", 1)).unwrap();

    // Already issued wins over not available
    assert!(matches!(
        t.ledger.issue(&issue_req("111", "Dune", "a@x.com", 1)),
        Err(IssueError::AlreadyIssued { .. })
    ));
    assert!(matches!(
        t.ledger.issue(&issue_req("222", "Emma", "a@x.com", 1)),
        Err(IssueError::UnknownBook { .. })
    ));
    assert!(matches!(
        t.ledger.issue(&issue_req("111", "Dune", "b@x.com", 2)),
        Err(IssueError::NotAvailable { .. })
    ));

    // Rejections leave nothing behind
    assert_eq!(t.available("111"), 0);
    assert_eq!(t.ledger.open_loans().unwrap().len(), 1);
    assert_eq!(t.audit_lines("issues.csv").len(), 1);
}

#[test]
fn return_preconditions() {
    let t = TestLedger::new();
    t.ledger.register(&register_req("111", "Dune", 2)).unwrap();
    t.ledger.issue(&issue_req("111", "Dune", "a@x.com", 1)).unwrap();

    assert!(matches!(
        t.ledger.return_book(&return_req("111", "Emma", "a@x.com", 1)),
        Err(ReturnError::UnknownBook { .. })
    ));
    assert!(matches!(
        t.ledger.return_book(&return_req("999", "Dune", "a@x.com", 1)),
        Err(ReturnError::UnknownBook { .. })
    ));
    // Same email, different roll: a different borrower
    assert!(matches!(
        t.ledger.return_book(&return_req("111", "Dune", "a@x.com", 2)),
        Err(ReturnError::NotIssued { .. })
    ));

    assert_eq!(t.available("111"), 1);
    assert!(t.ledger.returns().unwrap().is_empty());
}

#[test]
fn return_closes_only_the_matching_loan() {
    let t = TestLedger::new();
    t.ledger.register(&register_req("111", "Dune", 1)).unwrap();
    t.ledger.register(&register_req("222", "Emma", 1)).unwrap();
    t.ledger.issue(&issue_req("111", "Dune", "a@x.com", 1)).unwrap();
    t.ledger.issue(&issue_req("222", "Emma", "a@x.com", 1)).unwrap();

    t.ledger
        .return_book(&return_req("111", "Dune", "a@x.com", 1))
        .unwrap();

    let open = t.ledger.loans_for(&who("a@x.com", 1)).unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].catalog_number, cn("222"));
    assert_eq!(t.available("111"), 1);
    assert_eq!(t.available("222"), 0);

    let issues = t.audit_lines("issues.csv");
    assert_eq!(issues.len(), 1);
    assert!(issues[0].starts_with("222,"));
}

#[test]
fn duplicate_registration_refused() {
    let t = TestLedger::new();
    t.ledger.register(&register_req("111", "Dune", 3)).unwrap();
    assert_eq!(
        t.ledger.register(&register_req("111", "Other", 9)).unwrap_err(),
        RegisterError::DuplicateCatalogNumber { catalog_number: cn("111") }
    );
    let book = t.ledger.book(&cn("111")).unwrap().unwrap();
    assert_eq!((book.title.as_str(), book.available_count), ("Dune", 3));
    assert_eq!(t.audit_lines("registrations.csv").len(), 1);
}

#[test]
fn loan_uses_catalog_title_and_author() {
    let t = TestLedger::new();
    t.ledger.register(&register_req("111", "Dune", 1)).unwrap();
    let mut request = issue_req("111", "dune (paperback)", "a@x.com", 1);
    request.author = "F. Herbert".to_string();

    let loan = t.ledger.issue(&request).unwrap().into_record();
    assert_eq!(loan.title, "Dune");
    assert_eq!(loan.author, "Herbert");
}

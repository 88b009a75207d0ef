//! The JSON command boundary through the facade

use stacks::{Command, Error, Executor, Output};

fn run(executor: &Executor, json: &str) -> stacks::Result<Output> {
    let cmd: Command = serde_json::from_str(json).expect("valid command JSON");
    executor.execute(cmd)
}

#[test]
fn json_commands_drive_the_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let executor = Executor::open(dir.path()).unwrap();

    run(
        &executor,
        r#"{"RegisterBook":{"catalog_number":"111","title":"Dune","author":"Herbert","initial_available":1}}"#,
    )
    .unwrap();
    let issue_a = r#"{"IssueBook":{"catalog_number":"111","title":"Dune","author":"Herbert","borrower_email":"a@x.com","borrower_roll":1}}"#;
    let issue_b = r#"{"IssueBook":{"catalog_number":"111","title":"Dune","author":"Herbert","borrower_email":"b@x.com","borrower_roll":2}}"#;

    assert!(matches!(run(&executor, issue_a), Ok(Output::Issued { warning: None, .. })));
    assert_eq!(
        run(&executor, issue_b),
        Err(Error::NotAvailable {
            catalog_number: "111".into()
        })
    );
    assert!(matches!(
        run(
            &executor,
            r#"{"ReturnBook":{"catalog_number":"111","title":"Dune","borrower_email":"a@x.com","borrower_roll":1}}"#
        ),
        Ok(Output::Returned { .. })
    ));
    assert!(matches!(run(&executor, issue_b), Ok(Output::Issued { .. })));

    match run(&executor, r#"{"GetBook":{"catalog_number":"111"}}"#).unwrap() {
        Output::Book(Some(book)) => assert_eq!(book.available_count, 0),
        other => panic!("{:?}", other),
    }
    assert!(matches!(
        run(&executor, r#""Reconcile""#),
        Ok(Output::Reconciled(report)) if report.is_clean()
    ));
}

#[test]
fn second_open_of_same_directory_refused() {
    let dir = tempfile::tempdir().unwrap();
    let _first = Executor::open(dir.path()).unwrap();
    assert!(Executor::open(dir.path()).is_err());
}

#[test]
fn errors_serialize_for_clients() {
    let executor = Executor::ephemeral().unwrap();
    let err = run(
        &executor,
        r#"{"ListReturns":{"borrower_email":"nobody","borrower_roll":1}}"#,
    )
    .unwrap_err();
    let value = serde_json::to_value(&err).unwrap();
    assert_eq!(value["InvalidInput"]["field"], "borrower_email");
}

//! Output → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): one line per record
//! - **JSON** (`--json`): `serde_json::to_string_pretty` of the output or error

use stacks_executor::{BookCopy, Error, Loan, Output, ReconcileReport, ReturnRecord};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a successful output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(output)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({ "error": err }))
            .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("(error) {}", err),
    }
}

fn format_human(output: &Output) -> String {
    match output {
        Output::Pong { version } => format!("PONG {}", version),
        Output::Registered { book, .. } => format!("Registered {}", book_line(book)),
        Output::Issued { message, .. } | Output::Returned { message, .. } => message.clone(),
        Output::Book(Some(book)) => book_line(book),
        Output::Book(None) => "(nil)".to_string(),
        Output::Books(books) => lines(books, book_line),
        Output::Loans(loans) => lines(loans, loan_line),
        Output::Returns(records) => lines(records, return_line),
        Output::Reconciled(report) => reconcile_line(report),
    }
}

fn lines<T>(items: &[T], line: fn(&T) -> String) -> String {
    if items.is_empty() {
        return "(empty list)".to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}) {}", i + 1, line(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn book_line(book: &BookCopy) -> String {
    format!(
        "{} \"{}\" by {} ({} available)",
        book.catalog_number, book.title, book.author, book.available_count
    )
}

fn loan_line(loan: &Loan) -> String {
    format!(
        "{} \"{}\" issued to {} on {}",
        loan.catalog_number, loan.title, loan.borrower, loan.issue_date
    )
}

fn return_line(record: &ReturnRecord) -> String {
    format!(
        "{} \"{}\" {} issued {} returned {}",
        record.catalog_number, record.title, record.borrower, record.issue_date, record.return_date
    )
}

fn reconcile_line(report: &ReconcileReport) -> String {
    if report.is_clean() {
        return "Audit mirror already in sync".to_string();
    }
    format!(
        "Audit mirror healed: registrations +{}, issues +{} -{}, returns +{}",
        report.registrations_added,
        report.issues_added,
        report.issues_removed,
        report.returns_added
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_empty_and_nil() {
        assert_eq!(format_output(&Output::Books(vec![]), OutputMode::Human), "(empty list)");
        assert_eq!(format_output(&Output::Book(None), OutputMode::Human), "(nil)");
    }

    #[test]
    fn test_reconcile_lines() {
        let clean = Output::Reconciled(ReconcileReport::default());
        assert_eq!(
            format_output(&clean, OutputMode::Human),
            "Audit mirror already in sync"
        );
        let healed = Output::Reconciled(ReconcileReport {
            issues_added: 1,
            returns_added: 2,
            ..Default::default()
        });
        assert_eq!(
            format_output(&healed, OutputMode::Human),
            "Audit mirror healed: registrations +0, issues +1 -0, returns +2"
        );
    }

    #[test]
    fn test_error_modes() {
        let err = Error::NotAvailable {
            catalog_number: "111".into(),
        };
        assert_eq!(
            format_error(&err, OutputMode::Human),
            "(error) no copy of 111 is available"
        );
        let json: serde_json::Value =
            serde_json::from_str(&format_error(&err, OutputMode::Json)).unwrap();
        assert_eq!(json["error"]["NotAvailable"]["catalog_number"], "111");
    }
}

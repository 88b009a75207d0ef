//! ArgMatches → Command conversion.
//!
//! Field values are passed through raw; the executor validates them.

use clap::ArgMatches;
use stacks_executor::{Command, Error};

fn string(m: &ArgMatches, id: &str) -> String {
    m.get_one::<String>(id).cloned().unwrap_or_default()
}

fn number<T: Copy + Send + Sync + 'static>(m: &ArgMatches, id: &str) -> Option<T> {
    m.get_one::<T>(id).copied()
}

/// Translate a parsed subcommand into the command to execute.
pub fn matches_to_command(matches: &ArgMatches) -> Result<Command, Error> {
    let Some((name, m)) = matches.subcommand() else {
        return Err(Error::InvalidInput {
            field: "command".to_string(),
            reason: "no subcommand given".to_string(),
        });
    };

    let cmd = match name {
        "ping" => Command::Ping,
        "register" => Command::RegisterBook {
            catalog_number: string(m, "catalog"),
            title: string(m, "title"),
            author: string(m, "author"),
            initial_available: number(m, "copies").unwrap_or(1),
        },
        "issue" => Command::IssueBook {
            catalog_number: string(m, "catalog"),
            title: string(m, "title"),
            author: string(m, "author"),
            borrower_email: string(m, "email"),
            borrower_roll: number(m, "roll").unwrap_or_default(),
        },
        "return" => Command::ReturnBook {
            catalog_number: string(m, "catalog"),
            title: string(m, "title"),
            borrower_email: string(m, "email"),
            borrower_roll: number(m, "roll").unwrap_or_default(),
        },
        "book" => Command::GetBook {
            catalog_number: string(m, "catalog"),
        },
        "books" if m.get_flag("unavailable") => Command::ListUnavailable,
        "books" => Command::ListBooks,
        "loans" => Command::ListLoans {
            borrower_email: m.get_one::<String>("email").cloned(),
            borrower_roll: number(m, "roll"),
        },
        "returns" => Command::ListReturns {
            borrower_email: string(m, "email"),
            borrower_roll: number(m, "roll").unwrap_or_default(),
        },
        "reconcile" => Command::Reconcile,
        "exec" => parse_json_command(&string(m, "command"))?,
        other => {
            return Err(Error::InvalidInput {
                field: "command".to_string(),
                reason: format!("unknown subcommand '{}'", other),
            })
        }
    };
    Ok(cmd)
}

/// Parse a JSON-encoded `Command`.
pub fn parse_json_command(text: &str) -> Result<Command, Error> {
    serde_json::from_str(text).map_err(|e| Error::InvalidInput {
        field: "command".to_string(),
        reason: e.to_string(),
    })
}

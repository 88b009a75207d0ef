//! Clap command tree definition.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("stacks")
        .about("Library circulation ledger")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg(
            Arg::new("db")
                .long("db")
                .value_name("DIR")
                .help("Data directory (default: .stacks)")
                .global(true),
        )
        .arg(
            Arg::new("ephemeral")
                .long("ephemeral")
                .help("In-memory database, no files and no audit mirror")
                .action(ArgAction::SetTrue)
                .conflicts_with("db")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_register())
        .subcommand(build_issue())
        .subcommand(build_return())
        .subcommand(
            Command::new("book")
                .about("Show one book")
                .arg(catalog_arg()),
        )
        .subcommand(
            Command::new("books").about("List books").arg(
                Arg::new("unavailable")
                    .long("unavailable")
                    .help("Only books with no copy on the shelf")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(
            Command::new("loans")
                .about("List open loans")
                .arg(
                    Arg::new("email")
                        .long("email")
                        .help("Only loans of this borrower (needs --roll)")
                        .requires("roll"),
                )
                .arg(
                    Arg::new("roll")
                        .long("roll")
                        .help("Borrower roll number (needs --email)")
                        .value_parser(value_parser!(u64))
                        .requires("email"),
                ),
        )
        .subcommand(
            Command::new("returns")
                .about("List a borrower's closed loans")
                .arg(email_arg())
                .arg(roll_arg()),
        )
        .subcommand(Command::new("reconcile").about("Heal the audit mirror from the ledger"))
        .subcommand(Command::new("ping").about("Check the database opens"))
        .subcommand(
            Command::new("exec")
                .about("Execute one JSON-encoded command")
                .arg(
                    Arg::new("command")
                        .required(true)
                        .help(r#"e.g. '{"GetBook":{"catalog_number":"111"}}'"#),
                ),
        )
}

fn build_register() -> Command {
    Command::new("register")
        .about("Register a book")
        .arg(catalog_arg())
        .arg(Arg::new("title").required(true).help("Title"))
        .arg(Arg::new("author").required(true).help("Author"))
        .arg(
            Arg::new("copies")
                .long("copies")
                .help("Copies on the shelf")
                .value_parser(value_parser!(u32))
                .default_value("1"),
        )
}

fn build_issue() -> Command {
    Command::new("issue")
        .about("Issue a book to a borrower")
        .arg(catalog_arg())
        .arg(Arg::new("title").required(true).help("Title"))
        .arg(Arg::new("author").required(true).help("Author"))
        .arg(email_arg())
        .arg(roll_arg())
}

fn build_return() -> Command {
    Command::new("return")
        .about("Return a borrowed book")
        .arg(catalog_arg())
        .arg(Arg::new("title").required(true).help("Title"))
        .arg(email_arg())
        .arg(roll_arg())
}

fn catalog_arg() -> Arg {
    Arg::new("catalog")
        .required(true)
        .help("Catalog number")
}

fn email_arg() -> Arg {
    Arg::new("email")
        .long("email")
        .required(true)
        .help("Borrower email")
}

fn roll_arg() -> Arg {
    Arg::new("roll")
        .long("roll")
        .required(true)
        .help("Borrower roll number")
        .value_parser(value_parser!(u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_tree_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_db_conflicts_with_ephemeral() {
        let result = build_cli().try_get_matches_from(["stacks", "--db", "d", "--ephemeral", "books"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_loans_filter_needs_both_parts() {
        assert!(build_cli()
            .try_get_matches_from(["stacks", "loans", "--email", "a@x.com"])
            .is_err());
        assert!(build_cli()
            .try_get_matches_from(["stacks", "loans", "--email", "a@x.com", "--roll", "1"])
            .is_ok());
    }
}

//! Stacks CLI: one-shot driver for the circulation ledger.
//!
//! `stacks [--db DIR | --ephemeral] [--json] <subcommand>`
//!
//! Exit code 0 on success, including degraded success (the warning goes to
//! stderr), 1 on any error.

mod commands;
mod format;
mod parse;

use std::process;

use stacks_executor::Executor;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_output, OutputMode};
use parse::matches_to_command;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = build_cli().get_matches();
    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let executor = match open_executor(&matches) {
        Ok(executor) => executor,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    process::exit(run(&executor, &matches, mode));
}

fn open_executor(matches: &clap::ArgMatches) -> Result<Executor, String> {
    if matches.get_flag("ephemeral") {
        return Executor::ephemeral()
            .map_err(|e| format!("Failed to open ephemeral database: {}", e));
    }
    let path = matches
        .get_one::<String>("db")
        .map(|s| s.as_str())
        .unwrap_or(".stacks");
    Executor::open(path).map_err(|e| format!("Failed to open database at {}: {}", path, e))
}

fn run(executor: &Executor, matches: &clap::ArgMatches, mode: OutputMode) -> i32 {
    let result = matches_to_command(matches).and_then(|cmd| executor.execute(cmd));
    match result {
        Ok(output) => {
            println!("{}", format_output(&output, mode));
            if let Some(warning) = output.warning() {
                eprintln!("warning: {}", warning);
            }
            0
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            1
        }
    }
}

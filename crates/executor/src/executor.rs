//! The Executor - single entry point to the circulation ledger.
//!
//! The Executor is a stateless dispatcher: it validates command fields,
//! routes each command to its handler and converts the result to an
//! `Output`.

use std::path::Path;
use std::sync::Arc;

use stacks_engine::{CirculationLedger, Database};
use tracing::debug;

use crate::handlers::{audit, circulation, history, inventory};
use crate::{Command, Output, Result};

/// The command executor.
///
/// Executor is `Send + Sync`; share one behind an `Arc` across request
/// threads. All state lives in the ledger.
///
/// # Example
///
/// ```ignore
/// use stacks_executor::{Command, Executor};
///
/// let executor = Executor::open("/path/to/data")?;
/// executor.execute(Command::RegisterBook {
///     catalog_number: "111".into(),
///     title: "Dune".into(),
///     author: "Herbert".into(),
///     initial_available: 1,
/// })?;
/// ```
pub struct Executor {
    ledger: Arc<CirculationLedger>,
}

impl Executor {
    /// Create an executor over an existing ledger.
    pub fn new(ledger: Arc<CirculationLedger>) -> Self {
        Self { ledger }
    }

    /// Open (or create) the database at `path` and wrap its ledger.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = Database::open(path)?;
        Ok(Self::new(Arc::new(CirculationLedger::new(db)?)))
    }

    /// Executor over an in-memory database with no audit mirror.
    pub fn ephemeral() -> Result<Self> {
        let ledger = CirculationLedger::new(Database::ephemeral())?;
        Ok(Self::new(Arc::new(ledger)))
    }

    /// The ledger commands run against.
    pub fn ledger(&self) -> &Arc<CirculationLedger> {
        &self.ledger
    }

    /// Execute a single command.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        let name = cmd.name();
        let result = self.dispatch(cmd);
        match &result {
            Ok(output) => debug!(
                target: "stacks::executor",
                command = name,
                degraded = output.warning().is_some(),
                "Command executed"
            ),
            Err(e) => debug!(target: "stacks::executor", command = name, error = %e, "Command failed"),
        }
        result
    }

    /// Execute commands in order, one result per command.
    ///
    /// A failing command does not stop the batch.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }

    fn dispatch(&self, cmd: Command) -> Result<Output> {
        let ledger = &self.ledger;
        match cmd {
            Command::Ping => Ok(Output::Pong {
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),

            // Inventory
            Command::RegisterBook {
                catalog_number,
                title,
                author,
                initial_available,
            } => inventory::register_book(ledger, catalog_number, title, author, initial_available),
            Command::GetBook { catalog_number } => inventory::get_book(ledger, catalog_number),
            Command::ListBooks => inventory::list_books(ledger),
            Command::ListUnavailable => inventory::list_unavailable(ledger),

            // Circulation
            Command::IssueBook {
                catalog_number,
                title,
                author,
                borrower_email,
                borrower_roll,
            } => circulation::issue_book(
                ledger,
                catalog_number,
                title,
                author,
                borrower_email,
                borrower_roll,
            ),
            Command::ReturnBook {
                catalog_number,
                title,
                borrower_email,
                borrower_roll,
            } => circulation::return_book(
                ledger,
                catalog_number,
                title,
                borrower_email,
                borrower_roll,
            ),

            // History
            Command::ListLoans {
                borrower_email,
                borrower_roll,
            } => history::list_loans(ledger, borrower_email, borrower_roll),
            Command::ListReturns {
                borrower_email,
                borrower_roll,
            } => history::list_returns(ledger, borrower_email, borrower_roll),

            // Audit
            Command::Reconcile => audit::reconcile(ledger),
        }
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").field("ledger", &self.ledger).finish()
    }
}

//! Audit mirror handlers.

use std::sync::Arc;

use stacks_engine::CirculationLedger;

use crate::{Output, Result};

/// Handle Reconcile command.
pub fn reconcile(ledger: &Arc<CirculationLedger>) -> Result<Output> {
    Ok(Output::Reconciled(ledger.reconcile()?))
}

//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use chrono::NaiveDate;
use stacks::{
    BorrowerId, CatalogNumber, CirculationLedger, Database, FixedClock, IssueRequest,
    RegisterRequest, ReturnRequest, StacksConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn cn(s: &str) -> CatalogNumber {
    CatalogNumber::new(s).unwrap()
}

pub fn who(email: &str, roll: u64) -> BorrowerId {
    BorrowerId::new(email, roll).unwrap()
}

/// Create a StacksConfig with always durability mode.
pub fn always_config() -> StacksConfig {
    StacksConfig {
        durability: "always".to_string(),
        ..StacksConfig::default()
    }
}

pub fn register_req(catalog: &str, title: &str, copies: u32) -> RegisterRequest {
    RegisterRequest {
        catalog_number: cn(catalog),
        title: title.to_string(),
        author: "Herbert".to_string(),
        initial_available: copies,
    }
}

pub fn issue_req(catalog: &str, title: &str, email: &str, roll: u64) -> IssueRequest {
    IssueRequest {
        catalog_number: cn(catalog),
        title: title.to_string(),
        author: "Herbert".to_string(),
        borrower: who(email, roll),
    }
}

pub fn return_req(catalog: &str, title: &str, email: &str, roll: u64) -> ReturnRequest {
    ReturnRequest {
        catalog_number: cn(catalog),
        title: title.to_string(),
        borrower: who(email, roll),
    }
}

// ============================================================================
// TestLedger - disk-backed ledger with a pinned clock
// ============================================================================

/// Ledger over a temp data directory, dated 2024-03-01 until moved.
pub struct TestLedger {
    pub ledger: Arc<CirculationLedger>,
    pub clock: Arc<FixedClock>,
    pub dir: TempDir,
}

impl TestLedger {
    /// Standard durability.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = Database::open(dir.path()).expect("Failed to create test database");
        Self::wrap(db, Arc::new(FixedClock::new(date(2024, 3, 1))), dir)
    }

    /// Fsync on every commit.
    pub fn new_strict() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = Database::open_with_config(dir.path(), always_config())
            .expect("Failed to create test database");
        Self::wrap(db, Arc::new(FixedClock::new(date(2024, 3, 1))), dir)
    }

    fn wrap(db: Arc<Database>, clock: Arc<FixedClock>, dir: TempDir) -> Self {
        let ledger = CirculationLedger::new(db)
            .expect("Failed to open ledger")
            .with_clock(clock.clone());
        TestLedger {
            ledger: Arc::new(ledger),
            clock,
            dir,
        }
    }

    /// Close everything and open the same directory again.
    ///
    /// Panics if another handle to the ledger is still alive.
    pub fn reopen(self) -> Self {
        self.reopen_after(|_| {})
    }

    /// Close everything, let `tamper` touch the data directory, then reopen.
    pub fn reopen_after(self, tamper: impl FnOnce(&Path)) -> Self {
        let TestLedger { ledger, clock, dir } = self;
        drop(Arc::try_unwrap(ledger).expect("ledger still shared"));
        tamper(dir.path());
        let db = Database::open(dir.path()).expect("Failed to reopen test database");
        Self::wrap(db, clock, dir)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn audit_file(&self, name: &str) -> PathBuf {
        self.ledger.audit_dir().unwrap().join(name)
    }

    /// Data rows of an audit CSV file (header stripped), as raw lines.
    pub fn audit_lines(&self, name: &str) -> Vec<String> {
        match std::fs::read_to_string(self.audit_file(name)) {
            Ok(text) => text.lines().skip(1).map(str::to_string).collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => panic!("cannot read {}: {}", name, e),
        }
    }

    /// Available copies of one book.
    pub fn available(&self, catalog: &str) -> u32 {
        self.ledger
            .book(&cn(catalog))
            .unwrap()
            .expect("book not registered")
            .available_count
    }
}

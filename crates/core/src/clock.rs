//! Calendar date source
//!
//! The ledger stamps loans and returns with a date, never a time. Routing
//! that through a trait lets tests pin the date.

use chrono::{Datelike, NaiveDate};
use std::sync::atomic::{AtomicI32, Ordering};

/// Source of today's date
pub trait Clock: Send + Sync {
    /// Today's calendar date
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Settable clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    days_from_ce: AtomicI32,
}

impl FixedClock {
    /// Clock frozen at `date`
    pub fn new(date: NaiveDate) -> Self {
        FixedClock {
            days_from_ce: AtomicI32::new(date.num_days_from_ce()),
        }
    }

    /// Move the clock to `date`
    pub fn set(&self, date: NaiveDate) {
        self.days_from_ce
            .store(date.num_days_from_ce(), Ordering::SeqCst);
    }

    /// Move the clock forward by `days`
    pub fn advance_days(&self, days: i32) {
        self.days_from_ce.fetch_add(days, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        let days = self.days_from_ce.load(Ordering::SeqCst);
        // Only ever set from a valid NaiveDate, plus small test offsets.
        NaiveDate::from_num_days_from_ce_opt(days).unwrap_or(NaiveDate::MIN)
    }
}

// ⏰ Clock - the "current date" made explicit
//
// Credit/Debit stamp transactions with today's calendar date. The date source is
// injected so tests (and replays) are deterministic.

use chrono::{Local, NaiveDate};

/// Date format used in persisted transactions
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the device
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

use chrono::{DateTime, NaiveDate, Utc};

use crate::utils::time::date_at_ist;

/// Source of "now". Injected wherever today's date matters so tests can
/// pin the calendar to a known instant.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    /// Today's calendar date at the organization's timezone.
    fn today_ist(&self) -> NaiveDate {
        date_at_ist(self.now_utc())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

//! Time source used to resolve "today" and write timestamps.

use chrono::{Local, NaiveDate, NaiveTime, Utc};

pub trait Clock {
    /// Current local calendar day.
    fn today(&self) -> NaiveDate;
    /// Current instant as Unix epoch milliseconds.
    fn now_epoch_ms(&self) -> i64;
}

/// Wall clock in the process-local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_epoch_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for deterministic callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    today: NaiveDate,
    epoch_ms: i64,
}

impl FixedClock {
    /// Pins the clock to `today`, with epoch time at that day's UTC midnight.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            epoch_ms: today.and_time(NaiveTime::MIN).and_utc().timestamp_millis(),
        }
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    /// Moves the clock forward by whole days.
    pub fn advance_days(&mut self, days: u64) {
        if let Some(next) = self.today.checked_add_days(chrono::Days::new(days)) {
            self.set_today(next);
        }
    }

    /// Moves the instant forward without changing the day.
    pub fn tick_ms(&mut self, millis: i64) {
        self.epoch_ms += millis;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_epoch_ms(&self) -> i64 {
        self.epoch_ms
    }
}

//! Test doubles shared by the unit tests.

use crate::audit::AuditLog;
use crate::exchange::client::RateProvider;
use crate::model::rates::{DateRates, Rate};
use chat_common::currency::Currency;
use chat_common::{ChatError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Provider answering from memory, recording every requested date.
#[derive(Default)]
pub struct StubProvider {
    failing: Vec<NaiveDate>,
    fail_all: bool,
    panic_all: bool,
    delay: Option<Duration>,
    requested: Mutex<Vec<NaiveDate>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubProvider {
    pub fn failing_on(dates: Vec<NaiveDate>) -> Self {
        Self {
            failing: dates,
            ..Self::default()
        }
    }

    pub fn always_failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn panicking() -> Self {
        Self {
            panic_all: true,
            ..Self::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn requested(&self) -> Vec<NaiveDate> {
        self.requested.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl RateProvider for StubProvider {
    fn fetch(&self, date: NaiveDate) -> Result<DateRates> {
        self.requested.lock().unwrap().push(date);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_all {
            panic!("provider bug while fetching {}", date);
        }
        if self.fail_all || self.failing.contains(&date) {
            return Err(ChatError::fetch(date, "stubbed failure"));
        }
        let mut rates = BTreeMap::new();
        rates.insert(Currency::EUR, Rate { sale: Some(41.5), purchase: Some(40.5) });
        rates.insert(Currency::USD, Rate { sale: Some(38.0), purchase: None });
        Ok(DateRates { date, rates })
    }
}

/// Audit log that only counts appends.
#[derive(Default)]
pub struct CountingAudit {
    entries: AtomicUsize,
}

impl CountingAudit {
    pub fn count(&self) -> usize {
        self.entries.load(Ordering::SeqCst)
    }
}

impl AuditLog for CountingAudit {
    fn append(&self, _at: NaiveDateTime) -> Result<()> {
        self.entries.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Audit log whose target cannot be written, counting attempts.
#[derive(Default)]
pub struct FailingAudit {
    attempts: AtomicUsize,
}

impl FailingAudit {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl AuditLog for FailingAudit {
    fn append(&self, _at: NaiveDateTime) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ChatError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "audit log is read-only",
        )))
    }
}

/// Names "User 1", "User 2", ... in registration order.
pub fn sequential_names() -> impl Fn() -> String + Send + Sync {
    let next = AtomicUsize::new(1);
    move || format!("User {}", next.fetch_add(1, Ordering::SeqCst))
}

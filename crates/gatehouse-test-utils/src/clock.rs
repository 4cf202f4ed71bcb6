//! Controllable clock for tests.

use chrono::{DateTime, Duration, Utc};
pub use gatehouse_service::clock::Clock;
use std::sync::Mutex;

/// Clock that only moves when told to.
///
/// Shared between a component under test and the test body through an
/// `Arc`, so the test can issue a token, move time past its expiry, and
/// observe the rejection.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Clock fixed at a Unix timestamp.
    pub fn at_timestamp(timestamp: i64) -> Self {
        let now = DateTime::from_timestamp(timestamp, 0).expect("Timestamp should be in range");
        Self::new(now)
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("Clock lock should not be poisoned") = now;
    }

    /// Move the clock forward, or backward with a negative value.
    pub fn advance_seconds(&self, seconds: i64) {
        let mut now = self.now.lock().expect("Clock lock should not be poisoned");
        *now = *now + Duration::seconds(seconds);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("Clock lock should not be poisoned")
    }
}

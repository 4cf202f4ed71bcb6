//! Time source abstraction.
//!
//! Token expiry decisions depend on "now", so the codec takes its time from
//! a [`Clock`] trait object instead of calling `Utc::now()` directly. Tests
//! inject a fixed clock and drive it forward deterministically.

use chrono::{DateTime, Utc};

/// Supplies the current time for issuance and expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// In the lib test build, `gatehouse_test_utils` links the separately compiled
// (non-test) `gatehouse_service` rlib, so its `FixedClock` implements that
// crate identity's `Clock`, not this one's. Bridge the two identities so unit
// tests can coerce `Arc<FixedClock>` to `Arc<dyn Clock>` (REVIEW_FINDINGS.md
// F5); the orphan rule permits this because the trait is local here.
#[cfg(test)]
impl Clock for gatehouse_test_utils::FixedClock {
    fn now(&self) -> DateTime<Utc> {
        gatehouse_test_utils::clock::Clock::now(self)
    }
}

//! Time source abstraction.
//!
//! The business-hours condition (see `pdp_policy::condition`) falls back to
//! the wall clock when a request's environment omits `time`. That fallback
//! is preserved from the original implementation, but routed through this
//! trait so tests can pin it instead of depending on real time.

use chrono::{DateTime, Utc};

/// Something that can report the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the real wall clock. The default in non-test code.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant. Used by tests that exercise the
/// `business-hours` fallback deterministically.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_returns_pinned_instant() {
        let instant = Utc.with_ymd_and_hms(2026, 7, 26, 14, 30, 0).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
    }
}

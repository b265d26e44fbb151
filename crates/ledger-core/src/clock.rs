//! Time source for block timestamps.
use crate::constants::TIMESTAMP_FORMAT;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// Supplies the instant a block is created at. Injected into the ledger so
/// block construction stays deterministic under test.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Human-readable rendering stored in `Block::created_at`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_like_a_date_string() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(at), "Thu Jan 01 2026 00:00:00 GMT+0000");
    }

    #[test]
    fn fixed_clock_does_not_move() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 12, 30, 5).unwrap();
        let clock = FixedClock(at);
        assert_eq!(clock.now(), clock.now());
        assert_eq!(format_timestamp(clock.now()), "Fri Oct 16 2026 12:30:05 GMT+0000");
    }
}

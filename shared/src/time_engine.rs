//! Time Engine - wall clock sources for the dial
//!
//! The dial shows `origin + now`, where `now` is seconds since the process
//! started. This module computes the origin that makes the dial show real
//! local time, and provides the monotonic `now` itself.

use std::time::Instant;

use chrono::{DateTime, Local, Timelike, Utc};
use chrono_tz::Tz;

/// Seconds in one revolution of the hour pointer
pub const DIAL_PERIOD_SECS: f64 = 12.0 * 3600.0;

/// Monotonic seconds since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct ProcessClock {
    started: Instant,
}

impl ProcessClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn now_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

impl Default for ProcessClock {
    fn default() -> Self {
        Self::start()
    }
}

/// Local time of day at `instant`, folded into one dial period
///
/// Uses `tz` when given, otherwise the system's local offset.
pub fn dial_seconds_at(tz: Option<Tz>, instant: DateTime<Utc>) -> f64 {
    let (secs, nanos) = match tz {
        Some(tz) => {
            let local = instant.with_timezone(&tz);
            (local.num_seconds_from_midnight(), local.nanosecond())
        }
        None => {
            let local = instant.with_timezone(&Local);
            (local.num_seconds_from_midnight(), local.nanosecond())
        }
    };
    // Leap seconds report nanos >= 1e9; clamp them into the same second
    let fraction = f64::from(nanos.min(999_999_999)) / 1_000_000_000.0;
    (f64::from(secs) + fraction).rem_euclid(DIAL_PERIOD_SECS)
}

/// Origin that makes the dial show real local time
///
/// `now_secs` is the process clock reading taken at `instant`.
pub fn baseline_origin(tz: Option<Tz>, instant: DateTime<Utc>, now_secs: f64) -> f64 {
    dial_seconds_at(tz, instant) - now_secs
}

/// Parse a timezone string into a Tz, with fallback
pub fn parse_timezone(tz_str: &str) -> Result<Tz, String> {
    tz_str
        .parse::<Tz>()
        .map_err(|_| format!("Invalid timezone: {}", tz_str))
}

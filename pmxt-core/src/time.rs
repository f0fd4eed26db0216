//! Time utilities
//!
//! All timestamps are `i64` milliseconds since the Unix epoch, UTC.
//!
//! Components that age state (the snapshot store) read time through the
//! [`Clock`] trait so tests can drive expiry with a [`ManualClock`].
//!
//! ```rust
//! use pmxt_core::time::{Clock, ManualClock, milliseconds, iso8601};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new(1_000);
//! clock.advance(Duration::from_secs(2));
//! assert_eq!(clock.now_ms(), 3_000);
//!
//! assert!(milliseconds() > 0);
//! assert_eq!(iso8601(0).unwrap(), "1970-01-01T00:00:00.000Z");
//! ```

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use crate::error::{ParseError, Result};

/// Returns the current time in milliseconds since the Unix epoch
#[inline]
pub fn milliseconds() -> i64 {
    Utc::now().timestamp_millis()
}

/// Formats a millisecond timestamp as ISO 8601 with millisecond precision.
pub fn iso8601(timestamp: i64) -> Result<String> {
    let dt = Utc
        .timestamp_millis_opt(timestamp)
        .single()
        .ok_or_else(|| ParseError::timestamp_owned(format!("Timestamp out of range: {timestamp}")))?;
    Ok(dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}

/// Parses an RFC 3339 or naive ISO 8601 date into a UTC datetime.
///
/// Venues disagree on whether they send an offset; naive values are read as UTC.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    if value.is_empty() {
        return Err(ParseError::timestamp("Empty datetime string").into());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(ParseError::timestamp_owned(format!("Unable to parse datetime: {value}")).into())
}

/// Converts a duration to whole milliseconds, saturating at `i64::MAX`.
#[inline]
pub fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

/// Source of the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        milliseconds()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Starts at `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(now_ms),
        }
    }

    /// Moves time forward.
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(duration_ms(by), Ordering::SeqCst);
    }

    /// Jumps to an absolute time.
    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

//! Time-related utilities with clock abstraction for testability.
//!
//! Timestamps are Unix epoch nanoseconds. Display uses JST (UTC+9) RFC 3339
//! and keeps every fractional digit so that a rendered cursor parses back to
//! the same instant.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone, Utc};
use thiserror::Error;

const JST_OFFSET_SECONDS: i32 = 9 * 3600;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (nanoseconds)
    fn now_nanos(&self) -> i64;
}

/// System clock implementation (uses actual system time)
///
/// Readings are strictly increasing within one clock: a call that lands on
/// the same nanosecond as (or earlier than) the previous reading is bumped
/// one nanosecond past it.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_nanos(&self) -> i64 {
        let now = get_timestamp_nanos();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or(now);
        now.max(previous.saturating_add(1))
    }
}

/// Manually driven clock for testing.
///
/// Returns the same instant until it is moved with [`FixedClock::advance`]
/// or [`FixedClock::set`].
#[derive(Debug, Default)]
pub struct FixedClock {
    fixed_time: AtomicI64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_nanos: i64) -> Self {
        Self {
            fixed_time: AtomicI64::new(fixed_time_nanos),
        }
    }

    /// Move the clock forward by `nanos`.
    pub fn advance(&self, nanos: i64) {
        self.fixed_time.fetch_add(nanos, Ordering::SeqCst);
    }

    pub fn set(&self, nanos: i64) {
        self.fixed_time.store(nanos, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_nanos(&self) -> i64 {
        self.fixed_time.load(Ordering::SeqCst)
    }
}

/// Errors from [`parse_rfc3339_to_nanos`].
#[derive(Debug, Error)]
pub enum TimestampParseError {
    #[error("invalid RFC 3339 timestamp: {0}")]
    Invalid(#[from] chrono::ParseError),
    #[error("timestamp is outside the representable nanosecond range")]
    OutOfRange,
}

/// Get current Unix timestamp (nanoseconds)
///
/// Saturates at `i64::MAX` past the year 2262.
pub fn get_timestamp_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECONDS).expect("JST offset is within ±24h")
}

/// Convert Unix timestamp (nanoseconds) to JST RFC 3339 format
pub fn timestamp_to_jst_rfc3339(timestamp_nanos: i64) -> String {
    jst()
        .timestamp_nanos(timestamp_nanos)
        .to_rfc3339_opts(SecondsFormat::Nanos, false)
}

/// Parse an RFC 3339 string (any offset) into Unix nanoseconds.
pub fn parse_rfc3339_to_nanos(value: &str) -> Result<i64, TimestampParseError> {
    DateTime::parse_from_rfc3339(value)?
        .timestamp_nanos_opt()
        .ok_or(TimestampParseError::OutOfRange)
}

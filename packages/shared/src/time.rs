//! Time-related utilities with clock abstraction for testability.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        now_millis()
    }
}

/// Manually driven clock for tests.
///
/// Every read returns the current value and then advances it by `step`
/// milliseconds, so records created in sequence get distinct, increasing
/// timestamps.
#[derive(Debug)]
pub struct FixedClock {
    current: AtomicI64,
    step: i64,
}

impl FixedClock {
    /// Create a clock frozen at `fixed_time_millis`
    pub fn new(fixed_time_millis: i64) -> Self {
        Self::stepping(fixed_time_millis, 0)
    }

    /// Create a clock that starts at `start_millis` and advances `step` on every read
    pub fn stepping(start_millis: i64, step: i64) -> Self {
        Self {
            current: AtomicI64::new(start_millis),
            step,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.current.fetch_add(self.step, Ordering::SeqCst)
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to RFC 3339 (UTC, millisecond precision).
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

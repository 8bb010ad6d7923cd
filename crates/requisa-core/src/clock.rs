//! # Clock Abstraction
//!
//! "Now" is an input, not ambient state. Every timestamp the engine writes
//! (creation, approval, code day) comes from a [`Clock`] supplied by the
//! caller, which makes day-rollover and sequencing behavior testable.
//!
//! ## Usage
//! ```rust
//! use requisa_core::clock::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let now = clock.now();
//! ```

use chrono::{DateTime, Utc};
use std::fmt;

/// Source of the current instant.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock. The only sanctioned `Utc::now()` call site in the workspace.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a clock that always reports `instant`.
    pub const fn new(instant: DateTime<Utc>) -> Self {
        FixedClock { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_is_pinned() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let clock = FixedClock::new(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}

//! Time-related utilities with clock abstraction for testability.
//!
//! Cooldown records store unix-second timestamps, so the clock works at
//! second granularity.

use chrono::Utc;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current unix timestamp in seconds
    fn now_unix(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        get_unix_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given unix timestamp
    pub fn new(fixed_time_secs: i64) -> Self {
        Self {
            fixed_time: fixed_time_secs,
        }
    }
}

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current unix timestamp in seconds
pub fn get_unix_timestamp() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_non_zero_timestamp() {
        // given:
        let clock = SystemClock;

        // when:
        let timestamp = clock.now_unix();

        // then:
        assert!(timestamp > 0);
    }

    #[test]
    fn test_system_clock_returns_non_decreasing_timestamps() {
        // given:
        let clock = SystemClock;

        // when:
        let timestamp1 = clock.now_unix();
        let timestamp2 = clock.now_unix();

        // then:
        assert!(timestamp2 >= timestamp1);
    }

    #[test]
    fn test_fixed_clock_returns_fixed_timestamp() {
        // given:
        let fixed_time = 1_234_567_890;
        let clock = FixedClock::new(fixed_time);

        // when:
        let timestamp = clock.now_unix();

        // then:
        assert_eq!(timestamp, fixed_time);
    }

    #[test]
    fn test_fixed_clock_returns_consistent_timestamp() {
        // given:
        let fixed_time = 9_876_543_210;
        let clock = FixedClock::new(fixed_time);

        // when:
        let timestamp1 = clock.now_unix();
        let timestamp2 = clock.now_unix();

        // then:
        assert_eq!(timestamp1, fixed_time);
        assert_eq!(timestamp2, fixed_time);
    }
}

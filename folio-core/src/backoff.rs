//! Exponential backoff between retry attempts.

use std::time::Duration;

/// Pure delay schedule: `delay(i) = base * 2^i`, no jitter.
///
/// Used only *between* retries, never before the first attempt. Saturates
/// instead of overflowing for absurd attempt indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    base: Duration,
}

impl BackoffPolicy {
    pub fn new(base: Duration) -> Self {
        Self { base }
    }

    pub fn from_millis(base_ms: u64) -> Self {
        Self::new(Duration::from_millis(base_ms))
    }

    /// Delay to wait after the failure of attempt `attempt_index` (0-based).
    pub fn delay(&self, attempt_index: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt_index).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor)
    }

    pub fn base(&self) -> Duration {
        self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_per_attempt() {
        let policy = BackoffPolicy::from_millis(1000);
        for i in 0..6 {
            assert_eq!(policy.delay(i), Duration::from_millis(1000 << i));
        }
    }

    #[test]
    fn first_retry_waits_the_base() {
        let policy = BackoffPolicy::from_millis(250);
        assert_eq!(policy.delay(0), Duration::from_millis(250));
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let policy = BackoffPolicy::new(Duration::from_secs(u64::MAX / 2));
        let huge = policy.delay(63);
        assert!(huge >= policy.delay(62));
    }
}

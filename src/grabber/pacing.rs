//! Jittered pacing between task submissions
//!
//! Every task submission consumes one delay drawn uniformly from the
//! configured range. The pause happens on the submitting side, so total
//! submission time grows with the number of tasks regardless of how wide
//! the worker pool is.

use crate::ConfigError;
use std::time::Duration;

/// Inclusive-exclusive range `[min, max)` a pacing delay is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    /// No pacing at all
    pub const NONE: DelayRange = DelayRange {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    /// Creates a range, rejecting `min > max`
    pub fn new(min: Duration, max: Duration) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::Validation(format!(
                "delay minimum {:?} exceeds maximum {:?}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Result<Self, ConfigError> {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Lower bound on the pacing time of `submissions` submissions
    ///
    /// Returns None when the total does not fit in a `Duration`.
    pub fn min_total(&self, submissions: usize) -> Option<Duration> {
        let submissions = u32::try_from(submissions).ok()?;
        self.min.checked_mul(submissions)
    }

    /// Draws one delay from `[min, max)`
    ///
    /// A degenerate range (`min == max`) always yields `min`. Sampling uses
    /// the calling thread's own generator, so concurrent callers never share
    /// RNG state.
    pub fn sample(&self) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        rand::random_range(self.min..self.max)
    }

    /// Sleeps for one sampled delay
    pub async fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tracing::trace!(delay_ms = delay.as_millis() as u64, "Pacing submission");
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_total() {
        let range = DelayRange::from_millis(250, 500).unwrap();
        assert_eq!(range.min_total(0), Some(Duration::ZERO));
        assert_eq!(range.min_total(8), Some(Duration::from_secs(2)));
        assert_eq!(DelayRange::NONE.min_total(usize::MAX), None);

        let huge = DelayRange::from_millis(u64::MAX, u64::MAX).unwrap();
        assert_eq!(huge.min_total(1), Some(Duration::from_millis(u64::MAX)));
        assert_eq!(huge.min_total(2), None);
    }

    #[test]
    fn test_samples_stay_in_range() {
        for (min, max) in [(0, 1), (0, 50), (10, 11), (100, 250), (1_000, 5_000)] {
            let range = DelayRange::from_millis(min, max).unwrap();
            for _ in 0..500 {
                let delay = range.sample();
                assert!(delay >= range.min(), "{:?} below {:?}", delay, range.min());
                assert!(delay < range.max(), "{:?} not below {:?}", delay, range.max());
            }
        }
    }

    #[test]
    fn test_degenerate_range() {
        let range = DelayRange::from_millis(40, 40).unwrap();
        assert_eq!(range.sample(), Duration::from_millis(40));
        assert_eq!(DelayRange::NONE.sample(), Duration::ZERO);
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(matches!(
            DelayRange::from_millis(20, 10),
            Err(ConfigError::Validation(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_sleeps_within_range() {
        let range = DelayRange::from_millis(100, 200).unwrap();
        let start = tokio::time::Instant::now();
        range.pause().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(200));
    }
}

//! Delay-and-replace debouncing driven by explicit timestamps.
//!
//! The page never reads the clock itself: time advances only through
//! [`Event::Tick`](super::Event::Tick), which keeps debouncing deterministic
//! under test.

use std::time::{Duration, Instant};

/// Holds the latest scheduled value until it has been quiet for `delay`.
///
/// # Examples
///
/// ```
/// use classdesk::app::Debouncer;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let mut search = Debouncer::new(Duration::from_millis(300));
/// search.schedule("ma".to_string(), start);
/// search.schedule("mat".to_string(), start + Duration::from_millis(100));
///
/// assert_eq!(search.poll(start + Duration::from_millis(300)), None);
/// assert_eq!(search.poll(start + Duration::from_millis(400)), Some("mat".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Replaces any pending value; the quiet period restarts at `now`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Releases the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = self.pending.as_ref().is_some_and(|(_, deadline)| now >= *deadline);
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Drops the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_quiet_period() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule(1, t0);
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(299)), None);
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(300)), Some(1));
        assert_eq!(debouncer.poll(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn cancel_discards_pending_value() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule("x", t0);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(t0 + Duration::from_secs(1)), None);
    }
}

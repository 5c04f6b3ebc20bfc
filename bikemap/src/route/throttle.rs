//! Rate limiting for directions fetches

use std::time::Duration;

use tokio::time::Instant;

/// Admits at most one action per period.
///
/// Rejected triggers are dropped, not queued: the caller acts on its
/// latest state at the next admitted trigger, so intermediate values
/// simply disappear (last write wins).
#[derive(Debug)]
pub struct Throttle {
    period: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    /// True when the current window admits an action. An admission
    /// restarts the window.
    pub fn admit(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.period => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forgets the last admission; the next trigger is admitted
    /// immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_trigger_admitted() {
        let mut throttle = Throttle::new(Duration::from_millis(250));
        assert!(throttle.admit());
        assert!(!throttle.admit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_reopens_after_period() {
        let mut throttle = Throttle::new(Duration::from_millis(250));
        assert!(throttle.admit());

        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!throttle.admit());

        tokio::time::advance(Duration::from_millis(150)).await;
        assert!(throttle.admit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_admissions_bounded_by_elapsed_over_period() {
        let period = Duration::from_millis(250);
        let mut throttle = Throttle::new(period);

        // Trigger every 25 ms for one second, 10x faster than the window
        let mut admitted = 0;
        for _ in 0..40 {
            if throttle.admit() {
                admitted += 1;
            }
            tokio::time::advance(Duration::from_millis(25)).await;
        }

        // elapsed / period + 1
        assert!(admitted <= 5, "admitted {admitted} times");
        assert!(admitted >= 4, "admitted {admitted} times");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_reopens_window() {
        let mut throttle = Throttle::new(Duration::from_millis(250));
        assert!(throttle.admit());
        throttle.reset();
        assert!(throttle.admit());
    }
}

//! Exponential reconnect delay.

use std::time::Duration;

/// First reconnect delay, and the value restored after a successful open.
pub const RECONNECT_FLOOR: Duration = Duration::from_secs(1);
/// Upper bound for the reconnect delay.
pub const RECONNECT_CEILING: Duration = Duration::from_secs(30);

/// Doubling delay between `floor` and `ceiling`.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    floor: Duration,
    ceiling: Duration,
}

impl Backoff {
    pub fn new(floor: Duration, ceiling: Duration) -> Self {
        Self {
            current: floor,
            floor,
            ceiling,
        }
    }

    /// Delay to wait now. The following call returns double, capped.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.ceiling);
        delay
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = self.floor;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(RECONNECT_FLOOR, RECONNECT_CEILING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(delays: &[Duration]) -> Vec<u64> {
        delays.iter().map(Duration::as_secs).collect()
    }

    #[test]
    fn doubles_up_to_ceiling() {
        let mut backoff = Backoff::default();
        let delays: Vec<Duration> = (0..8).map(|_| backoff.next_delay()).collect();
        assert_eq!(secs(&delays), vec![1, 2, 4, 8, 16, 30, 30, 30]);
    }

    #[test]
    fn reset_returns_to_floor() {
        let mut backoff = Backoff::default();
        for _ in 0..4 {
            backoff.next_delay();
        }
        assert_eq!(backoff.current(), Duration::from_secs(16));
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
        assert_eq!(backoff.next_delay(), Duration::from_secs(2));
    }
}

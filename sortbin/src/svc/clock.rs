use std::time::Duration;

/// Milliseconds since boot, 32 bits. Wraps after ~49 days.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct Instant(u32);

impl Instant {
    pub fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    pub fn to_millis(&self) -> u32 {
        self.0
    }

    pub fn duration_since(&self, earlier: Instant) -> Duration {
        Duration::from_millis(self.0.wrapping_sub(earlier.0) as u64)
    }
}

pub trait Clock {
    fn now(&self) -> Instant;

    /// Blocks the caller.
    fn sleep(&self, duration: Duration);
}

pub struct StdClock {
    start: std::time::Instant,
}

impl Default for StdClock {
    fn default() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Clock for StdClock {
    fn now(&self) -> Instant {
        let t_ms = std::time::Instant::now()
            .saturating_duration_since(self.start)
            .as_millis();

        Instant((t_ms % (u32::MAX as u128 + 1)) as u32)
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_since() {
        let earlier = Instant::from_millis(1_000);
        let later = Instant::from_millis(1_500);
        assert_eq!(later.duration_since(earlier), Duration::from_millis(500));
    }

    #[test]
    fn test_duration_since_across_wrap() {
        let earlier = Instant::from_millis(u32::MAX - 4);
        let later = Instant::from_millis(5);
        assert_eq!(later.duration_since(earlier), Duration::from_millis(10));
    }

    #[test]
    fn test_std_clock_sleep_advances_time() {
        let clock = StdClock::default();
        let start = clock.now();
        clock.sleep(Duration::from_millis(20));
        assert!(clock.now().duration_since(start) >= Duration::from_millis(20));
    }
}

//////////////////////////////////////////////////
// Using

use std::time::{Duration, Instant};

//////////////////////////////////////////////////
// Const

/// Logical ticks per second of wall clock.
pub const TICKS_PER_SECOND: u64 = 60;

//////////////////////////////////////////////////
// Definition

/// Logical time, counted in ticks since the clock started.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub u64);

/// Converts wall clock time into logical ticks.
#[derive(Debug, Copy, Clone)]
pub struct Clock {
    start: Instant,
}

//////////////////////////////////////////////////
// Implementation

impl Time {
    pub fn next(self) -> Time {
        Time(self.0 + 1)
    }

    pub fn from_elapsed(elapsed: Duration) -> Time {
        Time((elapsed.as_nanos() * TICKS_PER_SECOND as u128 / 1_000_000_000) as u64)
    }
}

impl Clock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    pub fn restart(&mut self) {
        self.start = Instant::now();
    }

    pub fn now(&self) -> Time {
        Time::from_elapsed(self.start.elapsed())
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

//////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_converts_to_ticks() {
        assert_eq!(Time::from_elapsed(Duration::ZERO), Time(0));
        assert_eq!(Time::from_elapsed(Duration::from_secs(1)), Time(TICKS_PER_SECOND));
        assert_eq!(Time::from_elapsed(Duration::from_millis(2500)), Time(150));
        // partial ticks are not counted yet
        assert_eq!(Time::from_elapsed(Duration::from_millis(16)), Time(0));
        assert_eq!(Time::from_elapsed(Duration::from_millis(17)), Time(1));
    }

    #[test]
    fn next_advances_one_tick() {
        assert_eq!(Time(0).next(), Time(1));
        assert_eq!(Time(41).next().next(), Time(43));
        assert!(Time(3) < Time(3).next());
    }

    #[test]
    fn clock_never_goes_backwards() {
        let clock = Clock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}

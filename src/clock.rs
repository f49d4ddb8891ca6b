use std::cell::Cell;
use std::time::Instant;

/// Monotonic time in seconds since an arbitrary epoch. Never scaled.
pub trait Clock {
    fn now(&self) -> f64;
}

#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock { epoch: Instant }

impl MonotonicClock {
    pub fn new() -> Self { Self { epoch: Instant::now() } }
}

impl Default for MonotonicClock {
    fn default() -> Self { Self::new() }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 { self.epoch.elapsed().as_secs_f64() }
}

/// Clock advanced by hand, for headless runs and tests.
#[derive(Debug, Default)]
pub struct ManualClock { now: Cell<f64> }

impl ManualClock {
    pub fn new(start: f64) -> Self { Self { now: Cell::new(start) } }

    pub fn advance(&self, secs: f64) { self.now.set(self.now.get() + secs); }

    pub fn set(&self, t: f64) { self.now.set(t); }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 { self.now.get() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let c = ManualClock::new(1.5);
        c.advance(0.25);
        assert_eq!(c.now(), 1.75);
        c.set(0.0);
        assert_eq!(c.now(), 0.0);
    }

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let c = MonotonicClock::new();
        let a = c.now();
        let b = c.now();
        assert!(b >= a);
    }
}

use std::time::Instant;

/// Source of elapsed playback time in seconds. Non-decreasing within a
/// session; restarting a session brings it back to zero.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Clock driven explicitly by the caller. Used for replays and tests.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock to `t`. Earlier times are ignored so the clock never
    /// runs backwards.
    pub fn set(&mut self, t: f64) {
        if t > self.now {
            self.now = t;
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.set(self.now + dt);
    }

    /// Starts a new session at time zero.
    pub fn reset(&mut self) {
        self.now = 0.0;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now
    }
}

/// Wall-clock time since the last `restart`.
#[derive(Debug, Clone)]
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn restart(&mut self) {
        self.start = Instant::now();
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_monotonic() {
        let mut c = ManualClock::new();
        c.set(2.0);
        c.set(1.0);
        assert_eq!(c.now(), 2.0);
        c.advance(0.5);
        assert_eq!(c.now(), 2.5);
        c.reset();
        assert_eq!(c.now(), 0.0);
    }

    #[test]
    fn wall_clock_moves_forward() {
        let c = WallClock::new();
        let a = c.now();
        let b = c.now();
        assert!(b >= a);
    }
}

//! Frame clocks
//!
//! The scheduler stamps play starts and computes elapsed fractions from a
//! [`Clock`]. Hosts with a real display use [`SystemClock`]; tests and
//! offline renderers use [`ManualClock`] and advance it themselves.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Duration of one frame at 60fps, in milliseconds
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// A monotonic millisecond time source
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin
    fn now(&self) -> f64;
}

/// Wall clock measured from its creation
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time position, so a test can keep one handle and
/// give another to the animator.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    position: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Create a clock positioned at 0ms
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock positioned at `ms`
    pub fn starting_at(ms: f64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    /// Seek to an absolute position. Seeking backwards is ignored.
    pub fn set(&self, ms: f64) {
        if ms >= self.position.get() {
            self.position.set(ms);
        }
    }

    /// Advance by a relative amount. Negative amounts are ignored.
    pub fn advance(&self, ms: f64) {
        if ms > 0.0 {
            self.position.set(self.position.get() + ms);
        }
    }

    /// Advance by one 60fps frame
    pub fn step_frame(&self) {
        self.advance(FRAME_MS);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.position.get()
    }
}

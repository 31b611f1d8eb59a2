//! Time management for the simulation
//!
//! The simulation advances in fixed-length ticks measured in milliseconds of
//! simulated time. The clock also keeps the batch-window bookkeeping the
//! dispatcher needs ("accumulating" until a window has elapsed since the last
//! assignment pass).

use serde::{Deserialize, Serialize};

/// Millisecond simulation clock with a fixed tick length
///
/// # Example
/// ```
/// use elevator_dispatch_core::SimClock;
///
/// let mut clock = SimClock::new(200);
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance_tick();
/// assert_eq!(clock.now_ms(), 200);
/// assert_eq!(clock.ticks_elapsed(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    /// Simulated time since start (ms)
    now_ms: u64,
    /// Length of one tick (ms)
    tick_ms: u64,
    /// Number of ticks executed
    ticks_elapsed: u64,
    /// Simulated time of the last dispatch pass (ms)
    last_batch_ms: u64,
}

impl SimClock {
    /// Create a clock at time zero
    ///
    /// # Panics
    /// Panics if `tick_ms` is zero
    pub fn new(tick_ms: u64) -> Self {
        assert!(tick_ms > 0, "tick_ms must be positive");
        Self {
            now_ms: 0,
            tick_ms,
            ticks_elapsed: 0,
            last_batch_ms: 0,
        }
    }

    /// Advance time by one tick and return the new time
    pub fn advance_tick(&mut self) -> u64 {
        self.now_ms += self.tick_ms;
        self.ticks_elapsed += 1;
        self.now_ms
    }

    /// Current simulated time (ms)
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Tick length (ms)
    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    /// Change the tick length; elapsed time is kept
    pub fn set_tick_ms(&mut self, tick_ms: u64) {
        assert!(tick_ms > 0, "tick_ms must be positive");
        self.tick_ms = tick_ms;
    }

    /// Number of ticks executed so far
    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    /// Time of the last dispatch pass (ms)
    pub fn last_batch_ms(&self) -> u64 {
        self.last_batch_ms
    }

    /// True once at least `window_ms` has elapsed since the last dispatch pass
    ///
    /// # Example
    /// ```
    /// use elevator_dispatch_core::SimClock;
    ///
    /// let mut clock = SimClock::new(500);
    /// clock.advance_tick();
    /// assert!(!clock.batch_window_elapsed(1000));
    /// clock.advance_tick();
    /// assert!(clock.batch_window_elapsed(1000));
    /// ```
    pub fn batch_window_elapsed(&self, window_ms: u64) -> bool {
        self.now_ms.saturating_sub(self.last_batch_ms) >= window_ms
    }

    /// Record that a dispatch pass ran at the current time
    pub fn mark_batch(&mut self) {
        self.last_batch_ms = self.now_ms;
    }
}

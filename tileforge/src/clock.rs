//! Tick clock driving per-frame updates.

use std::time::Duration;

/// Monotonic tick source consumed by cameras and other per-tick systems.
pub trait GameLoop {
    /// Ticks elapsed since the loop started.
    fn ticks(&self) -> u64;

    /// Milliseconds elapsed since the given tick.
    fn delta_time(&self, since_tick: u64) -> u64;

    /// Fixed number of ticks per second.
    fn update_rate(&self) -> u32;
}

/// Fixed-rate game loop clock.
///
/// Wall time is fed in with [`TickClock::update_time`]; whole ticks are
/// carved out of the accumulated time at the configured update rate.
#[derive(Clone, Debug)]
pub struct TickClock {
    ticks: u64,
    update_rate: u32,
    tick_duration: Duration,
    accumulator: Duration,
}

impl TickClock {
    /// Create a clock running at `update_rate` ticks per second (clamped to at least 1).
    pub fn new(update_rate: u32) -> Self {
        let update_rate = update_rate.max(1);
        Self {
            ticks: 0,
            update_rate,
            tick_duration: Duration::from_secs_f64(1.0 / f64::from(update_rate)),
            accumulator: Duration::ZERO,
        }
    }

    /// Advance by a single tick.
    pub fn tick(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }

    /// Advance by `count` ticks.
    pub fn advance(&mut self, count: u64) -> u64 {
        self.ticks += count;
        self.ticks
    }

    /// Feed elapsed wall time and return how many fixed ticks it produced.
    pub fn update_time(&mut self, delta: Duration) -> u32 {
        self.accumulator += delta;

        let mut produced = 0;
        while self.accumulator >= self.tick_duration {
            self.accumulator -= self.tick_duration;
            self.ticks += 1;
            produced += 1;
        }

        produced
    }

    /// Duration of one tick.
    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Fraction of the next tick already accumulated, between 0.0 and 1.0.
    pub fn alpha(&self) -> f32 {
        (self.accumulator.as_secs_f32() / self.tick_duration.as_secs_f32()).min(1.0)
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl GameLoop for TickClock {
    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn delta_time(&self, since_tick: u64) -> u64 {
        let elapsed = self.ticks.saturating_sub(since_tick);
        elapsed * 1000 / u64::from(self.update_rate)
    }

    fn update_rate(&self) -> u32 {
        self.update_rate
    }
}

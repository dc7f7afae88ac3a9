//! Scheduler configuration.

use std::time::Duration;

/// Configuration for the animation scheduler.
///
/// Fixed at construction. The defaults reproduce the classic feel: a 50 ms
/// clock and a five-cloud ambient batch every 10-20 seconds.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Nominal tick period. The driver sleeps this long after every
    /// iteration regardless of how long the iteration took; cumulative drift
    /// under load is accepted.
    pub tick_interval: Duration,
    /// Ambient animations admitted per countdown expiry. Zero disables
    /// ambient spawning without touching the countdown.
    pub ambient_batch_size: usize,
    /// Lower bound of the countdown reset draw, in milliseconds.
    pub ambient_delay_min_ms: u64,
    /// Upper bound of the countdown reset draw, in milliseconds (inclusive).
    pub ambient_delay_max_ms: u64,
    /// Initial countdown, in milliseconds. Zero spawns a batch on the very
    /// first tick.
    pub ambient_countdown_ms: i64,
    /// Capacity of the lifecycle event channel; once full, further events
    /// are dropped rather than blocking the driver.
    pub event_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            ambient_batch_size: 5,
            ambient_delay_min_ms: 10_000,
            ambient_delay_max_ms: 20_000,
            ambient_countdown_ms: 0,
            event_capacity: 256,
        }
    }
}

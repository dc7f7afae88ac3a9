//! The shared-clock animation scheduler.
//!
//! One dedicated driver thread advances every active animation at a fixed
//! tick, scaled by the world's speed multiplier. Producers append from any
//! thread; render passes iterate read-only from any thread; only the driver
//! removes, and only between traversals.
//!
//! ```text
//! tick:
//!   1. countdown -= tick       ──> ambient batch when it expires
//!   2. walk the active set     ──> finished? mark : advance(tick × speed)
//!   3. sweep the marked        ──> reverse-index removal, never mid-walk
//!   4. pause gate              ──> condvar wait, recheck after every wake
//!   5. sleep(tick)
//! ```
//!
//! The walk is fault-contained: a panicking animation is caught and logged
//! and the tick proceeds to its sweep/pause/sleep phases.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use rand::Rng;

use crate::animation::{BoxedAnimation, Layer};
use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::events::{EventChannel, EventReceiver, SchedulerEvent};
use crate::render::DrawList;
use crate::world::World;

/// Name of the driver thread, as shown by debuggers and profilers.
const DRIVER_THREAD_NAME: &str = "cinder-anim-driver";

/// Gate the driver blocks on while the simulation is paused.
struct PauseGate {
    /// True while the simulation is paused.
    paused: Mutex<bool>,
    /// Signaled when the paused flag is cleared.
    unpaused: Condvar,
}

impl PauseGate {
    fn new() -> Self {
        Self {
            paused: Mutex::new(false),
            unpaused: Condvar::new(),
        }
    }

    /// Blocks until the flag is clear or `running` goes false.
    ///
    /// The flag is rechecked after every wake; spurious wakeups and
    /// stop-wakes fall out of the loop condition.
    fn wait_while_paused(&self, running: &AtomicBool) {
        let mut paused = self.paused.lock();
        while *paused && running.load(Ordering::Acquire) {
            self.unpaused.wait(&mut paused);
        }
    }
}

/// Lifetime counters shared between the driver and observers.
#[derive(Default)]
struct Counters {
    /// Completed driver iterations.
    ticks: AtomicU64,
    /// Ambient animations admitted so far.
    ambient_spawned: AtomicU64,
    /// Finished animations swept out so far.
    retired: AtomicU64,
    /// Contained animation faults.
    faults: AtomicU64,
}

/// Snapshot of the scheduler's lifetime counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Completed driver iterations.
    pub ticks: u64,
    /// Ambient animations admitted so far.
    pub ambient_spawned: u64,
    /// Finished animations swept out so far.
    pub retired: u64,
    /// Contained animation faults (panics during a walk or render pass).
    pub faults: u64,
}

/// State shared between the scheduler handle and the driver thread.
struct Shared {
    config: SchedulerConfig,
    world: Arc<dyn World>,
    /// The active set. Producers only append; the driver is the sole
    /// structural remover, so marks taken during a walk stay valid across an
    /// unlock/relock.
    animations: Mutex<Vec<BoxedAnimation>>,
    running: AtomicBool,
    destroyed: AtomicBool,
    gate: PauseGate,
    counters: Counters,
    events: EventChannel,
}

impl Shared {
    /// Appends a batch unless the scheduler was destroyed in the meantime.
    fn admit(&self, batch: Vec<BoxedAnimation>) -> usize {
        if self.destroyed.load(Ordering::Acquire) {
            tracing::debug!(
                count = batch.len(),
                "discarding animations offered after destroy"
            );
            return 0;
        }
        let count = batch.len();
        self.animations.lock().extend(batch);
        count
    }
}

/// Drives every active animation on one shared clock.
///
/// All control operations are callable from any thread. The driver thread is
/// created by [`start`](Self::start) and joined when the scheduler is
/// dropped. See the module docs for the tick algorithm.
pub struct AnimationScheduler {
    shared: Arc<Shared>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl AnimationScheduler {
    /// Creates a scheduler over `world` with the given configuration.
    ///
    /// The driver thread does not exist until [`start`](Self::start).
    #[must_use]
    pub fn new(world: Arc<dyn World>, config: SchedulerConfig) -> Self {
        let events = EventChannel::new(config.event_capacity);
        Self {
            shared: Arc::new(Shared {
                world,
                animations: Mutex::new(Vec::new()),
                running: AtomicBool::new(false),
                destroyed: AtomicBool::new(false),
                gate: PauseGate::new(),
                counters: Counters::default(),
                events,
                config,
            }),
            driver: Mutex::new(None),
        }
    }

    /// Starts the driver thread.
    ///
    /// `running` is observable before the loop's first iteration. A restart
    /// after [`stop`](Self::stop) first joins the previous driver, which is
    /// bounded by one tick period.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::AlreadyRunning`] on a second `start`,
    /// [`SchedulerError::Destroyed`] after [`destroy`](Self::destroy), and
    /// [`SchedulerError::DriverSpawn`] if the OS refuses the thread.
    pub fn start(&self) -> SchedulerResult<()> {
        // The driver-handle lock serializes concurrent starts; `running` is
        // set before it is released, so a losing racer reports AlreadyRunning
        // instead of touching the fresh handle.
        let mut driver = self.driver.lock();
        if self.shared.destroyed.load(Ordering::Acquire) {
            return Err(SchedulerError::Destroyed);
        }
        if self.shared.running.load(Ordering::Acquire) {
            return Err(SchedulerError::AlreadyRunning);
        }

        // Reap a driver left over from a previous stop() so two loops never
        // overlap.
        if let Some(previous) = driver.take() {
            let _ = previous.join();
        }
        *self.shared.gate.paused.lock() = false;
        self.shared.running.store(true, Ordering::Release);

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name(DRIVER_THREAD_NAME.into())
            .spawn(move || Self::drive(&shared))
            .map_err(|e| {
                self.shared.running.store(false, Ordering::Release);
                SchedulerError::DriverSpawn(e.to_string())
            })?;

        *driver = Some(handle);
        drop(driver);

        self.shared.events.emit(SchedulerEvent::Started);
        tracing::info!(
            tick_ms = self.shared.config.tick_interval.as_millis() as u64,
            "animation driver started"
        );
        Ok(())
    }

    /// Appends `animation` to the active set.
    ///
    /// Callable from any thread, never fails, amortized O(1). Inclusion in
    /// an in-flight tick is not guaranteed; the animation is driven no later
    /// than the next one. After [`destroy`](Self::destroy) the animation is
    /// quietly discarded.
    pub fn add(&self, animation: BoxedAnimation) {
        self.shared.admit(vec![animation]);
    }

    /// Renders every animation on `layer` into `list`.
    ///
    /// Read-only with respect to the active set and safe against the
    /// driver's sweep: the pass sees each animation fully present or fully
    /// absent, never torn. A panicking animation leaves the frame partial
    /// and is logged; the call itself never fails.
    pub fn render(&self, list: &mut DrawList, layer: Layer) {
        let pass = panic::catch_unwind(AssertUnwindSafe(|| {
            let animations = self.shared.animations.lock();
            for animation in animations.iter() {
                if animation.layer() == layer {
                    animation.render(list);
                }
            }
        }));
        if pass.is_err() {
            self.shared.counters.faults.fetch_add(1, Ordering::Relaxed);
            tracing::error!("animation fault during render pass, frame left partial");
        }
    }

    /// Pauses the simulation.
    ///
    /// The driver blocks after completing its current iteration, so an
    /// in-flight tick may still advance animations once. No-op when not
    /// running.
    pub fn pause(&self) {
        if !self.shared.running.load(Ordering::Acquire) {
            tracing::warn!("pause requested while driver is not running");
            return;
        }
        let mut paused = self.shared.gate.paused.lock();
        if !*paused {
            *paused = true;
            drop(paused);
            self.shared.events.emit(SchedulerEvent::Paused);
            tracing::debug!("simulation paused");
        }
    }

    /// Resumes a paused simulation.
    ///
    /// Clears the flag *before* notifying exactly one blocked waiter, so a
    /// resume racing a not-yet-blocked pause is never lost. No-op when not
    /// paused.
    pub fn resume(&self) {
        let mut paused = self.shared.gate.paused.lock();
        if *paused {
            *paused = false;
            self.shared.gate.unpaused.notify_one();
            drop(paused);
            self.shared.events.emit(SchedulerEvent::Resumed);
            tracing::debug!("simulation resumed");
        }
    }

    /// Asks the driver to stop.
    ///
    /// Cooperative: the loop observes the flag at its next iteration
    /// boundary, so callers needing a hard bound must allow one tick period.
    /// A paused driver is woken so the stop is observed. Idempotent.
    pub fn stop(&self) {
        if !self.shared.running.swap(false, Ordering::AcqRel) {
            return;
        }
        {
            let mut paused = self.shared.gate.paused.lock();
            *paused = false;
            self.shared.gate.unpaused.notify_one();
        }
        self.shared.events.emit(SchedulerEvent::Stopped);
        tracing::info!("animation driver stopping");
    }

    /// Stops the driver and clears the active set.
    ///
    /// The scheduler cannot be restarted afterwards: `start` reports
    /// [`SchedulerError::Destroyed`] and later `add` calls are discarded.
    pub fn destroy(&self) {
        self.shared.destroyed.store(true, Ordering::Release);
        self.stop();
        self.shared.animations.lock().clear();
        self.shared.events.emit(SchedulerEvent::Destroyed);
        tracing::info!("scheduler destroyed");
    }

    /// True while the driver loop is (or is about to be) running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// True while the simulation is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        *self.shared.gate.paused.lock()
    }

    /// Number of animations currently in the active set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.animations.lock().len()
    }

    /// True when the active set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the lifetime counters.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            ticks: self.shared.counters.ticks.load(Ordering::Relaxed),
            ambient_spawned: self.shared.counters.ambient_spawned.load(Ordering::Relaxed),
            retired: self.shared.counters.retired.load(Ordering::Relaxed),
            faults: self.shared.counters.faults.load(Ordering::Relaxed),
        }
    }

    /// Subscribes to lifecycle events.
    ///
    /// Receivers share one queue: each event is delivered to whichever
    /// subscriber receives it first.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        self.shared.events.subscribe()
    }

    /// Driver thread body. Exits when `running` goes false.
    fn drive(shared: &Shared) {
        let tick = shared.config.tick_interval;
        let tick_ms = tick.as_millis() as i64;
        let delay_lo = shared
            .config
            .ambient_delay_min_ms
            .min(shared.config.ambient_delay_max_ms);
        let delay_hi = shared
            .config
            .ambient_delay_max_ms
            .max(shared.config.ambient_delay_min_ms);
        let mut countdown = shared.config.ambient_countdown_ms;
        let mut rng = rand::thread_rng();
        // Marked-for-removal buffer: the set is never mutated while a walk
        // traverses it.
        let mut marked: Vec<usize> = Vec::new();

        while shared.running.load(Ordering::Acquire) {
            countdown -= tick_ms;
            if countdown <= 0 {
                let batch: Vec<BoxedAnimation> = (0..shared.config.ambient_batch_size)
                    .map(|_| shared.world.spawn_ambient())
                    .collect();
                let admitted = shared.admit(batch);
                if admitted > 0 {
                    shared
                        .counters
                        .ambient_spawned
                        .fetch_add(admitted as u64, Ordering::Relaxed);
                    shared
                        .events
                        .emit(SchedulerEvent::AmbientSpawned { count: admitted });
                }
                countdown = rng.gen_range(delay_lo..=delay_hi) as i64;
            }

            let speed = shared.world.speed_multiplier().max(0.0);
            let elapsed = tick.mul_f32(speed);

            let walk = panic::catch_unwind(AssertUnwindSafe(|| {
                let mut animations = shared.animations.lock();
                for (index, animation) in animations.iter_mut().enumerate() {
                    if animation.finished() {
                        marked.push(index);
                    } else {
                        animation.advance(elapsed);
                    }
                }
            }));
            if walk.is_err() {
                shared.counters.faults.fetch_add(1, Ordering::Relaxed);
                tracing::error!("animation fault during advance walk, continuing tick");
            }

            if !marked.is_empty() {
                {
                    let mut animations = shared.animations.lock();
                    // Reverse order keeps the remaining marks valid;
                    // concurrent adds only append, so every mark still names
                    // the element it was taken for.
                    for &index in marked.iter().rev() {
                        animations.remove(index);
                    }
                }
                shared
                    .counters
                    .retired
                    .fetch_add(marked.len() as u64, Ordering::Relaxed);
                shared.events.emit(SchedulerEvent::Retired {
                    count: marked.len(),
                });
                marked.clear();
            }

            shared.counters.ticks.fetch_add(1, Ordering::Relaxed);

            shared.gate.wait_while_paused(&shared.running);

            // Fixed nap, independent of how long the tick took.
            thread::sleep(tick);
        }

        tracing::debug!("animation driver exited");
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.stop();
        if let Some(handle) = self.driver.lock().take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;
    use std::time::Duration;

    struct Puff;

    impl Animation for Puff {
        fn layer(&self) -> Layer {
            Layer::Sky
        }
        fn finished(&self) -> bool {
            false
        }
        fn advance(&mut self, _elapsed: Duration) {}
        fn render(&self, _out: &mut DrawList) {}
    }

    struct StillWorld;

    impl World for StillWorld {
        fn speed_multiplier(&self) -> f32 {
            1.0
        }
        fn spawn_ambient(&self) -> BoxedAnimation {
            Box::new(Puff)
        }
    }

    fn quiet_config() -> SchedulerConfig {
        SchedulerConfig {
            tick_interval: Duration::from_millis(5),
            ambient_batch_size: 0,
            ambient_countdown_ms: i64::MAX,
            ..SchedulerConfig::default()
        }
    }

    #[test]
    fn test_double_start_is_reported() {
        let scheduler = AnimationScheduler::new(Arc::new(StillWorld), quiet_config());
        assert!(scheduler.start().is_ok());
        assert_eq!(scheduler.start(), Err(SchedulerError::AlreadyRunning));
        scheduler.stop();
    }

    #[test]
    fn test_destroy_blocks_restart_and_add() {
        let scheduler = AnimationScheduler::new(Arc::new(StillWorld), quiet_config());
        scheduler.add(Box::new(Puff));
        scheduler.add(Box::new(Puff));
        assert_eq!(scheduler.len(), 2);

        scheduler.destroy();
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.start(), Err(SchedulerError::Destroyed));

        scheduler.add(Box::new(Puff));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_pause_without_running_is_noop() {
        let scheduler = AnimationScheduler::new(Arc::new(StillWorld), quiet_config());
        scheduler.pause();
        assert!(!scheduler.is_paused());
        scheduler.resume();
        assert!(!scheduler.is_paused());
    }

    #[test]
    fn test_stats_start_at_zero() {
        let scheduler = AnimationScheduler::new(Arc::new(StillWorld), quiet_config());
        assert_eq!(scheduler.stats(), SchedulerStats::default());
    }

    #[test]
    fn test_restart_after_stop() {
        let scheduler = AnimationScheduler::new(Arc::new(StillWorld), quiet_config());
        assert!(scheduler.start().is_ok());
        scheduler.stop();
        assert!(scheduler.start().is_ok());
        assert!(scheduler.is_running());
        scheduler.stop();
    }
}

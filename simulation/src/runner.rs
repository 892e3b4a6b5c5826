//! Simulation runner - background thread that ticks the world at regular
//! intervals, feeding it wall-clock timestamps the way an animation callback
//! would.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::world::{SimulationWorld, TickResult};

/// Drives a shared [`SimulationWorld`] from a background thread.
pub struct SimulationRunner {
    is_running: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl SimulationRunner {
    pub fn new() -> Self {
        Self {
            is_running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    /// Start ticking the world every `interval_ms` milliseconds.
    ///
    /// # Arguments
    /// * `world` - Shared reference to the simulation world
    /// * `interval_ms` - Milliseconds between ticks (e.g., 16 for ~60 fps)
    /// * `callback` - Called with every tick result (for frame reporting)
    pub fn start<F>(&mut self, world: Arc<Mutex<SimulationWorld>>, interval_ms: u64, callback: F)
    where
        F: Fn(TickResult) + Send + 'static,
    {
        if self.is_running.load(Ordering::Relaxed) {
            warn!("simulation runner already running");
            return;
        }

        info!(interval_ms, "starting simulation runner");
        self.is_running.store(true, Ordering::Relaxed);
        let running = Arc::clone(&self.is_running);

        let handle = thread::spawn(move || {
            let started = Instant::now();
            while running.load(Ordering::Relaxed) {
                let now_ms = started.elapsed().as_secs_f64() * 1000.0;
                let tick_result = {
                    let mut w = world.lock().unwrap();
                    w.advance(now_ms)
                };

                callback(tick_result);

                thread::sleep(Duration::from_millis(interval_ms));
            }
            info!("simulation runner thread stopped");
        });

        self.thread_handle = Some(handle);
    }

    /// Stop ticking and join the worker thread.
    pub fn stop(&mut self) {
        if !self.is_running.load(Ordering::Relaxed) {
            return;
        }

        info!("stopping simulation runner");
        self.is_running.store(false, Ordering::Relaxed);

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join(); // Thread panic result intentionally ignored during shutdown
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }
}

impl Default for SimulationRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn test_simulation_runner() {
        let world = SimulationWorld::new(SimulationConfig::default()).unwrap();
        let world = Arc::new(Mutex::new(world));
        world.lock().unwrap().seed_points(10);

        let tick_count = Arc::new(AtomicU32::new(0));
        let tick_count_clone = Arc::clone(&tick_count);

        let mut runner = SimulationRunner::new();
        runner.start(
            Arc::clone(&world),
            100, // 100ms between ticks
            move |_result| {
                tick_count_clone.fetch_add(1, Ordering::Relaxed);
            },
        );
        assert!(runner.is_running());

        // Let it run for ~500ms (should get ~5 ticks)
        thread::sleep(Duration::from_millis(550));
        runner.stop();
        assert!(!runner.is_running());

        let count = tick_count.load(Ordering::Relaxed);
        assert!((3..=8).contains(&count), "Expected ~5 ticks, got {}", count);

        // The world kept advancing while the runner ran
        assert_eq!(world.lock().unwrap().point_count(), 10);
    }
}

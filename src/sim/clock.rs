//! Time sources for the scene
//!
//! Every consumer is handed absolute elapsed seconds and recomputes from it;
//! nothing in the simulation integrates a frame delta.

use serde::{Deserialize, Serialize};

/// Monotonic "time since start" over a platform millisecond timestamp
/// (`performance.now()` / `requestAnimationFrame` time on the web).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameClock {
    start_ms: f64,
}

impl FrameClock {
    /// Create a clock with `now_ms` as t = 0
    pub fn started_at(now_ms: f64) -> Self {
        Self { start_ms: now_ms }
    }

    /// Seconds elapsed since start (never negative)
    pub fn elapsed(&self, now_ms: f64) -> f32 {
        ((now_ms - self.start_ms) / 1000.0).max(0.0) as f32
    }
}

/// Fixed-interval trigger polled against an external time source.
///
/// Used where no platform interval timer exists (the headless driver). Fires
/// at `start + k * interval` for k = 1, 2, ...
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalTimer {
    interval: f32,
    next_fire: f32,
}

impl IntervalTimer {
    pub fn new(interval: f32, start: f32) -> Self {
        Self {
            interval,
            next_fire: start + interval,
        }
    }

    /// Number of firings due at `now`, at most `max_fires`.
    ///
    /// If more than `max_fires` are overdue the backlog is dropped and the
    /// schedule restarts from `now`.
    pub fn poll(&mut self, now: f32, max_fires: u32) -> u32 {
        if self.interval <= 0.0 {
            return 0;
        }

        let mut fires = 0;
        while self.next_fire <= now && fires < max_fires {
            self.next_fire += self.interval;
            fires += 1;
        }

        if self.next_fire <= now {
            log::debug!(
                "Interval timer behind by {:.3}s, dropping backlog",
                now - self.next_fire
            );
            self.next_fire = now + self.interval;
        }

        fires
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = FrameClock::started_at(1000.0);
        assert_eq!(clock.elapsed(1000.0), 0.0);
        assert!((clock.elapsed(3500.0) - 2.5).abs() < 1e-6);
        // A timestamp before start never yields negative time
        assert_eq!(clock.elapsed(900.0), 0.0);
    }

    #[test]
    fn test_interval_cadence() {
        let mut timer = IntervalTimer::new(0.16, 0.0);
        assert_eq!(timer.poll(0.1, 8), 0);
        assert_eq!(timer.poll(0.17, 8), 1);
        assert_eq!(timer.poll(0.2, 8), 0);
        // Two periods later in one poll
        assert_eq!(timer.poll(0.5, 8), 2);
    }

    #[test]
    fn test_interval_backlog_dropped() {
        let mut timer = IntervalTimer::new(0.16, 0.0);
        // 10 seconds with a cap of 8: fires 8 times, then resyncs
        assert_eq!(timer.poll(10.0, 8), 8);
        assert_eq!(timer.poll(10.1, 8), 0);
        assert_eq!(timer.poll(10.17, 8), 1);
    }

    #[test]
    fn test_interval_zero_never_fires() {
        let mut timer = IntervalTimer::new(0.0, 0.0);
        assert_eq!(timer.poll(100.0, 8), 0);
    }
}

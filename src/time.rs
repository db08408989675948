//! Fixed-rate frame pacing for hosts.
//!
//! The sketch itself has no notion of wall-clock time; it advances one frame
//! per tick. [`FrameClock`] tells a host when the next tick is due at a target
//! rate, and measures the rate actually achieved.
//!
//! Every method takes the current [`Instant`] explicitly so the clock can be
//! driven from an event loop or from tests.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Instant;
//! use driftfield::time::FrameClock;
//!
//! let mut clock = FrameClock::new(30.0);
//! loop {
//!     let now = Instant::now();
//!     if clock.advance(now) {
//!         sketch.tick()?;
//!     }
//!     std::thread::sleep(clock.until_due(Instant::now()));
//! }
//! ```

use std::time::{Duration, Instant};

/// Paces ticks at a target frame rate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Time between ticks.
    interval: Duration,
    /// When the next tick is due. `None` until the first tick.
    next_due: Option<Instant>,
    /// Ticks granted since creation or reset.
    frame_count: u64,
    /// Measured ticks per second (updated periodically).
    fps: f64,
    fps_frame_count: u64,
    fps_update_time: Option<Instant>,
    fps_update_interval: Duration,
    paused: bool,
}

impl FrameClock {
    /// Clock for `fps` ticks per second. Rates that are not positive, not
    /// finite, or so slow their interval overflows a [`Duration`] fall back
    /// to 30.
    pub fn new(fps: f64) -> Self {
        let fallback = Duration::from_secs_f64(1.0 / 30.0);
        let interval = if fps.is_finite() && fps > 0.0 {
            Duration::try_from_secs_f64(1.0 / fps).unwrap_or(fallback)
        } else {
            fallback
        };
        Self {
            interval,
            next_due: None,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: None,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks granted so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Measured ticks per second.
    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Instant the next tick is due, if one has been scheduled.
    #[inline]
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Whether a tick is due at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        !self.paused && self.next_due.map_or(true, |due| now >= due)
    }

    /// Time left until the next tick, zero if already due.
    pub fn until_due(&self, now: Instant) -> Duration {
        match self.next_due {
            Some(due) if !self.paused => due.saturating_duration_since(now),
            _ => Duration::ZERO,
        }
    }

    /// Consume one tick if it is due at `now`.
    ///
    /// The next deadline is scheduled one interval after the previous one, so
    /// jitter does not accumulate. A host that fell more than one interval
    /// behind is resynchronized to `now` instead of bursting to catch up.
    pub fn advance(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }

        let next = match self.next_due {
            Some(due) => due + self.interval,
            None => now + self.interval,
        };
        self.next_due = Some(if next <= now { now + self.interval } else { next });
        self.frame_count += 1;

        let Some(since) = self.fps_update_time else {
            self.fps_update_time = Some(now);
            self.fps_frame_count = self.frame_count;
            return true;
        };
        let fps_elapsed = now.saturating_duration_since(since);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f64 / fps_elapsed.as_secs_f64();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = Some(now);
        }
        true
    }

    /// Stop granting ticks.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume granting ticks; the first one is due immediately.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.next_due = None;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Reset to the freshly created state, keeping the rate.
    pub fn reset(&mut self) {
        *self = Self {
            interval: self.interval,
            fps_update_interval: self.fps_update_interval,
            ..Self::new(1.0)
        };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(30.0)
    }
}

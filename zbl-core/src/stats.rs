//! Capture frame-rate accounting.

use std::time::{Duration, Instant};

/// How often the capture loop reports its frame rate.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Counts frames and yields an FPS figure once per report interval.
///
/// Time is passed in by the caller so the meter stays deterministic
/// under test.
#[derive(Debug)]
pub struct FpsMeter {
    interval: Duration,
    window_start: Instant,
    frames: u32,
}

impl FpsMeter {
    pub fn new(start: Instant) -> Self {
        Self::with_interval(start, REPORT_INTERVAL)
    }

    pub fn with_interval(start: Instant, interval: Duration) -> Self {
        Self {
            interval,
            window_start: start,
            frames: 0,
        }
    }

    /// Record one frame arriving at `now`.
    ///
    /// Returns `Some(fps)` when strictly more than the interval has passed
    /// since the last report; the counter then starts a new window at
    /// `now`.
    pub fn record(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed <= self.interval {
            return None;
        }
        let fps = f64::from(self.frames) / elapsed.as_secs_f64();
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }

    /// Frames counted in the current window.
    pub fn pending_frames(&self) -> u32 {
        self.frames
    }
}

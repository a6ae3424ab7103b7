//! Frame timing and periodic fps reporting.

use std::time::{Duration, Instant};

use tracing::info;

/// Averages over one reporting window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub fps: f64,
    pub frame_time_ms: f64,
}

/// Tracks per-frame delta time and logs fps once per report interval.
#[derive(Debug, Clone)]
pub struct FrameCounter {
    report_interval: Duration,
    last_frame: Option<Instant>,
    window_start: Option<Instant>,
    frames_in_window: u32,
    delta: Duration,
    last_report: Option<FrameReport>,
}

impl FrameCounter {
    /// Create a counter reporting once per second.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    pub fn with_interval(report_interval: Duration) -> Self {
        Self {
            report_interval,
            last_frame: None,
            window_start: None,
            frames_in_window: 0,
            delta: Duration::ZERO,
            last_report: None,
        }
    }

    /// Record a frame now. Call once per frame.
    pub fn tick(&mut self) -> Option<FrameReport> {
        self.tick_at(Instant::now())
    }

    /// Record a frame at `now`. Returns a report when the interval elapsed.
    pub fn tick_at(&mut self, now: Instant) -> Option<FrameReport> {
        self.delta = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_frame = Some(now);

        // The first tick only opens the window.
        let Some(window_start) = self.window_start else {
            self.window_start = Some(now);
            return None;
        };
        self.frames_in_window += 1;

        let elapsed = now.saturating_duration_since(window_start);
        if elapsed < self.report_interval || elapsed.is_zero() {
            return None;
        }

        let secs = elapsed.as_secs_f64();
        let frames = f64::from(self.frames_in_window);
        let report = FrameReport {
            fps: frames / secs,
            frame_time_ms: secs * 1000.0 / frames,
        };
        info!(
            "{:.2} fps ({:.2} ms/frame)",
            report.fps, report.frame_time_ms
        );
        self.frames_in_window = 0;
        self.window_start = Some(now);
        self.last_report = Some(report);
        Some(report)
    }

    /// Time since the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn last_report(&self) -> Option<FrameReport> {
        self.last_report
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}

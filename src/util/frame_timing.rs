use web_time::{Duration, Instant};

/// Elapsed/delta pair sampled once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
}

/// Frame clock with smoothed FPS.
///
/// Both values of a [`FrameTick`] come from the same `Instant`, so the
/// delta is never consumed by an earlier elapsed-time read.
pub struct FrameTiming {
    /// When the clock started
    start: Instant,
    /// Last frame timestamp
    last_frame: Instant,
    /// Longest delta reported, so a stalled tab does not teleport animations
    max_delta: Duration,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Create a clock starting now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            max_delta: Duration::from_millis(100),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Sample the clock. Call exactly once per frame.
    pub fn tick(&mut self) -> FrameTick {
        self.tick_at(Instant::now())
    }

    /// Sample the clock at an explicit instant.
    pub fn tick_at(&mut self, now: Instant) -> FrameTick {
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        let frame_time = delta.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }

        FrameTick {
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            delta: delta.min(self.max_delta).as_secs_f32(),
        }
    }

    /// Current FPS (smoothed).
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

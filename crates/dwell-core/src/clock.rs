//! Time sources and frame-rate measurement

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall-clock time measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock shared between a test and the code under test
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Frames-per-second estimate, recomputed once at least a second of frame
/// time has accumulated
#[derive(Debug, Clone, Default)]
pub struct FrameRateMeter {
    last_frame_ms: Option<f64>,
    accumulated_ms: f64,
    frames: u32,
    fps: Option<f64>,
}

impl FrameRateMeter {
    const WINDOW_MS: f64 = 1000.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now_ms`
    pub fn record(&mut self, now_ms: f64) {
        if let Some(last) = self.last_frame_ms {
            self.accumulated_ms += (now_ms - last).max(0.0);
            self.frames += 1;
            if self.accumulated_ms >= Self::WINDOW_MS {
                self.fps = Some((self.frames as f64 / self.accumulated_ms * 1000.0).round());
                self.accumulated_ms = 0.0;
                self.frames = 0;
            }
        }
        self.last_frame_ms = Some(now_ms);
    }

    /// Latest estimate; `None` until the first full window
    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    /// Forget timing so a pause does not count as one long frame
    pub fn reset(&mut self) {
        self.last_frame_ms = None;
        self.accumulated_ms = 0.0;
        self.frames = 0;
    }
}

//! Feedback port: advisory output for progress and highlight widgets
//!
//! The engine pushes data out through [`FeedbackPort`] and never reads it
//! back. Presentation (drawing a ring, styling a highlight) lives entirely on
//! the other side of this trait.

use crate::registry::RegionId;
use crate::spatial::Point;

/// Per-tick pointer position and dwell progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackFrame {
    pub x: f64,
    pub y: f64,
    /// In `[0, 1]`
    pub progress: f64,
}

impl FeedbackFrame {
    pub fn new(point: Point, progress: f64) -> Self {
        Self {
            x: point.x,
            y: point.y,
            progress,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Why a dwell target was let go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    /// The pointer moved outside the grace box
    LeftGrace,
    /// The region disappeared or became ineligible mid-dwell
    TargetLost,
    /// The dwell completed and the region fired
    Activated,
    /// The engine was stopped
    Stopped,
}

/// Receiver of engine feedback. Every callback defaults to a no-op.
pub trait FeedbackPort {
    /// Called once per tick that had a pointer sample, and once more with
    /// zero progress right after an activation so the ring resets
    fn on_frame(&mut self, _frame: FeedbackFrame) {}

    /// A region became the dwell target (highlight on)
    fn on_acquired(&mut self, _region: &RegionId) {}

    /// The dwell target was dropped (highlight off)
    fn on_released(&mut self, _region: &RegionId, _reason: ReleaseReason) {}

    /// A completed dwell was dispatched. Fired the same way whether the
    /// region's behavior succeeded or failed.
    fn on_activated(&mut self, _region: &RegionId) {}
}

impl<F: FeedbackPort + ?Sized> FeedbackPort for Box<F> {
    fn on_frame(&mut self, frame: FeedbackFrame) {
        (**self).on_frame(frame)
    }

    fn on_acquired(&mut self, region: &RegionId) {
        (**self).on_acquired(region)
    }

    fn on_released(&mut self, region: &RegionId, reason: ReleaseReason) {
        (**self).on_released(region, reason)
    }

    fn on_activated(&mut self, region: &RegionId) {
        (**self).on_activated(region)
    }
}

/// Discards all feedback
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackPort for NullFeedback {}

/// One recorded feedback callback
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackEvent {
    Frame(FeedbackFrame),
    Acquired(RegionId),
    Released(RegionId, ReleaseReason),
    Activated(RegionId),
}

/// Keeps every callback in order; for tests and simple front ends
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    events: Vec<FeedbackEvent>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[FeedbackEvent] {
        &self.events
    }

    /// Drain everything recorded so far
    pub fn take(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn frames(&self) -> impl Iterator<Item = &FeedbackFrame> {
        self.events.iter().filter_map(|e| match e {
            FeedbackEvent::Frame(frame) => Some(frame),
            _ => None,
        })
    }

    pub fn last_frame(&self) -> Option<&FeedbackFrame> {
        self.frames().last()
    }

    pub fn releases(&self) -> impl Iterator<Item = (&RegionId, ReleaseReason)> {
        self.events.iter().filter_map(|e| match e {
            FeedbackEvent::Released(id, reason) => Some((id, *reason)),
            _ => None,
        })
    }

    pub fn activations(&self) -> impl Iterator<Item = &RegionId> {
        self.events.iter().filter_map(|e| match e {
            FeedbackEvent::Activated(id) => Some(id),
            _ => None,
        })
    }
}

impl FeedbackPort for RecordingFeedback {
    fn on_frame(&mut self, frame: FeedbackFrame) {
        self.events.push(FeedbackEvent::Frame(frame));
    }

    fn on_acquired(&mut self, region: &RegionId) {
        self.events.push(FeedbackEvent::Acquired(region.clone()));
    }

    fn on_released(&mut self, region: &RegionId, reason: ReleaseReason) {
        self.events.push(FeedbackEvent::Released(region.clone(), reason));
    }

    fn on_activated(&mut self, region: &RegionId) {
        self.events.push(FeedbackEvent::Activated(region.clone()));
    }
}

/// Placement of a circular progress ring centered on the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressWheel {
    /// Top-left corner of the ring's box
    pub left: f64,
    pub top: f64,
    pub size: f64,
    pub rotation_deg: f64,
    pub visible: bool,
}

impl ProgressWheel {
    pub const DEFAULT_SIZE: f64 = 40.0;

    /// Ring of the default 40px size for a frame
    pub fn for_frame(frame: &FeedbackFrame) -> Self {
        Self::with_size(frame, Self::DEFAULT_SIZE)
    }

    pub fn with_size(frame: &FeedbackFrame, size: f64) -> Self {
        let half = size / 2.0;
        Self {
            left: frame.x - half,
            top: frame.y - half,
            size,
            rotation_deg: frame.progress * 360.0,
            visible: frame.progress > 0.0,
        }
    }
}

//! Feedback port that keeps just what the renderer needs

use dwell_core::{FeedbackFrame, FeedbackPort, RegionId, ReleaseReason};

#[derive(Debug, Default)]
pub struct DemoFeedback {
    highlighted: Option<RegionId>,
    frame: Option<FeedbackFrame>,
    status: Option<String>,
}

impl DemoFeedback {
    pub fn highlighted(&self) -> Option<&RegionId> {
        self.highlighted.as_ref()
    }

    /// Latest pointer frame, absent while tracking is lost
    pub fn frame(&self) -> Option<&FeedbackFrame> {
        self.frame.as_ref()
    }

    pub fn clear_frame(&mut self) {
        self.frame = None;
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }
}

impl FeedbackPort for DemoFeedback {
    fn on_frame(&mut self, frame: FeedbackFrame) {
        self.frame = Some(frame);
    }

    fn on_acquired(&mut self, region: &RegionId) {
        self.highlighted = Some(region.clone());
        self.status = Some(format!("Dwelling on {}", region));
    }

    fn on_released(&mut self, region: &RegionId, reason: ReleaseReason) {
        if self.highlighted.as_ref() == Some(region) {
            self.highlighted = None;
        }
        match reason {
            ReleaseReason::LeftGrace => self.status = Some(format!("Left {}", region)),
            ReleaseReason::TargetLost => self.status = Some(format!("{} went away", region)),
            ReleaseReason::Stopped => self.status = None,
            // The activation message is already in place
            ReleaseReason::Activated => {}
        }
    }

    fn on_activated(&mut self, region: &RegionId) {
        self.status = Some(format!("Activated {}", region));
    }
}

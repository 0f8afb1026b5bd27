use std::sync::mpsc::Sender;

use crate::classify::Verdict;
use crate::pose::Skeleton;
use crate::source::RgbFrame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Stopped,
    DeviceUnavailable(String),
}

/// Result of processing one frame
#[derive(Debug, Clone)]
pub struct FrameUpdate {
    pub frame: Option<RgbFrame>,
    pub skeleton: Option<Skeleton>,
    /// `None` when no person was detected
    pub verdict: Option<Verdict>,
    pub remaining_secs: u32,
    pub required_secs: u32,
}

/// Receives session output on the worker thread.
/// Implementations hand it off to whatever owns the display.
pub trait SessionSink: Send {
    fn set_status(&mut self, text: &str);
    fn set_timer(&mut self, text: &str);
    fn frame_processed(&mut self, update: FrameUpdate);
    fn session_ended(&mut self, outcome: SessionOutcome);
}

#[derive(Debug, Clone)]
pub enum UiUpdate {
    Status(String),
    Timer(String),
    Frame(FrameUpdate),
    Ended(SessionOutcome),
}

/// Posts every update to a channel drained by the UI thread
pub struct ChannelSink {
    tx: Sender<UiUpdate>,
}

impl ChannelSink {
    pub fn new(tx: Sender<UiUpdate>) -> Self {
        Self { tx }
    }
}

// A closed receiver means the UI is gone; updates are dropped
impl SessionSink for ChannelSink {
    fn set_status(&mut self, text: &str) {
        let _ = self.tx.send(UiUpdate::Status(text.to_string()));
    }

    fn set_timer(&mut self, text: &str) {
        let _ = self.tx.send(UiUpdate::Timer(text.to_string()));
    }

    fn frame_processed(&mut self, update: FrameUpdate) {
        let _ = self.tx.send(UiUpdate::Frame(update));
    }

    fn session_ended(&mut self, outcome: SessionOutcome) {
        let _ = self.tx.send(UiUpdate::Ended(outcome));
    }
}

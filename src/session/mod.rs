pub mod controller;
pub mod hold;
pub mod runner;
pub mod sink;

pub use controller::{timer_text, SessionController, SessionEvent, SessionState};
pub use hold::{HoldDuration, HoldSetting, UnknownHoldDuration};
pub use runner::{SessionHandle, SessionRunner};
pub use sink::{ChannelSink, FrameUpdate, SessionOutcome, SessionSink, UiUpdate};

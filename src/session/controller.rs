//! Per-frame session state machine.
//!
//! The controller turns a stream of [`Verdict`]s into session events. It owns
//! no clock and no I/O: callers pass `now` with every frame and forward the
//! returned events to whatever displays or speaks them.

use std::time::{Duration, Instant};

use crate::classify::{Correction, Verdict};
use crate::config::SessionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Session running, waiting for a run of correct frames
    Armed,
    /// Hold timer running
    Holding,
    Completed,
    Stopped,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Stopped)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started { pose: String, required_secs: u32 },
    HoldStarted { required_secs: u32 },
    TimerTick { remaining: u32 },
    TimerReset { required_secs: u32 },
    Correction(Correction),
    WrongPose { other: &'static str, target: String },
    Completed,
    Stopped { required_secs: u32 },
}

impl SessionEvent {
    /// Status line shown to the user, if this event changes it
    pub fn status(&self) -> Option<String> {
        match self {
            Self::Started { pose, .. } => Some(format!("Starting {pose}... Get ready!")),
            Self::HoldStarted { required_secs } => {
                Some(format!("Perfect pose! Hold for {required_secs} seconds."))
            }
            Self::Correction(msg) => Some(msg.to_string()),
            Self::WrongPose { other, target } => {
                Some(format!("You're doing {other} instead of {target}"))
            }
            Self::Completed => Some("Pose completed perfectly! Great job!".to_string()),
            Self::Stopped { .. } => {
                Some("Session stopped. Select a new pose to continue.".to_string())
            }
            Self::TimerTick { .. } | Self::TimerReset { .. } => None,
        }
    }

    /// Utterance for the speech dispatcher, if any
    pub fn speech(&self) -> Option<String> {
        match self {
            Self::Started { pose, .. } => Some(format!(
                "Get ready for {pose}. Timer will start only when your pose is perfect."
            )),
            Self::HoldStarted { .. } => Some("Your pose is correct. Timer starting now.".to_string()),
            Self::Correction(msg) => Some(msg.to_string()),
            Self::WrongPose { other, target } => Some(format!("You're doing {other} instead of {target}")),
            Self::Completed => Some("Excellent! You have held the pose perfectly.".to_string()),
            _ => None,
        }
    }

    /// Seconds to show on the timer display, if this event changes it
    pub fn timer_secs(&self) -> Option<u32> {
        match self {
            Self::Started { required_secs, .. }
            | Self::TimerReset { required_secs }
            | Self::Stopped { required_secs } => Some(*required_secs),
            Self::TimerTick { remaining } => Some(*remaining),
            _ => None,
        }
    }
}

pub fn timer_text(secs: u32) -> String {
    format!("{secs}s")
}

#[derive(Debug)]
pub struct SessionController {
    state: SessionState,
    target: String,
    consecutive_correct: u32,
    hold_start: Option<Instant>,
    required_secs: u32,
    last_feedback: Option<Instant>,
    debounce_frames: u32,
    feedback_cooldown: Duration,
}

impl SessionController {
    pub fn new(debounce_frames: u32, feedback_cooldown: Duration) -> Self {
        Self {
            state: SessionState::Idle,
            target: String::new(),
            consecutive_correct: 0,
            hold_start: None,
            required_secs: 0,
            last_feedback: None,
            debounce_frames: debounce_frames.max(1),
            feedback_cooldown,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.debounce_frames, config.feedback_cooldown())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn consecutive_correct(&self) -> u32 {
        self.consecutive_correct
    }

    pub fn hold_start(&self) -> Option<Instant> {
        self.hold_start
    }

    pub fn required_secs(&self) -> u32 {
        self.required_secs
    }

    /// Begin a fresh session. Any previous progress is discarded.
    pub fn start(&mut self, pose: &str, required_secs: u32) -> Vec<SessionEvent> {
        self.state = SessionState::Armed;
        self.target = pose.to_string();
        self.consecutive_correct = 0;
        self.hold_start = None;
        self.required_secs = required_secs;
        self.last_feedback = None;
        vec![SessionEvent::Started { pose: self.target.clone(), required_secs }]
    }

    /// Change the hold duration. Takes effect on the next timer computation.
    pub fn set_required_secs(&mut self, secs: u32) {
        self.required_secs = secs;
    }

    pub fn stop(&mut self) -> Vec<SessionEvent> {
        if self.state == SessionState::Stopped {
            return Vec::new();
        }
        self.state = SessionState::Stopped;
        self.consecutive_correct = 0;
        self.hold_start = None;
        vec![SessionEvent::Stopped { required_secs: self.required_secs }]
    }

    /// Advance by one classified frame
    pub fn on_frame(&mut self, verdict: &Verdict, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        match (self.state, verdict) {
            (SessionState::Idle | SessionState::Completed | SessionState::Stopped, _) => {}
            (SessionState::Armed, Verdict::Correct) => {
                self.consecutive_correct += 1;
                if self.consecutive_correct >= self.debounce_frames {
                    self.state = SessionState::Holding;
                    self.hold_start = Some(now);
                    events.push(SessionEvent::HoldStarted { required_secs: self.required_secs });
                    self.tick(now, &mut events);
                }
            }
            (SessionState::Holding, Verdict::Correct) => {
                self.consecutive_correct = self.consecutive_correct.saturating_add(1);
                self.tick(now, &mut events);
            }
            (SessionState::Armed | SessionState::Holding, _) => {
                if self.state == SessionState::Holding {
                    self.state = SessionState::Armed;
                    self.hold_start = None;
                    events.push(SessionEvent::TimerReset { required_secs: self.required_secs });
                }
                self.consecutive_correct = 0;
                self.feedback(verdict, now, &mut events);
            }
        }
        events
    }

    fn tick(&mut self, now: Instant, events: &mut Vec<SessionEvent>) {
        let Some(start) = self.hold_start else { return };
        let elapsed = now.saturating_duration_since(start).as_secs();
        let remaining = u64::from(self.required_secs).saturating_sub(elapsed) as u32;
        events.push(SessionEvent::TimerTick { remaining });
        if remaining == 0 {
            self.state = SessionState::Completed;
            events.push(SessionEvent::Completed);
        }
    }

    fn feedback(&mut self, verdict: &Verdict, now: Instant, events: &mut Vec<SessionEvent>) {
        let due = match self.last_feedback {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.feedback_cooldown,
        };
        if !due {
            return;
        }
        let event = match *verdict {
            Verdict::Incorrect(msg) => SessionEvent::Correction(msg),
            Verdict::WrongPose(other) => {
                SessionEvent::WrongPose { other, target: self.target.clone() }
            }
            Verdict::Correct => return,
        };
        events.push(event);
        self.last_feedback = Some(now);
    }
}

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// The hold durations a user can pick from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldDuration {
    #[default]
    HalfMinute,
    OneMinute,
    ThreeMinutes,
}

impl HoldDuration {
    pub const ALL: [HoldDuration; 3] =
        [HoldDuration::HalfMinute, HoldDuration::OneMinute, HoldDuration::ThreeMinutes];

    pub fn seconds(self) -> u32 {
        match self {
            Self::HalfMinute => 30,
            Self::OneMinute => 60,
            Self::ThreeMinutes => 180,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::HalfMinute => "30s",
            Self::OneMinute => "1 min",
            Self::ThreeMinutes => "3 min",
        }
    }

    /// Next choice, wrapping back to the shortest
    pub fn next(self) -> Self {
        match self {
            Self::HalfMinute => Self::OneMinute,
            Self::OneMinute => Self::ThreeMinutes,
            Self::ThreeMinutes => Self::HalfMinute,
        }
    }

    pub fn from_seconds(secs: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.seconds() == secs)
    }
}

impl fmt::Display for HoldDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("unknown hold duration '{0}' (expected 30s, 1 min or 3 min)")]
pub struct UnknownHoldDuration(pub String);

impl FromStr for HoldDuration {
    type Err = UnknownHoldDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownHoldDuration(s.to_string()))
    }
}

/// Required hold seconds shared between the UI and the session worker.
/// The worker reads it every frame, so a change applies to a running session.
#[derive(Debug, Clone)]
pub struct HoldSetting(Arc<AtomicU32>);

impl HoldSetting {
    pub fn new(secs: u32) -> Self {
        Self(Arc::new(AtomicU32::new(secs)))
    }

    pub fn seconds(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, secs: u32) {
        self.0.store(secs, Ordering::Relaxed);
    }

    /// Advance to the next fixed duration; custom values restart the cycle
    pub fn cycle(&self) -> HoldDuration {
        let next = HoldDuration::from_seconds(self.seconds())
            .map(HoldDuration::next)
            .unwrap_or_default();
        self.set(next.seconds());
        next
    }
}

impl Default for HoldSetting {
    fn default() -> Self {
        Self::new(HoldDuration::default().seconds())
    }
}

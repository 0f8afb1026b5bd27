//! Errors surfaced to the coach's callers.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoachError {
    /// Pose metadata missing or malformed
    #[error("Pose instructions unavailable: {0}")]
    Configuration(String),

    #[error("Pose not recognized: {0}")]
    UnrecognizedPose(String),

    /// Frame source could not be opened or read
    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),
}

pub type Result<T> = std::result::Result<T, CoachError>;

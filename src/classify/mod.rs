pub mod angle;
pub mod classifier;
pub mod metrics;
pub mod rules;
pub mod wrong_pose;

#[cfg(test)]
pub(crate) mod fixtures;

pub use angle::angle;
pub use classifier::{PoseClassifier, PoseTarget, Verdict};
pub use rules::{Correction, PoseRule, PoseRules, RuleResult};

use std::sync::Arc;

use super::rules::{Correction, PoseRules};
use super::wrong_pose;
use crate::error::{CoachError, Result};
use crate::pose::Skeleton;

/// Per-frame outcome for the target pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    /// The skeleton looks like a different known pose
    WrongPose(&'static str),
    /// Right pose attempted, first failing correction
    Incorrect(Correction),
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// Decides correct / wrong pose / incorrect for poses in the catalog
pub struct PoseClassifier {
    rules: Arc<PoseRules>,
    known: Vec<String>,
}

impl PoseClassifier {
    /// Classifier for `known_poses` using the standard rule set
    pub fn new<I, S>(known_poses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_rules(PoseRules::standard(), known_poses)
    }

    pub fn with_rules<I, S>(rules: PoseRules, known_poses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rules: Arc::new(rules),
            known: known_poses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_known(&self, pose: &str) -> bool {
        self.known.iter().any(|p| p == pose)
    }

    /// Poses with a dedicated rule that the catalog does not list
    pub fn uncatalogued_rules(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.names().filter(|name| !self.is_known(name))
    }

    /// Validate a pose name once; the target shares this classifier's rules
    pub fn target(&self, pose: &str) -> Result<PoseTarget> {
        if !self.is_known(pose) {
            return Err(CoachError::UnrecognizedPose(pose.to_string()));
        }
        Ok(PoseTarget {
            name: pose.to_string(),
            rules: Arc::clone(&self.rules),
        })
    }

    pub fn classify(&self, pose: &str, skeleton: &Skeleton) -> Result<Verdict> {
        Ok(self.target(pose)?.classify(skeleton))
    }
}

/// A recognised target pose
#[derive(Debug, Clone)]
pub struct PoseTarget {
    name: String,
    rules: Arc<PoseRules>,
}

impl PoseTarget {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_dedicated_rule(&self) -> bool {
        self.rules.rule(&self.name).is_some()
    }

    /// A broad match to another pose preempts the target's fine-grained corrections
    pub fn classify(&self, skeleton: &Skeleton) -> Verdict {
        if let Some(other) = wrong_pose::detect(skeleton) {
            if other != self.name {
                return Verdict::WrongPose(other);
            }
        }

        match self.rules.check(&self.name, skeleton) {
            Ok(()) => Verdict::Correct,
            Err(correction) => Verdict::Incorrect(correction),
        }
    }
}

use crate::classify::Verdict;
use crate::pose::Landmark;

/// Bones drawn between landmarks (start, end)
pub const SKELETON_CONNECTIONS: [(Landmark, Landmark); 14] = [
    // arms
    (Landmark::LeftShoulder, Landmark::RightShoulder),
    (Landmark::LeftShoulder, Landmark::LeftElbow),
    (Landmark::LeftElbow, Landmark::LeftWrist),
    (Landmark::RightShoulder, Landmark::RightElbow),
    (Landmark::RightElbow, Landmark::RightWrist),
    // torso
    (Landmark::LeftShoulder, Landmark::LeftHip),
    (Landmark::RightShoulder, Landmark::RightHip),
    (Landmark::LeftHip, Landmark::RightHip),
    // legs
    (Landmark::LeftHip, Landmark::LeftKnee),
    (Landmark::LeftKnee, Landmark::LeftAnkle),
    (Landmark::RightHip, Landmark::RightKnee),
    (Landmark::RightKnee, Landmark::RightAnkle),
    // head
    (Landmark::Nose, Landmark::LeftShoulder),
    (Landmark::Nose, Landmark::RightShoulder),
];

pub const KEYPOINT_COLOR: u32 = 0xF542E6;

pub const CORRECT_COLOR: u32 = 0x00FF00;

pub const INCORRECT_COLOR: u32 = 0xFFA500;

pub const WRONG_POSE_COLOR: u32 = 0xFF0000;

/// Skeleton colour before any verdict has been made
pub const NEUTRAL_COLOR: u32 = 0xF57542;

pub const PROGRESS_COLOR: u32 = 0x00C8FF;

pub const PROGRESS_BACKGROUND: u32 = 0x303030;

pub fn verdict_color(verdict: Option<&Verdict>) -> u32 {
    match verdict {
        Some(Verdict::Correct) => CORRECT_COLOR,
        Some(Verdict::Incorrect(_)) => INCORRECT_COLOR,
        Some(Verdict::WrongPose(_)) => WRONG_POSE_COLOR,
        None => NEUTRAL_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_landmark_connected() {
        for lm in Landmark::ALL {
            assert!(SKELETON_CONNECTIONS.iter().any(|(a, b)| *a == lm || *b == lm));
        }
    }

    #[test]
    fn test_verdict_colors_distinct() {
        let colors = [
            verdict_color(Some(&Verdict::Correct)),
            verdict_color(Some(&Verdict::Incorrect("Straighten your back"))),
            verdict_color(Some(&Verdict::WrongPose("Tree Pose"))),
            verdict_color(None),
        ];
        for i in 0..colors.len() {
            for j in i + 1..colors.len() {
                assert_ne!(colors[i], colors[j]);
            }
        }
    }
}

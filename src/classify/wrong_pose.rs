//! Coarse shape tests that guess which known pose a skeleton resembles,
//! independent of the pose the user was asked to do.

use super::metrics::{
    ankle_height, foot_height_diff, hip_height, joint_angle, knee_distance, left_knee_angle,
    right_knee_angle, shoulder_height, shoulder_width,
};
use crate::pose::{Landmark::*, Skeleton};

type ShapeTest = fn(&Skeleton) -> bool;

/// Tests in priority order; the first match wins
const SHAPE_TESTS: [(&str, ShapeTest); 7] = [
    ("Tree Pose", looks_like_tree),
    ("Warrior Pose", looks_like_warrior),
    ("Plank Pose", looks_like_plank),
    ("Chair Pose", looks_like_chair),
    ("Bridge Pose", looks_like_bridge),
    ("Camel Pose", looks_like_camel),
    ("Hero Pose", looks_like_hero),
];

/// Name of the first known pose the skeleton matches
pub fn detect(skeleton: &Skeleton) -> Option<&'static str> {
    SHAPE_TESTS
        .iter()
        .find(|(_, test)| test(skeleton))
        .map(|(name, _)| *name)
}

/// One foot clearly off the ground
fn looks_like_tree(s: &Skeleton) -> bool {
    foot_height_diff(s) > 0.15
}

/// Wide stance with a bent knee
fn looks_like_warrior(s: &Skeleton) -> bool {
    shoulder_width(s) > 0.3 && (left_knee_angle(s) < 120.0 || right_knee_angle(s) < 120.0)
}

/// Straight shoulder-hip-ankle line
fn looks_like_plank(s: &Skeleton) -> bool {
    let body = joint_angle(s, LeftShoulder, LeftHip, LeftAnkle);
    170.0 < body && body < 190.0
}

/// Bent knees and arms up
fn looks_like_chair(s: &Skeleton) -> bool {
    left_knee_angle(s) < 140.0
        && (s.get(LeftWrist).y < s.get(LeftShoulder).y + 0.1
            || s.get(RightWrist).y < s.get(RightShoulder).y + 0.1)
}

/// Hips above shoulders
fn looks_like_bridge(s: &Skeleton) -> bool {
    hip_height(s) < shoulder_height(s) - 0.1
}

/// Open back angle with hands reaching back
fn looks_like_camel(s: &Skeleton) -> bool {
    joint_angle(s, LeftShoulder, LeftHip, LeftKnee) > 140.0
        && (s.get(LeftWrist).y > s.get(LeftHip).y - 0.05
            || s.get(RightWrist).y > s.get(RightHip).y - 0.05)
}

/// Knees together, sitting below the ankles
fn looks_like_hero(s: &Skeleton) -> bool {
    knee_distance(s) < 0.15 && hip_height(s) > ankle_height(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::fixtures::*;

    #[test]
    fn test_detects_each_shape() {
        assert_eq!(detect(&tree()), Some("Tree Pose"));
        assert_eq!(detect(&warrior()), Some("Warrior Pose"));
        assert_eq!(detect(&plank()), Some("Plank Pose"));
        assert_eq!(detect(&chair()), Some("Chair Pose"));
        assert_eq!(detect(&inverted_v()), Some("Bridge Pose"));
        assert_eq!(detect(&camel()), Some("Camel Pose"));
        assert_eq!(detect(&hero()), Some("Hero Pose"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(detect(&standing_prayer()), None);
        assert_eq!(detect(&sagging_plank()), None);
    }

    #[test]
    fn test_priority_order() {
        // A raised foot wins over the straight body line
        let s = tweak(plank(), &[(RightAnkle, 0.8, 0.2)]);
        assert!(looks_like_plank(&s));
        assert_eq!(detect(&s), Some("Tree Pose"));
    }

    #[test]
    fn test_warrior_wins_over_plank() {
        // wide shoulders and a bent knee, yet shoulder-hip-ankle stays straight
        let s = tweak(
            standing_prayer(),
            &[
                (LeftShoulder, 0.2, 0.3),
                (RightShoulder, 0.6, 0.3),
                (LeftHip, 0.25, 0.6),
                (LeftKnee, 0.45, 0.75),
                (LeftAnkle, 0.3, 0.9),
                (RightAnkle, 0.55, 0.9),
            ],
        );
        assert!(looks_like_warrior(&s));
        assert!(looks_like_plank(&s));
        assert_eq!(detect(&s), Some("Warrior Pose"));
    }

    #[test]
    fn test_plank_wins_over_camel() {
        let s = tweak(plank(), &[(LeftWrist, 0.3, 0.6), (RightWrist, 0.3, 0.6)]);
        assert!(looks_like_plank(&s));
        assert!(looks_like_camel(&s));
        assert_eq!(detect(&s), Some("Plank Pose"));
    }

    #[test]
    fn test_chair_wins_over_bridge() {
        let s = tweak(inverted_v(), &[(LeftKnee, 0.7, 0.45)]);
        assert!(looks_like_chair(&s));
        assert!(looks_like_bridge(&s));
        assert_eq!(detect(&s), Some("Chair Pose"));
    }

    #[test]
    fn test_bridge_wins_over_hero() {
        // shoulders on the floor, hips up, knees together above the hips
        let s = tweak(
            standing_prayer(),
            &[
                (LeftShoulder, 0.4, 0.8),
                (RightShoulder, 0.6, 0.8),
                (LeftHip, 0.45, 0.5),
                (RightHip, 0.55, 0.5),
                (LeftKnee, 0.47, 0.45),
                (RightKnee, 0.53, 0.45),
                (LeftAnkle, 0.6, 0.42),
                (RightAnkle, 0.6, 0.42),
                (LeftWrist, 0.43, 0.95),
                (RightWrist, 0.57, 0.95),
            ],
        );
        assert!(looks_like_bridge(&s));
        assert!(looks_like_hero(&s));
        assert_eq!(detect(&s), Some("Bridge Pose"));
    }
}

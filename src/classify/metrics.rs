//! Body measurements shared by the pose rules and the wrong-pose detector.
//! Heights are normalized y values, so a larger value is lower in the frame.

use super::angle::angle;
use crate::pose::{Landmark, Skeleton};

pub fn shoulder_height(s: &Skeleton) -> f32 {
    s.mid_y(Landmark::LeftShoulder, Landmark::RightShoulder)
}

pub fn hip_height(s: &Skeleton) -> f32 {
    s.mid_y(Landmark::LeftHip, Landmark::RightHip)
}

pub fn wrist_height(s: &Skeleton) -> f32 {
    s.mid_y(Landmark::LeftWrist, Landmark::RightWrist)
}

pub fn knee_height(s: &Skeleton) -> f32 {
    s.mid_y(Landmark::LeftKnee, Landmark::RightKnee)
}

pub fn ankle_height(s: &Skeleton) -> f32 {
    s.mid_y(Landmark::LeftAnkle, Landmark::RightAnkle)
}

/// Vertical distance between the two ankles
pub fn foot_height_diff(s: &Skeleton) -> f32 {
    (s.get(Landmark::LeftAnkle).y - s.get(Landmark::RightAnkle).y).abs()
}

/// Horizontal distance between the two shoulders
pub fn shoulder_width(s: &Skeleton) -> f32 {
    (s.get(Landmark::LeftShoulder).x - s.get(Landmark::RightShoulder).x).abs()
}

/// Horizontal distance between the two knees
pub fn knee_distance(s: &Skeleton) -> f32 {
    (s.get(Landmark::LeftKnee).x - s.get(Landmark::RightKnee).x).abs()
}

/// Angle at `vertex` between `from` and `to`
pub fn joint_angle(s: &Skeleton, from: Landmark, vertex: Landmark, to: Landmark) -> f32 {
    angle(s.get(from), s.get(vertex), s.get(to))
}

/// Hip-knee-ankle angle of the left leg
pub fn left_knee_angle(s: &Skeleton) -> f32 {
    joint_angle(s, Landmark::LeftHip, Landmark::LeftKnee, Landmark::LeftAnkle)
}

pub fn right_knee_angle(s: &Skeleton) -> f32 {
    joint_angle(s, Landmark::RightHip, Landmark::RightKnee, Landmark::RightAnkle)
}

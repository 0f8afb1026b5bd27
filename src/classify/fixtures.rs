//! Hand-built skeletons for classifier tests.

use crate::pose::{Landmark, Landmark::*, Point2D, Skeleton};

fn build(points: &[(Landmark, f32, f32)]) -> Skeleton {
    points
        .iter()
        .fold(Skeleton::default(), |s, &(lm, x, y)| s.with(lm, Point2D::new(x, y)))
}

/// `base` with some landmarks moved
pub fn tweak(base: Skeleton, points: &[(Landmark, f32, f32)]) -> Skeleton {
    points
        .iter()
        .fold(base, |s, &(lm, x, y)| s.with(lm, Point2D::new(x, y)))
}

/// Upright, feet together, palms joined at the chest
pub fn standing_prayer() -> Skeleton {
    build(&[
        (Nose, 0.5, 0.15),
        (LeftShoulder, 0.35, 0.3),
        (RightShoulder, 0.55, 0.3),
        (LeftElbow, 0.33, 0.42),
        (RightElbow, 0.57, 0.42),
        (LeftWrist, 0.43, 0.45),
        (RightWrist, 0.47, 0.45),
        (LeftHip, 0.45, 0.6),
        (RightHip, 0.55, 0.6),
        (LeftKnee, 0.45, 0.78),
        (RightKnee, 0.55, 0.78),
        (LeftAnkle, 0.45, 0.95),
        (RightAnkle, 0.55, 0.95),
    ])
}

/// Side view, shoulder-hip-ankle exactly 180°
pub fn plank() -> Skeleton {
    build(&[
        (Nose, 0.2, 0.45),
        (LeftShoulder, 0.3, 0.5),
        (RightShoulder, 0.3, 0.5),
        (LeftElbow, 0.3, 0.45),
        (RightElbow, 0.3, 0.45),
        (LeftWrist, 0.3, 0.4),
        (RightWrist, 0.3, 0.4),
        (LeftHip, 0.5, 0.5),
        (RightHip, 0.5, 0.5),
        (LeftKnee, 0.65, 0.5),
        (RightKnee, 0.65, 0.5),
        (LeftAnkle, 0.8, 0.5),
        (RightAnkle, 0.8, 0.5),
    ])
}

/// Plank with the legs dropped to a 150° shoulder-hip-ankle angle
pub fn sagging_plank() -> Skeleton {
    tweak(
        plank(),
        &[
            (LeftKnee, 0.6299, 0.575),
            (RightKnee, 0.6299, 0.575),
            (LeftAnkle, 0.7598, 0.65),
            (RightAnkle, 0.7598, 0.65),
        ],
    )
}

/// Standing on the left leg, right foot raised
pub fn tree() -> Skeleton {
    tweak(standing_prayer(), &[(RightAnkle, 0.55, 0.7)])
}

/// Wide arms, left knee bent to 90°
pub fn warrior() -> Skeleton {
    tweak(
        standing_prayer(),
        &[
            (LeftShoulder, 0.2, 0.3),
            (RightShoulder, 0.6, 0.3),
            (LeftKnee, 0.3, 0.6),
            (LeftAnkle, 0.3, 0.8),
            (RightAnkle, 0.55, 0.9),
        ],
    )
}

/// Knees bent, arms up
pub fn chair() -> Skeleton {
    tweak(
        standing_prayer(),
        &[
            (LeftKnee, 0.6, 0.72),
            (LeftAnkle, 0.45, 0.9),
            (LeftWrist, 0.4, 0.2),
            (RightWrist, 0.6, 0.2),
        ],
    )
}

/// Inverted V, hips well above shoulders
pub fn inverted_v() -> Skeleton {
    tweak(
        standing_prayer(),
        &[
            (LeftShoulder, 0.3, 0.6),
            (RightShoulder, 0.3, 0.6),
            (LeftHip, 0.5, 0.3),
            (RightHip, 0.5, 0.3),
            (LeftKnee, 0.6, 0.5),
            (RightKnee, 0.6, 0.5),
            (LeftAnkle, 0.7, 0.7),
            (RightAnkle, 0.7, 0.7),
        ],
    )
}

/// Kneeling upright, hands reaching back toward the heels
pub fn camel() -> Skeleton {
    tweak(
        standing_prayer(),
        &[
            (LeftShoulder, 0.55, 0.3),
            (RightShoulder, 0.55, 0.3),
            (LeftHip, 0.5, 0.55),
            (RightHip, 0.5, 0.55),
            (LeftKnee, 0.45, 0.8),
            (RightKnee, 0.45, 0.8),
            (LeftAnkle, 0.2, 0.8),
            (RightAnkle, 0.2, 0.8),
            (LeftWrist, 0.3, 0.75),
            (RightWrist, 0.3, 0.75),
        ],
    )
}

/// Knees together, sitting lower than the feet
pub fn hero() -> Skeleton {
    tweak(
        standing_prayer(),
        &[
            (LeftKnee, 0.47, 0.8),
            (RightKnee, 0.53, 0.8),
            (LeftAnkle, 0.45, 0.55),
            (RightAnkle, 0.55, 0.55),
        ],
    )
}

/// Seated with knees wide open
pub fn seated_open_knees() -> Skeleton {
    tweak(
        standing_prayer(),
        &[
            (LeftShoulder, 0.4, 0.4),
            (RightShoulder, 0.6, 0.4),
            (LeftHip, 0.45, 0.7),
            (RightHip, 0.55, 0.7),
            (LeftKnee, 0.3, 0.72),
            (RightKnee, 0.7, 0.72),
            (LeftAnkle, 0.45, 0.75),
            (RightAnkle, 0.55, 0.75),
        ],
    )
}

/// On hands and knees with a flat back
pub fn tabletop() -> Skeleton {
    tweak(
        standing_prayer(),
        &[
            (LeftShoulder, 0.3, 0.5),
            (RightShoulder, 0.3, 0.5),
            (LeftHip, 0.7, 0.5),
            (RightHip, 0.7, 0.5),
        ],
    )
}

//! Per-pose geometric checks.
//!
//! Every rule is an ordered list of conditions; the first one that fails
//! decides the correction the user hears, so reordering the checks inside a
//! rule changes which correction is reported.

use super::metrics::{
    ankle_height, foot_height_diff, hip_height, joint_angle, knee_distance, knee_height,
    left_knee_angle, right_knee_angle, shoulder_height, shoulder_width, wrist_height,
};
use crate::pose::{Landmark::*, Skeleton};

/// A spoken/displayed correction
pub type Correction = &'static str;

/// `Ok(())` when the pose is held correctly, otherwise the first correction
pub type RuleResult = Result<(), Correction>;

pub type PoseRule = fn(&Skeleton) -> RuleResult;

pub const GENERAL_CORRECTION: Correction =
    "Your posture is not perfect. Align shoulders and hips perfectly.";

fn ensure(condition: bool, correction: Correction) -> RuleResult {
    if condition {
        Ok(())
    } else {
        Err(correction)
    }
}

/// Registry of pose name → rule
#[derive(Debug)]
pub struct PoseRules {
    rules: Vec<(&'static str, PoseRule)>,
}

impl PoseRules {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Every pose with a dedicated rule
    pub fn standard() -> Self {
        let mut rules = Self::empty();
        rules.register("Tree Pose", tree_pose);
        rules.register("Warrior II", warrior_ii);
        rules.register("Cobra Pose", cobra_pose);
        rules.register("Standing Prayer Pose", standing_prayer_pose);
        rules.register("Downward Dog", downward_dog);
        rules.register("Bridge Pose", bridge_pose);
        rules.register("Plank Pose", plank_pose);
        rules.register("Easy Standing Forward Bend", easy_standing_forward_bend);
        rules.register("Standing Side Bend", standing_side_bend);
        rules.register("Easy Warrior", easy_warrior);
        rules.register("Easy Pose", easy_pose);
        rules.register("Seated Twist", seated_twist);
        rules.register("Butterfly Pose", butterfly_pose);
        rules.register("Camel Pose", camel_pose);
        rules.register("Hero Pose", hero_pose);
        rules.register("Chair Pose", chair_pose);
        rules.register("Mountain Pose", mountain_pose);
        rules.register("Child Pose", child_pose);
        rules.register("Seated Forward Bend", seated_forward_bend);
        rules.register("Cat Pose", cat_pose);
        rules.register("Cow Pose", cow_pose);
        rules
    }

    /// Add or replace the rule for `name`
    pub fn register(&mut self, name: &'static str, rule: PoseRule) {
        match self.rules.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = rule,
            None => self.rules.push((name, rule)),
        }
    }

    pub fn rule(&self, name: &str) -> Option<PoseRule> {
        self.rules.iter().find(|(n, _)| *n == name).map(|(_, r)| *r)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|(n, _)| *n)
    }

    /// Run the dedicated rule for `name`, or the general alignment check
    pub fn check(&self, name: &str, skeleton: &Skeleton) -> RuleResult {
        match self.rule(name) {
            Some(rule) => rule(skeleton),
            None => general_alignment(skeleton),
        }
    }
}

impl Default for PoseRules {
    fn default() -> Self {
        Self::standard()
    }
}

/// Fallback for poses without their own rule: level shoulders and hips
pub fn general_alignment(s: &Skeleton) -> RuleResult {
    let shoulder_alignment = (s.get(LeftShoulder).y - s.get(RightShoulder).y).abs();
    let hip_alignment = (s.get(LeftHip).y - s.get(RightHip).y).abs();
    ensure(
        shoulder_alignment < 0.02 && hip_alignment < 0.02,
        GENERAL_CORRECTION,
    )
}

pub fn tree_pose(s: &Skeleton) -> RuleResult {
    ensure(
        foot_height_diff(s) >= 0.08,
        "Please lift one foot and place it on the other thigh",
    )?;
    let hip = joint_angle(s, LeftKnee, LeftHip, RightHip);
    ensure(
        50.0 < hip && hip < 130.0,
        "Lift your knee a bit higher and place foot on inner thigh",
    )
}

pub fn warrior_ii(s: &Skeleton) -> RuleResult {
    let front_knee = left_knee_angle(s);
    let back_leg = right_knee_angle(s);
    ensure(
        70.0 < front_knee && front_knee < 110.0 && back_leg > 150.0,
        "Bend your front knee to about 90 degrees and keep back leg straight",
    )
}

pub fn cobra_pose(s: &Skeleton) -> RuleResult {
    let hip = hip_height(s);
    let shoulder = shoulder_height(s);
    // no head landmark in the rule; shoulder height stands in for it
    let head = shoulder;
    ensure(
        (hip - shoulder).abs() < 0.2,
        "Lie on your stomach with your hands under your shoulders",
    )?;
    ensure(
        shoulder < hip - 0.05,
        "Arch your back more while keeping hips on the ground",
    )?;
    ensure(head < 0.7, "Lift your chest higher off the ground")
}

pub fn standing_prayer_pose(s: &Skeleton) -> RuleResult {
    let shoulder = shoulder_height(s);
    let hip = hip_height(s);
    ensure(shoulder < hip + 0.3, "Stand tall with good posture")?;

    let wrist = wrist_height(s);
    ensure(
        wrist > shoulder - 0.2 && wrist < hip + 0.2,
        "Bring your hands to chest level in prayer position",
    )?;

    let wrist_distance = (s.get(LeftWrist).x - s.get(RightWrist).x).abs();
    ensure(
        wrist_distance < 0.4,
        "Bring your palms closer together at your chest",
    )?;

    let left_elbow = joint_angle(s, LeftShoulder, LeftElbow, LeftWrist);
    let right_elbow = joint_angle(s, RightShoulder, RightElbow, RightWrist);
    ensure(
        left_elbow < 180.0 && right_elbow < 180.0,
        "Bend your elbows and bring hands to heart center",
    )
}

pub fn downward_dog(s: &Skeleton) -> RuleResult {
    let left_body = joint_angle(s, LeftShoulder, LeftHip, LeftAnkle);
    let right_body = joint_angle(s, RightShoulder, RightHip, RightAnkle);
    ensure(
        left_body < 170.0 && right_body < 170.0,
        "Lift your hips up and back to form an inverted V shape",
    )?;
    ensure(
        hip_height(s) < shoulder_height(s) - 0.05,
        "Lift your hips higher to form a proper inverted V shape",
    )
}

pub fn bridge_pose(s: &Skeleton) -> RuleResult {
    ensure(
        hip_height(s) < shoulder_height(s) - 0.05,
        "Lift your hips higher toward the ceiling",
    )?;
    ensure(
        left_knee_angle(s) < 170.0 && right_knee_angle(s) < 170.0,
        "Bend your knees and keep feet flat on the ground",
    )?;
    let back = joint_angle(s, LeftShoulder, LeftHip, LeftKnee);
    ensure(
        120.0 < back && back < 240.0,
        "Keep your back straight while lifting hips",
    )
}

pub fn plank_pose(s: &Skeleton) -> RuleResult {
    let body = joint_angle(s, LeftShoulder, LeftHip, LeftAnkle);
    ensure(
        170.0 < body && body < 190.0,
        "Keep your body in a straight line from head to heels",
    )
}

pub fn easy_standing_forward_bend(s: &Skeleton) -> RuleResult {
    ensure(
        shoulder_height(s) > hip_height(s) + 0.02,
        "Bend forward from your hips, keeping your back relaxed",
    )
}

pub fn standing_side_bend(s: &Skeleton) -> RuleResult {
    let shoulder_diff = (s.get(LeftShoulder).y - s.get(RightShoulder).y).abs();
    ensure(
        shoulder_diff > 0.05,
        "Raise one arm overhead and lean to the side",
    )
}

pub fn easy_warrior(s: &Skeleton) -> RuleResult {
    ensure(
        shoulder_width(s) > 0.1 && (left_knee_angle(s) < 160.0 || right_knee_angle(s) < 160.0),
        "Step one foot back slightly and bend your front knee gently",
    )
}

pub fn easy_pose(s: &Skeleton) -> RuleResult {
    ensure(
        hip_height(s) > 0.6,
        "Sit comfortably on the floor with legs crossed",
    )?;
    ensure(
        knee_distance(s) > 0.15,
        "Open your knees wider and cross your shins",
    )
}

pub fn seated_twist(s: &Skeleton) -> RuleResult {
    let shoulder_alignment = (s.get(LeftShoulder).y - s.get(RightShoulder).y).abs();
    ensure(
        shoulder_alignment > 0.03,
        "Gently twist your spine while keeping it long",
    )
}

pub fn butterfly_pose(s: &Skeleton) -> RuleResult {
    ensure(
        knee_distance(s) > 0.15,
        "Bring soles of feet together and let knees fall open",
    )
}

pub fn camel_pose(s: &Skeleton) -> RuleResult {
    let back = joint_angle(s, LeftShoulder, LeftHip, LeftKnee);
    ensure(
        back > 120.0,
        "Arch your back and place hands on lower back first",
    )?;
    ensure(
        s.get(LeftWrist).y > s.get(LeftHip).y - 0.1 || s.get(RightWrist).y > s.get(RightHip).y - 0.1,
        "Reach your hands toward your heels while arching your back",
    )
}

pub fn hero_pose(s: &Skeleton) -> RuleResult {
    ensure(
        left_knee_angle(s) < 150.0,
        "Kneel with your knees together first",
    )?;
    ensure(knee_distance(s) < 0.25, "Bring your knees closer together")?;
    ensure(
        hip_height(s) > ankle_height(s) - 0.1,
        "Sit back between your heels",
    )
}

pub fn chair_pose(s: &Skeleton) -> RuleResult {
    ensure(
        left_knee_angle(s) < 160.0,
        "Bend your knees as if sitting back into a chair",
    )?;
    ensure(
        s.get(LeftWrist).y < s.get(LeftShoulder).y - 0.1
            || s.get(RightWrist).y < s.get(RightShoulder).y - 0.1,
        "Raise your arms overhead",
    )
}

pub fn mountain_pose(s: &Skeleton) -> RuleResult {
    let shoulder = shoulder_height(s);
    let hip = hip_height(s);
    ensure(shoulder < hip, "Stand tall with good posture")?;

    let wrist = wrist_height(s);
    ensure(
        wrist > hip - 0.2 && wrist < shoulder + 0.2,
        "Let your arms hang naturally at your sides",
    )?;

    let ankle_distance = (s.get(LeftAnkle).x - s.get(RightAnkle).x).abs();
    ensure(
        ankle_distance < 1.0,
        "Stand with feet together or hip-width apart",
    )
}

pub fn child_pose(s: &Skeleton) -> RuleResult {
    let hip = hip_height(s);
    ensure(
        hip > 0.7 && shoulder_height(s) > hip,
        "Kneel and fold forward, resting your forehead toward the floor",
    )?;
    ensure(knee_distance(s) > 0.04, "Widen your knees apart")
}

pub fn seated_forward_bend(s: &Skeleton) -> RuleResult {
    let hip = hip_height(s);
    ensure(hip > 0.5, "Sit on the floor with legs extended")?;
    ensure(
        knee_height(s) > 0.6,
        "Extend your legs straight out in front of you",
    )?;
    ensure(
        shoulder_height(s) > hip + 0.03,
        "Fold forward from your hips, reaching toward your feet",
    )
}

pub fn cat_pose(s: &Skeleton) -> RuleResult {
    let hip = hip_height(s);
    let shoulder = shoulder_height(s);
    ensure((hip - shoulder).abs() < 0.25, "Start on your hands and knees")?;
    ensure(shoulder < hip - 0.03, "Arch your back upward like a cat")
}

pub fn cow_pose(s: &Skeleton) -> RuleResult {
    let hip = hip_height(s);
    let shoulder = shoulder_height(s);
    ensure((hip - shoulder).abs() < 0.25, "Start on your hands and knees")?;
    ensure(
        hip < shoulder - 0.03,
        "Arch your back downward, lifting your chest and gaze",
    )
}

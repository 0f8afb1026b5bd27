use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body landmarks consumed by the pose rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum Landmark {
    Nose = 0,
    LeftShoulder = 1,
    RightShoulder = 2,
    LeftElbow = 3,
    RightElbow = 4,
    LeftWrist = 5,
    RightWrist = 6,
    LeftHip = 7,
    RightHip = 8,
    LeftKnee = 9,
    RightKnee = 10,
    LeftAnkle = 11,
    RightAnkle = 12,
}

impl Landmark {
    pub const COUNT: usize = 13;

    pub const ALL: [Landmark; Landmark::COUNT] = [
        Landmark::Nose,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
    ];

    /// Index of this landmark in MoveNet's 17-keypoint output
    pub fn movenet_index(self) -> usize {
        match self {
            Self::Nose => 0,
            Self::LeftShoulder => 5,
            Self::RightShoulder => 6,
            Self::LeftElbow => 7,
            Self::RightElbow => 8,
            Self::LeftWrist => 9,
            Self::RightWrist => 10,
            Self::LeftHip => 11,
            Self::RightHip => 12,
            Self::LeftKnee => 13,
            Self::RightKnee => 14,
            Self::LeftAnkle => 15,
            Self::RightAnkle => 16,
        }
    }
}

/// Normalized image coordinate. x and y in 0.0..=1.0, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Convert to pixel coordinates
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        let px = (self.x * width as f32) as i32;
        let py = (self.y * height as f32) as i32;
        (px, py)
    }
}

impl From<[f32; 2]> for Point2D {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for [f32; 2] {
    fn from(p: Point2D) -> Self {
        [p.x, p.y]
    }
}

/// One detected person: a point for every [`Landmark`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Skeleton {
    points: [Point2D; Landmark::COUNT],
}

impl Skeleton {
    pub fn new(points: [Point2D; Landmark::COUNT]) -> Self {
        Self { points }
    }

    pub fn get(&self, landmark: Landmark) -> Point2D {
        self.points[landmark as usize]
    }

    /// Copy of this skeleton with one landmark moved
    pub fn with(mut self, landmark: Landmark, point: Point2D) -> Self {
        self.points[landmark as usize] = point;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Landmark, Point2D)> + '_ {
        Landmark::ALL.iter().map(move |&lm| (lm, self.get(lm)))
    }

    /// Mean of the left and right y coordinates of a landmark pair
    pub fn mid_y(&self, left: Landmark, right: Landmark) -> f32 {
        (self.get(left).y + self.get(right).y) / 2.0
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("skeleton is missing landmark {0:?}")]
pub struct MissingLandmark(pub Landmark);

impl TryFrom<HashMap<Landmark, Point2D>> for Skeleton {
    type Error = MissingLandmark;

    fn try_from(map: HashMap<Landmark, Point2D>) -> Result<Self, Self::Error> {
        let mut points = [Point2D::default(); Landmark::COUNT];
        for lm in Landmark::ALL {
            points[lm as usize] = *map.get(&lm).ok_or(MissingLandmark(lm))?;
        }
        Ok(Self { points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_count() {
        assert_eq!(Landmark::COUNT, 13);
        for (i, lm) in Landmark::ALL.iter().enumerate() {
            assert_eq!(*lm as usize, i);
        }
    }

    #[test]
    fn test_movenet_index() {
        assert_eq!(Landmark::LeftShoulder.movenet_index(), 5);
        assert_eq!(Landmark::RightAnkle.movenet_index(), 16);
    }

    #[test]
    fn test_point_to_pixel() {
        let p = Point2D::new(0.5, 0.25);
        assert_eq!(p.to_pixel(640, 480), (320, 120));
    }

    #[test]
    fn test_skeleton_with_and_get() {
        let s = Skeleton::default().with(Landmark::LeftKnee, Point2D::new(0.3, 0.7));
        assert_eq!(s.get(Landmark::LeftKnee), Point2D::new(0.3, 0.7));
        assert_eq!(s.get(Landmark::RightKnee), Point2D::default());
    }

    #[test]
    fn test_skeleton_from_json_map() {
        let mut json = serde_json::Map::new();
        for lm in Landmark::ALL {
            let key = serde_json::to_value(lm).unwrap();
            json.insert(key.as_str().unwrap().to_string(), serde_json::json!([0.5, 0.5]));
        }
        let map: HashMap<Landmark, Point2D> =
            serde_json::from_value(serde_json::Value::Object(json)).unwrap();
        let s = Skeleton::try_from(map).unwrap();
        assert_eq!(s.get(Landmark::Nose), Point2D::new(0.5, 0.5));
    }

    #[test]
    fn test_skeleton_missing_landmark() {
        let mut map = HashMap::new();
        map.insert(Landmark::Nose, Point2D::new(0.5, 0.1));
        let err = Skeleton::try_from(map).unwrap_err();
        assert_eq!(err, MissingLandmark(Landmark::LeftShoulder));
    }
}

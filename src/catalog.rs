//! Pose metadata: display instructions and reference images, keyed by pose name.
//!
//! Loaded once at startup from a JSON object whose key order is the order
//! poses are offered in:
//!
//! ```json
//! { "Tree Pose": { "instructions": "...", "image": "images/tree.png" } }
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoachError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PoseInfo {
    pub instructions: String,
    /// Reference image; owned by the UI, never opened here
    #[serde(default)]
    pub image: Option<PathBuf>,
}

impl PoseInfo {
    /// The reference image, if one is configured and present on disk
    pub fn existing_image(&self) -> Option<&Path> {
        self.image.as_deref().filter(|p| p.exists())
    }

    /// Line shown in place of the reference image
    pub fn image_label(&self) -> String {
        match self.existing_image() {
            Some(image) => format!("Reference: {}", image.display()),
            None => "(Image not found)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PoseCatalog {
    poses: Vec<(String, PoseInfo)>,
}

impl PoseCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse catalog JSON. Relative image paths are resolved against `base_dir`.
    pub fn from_json_str(content: &str, base_dir: Option<&Path>) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(content).map_err(|e| CoachError::Configuration(e.to_string()))?;

        let mut poses = Vec::with_capacity(map.len());
        for (name, value) in map {
            let mut info: PoseInfo = serde_json::from_value(value)
                .map_err(|e| CoachError::Configuration(format!("{name}: {e}")))?;
            if let (Some(base), Some(image)) = (base_dir, info.image.as_ref()) {
                if image.is_relative() {
                    info.image = Some(base.join(image));
                }
            }
            poses.push((name, info));
        }
        Ok(Self { poses })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| CoachError::Configuration(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&content, path.parent())
    }

    /// Load the catalog, or fall back to an empty one plus the error to show the user
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> (Self, Option<CoachError>) {
        match Self::load(path) {
            Ok(catalog) => (catalog, None),
            Err(e) => (Self::empty(), Some(e)),
        }
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.poses.iter().map(|(n, _)| n.as_str())
    }

    /// First pose in file order
    pub fn default_pose(&self) -> Option<&str> {
        self.names().next()
    }

    pub fn get(&self, name: &str) -> Option<&PoseInfo> {
        self.poses.iter().find(|(n, _)| n == name).map(|(_, info)| info)
    }

    /// Instructions and image for the pose the user picked
    pub fn select(&self, name: &str) -> Result<&PoseInfo> {
        self.get(name)
            .ok_or_else(|| CoachError::UnrecognizedPose(name.to_string()))
    }
}

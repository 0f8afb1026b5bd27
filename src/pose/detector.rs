use anyhow::{Context, Result};
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use super::keypoint::{Landmark, Point2D, Skeleton};

/// Keypoints in MoveNet's output
const MOVENET_KEYPOINTS: usize = 17;

/// MoveNet skeleton extractor
pub struct PoseDetector {
    session: Session,
    min_confidence: f32,
}

impl PoseDetector {
    /// Load the ONNX model
    pub fn new<P: AsRef<Path>>(model_path: P, min_confidence: f32) -> Result<Self> {
        let builder = Session::builder()?.with_optimization_level(GraphOptimizationLevel::Level3)?;

        #[cfg(feature = "cuda")]
        let builder = {
            eprintln!("[ort] Attempting CUDA execution provider...");
            builder.with_execution_providers([
                ort::execution_providers::CUDAExecutionProvider::default().build(),
            ])?
        };

        let session = builder
            .commit_from_file(model_path.as_ref())
            .context("Failed to load ONNX model")?;

        Ok(Self {
            session,
            min_confidence,
        })
    }

    /// Run the model on a preprocessed tensor.
    ///
    /// Input: f32 tensor of shape [1, 192, 192, 3]
    /// Output: `None` when nobody is confidently in frame
    pub fn detect(&mut self, input: Array4<f32>) -> Result<Option<Skeleton>> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["serving_default_input_0" => input_tensor])
            .context("Inference failed")?;

        // MoveNet output is [1, 1, 17, 3] as (y, x, confidence)
        let output: ndarray::ArrayViewD<f32> = outputs["StatefulPartitionedCall_0"]
            .try_extract_array()
            .context("Failed to extract output tensor")?;

        let mut raw = [(Point2D::default(), 0.0f32); MOVENET_KEYPOINTS];
        for (i, slot) in raw.iter_mut().enumerate() {
            let y = output[[0, 0, i, 0]];
            let x = output[[0, 0, i, 1]];
            let confidence = output[[0, 0, i, 2]];
            *slot = (Point2D::new(x, y), confidence);
        }

        Ok(skeleton_from_movenet(&raw, self.min_confidence))
    }
}

/// Pick the landmarks we use out of MoveNet's keypoints. A frame whose mean
/// confidence over those landmarks is below `min_confidence` counts as empty.
pub fn skeleton_from_movenet(
    raw: &[(Point2D, f32); MOVENET_KEYPOINTS],
    min_confidence: f32,
) -> Option<Skeleton> {
    let mut points = [Point2D::default(); Landmark::COUNT];
    let mut confidence_sum = 0.0;
    for lm in Landmark::ALL {
        let (point, confidence) = raw[lm.movenet_index()];
        points[lm as usize] = point;
        confidence_sum += confidence;
    }

    if confidence_sum / (Landmark::COUNT as f32) < min_confidence {
        return None;
    }
    Some(Skeleton::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_from_movenet_picks_landmarks() {
        let mut raw = [(Point2D::default(), 0.9); MOVENET_KEYPOINTS];
        raw[15] = (Point2D::new(0.4, 0.95), 0.9);
        let skeleton = skeleton_from_movenet(&raw, 0.3).unwrap();
        assert_eq!(skeleton.get(Landmark::LeftAnkle), Point2D::new(0.4, 0.95));
    }

    #[test]
    fn test_skeleton_from_movenet_low_confidence() {
        let raw = [(Point2D::new(0.5, 0.5), 0.1); MOVENET_KEYPOINTS];
        assert!(skeleton_from_movenet(&raw, 0.3).is_none());
    }
}

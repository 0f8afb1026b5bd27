use anyhow::{Context, Result};
use opencv::{
    core::{Mat, Vec3b},
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs, VideoCaptureTrait},
};

use crate::config::{CameraConfig, DetectorConfig};
use crate::pose::{preprocess_for_movenet, PoseDetector};
use crate::source::{FrameSource, RgbFrame, SourceFrame};

/// OpenCV webcam capture
pub struct OpenCvCamera {
    capture: VideoCapture,
    width: u32,
    height: u32,
}

impl OpenCvCamera {
    /// Open a camera and request a resolution. The driver may pick another one.
    pub fn open_with_resolution(index: i32, width: Option<u32>, height: Option<u32>) -> Result<Self> {
        let mut capture =
            VideoCapture::new(index, VideoCaptureAPIs::CAP_ANY as i32).context("Failed to open camera")?;

        if !capture.is_opened()? {
            anyhow::bail!("Camera {} is not available", index);
        }

        if let Some(w) = width {
            capture.set(videoio::CAP_PROP_FRAME_WIDTH, w as f64)?;
        }
        if let Some(h) = height {
            capture.set(videoio::CAP_PROP_FRAME_HEIGHT, h as f64)?;
        }
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        let actual_width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let actual_height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;

        Ok(Self {
            capture,
            width: actual_width,
            height: actual_height,
        })
    }

    pub fn from_config(config: &CameraConfig) -> Result<Self> {
        Self::open_with_resolution(config.index, Some(config.width), Some(config.height))
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Read one BGR frame
    pub fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        self.capture
            .read(&mut frame)
            .context("Failed to read frame")?;

        if frame.empty() {
            anyhow::bail!("Empty frame received");
        }

        Ok(frame)
    }
}

/// Copy a BGR Mat into packed 0RGB pixels
pub fn mat_to_rgb(frame: &Mat) -> Result<RgbFrame> {
    let width = frame.cols() as usize;
    let height = frame.rows() as usize;
    let mut out = RgbFrame::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let pixel = frame.at_2d::<Vec3b>(y as i32, x as i32)?;
            let r = pixel[2] as u32;
            let g = pixel[1] as u32;
            let b = pixel[0] as u32;
            out.data[y * width + x] = (r << 16) | (g << 8) | b;
        }
    }
    Ok(out)
}

/// Live webcam frames run through the MoveNet detector
pub struct CameraSource {
    camera: OpenCvCamera,
    detector: PoseDetector,
}

impl CameraSource {
    pub fn new(camera: OpenCvCamera, detector: PoseDetector) -> Self {
        Self { camera, detector }
    }

    /// Open the configured camera and load the model
    pub fn open(camera: &CameraConfig, detector: &DetectorConfig) -> Result<Self> {
        let camera = OpenCvCamera::from_config(camera)?;
        let detector = PoseDetector::new(&detector.model_path, detector.min_confidence)?;
        Ok(Self::new(camera, detector))
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Option<SourceFrame>> {
        let frame = self.camera.read_frame()?;
        let input = preprocess_for_movenet(&frame)?;
        let skeleton = self.detector.detect(input)?;
        let pixels = mat_to_rgb(&frame)?;
        Ok(Some(SourceFrame { pixels: Some(pixels), skeleton }))
    }
}

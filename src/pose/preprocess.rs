use anyhow::{Context, Result};
use ndarray::Array4;
use opencv::{
    core::{AlgorithmHint, Mat, Size, Vec3b},
    imgproc,
    prelude::*,
};

/// MoveNet Lightning input edge length
pub const MOVENET_INPUT_SIZE: i32 = 192;

/// Turn a BGR camera frame into MoveNet's [1, 192, 192, 3] RGB input (0.0-255.0).
///
/// The frame is stretched to the square input; MoveNet returns coordinates
/// normalized to the input, which map straight back onto the camera frame.
pub fn preprocess_for_movenet(frame: &Mat) -> Result<Array4<f32>> {
    let mut resized = Mat::default();
    imgproc::resize(
        frame,
        &mut resized,
        Size::new(MOVENET_INPUT_SIZE, MOVENET_INPUT_SIZE),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )
    .context("Failed to resize frame")?;

    let mut rgb = Mat::default();
    imgproc::cvt_color(&resized, &mut rgb, imgproc::COLOR_BGR2RGB, 0, AlgorithmHint::ALGO_HINT_DEFAULT)?;

    let side = MOVENET_INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, side, side, 3));
    for y in 0..MOVENET_INPUT_SIZE {
        for x in 0..MOVENET_INPUT_SIZE {
            let pixel = rgb.at_2d::<Vec3b>(y, x)?;
            for c in 0..3 {
                tensor[[0, y as usize, x as usize, c]] = pixel[c] as f32;
            }
        }
    }

    Ok(tensor)
}

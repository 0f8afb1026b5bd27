pub mod capture;

pub use capture::{mat_to_rgb, CameraSource, OpenCvCamera};

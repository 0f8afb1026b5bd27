pub mod skeleton;
pub mod window;

pub use minifb::Key;
pub use skeleton::{verdict_color, SKELETON_CONNECTIONS};
pub use window::{Canvas, MinifbRenderer};

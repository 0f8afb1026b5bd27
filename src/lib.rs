#[cfg(feature = "desktop")]
pub mod camera;
pub mod catalog;
pub mod classify;
pub mod coach;
pub mod config;
pub mod error;
pub mod logging;
pub mod pose;
#[cfg(feature = "desktop")]
pub mod render;
pub mod session;
pub mod source;
pub mod speech;

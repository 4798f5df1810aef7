pub mod camera;
pub mod pattern;

pub use camera::{CameraDriver, CameraError, CameraFrame, CameraFrameCapturer, PixelFormat};

use async_trait::async_trait;
use bytes::Bytes;
use log::warn;
use thiserror::Error;

use framelink_buffer_utils::{BufMut, BytesMut};
use framelink_core::{
    error::DropReason,
    traits::{BorrowMutFrameProperties, FrameError, FrameProcessor},
};

/// Pixel layout of a frame as delivered by a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Grayscale,
    Rgb565,
    Rgb888,
    Jpeg,
}

impl PixelFormat {
    /// Bytes per pixel for raw layouts; `None` for compressed ones.
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            PixelFormat::Grayscale => Some(1),
            PixelFormat::Rgb565 => Some(2),
            PixelFormat::Rgb888 => Some(3),
            PixelFormat::Jpeg => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Camera returned no frame")]
    NoFrame,

    #[error("Camera device error: {0}")]
    Device(String),
}

/// One frame handed out by a driver. The data lives in driver-owned storage
/// until [`CameraDriver::release`] gets the frame back, which must happen
/// within the same pipeline iteration.
pub struct CameraFrame {
    data: Bytes,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl CameraFrame {
    pub fn new(data: Bytes, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            data,
            width,
            height,
            format,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }
}

/// The vendor camera seam: acquire one frame, release it after use. Drivers
/// are free to recycle the released storage for the next acquisition.
pub trait CameraDriver {
    fn acquire(&mut self) -> Result<CameraFrame, CameraError>;
    fn release(&mut self, frame: CameraFrame);
}

/// Copies one acquired camera frame into the frame DTO's buffer slot and
/// releases the driver storage. An acquisition failure is reported on the
/// frame and resolved by the next error switch; the loop itself never stops.
pub struct CameraFrameCapturer<D, K> {
    driver: D,
    buffer_key: K,
}

impl<D: CameraDriver, K> CameraFrameCapturer<D, K> {
    pub fn new(driver: D, buffer_key: K) -> Self {
        Self { driver, buffer_key }
    }
}

#[async_trait]
impl<D, F, K> FrameProcessor<F> for CameraFrameCapturer<D, K>
where
    D: CameraDriver + Send,
    K: Send,
    F: BorrowMutFrameProperties<K, BytesMut> + FrameError<DropReason> + Send + 'static,
{
    async fn process(&mut self, mut frame_data: F) -> Option<F> {
        match self.driver.acquire() {
            Ok(frame) => {
                if frame.data().is_empty() {
                    self.driver.release(frame);
                    frame_data.report_error(DropReason::EmptyFrame);
                    return Some(frame_data);
                }

                let buffer = frame_data.get_mut_ref(&self.buffer_key).unwrap();
                buffer.clear();
                buffer.put(frame.data());

                self.driver.release(frame);
            }
            Err(err) => {
                warn!("Frame acquisition failed: {}", err);
                frame_data.report_error(DropReason::AcquisitionFailed);
            }
        }

        Some(frame_data)
    }
}

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;

use crate::camera::{CameraDriver, CameraError, CameraFrame, PixelFormat};

/// Host-side stand-in for a raw camera: produces a scrolling diagonal
/// gradient so receivers show visible motion. Useful for demos and for
/// exercising pipelines without camera hardware.
pub struct TestPatternDriver {
    width: u32,
    height: u32,
    format: PixelFormat,
    tick: u32,
}

impl TestPatternDriver {
    /// `format` must be a raw layout; use [`JpegPatternDriver`] for a
    /// camera with a hardware JPEG encoder.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        assert!(
            format.bytes_per_pixel().is_some(),
            "test pattern requires a raw pixel format"
        );

        Self {
            width,
            height,
            format,
            tick: 0,
        }
    }

    fn render(&self) -> Vec<u8> {
        let (width, height) = (self.width as usize, self.height as usize);
        let bpp = self.format.bytes_per_pixel().unwrap();
        let mut data = Vec::with_capacity(width * height * bpp);

        for y in 0..height {
            for x in 0..width {
                let (r, g, b) = gradient_rgb(x as u32, y as u32, self.tick);

                match self.format {
                    PixelFormat::Grayscale => data.push(luma(r, g, b)),
                    PixelFormat::Rgb565 => {
                        let packed = pack_rgb565(r, g, b);
                        data.push((packed >> 8) as u8);
                        data.push((packed & 0xFF) as u8);
                    }
                    PixelFormat::Rgb888 => {
                        data.push(r);
                        data.push(g);
                        data.push(b);
                    }
                    PixelFormat::Jpeg => unreachable!(),
                }
            }
        }

        data
    }
}

impl CameraDriver for TestPatternDriver {
    fn acquire(&mut self) -> Result<CameraFrame, CameraError> {
        let frame = CameraFrame::new(
            Bytes::from(self.render()),
            self.width,
            self.height,
            self.format,
        );
        self.tick = self.tick.wrapping_add(1);

        Ok(frame)
    }

    fn release(&mut self, _frame: CameraFrame) {}
}

/// Stand-in for a camera with an on-sensor JPEG encoder: a short loop of
/// gradient frames is compressed once at construction and handed out in
/// rotation, so acquisition cost matches the hardware case (no per-frame
/// encode on the host).
pub struct JpegPatternDriver {
    frames: Vec<Bytes>,
    width: u32,
    height: u32,
    cursor: usize,
}

impl JpegPatternDriver {
    const LOOP_FRAMES: u32 = 8;

    pub fn new(width: u32, height: u32, quality: u8) -> Result<Self, CameraError> {
        let mut frames = Vec::new();

        for tick in 0..Self::LOOP_FRAMES {
            let mut rgb = Vec::with_capacity((width * height * 3) as usize);
            for y in 0..height {
                for x in 0..width {
                    let (r, g, b) = gradient_rgb(x, y, tick * 8);
                    rgb.extend_from_slice(&[r, g, b]);
                }
            }

            let mut jpeg = Vec::new();
            JpegEncoder::new_with_quality(&mut jpeg, quality)
                .encode(&rgb, width, height, image::ColorType::Rgb8)
                .map_err(|err| CameraError::Device(err.to_string()))?;

            frames.push(Bytes::from(jpeg));
        }

        Ok(Self {
            frames,
            width,
            height,
            cursor: 0,
        })
    }
}

impl CameraDriver for JpegPatternDriver {
    fn acquire(&mut self) -> Result<CameraFrame, CameraError> {
        let data = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();

        Ok(CameraFrame::new(
            data,
            self.width,
            self.height,
            PixelFormat::Jpeg,
        ))
    }

    fn release(&mut self, _frame: CameraFrame) {}
}

fn gradient_rgb(x: u32, y: u32, tick: u32) -> (u8, u8, u8) {
    let r = ((x + tick) & 0xFF) as u8;
    let g = ((y + tick) & 0xFF) as u8;
    let b = ((x + y) & 0xFF) as u8;
    (r, g, b)
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

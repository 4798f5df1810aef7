use async_trait::async_trait;

use framelink_buffer_utils::BytesMut;
use framelink_core::traits::{FrameProcessor, PullableFrameProperties};

use super::rgb565_to_rgb888;

/// Widens the RGB565 buffer in the source slot into the RGB888 destination
/// slot. Total per-pixel transform; buffer sizing is the pipeline builder's
/// responsibility.
pub struct Rgb565ToRgb888Converter<K> {
    src_key: K,
    dst_key: K,
}

impl<K> Rgb565ToRgb888Converter<K> {
    pub fn new(src_key: K, dst_key: K) -> Self {
        Self { src_key, dst_key }
    }
}

#[async_trait]
impl<F, K> FrameProcessor<F> for Rgb565ToRgb888Converter<K>
where
    K: Copy + Send,
    F: PullableFrameProperties<K, BytesMut> + Send + 'static,
{
    async fn process(&mut self, mut frame_data: F) -> Option<F> {
        let src_buffer = frame_data.pull(&self.src_key).unwrap();
        let mut dst_buffer = frame_data.pull(&self.dst_key).unwrap();

        dst_buffer.clear();
        rgb565_to_rgb888(&src_buffer, &mut dst_buffer);

        frame_data.push(self.src_key, src_buffer);
        frame_data.push(self.dst_key, dst_buffer);

        Some(frame_data)
    }
}

use async_trait::async_trait;
use image::{codecs::jpeg::JpegEncoder, ColorType};
use log::warn;

use framelink_buffer_utils::{BufMut, BytesMut};
use framelink_core::{
    error::DropReason,
    traits::{FrameError, FrameProcessor, PullableFrameProperties},
};

/// Compresses the RGB888 buffer in the source slot into a JPEG written to
/// the destination slot. Quality is fixed at build time, 1-100, higher
/// meaning better fidelity and larger output. An encoder failure reports
/// `CompressionFailed`; transmission is skipped for that frame only.
pub struct JpegFrameEncoder<K> {
    width: u32,
    height: u32,
    quality: u8,

    raw_key: K,
    encoded_key: K,
}

impl<K> JpegFrameEncoder<K> {
    pub fn new(width: u32, height: u32, quality: u8, raw_key: K, encoded_key: K) -> Self {
        Self {
            width,
            height,
            quality,
            raw_key,
            encoded_key,
        }
    }
}

#[async_trait]
impl<F, K> FrameProcessor<F> for JpegFrameEncoder<K>
where
    K: Copy + Send,
    F: PullableFrameProperties<K, BytesMut> + FrameError<DropReason> + Send + 'static,
{
    async fn process(&mut self, mut frame_data: F) -> Option<F> {
        let raw_buffer = frame_data.pull(&self.raw_key).unwrap();
        let mut encoded_buffer = frame_data.pull(&self.encoded_key).unwrap();

        encoded_buffer.clear();

        let result = JpegEncoder::new_with_quality((&mut encoded_buffer).writer(), self.quality)
            .encode(&raw_buffer, self.width, self.height, ColorType::Rgb8);

        if let Err(err) = result {
            warn!("JPEG encoding failed: {}", err);
            encoded_buffer.clear();
            frame_data.report_error(DropReason::CompressionFailed);
        }

        frame_data.push(self.raw_key, raw_buffer);
        frame_data.push(self.encoded_key, encoded_buffer);

        Some(frame_data)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
    enum Slot {
        Raw,
        Encoded,
    }

    #[derive(Default)]
    struct TestFrameData {
        buffers: HashMap<Slot, BytesMut>,
        drop_reason: Option<DropReason>,
    }

    impl PullableFrameProperties<Slot, BytesMut> for TestFrameData {
        fn push(&mut self, key: Slot, value: BytesMut) {
            self.buffers.insert(key, value);
        }

        fn pull(&mut self, key: &Slot) -> Option<BytesMut> {
            self.buffers.remove(key)
        }
    }

    impl FrameError<DropReason> for TestFrameData {
        fn report_error(&mut self, error: DropReason) {
            self.drop_reason = Some(error);
        }

        fn get_error(&self) -> Option<DropReason> {
            self.drop_reason
        }
    }

    fn dto_with_raw(len: usize) -> TestFrameData {
        let mut dto = TestFrameData::default();
        dto.push(Slot::Raw, BytesMut::from(&vec![0x7Fu8; len][..]));
        dto.push(Slot::Encoded, BytesMut::new());
        dto
    }

    #[tokio::test]
    async fn test_encoded_frame_decodes_to_original_dimensions() {
        let mut encoder = JpegFrameEncoder::new(16, 8, 90, Slot::Raw, Slot::Encoded);

        let dto = encoder.process(dto_with_raw(16 * 8 * 3)).await.unwrap();

        assert!(dto.get_error().is_none());
        let jpeg = &dto.buffers[&Slot::Encoded];
        let decoded = image::load_from_memory(jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[tokio::test]
    async fn test_mismatched_buffer_reports_compression_failure() {
        let mut encoder = JpegFrameEncoder::new(16, 8, 90, Slot::Raw, Slot::Encoded);

        // One pixel short of 16x8 RGB888.
        let dto = encoder.process(dto_with_raw(16 * 8 * 3 - 3)).await.unwrap();

        assert_eq!(dto.get_error(), Some(DropReason::CompressionFailed));
        assert!(dto.buffers[&Slot::Encoded].is_empty());
    }
}

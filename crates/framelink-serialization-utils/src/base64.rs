use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use log::warn;

use framelink_buffer_utils::BytesMut;
use framelink_core::{
    error::DropReason,
    traits::{FrameError, FrameProcessor, PullableFrameProperties},
};

/// Exact size of the Base64 rendering of `n` input bytes, `=` padding
/// included. Pool buffers for encoded slots are sized with this formula
/// once at startup and reused every iteration.
pub fn encoded_size(n: usize) -> usize {
    (n + 2) / 3 * 4
}

/// Renders the binary buffer in the source slot as Base64 text in the
/// destination slot. The destination is a preallocated pool buffer; the
/// line terminator is the sender's business, not ours.
pub struct Base64Encoder<K> {
    src_key: K,
    dst_key: K,
}

impl<K> Base64Encoder<K> {
    pub fn new(src_key: K, dst_key: K) -> Self {
        Self { src_key, dst_key }
    }
}

#[async_trait]
impl<F, K> FrameProcessor<F> for Base64Encoder<K>
where
    K: Copy + Send,
    F: PullableFrameProperties<K, BytesMut> + FrameError<DropReason> + Send + 'static,
{
    async fn process(&mut self, mut frame_data: F) -> Option<F> {
        let src_buffer = frame_data.pull(&self.src_key).unwrap();
        let mut dst_buffer = frame_data.pull(&self.dst_key).unwrap();

        dst_buffer.clear();
        dst_buffer.resize(encoded_size(src_buffer.len()), 0);

        match STANDARD.encode_slice(&src_buffer, &mut dst_buffer) {
            Ok(written) => dst_buffer.truncate(written),
            Err(err) => {
                warn!("Base64 encoding failed: {}", err);
                dst_buffer.clear();
                frame_data.report_error(DropReason::CompressionFailed);
            }
        }

        frame_data.push(self.src_key, src_buffer);
        frame_data.push(self.dst_key, dst_buffer);

        Some(frame_data)
    }
}

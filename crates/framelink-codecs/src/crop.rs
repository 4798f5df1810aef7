use async_trait::async_trait;
use log::debug;
use thiserror::Error;

use framelink_buffer_utils::BytesMut;
use framelink_core::{
    error::DropReason,
    traits::{FrameError, FrameProcessor, PullableFrameProperties},
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CropError {
    #[error("crop target {out_width}x{out_height} exceeds source {in_width}x{in_height}")]
    TargetLargerThanSource {
        in_width: usize,
        in_height: usize,
        out_width: usize,
        out_height: usize,
    },
}

/// Copies the centered `out_width x out_height` rectangle of `src` into
/// `dst`. Offsets are `(in - out) / 2` with integer division, so an odd
/// size difference leaves the extra pixel row/column on the far edge.
/// Receivers depend on the resulting alignment; do not round.
///
/// On failure nothing is written to `dst`.
pub fn crop_center(
    src: &[u8],
    in_width: usize,
    in_height: usize,
    bytes_per_pixel: usize,
    out_width: usize,
    out_height: usize,
    dst: &mut BytesMut,
) -> Result<(), CropError> {
    if out_width > in_width || out_height > in_height {
        return Err(CropError::TargetLargerThanSource {
            in_width,
            in_height,
            out_width,
            out_height,
        });
    }

    let x_offset = (in_width - out_width) / 2;
    let y_offset = (in_height - out_height) / 2;

    for row in 0..out_height {
        let start = ((y_offset + row) * in_width + x_offset) * bytes_per_pixel;
        let end = start + out_width * bytes_per_pixel;
        dst.extend_from_slice(&src[start..end]);
    }

    Ok(())
}

/// Crops the frame in the source slot to a centered rectangle written into
/// the destination slot. A crop target larger than the source reports
/// `DimensionMismatch` and abandons the frame at the next error switch.
pub struct CenterCropper<K> {
    in_width: usize,
    in_height: usize,
    bytes_per_pixel: usize,
    out_width: usize,
    out_height: usize,

    src_key: K,
    dst_key: K,
}

impl<K> CenterCropper<K> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        in_width: usize,
        in_height: usize,
        bytes_per_pixel: usize,
        out_width: usize,
        out_height: usize,
        src_key: K,
        dst_key: K,
    ) -> Self {
        Self {
            in_width,
            in_height,
            bytes_per_pixel,
            out_width,
            out_height,
            src_key,
            dst_key,
        }
    }
}

#[async_trait]
impl<F, K> FrameProcessor<F> for CenterCropper<K>
where
    K: Copy + Send,
    F: PullableFrameProperties<K, BytesMut> + FrameError<DropReason> + Send + 'static,
{
    async fn process(&mut self, mut frame_data: F) -> Option<F> {
        let src_buffer = frame_data.pull(&self.src_key).unwrap();
        let mut dst_buffer = frame_data.pull(&self.dst_key).unwrap();

        dst_buffer.clear();

        if let Err(err) = crop_center(
            &src_buffer,
            self.in_width,
            self.in_height,
            self.bytes_per_pixel,
            self.out_width,
            self.out_height,
            &mut dst_buffer,
        ) {
            debug!("Dropping frame: {}", err);
            frame_data.report_error(DropReason::DimensionMismatch);
        }

        frame_data.push(self.src_key, src_buffer);
        frame_data.push(self.dst_key, dst_buffer);

        Some(frame_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rectangle_is_extracted() {
        // 4x4 single-byte pixels numbered row-major.
        let src: Vec<u8> = (0..16).collect();
        let mut dst = BytesMut::new();

        crop_center(&src, 4, 4, 1, 2, 2, &mut dst).unwrap();

        assert_eq!(&dst[..], &[5, 6, 9, 10]);
    }

    #[test]
    fn test_output_length_accounts_for_pixel_width() {
        let src = vec![0u8; 6 * 4 * 2];
        let mut dst = BytesMut::new();

        crop_center(&src, 6, 4, 2, 3, 2, &mut dst).unwrap();

        assert_eq!(dst.len(), 3 * 2 * 2);
    }

    #[test]
    fn test_odd_difference_biases_toward_the_near_edge() {
        // 5 columns down to 2: offset is (5 - 2) / 2 = 1, never 2.
        let src: Vec<u8> = (0..5).collect();
        let mut dst = BytesMut::new();

        crop_center(&src, 5, 1, 1, 2, 1, &mut dst).unwrap();

        assert_eq!(&dst[..], &[1, 2]);
    }

    #[test]
    fn test_oversized_target_fails_and_writes_nothing() {
        let src = vec![0u8; 4];
        let mut dst = BytesMut::new();

        let result = crop_center(&src, 2, 2, 1, 3, 2, &mut dst);

        assert!(result.is_err());
        assert!(dst.is_empty());

        let result = crop_center(&src, 2, 2, 1, 2, 3, &mut dst);

        assert!(result.is_err());
        assert!(dst.is_empty());
    }

    mod processor {
        use std::collections::HashMap;

        use super::*;

        #[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
        enum Slot {
            Raw,
            Cropped,
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

        #[tokio::test]
        async fn test_oversized_target_reports_dimension_mismatch() {
            let mut cropper = CenterCropper::new(2, 2, 1, 4, 4, Slot::Raw, Slot::Cropped);

            let mut dto = TestFrameData::default();
            dto.push(Slot::Raw, BytesMut::from(&[0u8; 4][..]));
            dto.push(Slot::Cropped, BytesMut::new());

            let dto = cropper.process(dto).await.unwrap();

            assert_eq!(dto.get_error(), Some(DropReason::DimensionMismatch));
            assert!(dto.buffers[&Slot::Cropped].is_empty());
        }
    }
}

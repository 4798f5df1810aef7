use std::collections::HashMap;

use framelink_buffer_utils::BytesMut;
use framelink_core::{
    error::DropReason,
    traits::{
        BorrowFrameProperties, BorrowMutFrameProperties, FrameError, FrameProperties,
        PullableFrameProperties,
    },
};

/// Buffer slots a frame may carry while moving through a streamer pipeline.
/// Each variant holds at most one pooled buffer at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKey {
    /// Frame as delivered by the camera driver.
    RawFrame,
    /// Centered crop of the raw frame, same pixel encoding.
    CroppedFrame,
    /// RGB888 widening of the cropped frame.
    ConvertedFrame,
    /// JPEG bytes, from hardware or from the software encoder.
    CompressedFrame,
    /// Base64 text of the 12-byte frame header.
    TextHeader,
    /// Base64 text of the frame body.
    TextBody,
}

/// The frame DTO moved through streamer pipelines. Exclusively owned by one
/// component at a time; buffers live in it for exactly one iteration before
/// a redeemer pulls them back to their pool.
#[derive(Debug, Default)]
pub struct CaptureFrameData {
    buffers: HashMap<BufferKey, BytesMut>,

    stats: HashMap<&'static str, u128>,

    drop_reason: Option<DropReason>,
}

impl PullableFrameProperties<BufferKey, BytesMut> for CaptureFrameData {
    fn push(&mut self, key: BufferKey, value: BytesMut) {
        self.buffers.insert(key, value);
    }

    fn pull(&mut self, key: &BufferKey) -> Option<BytesMut> {
        self.buffers.remove(key)
    }
}

impl BorrowFrameProperties<BufferKey, BytesMut> for CaptureFrameData {
    fn get_ref(&self, key: &BufferKey) -> Option<&BytesMut> {
        self.buffers.get(key)
    }
}

impl BorrowMutFrameProperties<BufferKey, BytesMut> for CaptureFrameData {
    fn get_mut_ref(&mut self, key: &BufferKey) -> Option<&mut BytesMut> {
        self.buffers.get_mut(key)
    }
}

impl FrameProperties<&'static str, u128> for CaptureFrameData {
    fn set(&mut self, key: &'static str, value: u128) {
        self.stats.insert(key, value);
    }

    fn get(&self, key: &&'static str) -> Option<u128> {
        self.stats.get(key).copied()
    }
}

impl FrameError<DropReason> for CaptureFrameData {
    fn report_error(&mut self, error: DropReason) {
        self.drop_reason = Some(error);
    }

    fn get_error(&self) -> Option<DropReason> {
        self.drop_reason
    }
}

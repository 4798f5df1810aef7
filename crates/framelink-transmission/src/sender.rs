use async_trait::async_trait;
use log::warn;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use framelink_buffer_utils::BytesMut;
use framelink_core::{
    error::DropReason,
    traits::{BorrowFrameProperties, FrameError, FrameProcessor},
};

/// What the original receivers strip from the end of every message.
const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Writes the configured text buffer slots, in order and with no separator,
/// followed by one line terminator. One frame, one line. The transport is
/// not acknowledged or flow-controlled; a write failure marks the frame
/// with `ConnectionError` and the stream carries on with the next one.
pub struct LineFrameSender<W, K> {
    writer: W,
    buffer_keys: Vec<K>,
}

impl<W: AsyncWrite + Unpin, K> LineFrameSender<W, K> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer_keys: Vec::new(),
        }
    }

    /// Appends a buffer slot to the line. Call once per slot; the raw
    /// streaming variant sends the encoded header slot first and the
    /// encoded body slot second.
    pub fn key(mut self, buffer_key: K) -> Self {
        self.buffer_keys.push(buffer_key);
        self
    }
}

#[async_trait]
impl<W, F, K> FrameProcessor<F> for LineFrameSender<W, K>
where
    W: AsyncWrite + Unpin + Send,
    K: Send + Sync,
    F: BorrowFrameProperties<K, BytesMut> + FrameError<DropReason> + Send + 'static,
{
    async fn process(&mut self, mut frame_data: F) -> Option<F> {
        for key in &self.buffer_keys {
            let buffer = frame_data.get_ref(key).unwrap();

            if let Err(err) = self.writer.write_all(buffer).await {
                warn!("Transport write failed: {}", err);
                frame_data.report_error(DropReason::ConnectionError);
                return Some(frame_data);
            }
        }

        if let Err(err) = self.writer.write_all(LINE_TERMINATOR).await {
            warn!("Transport write failed: {}", err);
            frame_data.report_error(DropReason::ConnectionError);
            return Some(frame_data);
        }

        if let Err(err) = self.writer.flush().await {
            warn!("Transport flush failed: {}", err);
            frame_data.report_error(DropReason::ConnectionError);
        }

        Some(frame_data)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tokio::io::AsyncReadExt;

    use super::*;

    #[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
    enum Slot {
        Header,
        Body,
    }

    #[derive(Default)]
    struct TestFrameData {
        buffers: HashMap<Slot, BytesMut>,
        drop_reason: Option<DropReason>,
    }

    impl BorrowFrameProperties<Slot, BytesMut> for TestFrameData {
        fn get_ref(&self, key: &Slot) -> Option<&BytesMut> {
            self.buffers.get(key)
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

    fn dto() -> TestFrameData {
        let mut dto = TestFrameData::default();
        dto.buffers.insert(Slot::Header, BytesMut::from(&b"/6D/AAAA"[..]));
        dto.buffers.insert(Slot::Body, BytesMut::from(&b"Zm9v"[..]));
        dto
    }

    #[tokio::test]
    async fn test_slots_share_one_terminated_line() {
        let (writer, mut reader) = tokio::io::duplex(256);

        let mut sender = LineFrameSender::new(writer).key(Slot::Header).key(Slot::Body);

        let sent = sender.process(dto()).await.unwrap();
        assert!(sent.get_error().is_none());

        let mut line = vec![0u8; 14];
        reader.read_exact(&mut line).await.unwrap();
        assert_eq!(&line, b"/6D/AAAAZm9v\r\n");
    }

    #[tokio::test]
    async fn test_write_failure_reports_connection_error() {
        let (writer, reader) = tokio::io::duplex(16);
        drop(reader);

        let mut sender = LineFrameSender::new(writer).key(Slot::Body);

        let sent = sender.process(dto()).await.unwrap();
        assert_eq!(sent.get_error(), Some(DropReason::ConnectionError));
    }
}

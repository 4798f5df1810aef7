use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::timeout;

use framelink_buffer_utils::{pool::BuffersPool, Bytes};
use framelink_capturers::camera::{
    CameraDriver, CameraError, CameraFrame, CameraFrameCapturer, PixelFormat,
};
use framelink_codecs::{crop::CenterCropper, rgb::rgb565_to_rgb888::Rgb565ToRgb888Converter};
use framelink_core::{
    pipeline::{component::Component, Pipeline},
    processors::{error_switch::OnErrorSwitch, ticker::Ticker},
};
use framelink_serialization_utils::{
    base64::{encoded_size, Base64Encoder},
    header::{FrameHeader, FrameHeaderSerializer, ImageFormat, HEADER_SIZE},
};
use framelink_streamers::types::{BufferKey, CaptureFrameData};
use framelink_transmission::LineFrameSender;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

async fn read_message<R: AsyncBufRead + Unpin>(reader: &mut R) -> Vec<u8> {
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line).await.unwrap();

    assert!(line.ends_with(b"\r\n"), "message must end with CRLF");
    line.truncate(line.len() - 2);

    STANDARD.decode(&line).unwrap()
}

/// Grayscale driver that fails on its second acquisition. Each good frame
/// is filled with its own sequence number so lines can be told apart.
struct ScriptedDriver {
    seq: u8,
}

impl CameraDriver for ScriptedDriver {
    fn acquire(&mut self) -> Result<CameraFrame, CameraError> {
        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);

        if seq == 1 {
            return Err(CameraError::NoFrame);
        }

        Ok(CameraFrame::new(
            Bytes::from(vec![seq; 16]),
            4,
            4,
            PixelFormat::Grayscale,
        ))
    }

    fn release(&mut self, _frame: CameraFrame) {}
}

#[tokio::test]
async fn test_acquisition_failure_skips_exactly_one_frame() {
    let (writer, reader) = tokio::io::duplex(4096);

    let raw_pool = BuffersPool::new(BufferKey::RawFrame, 2, 16).await;
    let header_pool = BuffersPool::new(BufferKey::TextHeader, 2, encoded_size(HEADER_SIZE)).await;
    let body_pool = BuffersPool::new(BufferKey::TextBody, 2, encoded_size(16)).await;

    let mut error_pipeline = Pipeline::<CaptureFrameData>::new()
        .tag("Errors")
        .link(
            Component::new()
                .append(raw_pool.redeemer().soft())
                .append(header_pool.redeemer().soft())
                .append(body_pool.redeemer().soft()),
        )
        .feedable();

    let header = FrameHeader::new(ImageFormat::Grayscale, 4, 4);

    let main_pipeline = Pipeline::<CaptureFrameData>::new()
        .tag("Streamer")
        .link(
            Component::new()
                .append(Ticker::new(10))
                .append(raw_pool.borrower())
                .append(CameraFrameCapturer::new(
                    ScriptedDriver { seq: 0 },
                    BufferKey::RawFrame,
                ))
                .append(OnErrorSwitch::new(&mut error_pipeline))
                .append(header_pool.borrower())
                .append(FrameHeaderSerializer::new(header, BufferKey::TextHeader))
                .append(body_pool.borrower())
                .append(Base64Encoder::new(BufferKey::RawFrame, BufferKey::TextBody))
                .append(OnErrorSwitch::new(&mut error_pipeline))
                .append(
                    LineFrameSender::new(writer)
                        .key(BufferKey::TextHeader)
                        .key(BufferKey::TextBody),
                )
                .append(raw_pool.redeemer())
                .append(header_pool.redeemer())
                .append(body_pool.redeemer()),
        );

    let _handles: Vec<_> = error_pipeline
        .run()
        .into_iter()
        .chain(main_pipeline.run())
        .collect();

    let mut reader = BufReader::new(reader);

    let first = timeout(READ_TIMEOUT, read_message(&mut reader)).await.unwrap();
    assert_eq!(&first[..3], &[0xFF, 0xA0, 0xFF]);
    assert_eq!(first[3], ImageFormat::Grayscale as u8);
    assert_eq!(&first[4..8], &[4, 0, 0, 0]);
    assert_eq!(&first[HEADER_SIZE..], &[0u8; 16][..]);

    // The failed acquisition produced no line at all: the very next
    // message already carries the third frame.
    let second = timeout(READ_TIMEOUT, read_message(&mut reader)).await.unwrap();
    assert_eq!(&second[HEADER_SIZE..], &[2u8; 16][..]);
}

/// RGB565 driver with one known 4x1 frame.
struct KnownFrameDriver;

impl CameraDriver for KnownFrameDriver {
    fn acquire(&mut self) -> Result<CameraFrame, CameraError> {
        Ok(CameraFrame::new(
            Bytes::from_static(&[0xFF, 0xFF, 0xF8, 0x00, 0x07, 0xE0, 0x00, 0x1F]),
            4,
            1,
            PixelFormat::Rgb565,
        ))
    }

    fn release(&mut self, _frame: CameraFrame) {}
}

#[tokio::test]
async fn test_raw_pipeline_emits_cropped_widened_frame() {
    let (writer, reader) = tokio::io::duplex(4096);

    let raw_pool = BuffersPool::new(BufferKey::RawFrame, 2, 8).await;
    let cropped_pool = BuffersPool::new(BufferKey::CroppedFrame, 2, 4).await;
    let converted_pool = BuffersPool::new(BufferKey::ConvertedFrame, 2, 6).await;
    let header_pool = BuffersPool::new(BufferKey::TextHeader, 2, encoded_size(HEADER_SIZE)).await;
    let body_pool = BuffersPool::new(BufferKey::TextBody, 2, encoded_size(6)).await;

    let mut error_pipeline = Pipeline::<CaptureFrameData>::new()
        .tag("Errors")
        .link(
            Component::new()
                .append(raw_pool.redeemer().soft())
                .append(cropped_pool.redeemer().soft())
                .append(converted_pool.redeemer().soft())
                .append(header_pool.redeemer().soft())
                .append(body_pool.redeemer().soft()),
        )
        .feedable();

    let header = FrameHeader::new(ImageFormat::Rgb888, 2, 1);

    let main_pipeline = Pipeline::<CaptureFrameData>::new()
        .tag("Streamer")
        .link(
            Component::new()
                .append(Ticker::new(10))
                .append(raw_pool.borrower())
                .append(CameraFrameCapturer::new(KnownFrameDriver, BufferKey::RawFrame))
                .append(OnErrorSwitch::new(&mut error_pipeline))
                .append(cropped_pool.borrower())
                .append(CenterCropper::new(
                    4,
                    1,
                    2,
                    2,
                    1,
                    BufferKey::RawFrame,
                    BufferKey::CroppedFrame,
                ))
                .append(OnErrorSwitch::new(&mut error_pipeline))
                .append(converted_pool.borrower())
                .append(Rgb565ToRgb888Converter::new(
                    BufferKey::CroppedFrame,
                    BufferKey::ConvertedFrame,
                ))
                .append(header_pool.borrower())
                .append(FrameHeaderSerializer::new(header, BufferKey::TextHeader))
                .append(body_pool.borrower())
                .append(Base64Encoder::new(
                    BufferKey::ConvertedFrame,
                    BufferKey::TextBody,
                ))
                .append(OnErrorSwitch::new(&mut error_pipeline))
                .append(
                    LineFrameSender::new(writer)
                        .key(BufferKey::TextHeader)
                        .key(BufferKey::TextBody),
                )
                .append(raw_pool.redeemer())
                .append(cropped_pool.redeemer())
                .append(converted_pool.redeemer())
                .append(header_pool.redeemer())
                .append(body_pool.redeemer()),
        );

    let _handles: Vec<_> = error_pipeline
        .run()
        .into_iter()
        .chain(main_pipeline.run())
        .collect();

    let mut reader = BufReader::new(reader);

    let message = timeout(READ_TIMEOUT, read_message(&mut reader)).await.unwrap();

    // The centered 2x1 crop keeps pixels 1 and 2: pure red and pure green
    // in RGB565, widened to their lossy RGB888 values.
    assert_eq!(&message[..HEADER_SIZE], &header.to_bytes());
    assert_eq!(
        &message[HEADER_SIZE..],
        &[0xF8, 0x00, 0x00, 0x00, 0xFC, 0x00][..]
    );
}

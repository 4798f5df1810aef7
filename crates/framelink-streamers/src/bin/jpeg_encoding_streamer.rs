use clap::Parser;
use log::info;

use framelink_buffer_utils::pool::BuffersPool;
use framelink_capturers::{camera::CameraFrameCapturer, pattern::TestPatternDriver, PixelFormat};
use framelink_codecs::jpeg::encoder::JpegFrameEncoder;
use framelink_core::{
    error::DropReason,
    pipeline::{component::Component, Pipeline},
    processors::{error_switch::OnErrorSwitch, ticker::Ticker},
};
use framelink_loggers::{errors::ConsoleDropReasonLogger, stats::ConsoleAverageStatsLogger};
use framelink_profilation_utils::time::{add::TimestampAdder, diff::TimestampDiffCalculator};
use framelink_serialization_utils::base64::{encoded_size, Base64Encoder};
use framelink_streamers::{
    command_line::{open_transport, TransportArgs},
    types::{BufferKey, CaptureFrameData},
};
use framelink_transmission::LineFrameSender;

// Streamer for raw cameras on boards that can afford software JPEG
// encoding: RGB888 capture, JPEG compression on the host CPU, one Base64
// line per frame.
const FRAME_WIDTH: u32 = 160;
const FRAME_HEIGHT: u32 = 120;
const JPEG_QUALITY: u8 = 85;

const RAW_FRAME_SIZE: usize = (FRAME_WIDTH * FRAME_HEIGHT * 3) as usize;

const TICK_INTERVAL: u64 = 150;
const POOL_SIZE: usize = 2;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let args = TransportArgs::parse();
    let transport = open_transport(&args).await?;

    info!(
        "JPEG encoding streamer: {}x{} RGB888 compressed at quality {}",
        FRAME_WIDTH, FRAME_HEIGHT, JPEG_QUALITY
    );

    let raw_pool = BuffersPool::new(BufferKey::RawFrame, POOL_SIZE, RAW_FRAME_SIZE).await;
    let compressed_pool =
        BuffersPool::new(BufferKey::CompressedFrame, POOL_SIZE, RAW_FRAME_SIZE).await;
    let text_pool = BuffersPool::new(
        BufferKey::TextBody,
        POOL_SIZE,
        encoded_size(RAW_FRAME_SIZE),
    )
    .await;

    let mut error_pipeline = Pipeline::<CaptureFrameData>::new()
        .tag("ErrorsHandler")
        .link(
            Component::new()
                .append(raw_pool.redeemer().soft())
                .append(compressed_pool.redeemer().soft())
                .append(text_pool.redeemer().soft())
                .append(
                    ConsoleDropReasonLogger::new()
                        .header("--- Dropped frames")
                        .log(DropReason::AcquisitionFailed)
                        .log(DropReason::EmptyFrame)
                        .log(DropReason::CompressionFailed)
                        .log(DropReason::ConnectionError),
                ),
        )
        .feedable();

    let driver = TestPatternDriver::new(FRAME_WIDTH, FRAME_HEIGHT, PixelFormat::Rgb888);

    let main_pipeline = Pipeline::<CaptureFrameData>::new()
        .tag("JpegEncodingStreamer")
        .link(
            Component::new()
                .append(Ticker::new(TICK_INTERVAL))
                .append(TimestampAdder::new("capture_timestamp"))
                .append(raw_pool.borrower())
                .append(CameraFrameCapturer::new(driver, BufferKey::RawFrame))
                .append(OnErrorSwitch::new(&mut error_pipeline)),
        )
        .link(
            Component::new()
                .append(TimestampAdder::new("encoding_start_timestamp"))
                .append(compressed_pool.borrower())
                .append(JpegFrameEncoder::new(
                    FRAME_WIDTH,
                    FRAME_HEIGHT,
                    JPEG_QUALITY,
                    BufferKey::RawFrame,
                    BufferKey::CompressedFrame,
                ))
                .append(OnErrorSwitch::new(&mut error_pipeline))
                .append(TimestampDiffCalculator::new(
                    "encoding_start_timestamp",
                    "encoding_time",
                ))
                .append(text_pool.borrower())
                .append(Base64Encoder::new(
                    BufferKey::CompressedFrame,
                    BufferKey::TextBody,
                ))
                .append(OnErrorSwitch::new(&mut error_pipeline)),
        )
        .link(
            Component::new()
                .append(LineFrameSender::new(transport).key(BufferKey::TextBody))
                .append(OnErrorSwitch::new(&mut error_pipeline))
                .append(TimestampDiffCalculator::new("capture_timestamp", "frame_time"))
                .append(
                    ConsoleAverageStatsLogger::new()
                        .header("--- Frame times")
                        .log("encoding_time")
                        .log("frame_time"),
                )
                .append(raw_pool.redeemer())
                .append(compressed_pool.redeemer())
                .append(text_pool.redeemer()),
        );

    let mut handles = Vec::new();
    handles.extend(error_pipeline.run());
    handles.extend(main_pipeline.run());

    for handle in handles {
        handle.await.unwrap();
    }

    Ok(())
}

use clap::Parser;
use log::info;

use framelink_buffer_utils::pool::BuffersPool;
use framelink_capturers::{camera::CameraFrameCapturer, pattern::TestPatternDriver, PixelFormat};
use framelink_codecs::{crop::CenterCropper, rgb::rgb565_to_rgb888::Rgb565ToRgb888Converter};
use framelink_core::{
    error::DropReason,
    pipeline::{component::Component, Pipeline},
    processors::{error_switch::OnErrorSwitch, ticker::Ticker},
};
use framelink_loggers::{errors::ConsoleDropReasonLogger, stats::ConsoleAverageStatsLogger};
use framelink_profilation_utils::time::{add::TimestampAdder, diff::TimestampDiffCalculator};
use framelink_serialization_utils::{
    base64::{encoded_size, Base64Encoder},
    header::{FrameHeader, FrameHeaderSerializer, ImageFormat, HEADER_SIZE},
};
use framelink_streamers::{
    command_line::{open_transport, TransportArgs},
    types::{BufferKey, CaptureFrameData},
};
use framelink_transmission::LineFrameSender;

// Streamer for cameras without a hardware JPEG encoder: RGB565 capture,
// centered crop, RGB888 widening, explicit header framing. All geometry is
// fixed at build time.
const CAPTURE_WIDTH: usize = 160;
const CAPTURE_HEIGHT: usize = 120;
const CROP_WIDTH: usize = 96;
const CROP_HEIGHT: usize = 96;
const BYTES_PER_PIXEL: usize = 2;

const TICK_INTERVAL: u64 = 100;
const POOL_SIZE: usize = 2;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let args = TransportArgs::parse();
    let transport = open_transport(&args).await?;

    info!(
        "Raw streamer: {}x{} RGB565 cropped to {}x{}, framed Base64 lines",
        CAPTURE_WIDTH, CAPTURE_HEIGHT, CROP_WIDTH, CROP_HEIGHT
    );

    let raw_pool = BuffersPool::new(
        BufferKey::RawFrame,
        POOL_SIZE,
        CAPTURE_WIDTH * CAPTURE_HEIGHT * BYTES_PER_PIXEL,
    )
    .await;
    let cropped_pool = BuffersPool::new(
        BufferKey::CroppedFrame,
        POOL_SIZE,
        CROP_WIDTH * CROP_HEIGHT * BYTES_PER_PIXEL,
    )
    .await;
    let converted_pool = BuffersPool::new(
        BufferKey::ConvertedFrame,
        POOL_SIZE,
        CROP_WIDTH * CROP_HEIGHT * 3,
    )
    .await;
    let header_pool =
        BuffersPool::new(BufferKey::TextHeader, POOL_SIZE, encoded_size(HEADER_SIZE)).await;
    let body_pool = BuffersPool::new(
        BufferKey::TextBody,
        POOL_SIZE,
        encoded_size(CROP_WIDTH * CROP_HEIGHT * 3),
    )
    .await;

    let mut error_pipeline = Pipeline::<CaptureFrameData>::new()
        .tag("ErrorsHandler")
        .link(
            Component::new()
                .append(raw_pool.redeemer().soft())
                .append(cropped_pool.redeemer().soft())
                .append(converted_pool.redeemer().soft())
                .append(header_pool.redeemer().soft())
                .append(body_pool.redeemer().soft())
                .append(
                    ConsoleDropReasonLogger::new()
                        .header("--- Dropped frames")
                        .log(DropReason::AcquisitionFailed)
                        .log(DropReason::EmptyFrame)
                        .log(DropReason::DimensionMismatch)
                        .log(DropReason::ConnectionError),
                ),
        )
        .feedable();

    let driver = TestPatternDriver::new(
        CAPTURE_WIDTH as u32,
        CAPTURE_HEIGHT as u32,
        PixelFormat::Rgb565,
    );
    let header = FrameHeader::new(ImageFormat::Rgb888, CROP_WIDTH as u32, CROP_HEIGHT as u32);

    let main_pipeline = Pipeline::<CaptureFrameData>::new()
        .tag("RawStreamer")
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
                .append(cropped_pool.borrower())
                .append(CenterCropper::new(
                    CAPTURE_WIDTH,
                    CAPTURE_HEIGHT,
                    BYTES_PER_PIXEL,
                    CROP_WIDTH,
                    CROP_HEIGHT,
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
                .append(OnErrorSwitch::new(&mut error_pipeline)),
        )
        .link(
            Component::new()
                .append(
                    LineFrameSender::new(transport)
                        .key(BufferKey::TextHeader)
                        .key(BufferKey::TextBody),
                )
                .append(OnErrorSwitch::new(&mut error_pipeline))
                .append(TimestampDiffCalculator::new("capture_timestamp", "frame_time"))
                .append(
                    ConsoleAverageStatsLogger::new()
                        .header("--- Frame times")
                        .log("frame_time"),
                )
                .append(raw_pool.redeemer())
                .append(cropped_pool.redeemer())
                .append(converted_pool.redeemer())
                .append(header_pool.redeemer())
                .append(body_pool.redeemer()),
        );

    let mut handles = Vec::new();
    handles.extend(error_pipeline.run());
    handles.extend(main_pipeline.run());

    for handle in handles {
        handle.await.unwrap();
    }

    Ok(())
}

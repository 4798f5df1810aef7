use std::io;

use clap::Parser;
use log::info;

use framelink_buffer_utils::pool::BuffersPool;
use framelink_capturers::{camera::CameraFrameCapturer, pattern::JpegPatternDriver};
use framelink_core::{
    error::DropReason,
    pipeline::{component::Component, Pipeline},
    processors::{error_switch::OnErrorSwitch, ticker::Ticker},
};
use framelink_loggers::{errors::ConsoleDropReasonLogger, stats::ConsoleAverageStatsLogger};
use framelink_profilation_utils::{
    frame_drop::threshold::ThresholdBasedFrameDropper,
    time::{add::TimestampAdder, diff::TimestampDiffCalculator},
};
use framelink_serialization_utils::base64::{encoded_size, Base64Encoder};
use framelink_streamers::{
    command_line::{open_transport, TransportArgs},
    types::{BufferKey, CaptureFrameData},
};
use framelink_transmission::LineFrameSender;

// Streamer for cameras with an on-sensor JPEG encoder: frames arrive
// already compressed and go out as single Base64 lines.
const FRAME_WIDTH: u32 = 320;
const FRAME_HEIGHT: u32 = 240;
const JPEG_QUALITY: u8 = 80;

// Compressed frames are bounded by the raw RGB888 size.
const MAX_FRAME_SIZE: usize = (FRAME_WIDTH * FRAME_HEIGHT * 3) as usize;

const TICK_INTERVAL: u64 = 200;
const STALE_FRAME_DELAY: u128 = 500;
const POOL_SIZE: usize = 2;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let args = TransportArgs::parse();
    let transport = open_transport(&args).await?;

    info!(
        "JPEG camera streamer: {}x{} at quality {}, single Base64 lines",
        FRAME_WIDTH, FRAME_HEIGHT, JPEG_QUALITY
    );

    let compressed_pool =
        BuffersPool::new(BufferKey::CompressedFrame, POOL_SIZE, MAX_FRAME_SIZE).await;
    let text_pool = BuffersPool::new(
        BufferKey::TextBody,
        POOL_SIZE,
        encoded_size(MAX_FRAME_SIZE),
    )
    .await;

    let mut error_pipeline = Pipeline::<CaptureFrameData>::new()
        .tag("ErrorsHandler")
        .link(
            Component::new()
                .append(compressed_pool.redeemer().soft())
                .append(text_pool.redeemer().soft())
                .append(
                    ConsoleDropReasonLogger::new()
                        .header("--- Dropped frames")
                        .log(DropReason::AcquisitionFailed)
                        .log(DropReason::EmptyFrame)
                        .log(DropReason::StaleFrame)
                        .log(DropReason::ConnectionError),
                ),
        )
        .feedable();

    let driver = JpegPatternDriver::new(FRAME_WIDTH, FRAME_HEIGHT, JPEG_QUALITY)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

    let main_pipeline = Pipeline::<CaptureFrameData>::new()
        .tag("JpegCameraStreamer")
        .link(
            Component::new()
                .append(Ticker::new(TICK_INTERVAL))
                .append(TimestampAdder::new("capture_timestamp"))
                .append(compressed_pool.borrower())
                .append(CameraFrameCapturer::new(driver, BufferKey::CompressedFrame))
                .append(OnErrorSwitch::new(&mut error_pipeline)),
        )
        .link(
            Component::new()
                .append(TimestampDiffCalculator::new("capture_timestamp", "capture_delay"))
                .append(ThresholdBasedFrameDropper::new(
                    "capture_delay",
                    STALE_FRAME_DELAY,
                    DropReason::StaleFrame,
                ))
                .append(OnErrorSwitch::new(&mut error_pipeline))
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
                        .log("frame_time"),
                )
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

use std::fmt::Debug;

use log::warn;
use tokio::sync::mpsc::UnboundedSender;

/// Entry point for pushing frames into a feedable pipeline from outside of
/// it, typically from a switch processor of another pipeline.
pub struct PipelineFeeder<F> {
    sender: UnboundedSender<F>,
}

impl<F: Debug> PipelineFeeder<F> {
    pub fn new(sender: UnboundedSender<F>) -> Self {
        Self { sender }
    }

    pub fn feed(&self, frame_data: F) {
        if self.sender.send(frame_data).is_err() {
            warn!("Fed a frame to a pipeline that is no longer running");
        }
    }
}

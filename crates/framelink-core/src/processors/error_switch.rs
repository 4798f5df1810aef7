use std::fmt::Debug;

use async_trait::async_trait;
use log::debug;

use crate::{
    error::DropReason,
    pipeline::{feeder::PipelineFeeder, Pipeline},
    traits::{FrameError, FrameProcessor},
};

/// Diverts frames that carry a drop reason to a dedicated error-handling
/// pipeline, where pooled buffers are redeemed and the reason is logged.
/// Healthy frames pass through untouched.
pub struct OnErrorSwitch<F> {
    feeder: PipelineFeeder<F>,
}

impl<F> OnErrorSwitch<F>
where
    F: Default + Debug + Send + 'static,
{
    pub fn new(destination_pipeline: &mut Pipeline<F>) -> Self {
        Self {
            feeder: destination_pipeline.get_feeder(),
        }
    }
}

#[async_trait]
impl<F> FrameProcessor<F> for OnErrorSwitch<F>
where
    F: FrameError<DropReason> + Debug + Send + 'static,
{
    async fn process(&mut self, frame_data: F) -> Option<F> {
        match frame_data.get_error() {
            Some(reason) => {
                debug!("Diverting frame, drop reason: {:?}", reason);
                self.feeder.feed(frame_data);
                None
            }
            None => Some(frame_data),
        }
    }
}

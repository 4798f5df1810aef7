use std::fmt::Debug;

use async_trait::async_trait;

use crate::{
    pipeline::{feeder::PipelineFeeder, Pipeline},
    traits::FrameProcessor,
};

/// Unconditionally diverts every frame to another pipeline.
pub struct Switch<F> {
    feeder: PipelineFeeder<F>,
}

impl<F> Switch<F>
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
impl<F> FrameProcessor<F> for Switch<F>
where
    F: Debug + Send,
{
    async fn process(&mut self, frame_data: F) -> Option<F> {
        self.feeder.feed(frame_data);
        None
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::mpsc::UnboundedSender;

    use crate::pipeline::component::Component;

    use super::*;

    struct Sink {
        sender: UnboundedSender<u32>,
    }

    #[async_trait]
    impl FrameProcessor<u32> for Sink {
        async fn process(&mut self, frame_data: u32) -> Option<u32> {
            self.sender.send(frame_data).unwrap();
            Some(frame_data)
        }
    }

    #[tokio::test]
    async fn test_switch_diverts_every_frame() {
        let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();

        let mut destination = Pipeline::<u32>::new()
            .link(Component::new().append(Sink { sender }))
            .feedable();

        let mut switch = Switch::new(&mut destination);
        let _handles = destination.run();

        assert_eq!(switch.process(7).await, None);
        assert_eq!(receiver.recv().await, Some(7));
    }
}

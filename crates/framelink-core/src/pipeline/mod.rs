use std::fmt::Debug;

use log::info;
use tokio::{
    sync::mpsc::{self, UnboundedSender},
    task::JoinHandle,
};

use self::{component::Component, feeder::PipelineFeeder};

pub mod component;
pub mod feeder;

/// An ordered chain of components connected by unbounded channels. Each
/// component runs as its own task; a frame entering the pipeline flows
/// through every component in order unless a processor drops it.
pub struct Pipeline<F> {
    components: Vec<Component<F>>,
    feeding_sender: Option<UnboundedSender<F>>,

    tag: String,

    bound: bool,

    to_be_feedable: bool,
}

impl<F: Debug + Default + Send + 'static> Pipeline<F> {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            feeding_sender: None,

            tag: "".to_string(),

            bound: false,

            to_be_feedable: false,
        }
    }

    pub fn singleton(component: Component<F>) -> Self {
        Self::new().link(component)
    }

    pub fn link(mut self, component: Component<F>) -> Self {
        self.components.push(component);
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    /// Marks the pipeline as externally fed: its head component will wait
    /// for frames pushed through a [`PipelineFeeder`] instead of generating
    /// default DTOs on its own.
    pub fn feedable(mut self) -> Self {
        self.to_be_feedable = true;
        self
    }

    pub fn get_feeder(&mut self) -> PipelineFeeder<F> {
        if self.to_be_feedable {
            self.make_feedable();
        }

        let sender = self
            .feeding_sender
            .as_ref()
            .expect("pipeline is not feedable")
            .clone();
        PipelineFeeder::new(sender)
    }

    pub fn run(mut self) -> Vec<JoinHandle<()>> {
        info!("[{}] Launching tasks...", self.tag);

        if !self.bound {
            self.bind();
        }

        if self.to_be_feedable {
            self.make_feedable();
        }

        self.components
            .into_iter()
            .map(|component| component.launch())
            .collect()
    }

    fn bind(&mut self) {
        info!("[{}] Binding channels...", self.tag);

        for i in 0..self.components.len() - 1 {
            let (sender, receiver) = mpsc::unbounded_channel::<F>();

            self.components[i].set_sender(sender);
            self.components[i + 1].set_receiver(receiver);
        }

        self.bound = true;
    }

    fn make_feedable(&mut self) {
        let head = self
            .components
            .first_mut()
            .expect("cannot feed an empty pipeline");

        let (sender, receiver) = mpsc::unbounded_channel::<F>();
        self.feeding_sender = Some(sender);

        head.set_receiver(receiver);

        self.to_be_feedable = false;
    }
}

impl<F: Default + Debug + Send + 'static> Default for Pipeline<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::mpsc::UnboundedSender;

    use crate::{processors::ticker::Ticker, traits::FrameProcessor};

    use super::{component::Component, Pipeline};

    #[derive(Debug, Default)]
    struct CountedFrame {
        sequence: u64,
    }

    struct Sequencer {
        next: u64,
    }

    #[async_trait]
    impl FrameProcessor<CountedFrame> for Sequencer {
        async fn process(&mut self, mut frame_data: CountedFrame) -> Option<CountedFrame> {
            frame_data.sequence = self.next;
            self.next += 1;
            Some(frame_data)
        }
    }

    struct DropOdd;

    #[async_trait]
    impl FrameProcessor<CountedFrame> for DropOdd {
        async fn process(&mut self, frame_data: CountedFrame) -> Option<CountedFrame> {
            if frame_data.sequence % 2 == 1 {
                None
            } else {
                Some(frame_data)
            }
        }
    }

    struct Sink {
        sender: UnboundedSender<u64>,
    }

    #[async_trait]
    impl FrameProcessor<CountedFrame> for Sink {
        async fn process(&mut self, frame_data: CountedFrame) -> Option<CountedFrame> {
            self.sender.send(frame_data.sequence).unwrap();
            Some(frame_data)
        }
    }

    #[tokio::test]
    async fn test_dropped_frames_do_not_reach_later_components() {
        let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();

        let pipeline = Pipeline::<CountedFrame>::new()
            .tag("Test")
            .link(
                Component::new()
                    .append(Ticker::new(1))
                    .append(Sequencer { next: 0 })
                    .append(DropOdd),
            )
            .link(Component::new().append(Sink { sender }));

        let _handles = pipeline.run();

        // Sequences are generated endlessly by the head component; the
        // sink must only ever observe the even ones.
        for expected in [0u64, 2, 4, 6] {
            assert_eq!(receiver.recv().await.unwrap(), expected);
        }
    }
}

use log::debug;
use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};

use crate::traits::FrameProcessor;

/// A chain of processors executed in order within a single task. Components
/// with no receiver act as generators and allocate a default frame DTO at
/// every iteration of their loop.
pub struct Component<F> {
    processors: Vec<Box<dyn FrameProcessor<F> + Send>>,

    receiver: Option<UnboundedReceiver<F>>,
    sender: Option<UnboundedSender<F>>,

    tag: Option<String>,
}

impl<F: Default + Send + 'static> Component<F> {
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
            receiver: None,
            sender: None,
            tag: None,
        }
    }

    pub fn singleton<T: 'static + FrameProcessor<F> + Send>(processor: T) -> Self {
        Self::new().append(processor)
    }

    pub fn append<T: 'static + FrameProcessor<F> + Send>(mut self, processor: T) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    //////////////////////
    // Internal methods //
    //////////////////////

    pub(crate) fn set_sender(&mut self, sender: UnboundedSender<F>) {
        self.sender = Some(sender);
    }

    pub(crate) fn set_receiver(&mut self, receiver: UnboundedReceiver<F>) {
        self.receiver = Some(receiver);
    }

    pub(crate) fn launch(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let tag = self.tag.unwrap_or_default();

            loop {
                let mut frame_data = match self.receiver.as_mut() {
                    Some(receiver) => match receiver.recv().await {
                        Some(frame_data) => Some(frame_data),
                        None => {
                            debug!("[{}] Receive channel closed, shutting down", tag);
                            break;
                        }
                    },
                    None => {
                        debug!("[{}] No receiver registered, allocating an empty frame DTO", tag);
                        Some(F::default())
                    }
                };

                for processor in &mut self.processors {
                    frame_data = processor.process(frame_data.unwrap()).await;

                    if frame_data.is_none() {
                        break;
                    }
                }

                if let (Some(sender), Some(frame_data)) = (self.sender.as_ref(), frame_data) {
                    if sender.send(frame_data).is_err() {
                        debug!("[{}] Send channel closed, shutting down", tag);
                        break;
                    }
                }
            }
        })
    }
}

impl<F: Default + Send + 'static> Default for Component<F> {
    fn default() -> Self {
        Self::new()
    }
}

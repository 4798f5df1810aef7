use async_trait::async_trait;

use crate::traits::FrameProcessor;

/// Groups several processors into one, running them in order. A dropped
/// frame short-circuits the rest of the group.
pub struct Sequential<F> {
    processors: Vec<Box<dyn FrameProcessor<F> + Send>>,
}

impl<F> Sequential<F> {
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    pub fn append<T: 'static + FrameProcessor<F> + Send>(mut self, processor: T) -> Self {
        self.processors.push(Box::new(processor));
        self
    }
}

impl<F> Default for Sequential<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<F: Send> FrameProcessor<F> for Sequential<F> {
    async fn process(&mut self, frame_data: F) -> Option<F> {
        let mut result = Some(frame_data);

        for processor in &mut self.processors {
            match result {
                Some(frame_data) => result = processor.process(frame_data).await,
                None => break,
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use crate::processors::functional::Function;

    use super::*;

    #[tokio::test]
    async fn test_group_runs_in_order_and_short_circuits() {
        let mut group = Sequential::new()
            .append(Function::new(|value: u32| Some(value + 1)))
            .append(Function::new(|value: u32| if value > 3 { None } else { Some(value * 10) }));

        assert_eq!(group.process(1).await, Some(20));
        assert_eq!(group.process(3).await, None);
    }
}

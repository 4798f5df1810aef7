use async_trait::async_trait;

use crate::traits::FrameProcessor;

/// Wraps a plain function as a processor.
pub struct Function<F> {
    function: fn(F) -> Option<F>,
}

impl<F> Function<F> {
    pub fn new(function: fn(F) -> Option<F>) -> Self {
        Self { function }
    }
}

#[async_trait]
impl<F: Send> FrameProcessor<F> for Function<F> {
    async fn process(&mut self, frame_data: F) -> Option<F> {
        (self.function)(frame_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_function_transforms_and_drops() {
        let mut doubler = Function::new(|value: u32| Some(value * 2));
        assert_eq!(doubler.process(21).await, Some(42));

        let mut dropper = Function::new(|value: u32| if value > 10 { None } else { Some(value) });
        assert_eq!(dropper.process(5).await, Some(5));
        assert_eq!(dropper.process(11).await, None);
    }
}

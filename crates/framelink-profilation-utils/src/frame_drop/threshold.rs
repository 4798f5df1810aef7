use std::{cmp, fmt};

use async_trait::async_trait;
use log::debug;

use framelink_core::traits::{FrameError, FrameProcessor, FrameProperties};

/// Marks a frame for dropping when one of its statistics exceeds a
/// threshold, e.g. a capture-to-send delay that makes the frame stale.
pub struct ThresholdBasedFrameDropper<K, T, E> {
    stat_id: K,
    threshold: T,
    error: E,
}

impl<K, T, E> ThresholdBasedFrameDropper<K, T, E> {
    pub fn new(stat_id: K, threshold: T, error: E) -> Self {
        Self {
            stat_id,
            threshold,
            error,
        }
    }
}

#[async_trait]
impl<F, K, T, E> FrameProcessor<F> for ThresholdBasedFrameDropper<K, T, E>
where
    K: Copy + Send,
    T: fmt::Display + cmp::PartialOrd + Send,
    E: Copy + Send,
    F: FrameProperties<K, T> + FrameError<E> + Send + 'static,
{
    async fn process(&mut self, mut frame_data: F) -> Option<F> {
        let value = frame_data.get(&self.stat_id).unwrap();

        if value > self.threshold {
            debug!(
                "Dropping frame due to higher than threshold value {} > {}",
                value, self.threshold
            );
            frame_data.report_error(self.error);
        }

        Some(frame_data)
    }
}

use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::info;

use framelink_core::{
    error::DropReason,
    traits::{FrameError, FrameProcessor},
};

/// Counts dropped frames on an error pipeline and prints per-reason totals
/// once per round. This is the whole diagnostic channel: drops are logged,
/// never retried.
pub struct ConsoleDropReasonLogger {
    header: Option<String>,
    types_to_log: Vec<DropReason>,
    round_duration: Duration,

    current_round_start: Instant,

    logged_reasons: Vec<DropReason>,
}

impl Default for ConsoleDropReasonLogger {
    fn default() -> Self {
        Self {
            header: None,
            types_to_log: Vec::new(),
            round_duration: Duration::from_secs(1),
            current_round_start: Instant::now(),
            logged_reasons: Vec::new(),
        }
    }
}

impl ConsoleDropReasonLogger {
    pub fn new() -> Self {
        Self::default()
    }

    // Building functions
    pub fn header(mut self, header: &str) -> Self {
        self.header = Some(header.to_string());
        self
    }

    pub fn log(mut self, value: DropReason) -> Self {
        self.types_to_log.push(value);
        self
    }

    // Logging functions
    fn print_round_stats(&self) {
        if let Some(header) = &self.header {
            info!("{}", header);
        }

        let dropped_frames_count = self.logged_reasons.len();

        if dropped_frames_count == 0 {
            info!("No dropped frames");
            return;
        }

        info!("Dropped frames: {}", dropped_frames_count);

        for reason_type in &self.types_to_log {
            let count = self
                .logged_reasons
                .iter()
                .filter(|reason| *reason == reason_type)
                .count();

            if count > 0 {
                info!("{}: {}", reason_type, count);
            }
        }
    }

    fn reset_round(&mut self) {
        self.logged_reasons.clear();
        self.current_round_start = Instant::now();
    }
}

#[async_trait]
impl<F> FrameProcessor<F> for ConsoleDropReasonLogger
where
    F: FrameError<DropReason> + Send + 'static,
{
    async fn process(&mut self, frame_data: F) -> Option<F> {
        if let Some(reason) = frame_data.get_error() {
            self.logged_reasons.push(reason);

            if self.current_round_start.elapsed().gt(&self.round_duration) {
                self.print_round_stats();
                self.reset_round();
            }
        }

        Some(frame_data)
    }
}

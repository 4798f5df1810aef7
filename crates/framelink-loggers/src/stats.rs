use std::{
    collections::HashMap,
    fmt::Debug,
    hash::Hash,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use log::info;

use framelink_core::traits::{FrameProcessor, FrameProperties};

/// Prints per-round averages of the registered frame statistics, typically
/// the timestamp diffs produced by the profilation processors.
pub struct ConsoleAverageStatsLogger<K> {
    header: Option<String>,
    round_duration: Duration,

    current_round_start: Instant,

    logged_stats: HashMap<K, Vec<u128>>,
}

impl<K> Default for ConsoleAverageStatsLogger<K> {
    fn default() -> Self {
        Self {
            header: None,
            round_duration: Duration::from_secs(1),
            current_round_start: Instant::now(),
            logged_stats: HashMap::new(),
        }
    }
}

impl<K> ConsoleAverageStatsLogger<K>
where
    K: Debug + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    // Building functions
    pub fn header(mut self, header: &str) -> Self {
        self.header = Some(header.to_string());
        self
    }

    pub fn log(mut self, key: K) -> Self {
        self.logged_stats.insert(key, Vec::new());
        self
    }

    // Logging functions
    fn print_round_stats(&self) {
        if let Some(header) = &self.header {
            info!("{}", header);
        }

        for (key, values) in &self.logged_stats {
            if values.is_empty() {
                continue;
            }

            let avg = values.iter().sum::<u128>() / values.len() as u128;
            info!("Average {:?}: {}", key, avg);
        }
    }

    fn reset_round(&mut self) {
        self.logged_stats.values_mut().for_each(Vec::clear);
        self.current_round_start = Instant::now();
    }
}

#[async_trait]
impl<F, K> FrameProcessor<F> for ConsoleAverageStatsLogger<K>
where
    K: Copy + Eq + Hash + Send + Debug,
    F: FrameProperties<K, u128> + Send + 'static,
{
    async fn process(&mut self, frame_data: F) -> Option<F> {
        for (key, logged_values) in self.logged_stats.iter_mut() {
            if let Some(value) = frame_data.get(key) {
                logged_values.push(value);
            }
        }

        if self.current_round_start.elapsed().gt(&self.round_duration) {
            self.print_round_stats();
            self.reset_round();
        }

        Some(frame_data)
    }
}

/*!
 * Timing alignment sources.
 *
 * An `AlignmentSource` proposes a signed offset in milliseconds for every
 * entry. Real audio alignment lives outside this crate; `JitterAlignment`
 * stands in for it with bounded random nudges.
 */

use std::time::Duration;
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::subtitle::SubtitleEntry;

/// Supplies per-entry timing corrections
#[async_trait]
pub trait AlignmentSource: Send + Sync {
    /// One offset per entry, in the same order as `entries`
    async fn offsets(&self, entries: &[SubtitleEntry]) -> Result<Vec<i64>>;
}

/// Simulated alignment signal: uniform jitter in `[-max, +max]` ms
pub struct JitterAlignment {
    max_jitter_ms: u64,
    rng: Mutex<StdRng>,
    simulated_latency: Duration,
}

impl JitterAlignment {
    pub fn new(max_jitter_ms: u64) -> Self {
        Self {
            max_jitter_ms,
            rng: Mutex::new(StdRng::from_os_rng()),
            simulated_latency: Duration::ZERO,
        }
    }

    /// Deterministic jitter for reproducible runs
    pub fn with_seed(max_jitter_ms: u64, seed: u64) -> Self {
        Self {
            max_jitter_ms,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            simulated_latency: Duration::ZERO,
        }
    }

    /// Delay every call, mimicking a remote analysis service
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }

    pub fn max_jitter_ms(&self) -> u64 {
        self.max_jitter_ms
    }
}

#[async_trait]
impl AlignmentSource for JitterAlignment {
    async fn offsets(&self, entries: &[SubtitleEntry]) -> Result<Vec<i64>> {
        let max = self.max_jitter_ms as i64;
        let offsets: Vec<i64> = {
            let mut rng = self.rng.lock();
            entries
                .iter()
                .map(|_| if max == 0 { 0 } else { rng.random_range(-max..=max) })
                .collect()
        };

        if !self.simulated_latency.is_zero() {
            tokio::time::sleep(self.simulated_latency).await;
        }

        debug!("Generated {} jitter offsets (max {}ms)", offsets.len(), self.max_jitter_ms);
        Ok(offsets)
    }
}

//! High-velocity sender detection kernel.

use chrono::{DateTime, Duration, Utc};
use fraudnet_core::{
    domain::Domain,
    kernel::KernelMetadata,
    traits::AnalysisKernel,
    transaction::{AccountId, Transaction},
};
use std::collections::BTreeMap;

/// Default number of outgoing transfers that marks a burst.
pub const DEFAULT_VELOCITY_THRESHOLD: usize = 4;

/// Default burst window.
pub fn default_velocity_window() -> Duration {
    Duration::hours(72)
}

/// High-velocity sender detection kernel.
///
/// Flags senders that issue at least `threshold` transfers inside any
/// window of width `window`. Only outgoing activity is considered.
#[derive(Debug, Clone)]
pub struct VelocityDetector {
    metadata: KernelMetadata,
}

impl Default for VelocityDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityDetector {
    /// Create a new velocity detection kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("detect/velocity", Domain::PatternDetection)
                .with_description("Rolling-window outgoing transfer burst detection"),
        }
    }

    /// Return flagged senders sorted by id.
    pub fn compute(
        transactions: &[Transaction],
        window: Duration,
        threshold: usize,
    ) -> Vec<AccountId> {
        let mut by_sender: BTreeMap<&str, Vec<DateTime<Utc>>> = BTreeMap::new();
        for tx in transactions {
            by_sender
                .entry(tx.sender_id.as_str())
                .or_default()
                .push(tx.timestamp);
        }

        by_sender
            .into_iter()
            .filter_map(|(sender, mut timestamps)| {
                Self::has_burst(&mut timestamps, window, threshold).then(|| sender.to_string())
            })
            .collect()
    }

    /// Two-pointer scan over sorted timestamps.
    fn has_burst(timestamps: &mut [DateTime<Utc>], window: Duration, threshold: usize) -> bool {
        timestamps.sort_unstable();

        let mut left = 0;
        for right in 0..timestamps.len() {
            while left < right && timestamps[right] - timestamps[left] > window {
                left += 1;
            }
            if right - left + 1 >= threshold {
                return true;
            }
        }
        false
    }
}

impl AnalysisKernel for VelocityDetector {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

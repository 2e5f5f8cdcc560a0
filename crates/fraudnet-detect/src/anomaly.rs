//! Amount anomaly (z-score outlier) detection kernel.

use fraudnet_core::{
    domain::Domain,
    kernel::KernelMetadata,
    traits::AnalysisKernel,
    transaction::{AccountId, Transaction},
};
use std::collections::BTreeSet;
use tracing::debug;

/// Default z-score threshold.
pub const DEFAULT_Z_THRESHOLD: f64 = 2.0;

/// Amount anomaly detection kernel.
///
/// Computes the batch mean and population standard deviation of amounts and
/// flags the sender of every transfer whose z-score reaches the threshold.
/// The test is one-sided: unusually small amounts are never flagged.
#[derive(Debug, Clone)]
pub struct AmountAnomalyDetector {
    metadata: KernelMetadata,
}

impl Default for AmountAnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl AmountAnomalyDetector {
    /// Create a new amount anomaly detection kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("detect/amount-anomaly", Domain::PatternDetection)
                .with_description("Z-score outlier detection over transfer amounts"),
        }
    }

    /// Return flagged senders sorted by id.
    pub fn compute(transactions: &[Transaction], z_threshold: f64) -> Vec<AccountId> {
        let Some((mean, std_dev)) = Self::moments(transactions) else {
            return Vec::new();
        };

        let flagged: BTreeSet<&str> = transactions
            .iter()
            .filter(|tx| (tx.amount - mean) / std_dev >= z_threshold)
            .map(|tx| tx.sender_id.as_str())
            .collect();

        debug!(mean, std_dev, flagged = flagged.len(), "Amount anomaly scan");
        flagged.into_iter().map(str::to_string).collect()
    }

    /// Mean and population standard deviation, or `None` when fewer than two
    /// transfers exist or every amount is identical.
    fn moments(transactions: &[Transaction]) -> Option<(f64, f64)> {
        let n = transactions.len();
        if n < 2 {
            return None;
        }

        let mean = transactions.iter().map(|tx| tx.amount).sum::<f64>() / n as f64;
        let variance = transactions
            .iter()
            .map(|tx| (tx.amount - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        let std_dev = variance.sqrt();

        (std_dev > 0.0).then_some((mean, std_dev))
    }
}

impl AnalysisKernel for AmountAnomalyDetector {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

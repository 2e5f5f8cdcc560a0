//! Shell (pass-through) account detection kernel.

use fraudnet_core::{
    domain::Domain,
    kernel::KernelMetadata,
    traits::AnalysisKernel,
    transaction::{AccountId, Transaction},
};
use std::collections::BTreeMap;

/// Default ceiling on total transactions for a shell account.
pub const DEFAULT_MAX_TRANSACTIONS: usize = 3;

/// Shell account detection kernel.
///
/// A shell account both receives and sends, yet touches very few
/// transactions overall: money passes through it rather than resting there.
#[derive(Debug, Clone)]
pub struct ShellAccountDetector {
    metadata: KernelMetadata,
}

impl Default for ShellAccountDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellAccountDetector {
    /// Create a new shell account detection kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("detect/shell-account", Domain::PatternDetection)
                .with_description("Low-activity pass-through account detection"),
        }
    }

    /// Return accounts with at least one incoming and one outgoing transfer
    /// and no more than `max_transactions` in total, sorted by id.
    pub fn compute(transactions: &[Transaction], max_transactions: usize) -> Vec<AccountId> {
        // (incoming, outgoing)
        let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for tx in transactions {
            counts.entry(tx.receiver_id.as_str()).or_default().0 += 1;
            counts.entry(tx.sender_id.as_str()).or_default().1 += 1;
        }

        counts
            .into_iter()
            .filter(|(_, (incoming, outgoing))| {
                *incoming >= 1 && *outgoing >= 1 && incoming + outgoing <= max_transactions
            })
            .map(|(account, _)| account.to_string())
            .collect()
    }
}

impl AnalysisKernel for ShellAccountDetector {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

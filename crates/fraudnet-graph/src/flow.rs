//! Per-account flow aggregation kernel.

use crate::types::{FlowMap, FlowMetrics};
use fraudnet_core::{
    domain::Domain, kernel::KernelMetadata, traits::AnalysisKernel, transaction::Transaction,
};

/// Computes incoming/outgoing totals, net flow and transaction counts.
#[derive(Debug, Clone)]
pub struct FlowAggregator {
    metadata: KernelMetadata,
}

impl Default for FlowAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowAggregator {
    /// Create a new flow aggregation kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("graph/flow-metrics", Domain::GraphAnalytics)
                .with_description("Per-account incoming/outgoing totals and counts"),
        }
    }

    /// Aggregate flows in a single pass.
    ///
    /// The account universe is the union of all senders and receivers. An
    /// account active on both sides of a transfer (including a self-transfer)
    /// is counted once per side.
    pub fn compute(transactions: &[Transaction]) -> FlowMap {
        let mut metrics = FlowMap::new();

        for tx in transactions {
            let sender = metrics.entry(tx.sender_id.clone()).or_default();
            sender.outgoing_total += tx.amount;
            sender.transaction_count += 1;

            let receiver = metrics.entry(tx.receiver_id.clone()).or_default();
            receiver.incoming_total += tx.amount;
            receiver.transaction_count += 1;
        }

        for flow in metrics.values_mut() {
            flow.net_flow = flow.incoming_total - flow.outgoing_total;
        }

        metrics
    }

    /// Sum of `incoming_total + outgoing_total` over the given accounts.
    /// Accounts missing from `metrics` contribute nothing.
    pub fn volume<'a>(metrics: &FlowMap, accounts: impl IntoIterator<Item = &'a String>) -> f64 {
        accounts
            .into_iter()
            .filter_map(|account| metrics.get(account))
            .map(FlowMetrics::volume)
            .sum()
    }
}

impl AnalysisKernel for FlowAggregator {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tx(from: &str, to: &str, amount: f64) -> Transaction {
        Transaction::new(from, to, amount, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_single_transaction() {
        let metrics = FlowAggregator::compute(&[tx("A", "B", 100.0)]);

        assert_eq!(
            metrics["A"],
            FlowMetrics {
                incoming_total: 0.0,
                outgoing_total: 100.0,
                net_flow: -100.0,
                transaction_count: 1,
            }
        );
        assert_eq!(
            metrics["B"],
            FlowMetrics {
                incoming_total: 100.0,
                outgoing_total: 0.0,
                net_flow: 100.0,
                transaction_count: 1,
            }
        );
    }

    #[test]
    fn test_both_sides_counted() {
        let metrics = FlowAggregator::compute(&[
            tx("A", "B", 100.0),
            tx("B", "C", 60.0),
            tx("C", "A", 30.0),
        ]);

        let b = metrics["B"];
        assert_eq!(b.transaction_count, 2);
        assert_eq!(b.incoming_total, 100.0);
        assert_eq!(b.outgoing_total, 60.0);
        assert_eq!(b.net_flow, 40.0);

        let volume = FlowAggregator::volume(&metrics, &["A".to_string(), "B".to_string()]);
        assert_eq!(volume, 130.0 + 160.0);
    }

    #[test]
    fn test_self_transfer_counted_twice() {
        let metrics = FlowAggregator::compute(&[tx("A", "A", 10.0)]);
        assert_eq!(metrics["A"].transaction_count, 2);
        assert_eq!(metrics["A"].net_flow, 0.0);
    }

    #[test]
    fn test_empty_batch() {
        assert!(FlowAggregator::compute(&[]).is_empty());
    }
}

//! Transaction graph construction kernel.

use crate::types::TransactionGraph;
use fraudnet_core::{
    domain::Domain, kernel::KernelMetadata, traits::AnalysisKernel, transaction::Transaction,
};

/// Folds a transaction batch into a weighted directed graph.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    metadata: KernelMetadata,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Create a new graph builder kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("graph/builder", Domain::GraphAnalytics)
                .with_description("Weighted transaction graph with merged parallel edges"),
        }
    }

    /// Build the graph. Parallel transfers along the same ordered pair are
    /// merged into one edge whose weight is their summed amount.
    pub fn compute(transactions: &[Transaction]) -> TransactionGraph {
        let mut graph = TransactionGraph::new();
        for tx in transactions {
            graph.add_flow(&tx.sender_id, &tx.receiver_id, tx.amount);
        }
        graph
    }
}

impl AnalysisKernel for GraphBuilder {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

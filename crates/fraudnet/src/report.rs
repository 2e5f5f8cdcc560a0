//! Request and report types of the end-to-end analysis.

use fraudnet_core::{config::DetectionConfig, transaction::Transaction};
use fraudnet_graph::types::{FlowMap, GraphEdge};
use fraudnet_scoring::types::{FraudRing, SuspiciousAccount};
use serde::{Deserialize, Serialize};

/// Input to [`FraudAnalyzer`](crate::pipeline::FraudAnalyzer) batch execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Validated transaction batch.
    pub transactions: Vec<Transaction>,
    /// Configuration override for this request.
    #[serde(default)]
    pub config: Option<DetectionConfig>,
}

impl AnalysisRequest {
    /// Request with the analyzer's own configuration.
    #[must_use]
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            config: None,
        }
    }

    /// Override the configuration for this request only.
    #[must_use]
    pub fn with_config(mut self, config: DetectionConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Batch-level counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Accounts present in the transaction graph.
    pub total_accounts_analyzed: usize,
    /// Entries in `suspicious_accounts`.
    pub suspicious_accounts_flagged: usize,
    /// Entries in `fraud_rings`.
    pub fraud_rings_detected: usize,
    /// Wall-clock time of the analysis, two decimals.
    pub processing_time_seconds: f64,
}

/// Full result of analyzing one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Suspicious accounts, highest score first.
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    /// Cycle-based rings in creation order.
    pub fraud_rings: Vec<FraudRing>,
    /// Aggregated graph edges, for visualization.
    pub graph_edges: Vec<GraphEdge>,
    /// Per-account flow metrics.
    pub flow_metrics: FlowMap,
    /// Counters.
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    /// Look up a suspicious account entry.
    #[must_use]
    pub fn account(&self, account_id: &str) -> Option<&SuspiciousAccount> {
        self.suspicious_accounts
            .iter()
            .find(|entry| entry.account_id == account_id)
    }

    /// Look up a ring by id.
    #[must_use]
    pub fn ring(&self, ring_id: &str) -> Option<&FraudRing> {
        self.fraud_rings.iter().find(|ring| ring.ring_id == ring_id)
    }
}

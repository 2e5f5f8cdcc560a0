//! End-to-end fraud analysis kernel.
//!
//! Runs graph construction, flow aggregation, cycle detection, centrality and
//! the four pattern detectors over one batch, then fuses their output in the
//! scoring engine. The stages before scoring share no state, so the async
//! path can run them as independent blocking tasks and join them before
//! scoring. Both paths produce the same report.

use crate::report::{AnalysisReport, AnalysisRequest, AnalysisSummary};
use async_trait::async_trait;
use fraudnet_core::{
    config::DetectionConfig,
    domain::Domain,
    error::{FraudError, Result},
    kernel::KernelMetadata,
    traits::{AnalysisKernel, BatchKernel},
    transaction::{validate_batch, AccountId, Transaction},
};
use fraudnet_detect::{
    AmountAnomalyDetector, ShellAccountDetector, SmurfingDetector, SmurfingResult,
    VelocityDetector,
};
use fraudnet_graph::{
    CentralityResult, Cycle, CycleDetector, FlowAggregator, FlowMap, GraphBuilder, PageRank,
    TransactionGraph,
};
use fraudnet_scoring::{ScoringEngine, ScoringInput};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::{self, JoinHandle};
use tracing::{debug, info};

/// Graph-derived signals: the graph plus what is computed from it.
struct GraphSignals {
    graph: TransactionGraph,
    cycles: Vec<Cycle>,
    centrality: CentralityResult,
}

impl GraphSignals {
    fn compute(transactions: &[Transaction], config: &DetectionConfig) -> Self {
        let graph = GraphBuilder::compute(transactions);
        let cycles =
            CycleDetector::compute(&graph, config.cycle_min_length, config.cycle_max_length);
        let centrality = PageRank::compute(
            &graph,
            config.pagerank_damping,
            config.pagerank_max_iterations,
            config.pagerank_tolerance,
        );

        debug!(
            accounts = graph.node_count(),
            edges = graph.edge_count(),
            cycles = cycles.len(),
            pagerank_iterations = centrality.iterations,
            pagerank_converged = centrality.converged,
            "Graph stage complete"
        );

        Self {
            graph,
            cycles,
            centrality,
        }
    }
}

/// Everything the scoring engine consumes.
struct Signals {
    graph: GraphSignals,
    flow_metrics: FlowMap,
    smurfing: SmurfingResult,
    shells: Vec<AccountId>,
    velocity: Vec<AccountId>,
    anomalies: Vec<AccountId>,
}

impl Signals {
    fn log_hits(&self) {
        debug!(
            fan_in = self.smurfing.fan_in.len(),
            fan_out = self.smurfing.fan_out.len(),
            shells = self.shells.len(),
            velocity = self.velocity.len(),
            anomalies = self.anomalies.len(),
            "Detectors complete"
        );
    }
}

/// End-to-end fraud analysis kernel.
#[derive(Debug, Clone)]
pub struct FraudAnalyzer {
    metadata: KernelMetadata,
    config: DetectionConfig,
}

impl Default for FraudAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FraudAnalyzer {
    /// Create an analyzer with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DetectionConfig::default())
    }

    /// Create an analyzer with the given thresholds.
    #[must_use]
    pub fn with_config(config: DetectionConfig) -> Self {
        Self {
            metadata: KernelMetadata::batch("pipeline/fraud-analysis", Domain::Pipeline)
                .with_description("Graph and statistical fraud ring detection over a batch"),
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Analyze a batch on the calling thread.
    ///
    /// The batch is assumed valid; use [`BatchKernel::execute`] to validate
    /// it first.
    pub fn analyze(&self, transactions: &[Transaction]) -> AnalysisReport {
        let started = Instant::now();
        info!(transactions = transactions.len(), "Starting fraud analysis");

        let config = &self.config;
        let signals = Signals {
            graph: GraphSignals::compute(transactions, config),
            flow_metrics: FlowAggregator::compute(transactions),
            smurfing: SmurfingDetector::compute(
                transactions,
                config.fan_threshold,
                config.fan_window_delta(),
            ),
            shells: ShellAccountDetector::compute(transactions, config.shell_max_transactions),
            velocity: VelocityDetector::compute(
                transactions,
                config.velocity_window_delta(),
                config.velocity_threshold,
            ),
            anomalies: AmountAnomalyDetector::compute(transactions, config.z_threshold),
        };

        Self::assemble(signals, started)
    }

    /// Analyze a batch with every independent stage on its own blocking task.
    pub async fn analyze_parallel(&self, transactions: Arc<[Transaction]>) -> Result<AnalysisReport> {
        let started = Instant::now();
        info!(
            transactions = transactions.len(),
            parallel = true,
            "Starting fraud analysis"
        );

        let config = &self.config;

        let graph_task = {
            let txs = Arc::clone(&transactions);
            let config = config.clone();
            task::spawn_blocking(move || GraphSignals::compute(&txs, &config))
        };
        let flow_task = {
            let txs = Arc::clone(&transactions);
            task::spawn_blocking(move || FlowAggregator::compute(&txs))
        };
        let smurfing_task = {
            let txs = Arc::clone(&transactions);
            let (threshold, window) = (config.fan_threshold, config.fan_window_delta());
            task::spawn_blocking(move || SmurfingDetector::compute(&txs, threshold, window))
        };
        let shell_task = {
            let txs = Arc::clone(&transactions);
            let max = config.shell_max_transactions;
            task::spawn_blocking(move || ShellAccountDetector::compute(&txs, max))
        };
        let velocity_task = {
            let txs = Arc::clone(&transactions);
            let (window, threshold) = (config.velocity_window_delta(), config.velocity_threshold);
            task::spawn_blocking(move || VelocityDetector::compute(&txs, window, threshold))
        };
        let anomaly_task = {
            let txs = Arc::clone(&transactions);
            let z = config.z_threshold;
            task::spawn_blocking(move || AmountAnomalyDetector::compute(&txs, z))
        };

        let signals = Signals {
            graph: join(graph_task, "graph").await?,
            flow_metrics: join(flow_task, "flow metrics").await?,
            smurfing: join(smurfing_task, "smurfing").await?,
            shells: join(shell_task, "shell account").await?,
            velocity: join(velocity_task, "velocity").await?,
            anomalies: join(anomaly_task, "amount anomaly").await?,
        };

        Ok(Self::assemble(signals, started))
    }

    fn assemble(signals: Signals, started: Instant) -> AnalysisReport {
        signals.log_hits();

        let scored = ScoringEngine::compute(&ScoringInput {
            cycles: &signals.graph.cycles,
            smurfing: &signals.smurfing,
            shells: &signals.shells,
            velocity: &signals.velocity,
            anomalies: &signals.anomalies,
            centrality: &signals.graph.centrality,
            flow_metrics: &signals.flow_metrics,
        });

        let summary = AnalysisSummary {
            total_accounts_analyzed: signals.graph.graph.node_count(),
            suspicious_accounts_flagged: scored.suspicious_accounts.len(),
            fraud_rings_detected: scored.fraud_rings.len(),
            processing_time_seconds: round2(started.elapsed().as_secs_f64()),
        };

        info!(
            accounts = summary.total_accounts_analyzed,
            suspicious = summary.suspicious_accounts_flagged,
            rings = summary.fraud_rings_detected,
            seconds = summary.processing_time_seconds,
            "Fraud analysis complete"
        );

        AnalysisReport {
            suspicious_accounts: scored.suspicious_accounts,
            fraud_rings: scored.fraud_rings,
            graph_edges: signals.graph.graph.edges(),
            flow_metrics: signals.flow_metrics,
            summary,
        }
    }
}

impl AnalysisKernel for FraudAnalyzer {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    fn validate(&self) -> Result<()> {
        self.config.validate()
    }
}

#[async_trait]
impl BatchKernel<AnalysisRequest, AnalysisReport> for FraudAnalyzer {
    async fn execute(&self, input: AnalysisRequest) -> Result<AnalysisReport> {
        self.validate_input(&input)?;

        let analyzer = match input.config {
            Some(config) => FraudAnalyzer::with_config(config),
            None => self.clone(),
        };
        analyzer.validate()?;

        if analyzer.config.parallel {
            analyzer.analyze_parallel(input.transactions.into()).await
        } else {
            Ok(analyzer.analyze(&input.transactions))
        }
    }

    fn validate_input(&self, input: &AnalysisRequest) -> Result<()> {
        validate_batch(&input.transactions)
    }
}

async fn join<T>(handle: JoinHandle<T>, stage: &str) -> Result<T> {
    handle
        .await
        .map_err(|e| FraudError::internal(format!("{} task failed: {}", stage, e)))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

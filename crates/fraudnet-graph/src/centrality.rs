//! Weighted PageRank centrality kernel.
//!
//! Accounts that concentrate money flow from many well-connected accounts
//! score higher. Edge weight (aggregated amount) drives the transition
//! probability, so a large transfer pulls more rank than a small one.

use crate::types::{CentralityResult, TransactionGraph};
use fraudnet_core::{domain::Domain, kernel::KernelMetadata, traits::AnalysisKernel};
use petgraph::visit::EdgeRef;
use tracing::warn;

/// Default damping factor.
pub const DEFAULT_DAMPING: f64 = 0.85;
/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;
/// Default per-node tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1.0e-6;

/// PageRank power-iteration state.
#[derive(Debug, Clone, Default)]
pub struct PageRankState {
    /// Current scores.
    pub scores: Vec<f64>,
    /// Previous scores (for convergence check).
    pub prev_scores: Vec<f64>,
    /// Outgoing edges per node as (target, transition probability).
    pub transitions: Vec<Vec<(usize, f64)>>,
    /// Nodes with no outgoing weight.
    pub dangling: Vec<usize>,
    /// Damping factor.
    pub damping: f64,
    /// Current iteration.
    pub iteration: u32,
    /// Whether converged.
    pub converged: bool,
}

/// PageRank centrality kernel.
///
/// Power iteration with uniform teleport. Mass sitting on dangling accounts
/// (pure sinks, or accounts whose outgoing weight is zero) is spread
/// uniformly over all accounts each step, so scores always sum to 1.
#[derive(Debug, Clone)]
pub struct PageRank {
    metadata: KernelMetadata,
}

impl Default for PageRank {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRank {
    /// Create a new PageRank kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("graph/pagerank", Domain::GraphAnalytics)
                .with_description("Weighted PageRank centrality via power iteration"),
        }
    }

    /// Initialize state for a graph.
    pub fn initialize_state(graph: &TransactionGraph, damping: f64) -> PageRankState {
        let g = graph.inner();
        let n = g.node_count();

        let mut transitions = Vec::with_capacity(n);
        let mut dangling = Vec::new();

        for node in g.node_indices() {
            let out_weight: f64 = g.edges(node).map(|e| *e.weight()).sum();
            if out_weight > 0.0 {
                transitions.push(
                    g.edges(node)
                        .map(|e| (e.target().index(), *e.weight() / out_weight))
                        .collect(),
                );
            } else {
                dangling.push(node.index());
                transitions.push(Vec::new());
            }
        }

        PageRankState {
            scores: vec![1.0 / n.max(1) as f64; n],
            prev_scores: vec![0.0; n],
            transitions,
            dangling,
            damping,
            iteration: 0,
            converged: false,
        }
    }

    /// Perform one iteration. Returns the L1 change between iterates.
    pub fn iterate_step(state: &mut PageRankState) -> f64 {
        let n = state.scores.len();
        if n == 0 {
            return 0.0;
        }

        let d = state.damping;
        std::mem::swap(&mut state.scores, &mut state.prev_scores);

        let dangling_sum: f64 = state.dangling.iter().map(|&i| state.prev_scores[i]).sum();
        let base = (d * dangling_sum + (1.0 - d)) / n as f64;
        state.scores.iter_mut().for_each(|s| *s = base);

        for (source, edges) in state.transitions.iter().enumerate() {
            let rank = d * state.prev_scores[source];
            for &(target, probability) in edges {
                state.scores[target] += rank * probability;
            }
        }

        state.iteration += 1;
        state
            .scores
            .iter()
            .zip(&state.prev_scores)
            .map(|(a, b)| (a - b).abs())
            .sum()
    }

    /// Run PageRank until the L1 change drops below `n * tolerance` or the
    /// iteration cap is hit. Non-convergence is logged, and the last iterate
    /// is returned.
    pub fn compute(
        graph: &TransactionGraph,
        damping: f64,
        max_iterations: u32,
        tolerance: f64,
    ) -> CentralityResult {
        let n = graph.node_count();
        if n == 0 {
            return CentralityResult {
                converged: true,
                ..CentralityResult::default()
            };
        }

        let mut state = Self::initialize_state(graph, damping);
        for _ in 0..max_iterations {
            let diff = Self::iterate_step(&mut state);
            if diff < n as f64 * tolerance {
                state.converged = true;
                break;
            }
        }

        if !state.converged {
            warn!(
                iterations = state.iteration,
                nodes = n,
                "PageRank did not converge; using last iterate"
            );
        }

        CentralityResult {
            scores: graph.accounts().cloned().zip(state.scores).collect(),
            iterations: state.iteration,
            converged: state.converged,
        }
    }

    /// Run with the default damping, iteration cap and tolerance.
    pub fn compute_default(graph: &TransactionGraph) -> CentralityResult {
        Self::compute(graph, DEFAULT_DAMPING, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE)
    }
}

impl AnalysisKernel for PageRank {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

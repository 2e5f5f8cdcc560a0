//! Common graph types and data structures.

use fraudnet_core::transaction::AccountId;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Weighted directed transaction graph.
///
/// One node per account, one edge per ordered (sender, receiver) pair. The
/// edge weight is the sum of all amounts sent along that pair. Nodes are
/// indexed in order of first appearance in the batch.
#[derive(Debug, Clone, Default)]
pub struct TransactionGraph {
    graph: DiGraph<AccountId, f64>,
    index: HashMap<AccountId, NodeIndex>,
}

impl TransactionGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the edge `sender -> receiver`, creating nodes and the
    /// edge as needed.
    pub fn add_flow(&mut self, sender: &str, receiver: &str, amount: f64) {
        let from = self.node_or_insert(sender);
        let to = self.node_or_insert(receiver);

        match self.graph.find_edge(from, to) {
            Some(edge) => {
                if let Some(weight) = self.graph.edge_weight_mut(edge) {
                    *weight += amount;
                }
            }
            None => {
                self.graph.add_edge(from, to, amount);
            }
        }
    }

    fn node_or_insert(&mut self, account: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(account) {
            return idx;
        }
        let idx = self.graph.add_node(account.to_string());
        self.index.insert(account.to_string(), idx);
        idx
    }

    /// Number of accounts.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct (sender, receiver) pairs.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns true if the account appears in the graph.
    #[must_use]
    pub fn contains(&self, account: &str) -> bool {
        self.index.contains_key(account)
    }

    /// Aggregated weight of `sender -> receiver`, if the edge exists.
    #[must_use]
    pub fn weight(&self, sender: &str, receiver: &str) -> Option<f64> {
        let from = *self.index.get(sender)?;
        let to = *self.index.get(receiver)?;
        self.graph
            .find_edge(from, to)
            .and_then(|edge| self.graph.edge_weight(edge).copied())
    }

    /// Account ids in node index order.
    pub fn accounts(&self) -> impl Iterator<Item = &AccountId> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edge list in creation order, for visualization.
    #[must_use]
    pub fn edges(&self) -> Vec<GraphEdge> {
        self.graph
            .edge_references()
            .map(|edge| GraphEdge {
                source: self.graph[edge.source()].clone(),
                target: self.graph[edge.target()].clone(),
                weight: *edge.weight(),
            })
            .collect()
    }

    /// Underlying petgraph graph.
    #[must_use]
    pub fn inner(&self) -> &DiGraph<AccountId, f64> {
        &self.graph
    }
}

/// One aggregated edge of the transaction graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Sending account.
    pub source: AccountId,
    /// Receiving account.
    pub target: AccountId,
    /// Sum of amounts sent along this pair.
    pub weight: f64,
}

/// Per-account money flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Total amount received.
    pub incoming_total: f64,
    /// Total amount sent.
    pub outgoing_total: f64,
    /// `incoming_total - outgoing_total`.
    pub net_flow: f64,
    /// Appearances as sender plus appearances as receiver.
    pub transaction_count: usize,
}

impl FlowMetrics {
    /// Total volume moved through the account, both directions.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.incoming_total + self.outgoing_total
    }
}

/// Account -> flow metrics, ordered by account id.
pub type FlowMap = BTreeMap<AccountId, FlowMetrics>;

/// A simple directed cycle.
///
/// Each member has an edge to the next and the last has an edge back to the
/// first. Members are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cycle(pub Vec<AccountId>);

impl Cycle {
    /// Number of accounts in the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the cycle has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Members in traversal order.
    #[must_use]
    pub fn members(&self) -> &[AccountId] {
        &self.0
    }
}

/// Centrality result for a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CentralityResult {
    /// Score per account, summing to 1 over all accounts.
    pub scores: BTreeMap<AccountId, f64>,
    /// Number of iterations performed.
    pub iterations: u32,
    /// Whether the algorithm converged.
    pub converged: bool,
}

impl CentralityResult {
    /// Score of an account, if it is in the graph.
    #[must_use]
    pub fn get(&self, account: &str) -> Option<f64> {
        self.scores.get(account).copied()
    }

    /// Get the top-k accounts by score.
    #[must_use]
    pub fn top_k(&self, k: usize) -> Vec<(AccountId, f64)> {
        let mut sorted: Vec<(AccountId, f64)> =
            self.scores.iter().map(|(a, s)| (a.clone(), *s)).collect();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        sorted.truncate(k);
        sorted
    }
}

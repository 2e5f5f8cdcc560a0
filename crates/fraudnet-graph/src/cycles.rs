//! Simple cycle enumeration kernel.
//!
//! Round-tripping funds through a chain of accounts shows up as a directed
//! cycle in the transaction graph. This kernel enumerates every simple cycle
//! whose length falls inside a configured window.

use crate::types::{Cycle, TransactionGraph};
use fraudnet_core::{domain::Domain, kernel::KernelMetadata, traits::AnalysisKernel};
use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;

/// Default shortest reported cycle.
pub const DEFAULT_MIN_LENGTH: usize = 3;
/// Default longest reported cycle.
pub const DEFAULT_MAX_LENGTH: usize = 5;

/// Bounded simple-cycle enumeration.
///
/// Every cycle is rooted at its lowest-index member and extended only
/// through higher-index members of the same strongly connected component,
/// so each simple cycle is reported exactly once. Search depth never exceeds
/// the maximum length, which keeps the combinatorial cost on dense graphs in
/// the caller's hands.
#[derive(Debug, Clone)]
pub struct CycleDetector {
    metadata: KernelMetadata,
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleDetector {
    /// Create a new cycle detection kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("graph/cycle-detection", Domain::GraphAnalytics)
                .with_description("Length-bounded simple directed cycle enumeration"),
        }
    }

    /// Enumerate simple cycles with `min_length <= len <= max_length`.
    ///
    /// Cycles come out ordered by root node, then by depth-first traversal
    /// over successors in node index order. The order is fixed for a given
    /// graph.
    pub fn compute(graph: &TransactionGraph, min_length: usize, max_length: usize) -> Vec<Cycle> {
        let g = graph.inner();
        let n = g.node_count();
        if n == 0 || max_length == 0 || min_length > max_length {
            return Vec::new();
        }

        let mut component = vec![0usize; n];
        for (id, scc) in tarjan_scc(g).into_iter().enumerate() {
            for node in scc {
                component[node.index()] = id;
            }
        }

        // Successors restricted to the same SCC, in index order.
        let successors: Vec<Vec<usize>> = (0..n)
            .map(|u| {
                let mut next: Vec<usize> = g
                    .neighbors(NodeIndex::new(u))
                    .map(|v| v.index())
                    .filter(|&v| component[v] == component[u])
                    .collect();
                next.sort_unstable();
                next.dedup();
                next
            })
            .collect();

        let mut search = CycleSearch {
            successors: &successors,
            min_length,
            max_length,
            path: Vec::with_capacity(max_length),
            on_path: vec![false; n],
            found: Vec::new(),
        };

        for root in 0..n {
            search.path.push(root);
            search.on_path[root] = true;
            search.extend(root, root);
            search.on_path[root] = false;
            search.path.pop();
        }

        search
            .found
            .into_iter()
            .map(|members| Cycle(members.into_iter().map(|i| g[NodeIndex::new(i)].clone()).collect()))
            .collect()
    }
}

struct CycleSearch<'a> {
    successors: &'a [Vec<usize>],
    min_length: usize,
    max_length: usize,
    path: Vec<usize>,
    on_path: Vec<bool>,
    found: Vec<Vec<usize>>,
}

impl CycleSearch<'_> {
    fn extend(&mut self, root: usize, node: usize) {
        for &next in &self.successors[node] {
            if next == root {
                if self.path.len() >= self.min_length {
                    self.found.push(self.path.clone());
                }
            } else if next > root && !self.on_path[next] && self.path.len() < self.max_length {
                self.path.push(next);
                self.on_path[next] = true;
                self.extend(root, next);
                self.on_path[next] = false;
                self.path.pop();
            }
        }
    }
}

impl AnalysisKernel for CycleDetector {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn graph(edges: &[(&str, &str)]) -> TransactionGraph {
        let mut g = TransactionGraph::new();
        for (a, b) in edges {
            g.add_flow(a, b, 1.0);
        }
        g
    }

    fn is_valid_cycle(g: &TransactionGraph, cycle: &Cycle) -> bool {
        let members = cycle.members();
        let distinct: HashSet<&String> = members.iter().collect();
        distinct.len() == members.len()
            && (0..members.len())
                .all(|i| g.weight(&members[i], &members[(i + 1) % members.len()]).is_some())
    }

    #[test]
    fn test_cycle_metadata() {
        let kernel = CycleDetector::new();
        assert_eq!(kernel.metadata().id, "graph/cycle-detection");
    }

    #[test]
    fn test_triangle() {
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let cycles = CycleDetector::compute(&g, 3, 5);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].members(), ["A", "B", "C"]);
    }

    #[test]
    fn test_back_and_forth_excluded() {
        let g = graph(&[("A", "B"), ("B", "A")]);
        assert!(CycleDetector::compute(&g, 3, 5).is_empty());

        let cycles = CycleDetector::compute(&g, 2, 5);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 2);
    }

    #[test]
    fn test_self_loop() {
        let g = graph(&[("A", "A"), ("A", "B"), ("B", "C"), ("C", "A")]);

        let cycles = CycleDetector::compute(&g, 3, 5);
        assert_eq!(cycles.len(), 1);

        let cycles = CycleDetector::compute(&g, 1, 5);
        assert_eq!(cycles.len(), 2);
        assert!(cycles.iter().any(|c| c.members() == ["A"]));
    }

    #[test]
    fn test_length_window() {
        // 4-cycle A->B->C->D->A with a chord C->A giving a triangle.
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A"), ("C", "A")]);

        let all = CycleDetector::compute(&g, 3, 5);
        assert_eq!(all.len(), 2);

        let only_four = CycleDetector::compute(&g, 4, 4);
        assert_eq!(only_four.len(), 1);
        assert_eq!(only_four[0].members(), ["A", "B", "C", "D"]);

        let only_three = CycleDetector::compute(&g, 3, 3);
        assert_eq!(only_three.len(), 1);
        assert_eq!(only_three[0].len(), 3);
    }

    #[test]
    fn test_overlapping_cycles_each_reported_once() {
        // Two triangles sharing B: A->B->C->A and B->D->E->B.
        let g = graph(&[
            ("A", "B"),
            ("B", "C"),
            ("C", "A"),
            ("B", "D"),
            ("D", "E"),
            ("E", "B"),
        ]);

        let cycles = CycleDetector::compute(&g, 3, 5);
        assert_eq!(cycles.len(), 2);
        for cycle in &cycles {
            assert!(is_valid_cycle(&g, cycle));
        }

        let unique: HashSet<Vec<String>> = cycles.iter().map(|c| c.0.clone()).collect();
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_complete_digraph() {
        // K4 with both directions: simple cycles of length 3 = 8, length 4 = 6.
        let nodes = ["A", "B", "C", "D"];
        let mut edges = Vec::new();
        for a in nodes {
            for b in nodes {
                if a != b {
                    edges.push((a, b));
                }
            }
        }
        let g = graph(&edges);

        let cycles = CycleDetector::compute(&g, 3, 4);
        assert_eq!(cycles.iter().filter(|c| c.len() == 3).count(), 8);
        assert_eq!(cycles.iter().filter(|c| c.len() == 4).count(), 6);
        assert!(cycles.iter().all(|c| is_valid_cycle(&g, c)));
    }

    #[test]
    fn test_acyclic_and_empty() {
        let g = graph(&[("A", "B"), ("B", "C"), ("A", "C")]);
        assert!(CycleDetector::compute(&g, 3, 5).is_empty());
        assert!(CycleDetector::compute(&TransactionGraph::new(), 3, 5).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "A"), ("C", "D"), ("D", "A")]);
        assert_eq!(CycleDetector::compute(&g, 3, 5), CycleDetector::compute(&g, 3, 5));
    }
}

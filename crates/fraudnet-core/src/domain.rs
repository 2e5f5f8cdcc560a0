//! Domain definitions for kernel categorization.
//!
//! Kernels are grouped by the stage of the analysis they belong to. Domains are
//! used for kernel discovery in the registry and for log context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Analysis stage a kernel belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Domain {
    /// Graph construction, flow aggregation, cycles and centrality.
    GraphAnalytics,

    /// Statistical and temporal pattern detectors.
    PatternDetection,

    /// Score fusion and ring construction.
    Scoring,

    /// End-to-end batch analysis.
    Pipeline,
}

impl Domain {
    /// All available domains.
    pub const ALL: &'static [Domain] = &[
        Domain::GraphAnalytics,
        Domain::PatternDetection,
        Domain::Scoring,
        Domain::Pipeline,
    ];

    /// Returns the domain name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Domain::GraphAnalytics => "GraphAnalytics",
            Domain::PatternDetection => "PatternDetection",
            Domain::Scoring => "Scoring",
            Domain::Pipeline => "Pipeline",
        }
    }

    /// Parse a domain from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GraphAnalytics" => Some(Domain::GraphAnalytics),
            "PatternDetection" => Some(Domain::PatternDetection),
            "Scoring" => Some(Domain::Scoring),
            "Pipeline" => Some(Domain::Pipeline),
            _ => None,
        }
    }

    /// Kernel id prefix used by kernels of this domain (e.g. `graph/`).
    #[must_use]
    pub const fn id_prefix(&self) -> &'static str {
        match self {
            Domain::GraphAnalytics => "graph",
            Domain::PatternDetection => "detect",
            Domain::Scoring => "scoring",
            Domain::Pipeline => "pipeline",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

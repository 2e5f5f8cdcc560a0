//! Kernel metadata.
//!
//! Every analysis component is a kernel: a stateless struct carrying metadata
//! and exposing a pure `compute` function over a transaction batch.

use crate::domain::Domain;
use serde::{Deserialize, Serialize};

/// Kernel metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelMetadata {
    /// Unique kernel identifier (e.g., "graph/cycle-detection").
    pub id: String,

    /// Analysis stage the kernel belongs to.
    pub domain: Domain,

    /// Human-readable description.
    pub description: String,

    /// Version of the kernel implementation.
    pub version: u32,
}

impl KernelMetadata {
    /// Create metadata for a batch kernel.
    #[must_use]
    pub fn batch(id: impl Into<String>, domain: Domain) -> Self {
        Self {
            id: id.into(),
            domain,
            description: String::new(),
            version: 1,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Returns the kernel name in `Domain.KernelName` form.
    ///
    /// The kernel name is the last id segment in PascalCase
    /// (e.g. "graph/cycle-detection" -> "GraphAnalytics.CycleDetection").
    #[must_use]
    pub fn feature_string(&self) -> String {
        let name = self.id.rsplit('/').next().unwrap_or(&self.id);
        format!("{}.{}", self.domain, to_pascal_case(name))
    }
}

impl Default for KernelMetadata {
    fn default() -> Self {
        Self::batch("unnamed", Domain::Pipeline)
    }
}

/// Convert a kebab-case or snake_case string to PascalCase.
fn to_pascal_case(s: &str) -> String {
    s.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

//! Scoring types: pattern tags, fraud rings and suspicious account entries.

use fraudnet_core::transaction::AccountId;
use fraudnet_detect::types::SmurfingResult;
use fraudnet_graph::types::{CentralityResult, Cycle, FlowMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A detected pattern attributed to an account.
///
/// Serialized as its string tag, e.g. `cycle_length_3` or `fan_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternTag {
    /// Member of a ring built from a cycle of the given length.
    CycleLength(usize),
    /// Fan-in aggregator.
    FanIn,
    /// Fan-out disperser.
    FanOut,
    /// Low-activity pass-through account.
    ShellAccount,
    /// Burst of outgoing transfers.
    HighVelocity,
    /// Sender of an outlier amount.
    AmountAnomaly,
}

const CYCLE_PREFIX: &str = "cycle_length_";

impl PatternTag {
    /// Fixed tag string for non-cycle patterns.
    fn fixed_str(&self) -> Option<&'static str> {
        match self {
            PatternTag::CycleLength(_) => None,
            PatternTag::FanIn => Some("fan_in"),
            PatternTag::FanOut => Some("fan_out"),
            PatternTag::ShellAccount => Some("shell_account"),
            PatternTag::HighVelocity => Some("high_velocity"),
            PatternTag::AmountAnomaly => Some("amount_anomaly"),
        }
    }
}

impl fmt::Display for PatternTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternTag::CycleLength(len) => write!(f, "{}{}", CYCLE_PREFIX, len),
            other => f.write_str(other.fixed_str().unwrap_or_default()),
        }
    }
}

impl FromStr for PatternTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(len) = s.strip_prefix(CYCLE_PREFIX) {
            return len
                .parse()
                .map(PatternTag::CycleLength)
                .map_err(|_| format!("invalid cycle length in pattern tag: {}", s));
        }
        match s {
            "fan_in" => Ok(PatternTag::FanIn),
            "fan_out" => Ok(PatternTag::FanOut),
            "shell_account" => Ok(PatternTag::ShellAccount),
            "high_velocity" => Ok(PatternTag::HighVelocity),
            "amount_anomaly" => Ok(PatternTag::AmountAnomaly),
            other => Err(format!("unknown pattern tag: {}", other)),
        }
    }
}

impl Serialize for PatternTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PatternTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A group of accounts forming a detected cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRing {
    /// Sequential id, `RING_001`, `RING_002`, ...
    pub ring_id: String,
    /// Cycle members in traversal order.
    pub member_accounts: Vec<AccountId>,
    /// Always `"cycle"`.
    pub pattern_type: String,
    /// Risk in [0, 100], one decimal.
    pub risk_score: f64,
}

/// Per-account scoring entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    /// Account identifier.
    pub account_id: AccountId,
    /// Fused score in [0, 100], one decimal.
    pub suspicion_score: f64,
    /// Patterns in detection order, no duplicates.
    pub detected_patterns: Vec<PatternTag>,
    /// First ring the account was assigned to, empty if none.
    pub ring_id: String,
}

impl SuspiciousAccount {
    pub(crate) fn new(account_id: AccountId, ring_id: String) -> Self {
        Self {
            account_id,
            suspicion_score: 0.0,
            detected_patterns: Vec::new(),
            ring_id,
        }
    }

    /// Returns true if the pattern was attributed to this account.
    #[must_use]
    pub fn has_pattern(&self, tag: PatternTag) -> bool {
        self.detected_patterns.contains(&tag)
    }
}

/// Everything the scoring engine consumes.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    /// Cycles in detection order.
    pub cycles: &'a [Cycle],
    /// Fan-in / fan-out result.
    pub smurfing: &'a SmurfingResult,
    /// Shell accounts.
    pub shells: &'a [AccountId],
    /// High-velocity senders.
    pub velocity: &'a [AccountId],
    /// Amount anomaly senders.
    pub anomalies: &'a [AccountId],
    /// Centrality scores.
    pub centrality: &'a CentralityResult,
    /// Per-account flow metrics.
    pub flow_metrics: &'a FlowMap,
}

/// Scoring output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringOutput {
    /// Entries sorted by score descending.
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    /// Rings in creation order.
    pub fraud_rings: Vec<FraudRing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_tag_strings() {
        assert_eq!(PatternTag::CycleLength(4).to_string(), "cycle_length_4");
        assert_eq!(PatternTag::ShellAccount.to_string(), "shell_account");
        assert_eq!("high_velocity".parse::<PatternTag>(), Ok(PatternTag::HighVelocity));
        assert_eq!("cycle_length_5".parse::<PatternTag>(), Ok(PatternTag::CycleLength(5)));
        assert!("cycle_length_x".parse::<PatternTag>().is_err());
        assert!("layering".parse::<PatternTag>().is_err());
    }

    #[test]
    fn test_pattern_tag_json() {
        let tags = vec![PatternTag::CycleLength(3), PatternTag::FanIn];
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, r#"["cycle_length_3","fan_in"]"#);

        let parsed: Vec<PatternTag> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tags);
    }
}

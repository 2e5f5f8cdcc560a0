//! Score fusion kernel.
//!
//! Turns raw detector output into fraud rings and per-account suspicion
//! scores. Rings are built first, in cycle order, so that every account knows
//! the first ring it belongs to before any score entry is created. Boosts are
//! then applied pattern by pattern: cycles, fan-in, fan-out, shells,
//! velocity, anomalies, and finally a centrality boost for accounts that
//! already have an entry.

use crate::types::{FraudRing, PatternTag, ScoringInput, ScoringOutput, SuspiciousAccount};
use fraudnet_core::{
    domain::Domain, kernel::KernelMetadata, traits::AnalysisKernel, transaction::AccountId,
};
use fraudnet_graph::{flow::FlowAggregator, types::FlowMap};
use std::collections::HashMap;
use tracing::{info, warn};

/// Upper bound of every score.
pub const MAX_SCORE: f64 = 100.0;

/// Ring risk: baseline for any cycle.
pub const BASE_CYCLE_RISK: f64 = 50.0;
/// Ring risk: added per member.
pub const RISK_PER_MEMBER: f64 = 5.0;
/// Ring risk: volume divisor.
pub const VOLUME_SCALE: f64 = 10_000.0;
/// Ring risk: cap on the volume term.
pub const MAX_VOLUME_RISK: f64 = 45.0;

/// Cycle boost: base.
pub const BOOST_CYCLE_BASE: f64 = 20.0;
/// Cycle boost: added per member.
pub const BOOST_CYCLE_PER_HOP: f64 = 4.0;
/// Cycle boost: cap.
pub const MAX_CYCLE_BOOST: f64 = 50.0;

/// Fan-in boost.
pub const BOOST_FAN_IN: f64 = 25.0;
/// Fan-out boost.
pub const BOOST_FAN_OUT: f64 = 20.0;
/// Shell account boost.
pub const BOOST_SHELL: f64 = 15.0;
/// High velocity boost.
pub const BOOST_VELOCITY: f64 = 25.0;
/// Amount anomaly boost.
pub const BOOST_ANOMALY: f64 = 10.0;

/// Centrality boost: multiplier on the raw score.
pub const PAGERANK_SCALE: f64 = 500.0;
/// Centrality boost: cap.
pub const MAX_PAGERANK_BOOST: f64 = 20.0;

/// Ring pattern type.
pub const RING_PATTERN_CYCLE: &str = "cycle";

/// Score fusion kernel.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    metadata: KernelMetadata,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringEngine {
    /// Create a new scoring kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("scoring/fusion", Domain::Scoring)
                .with_description("Fraud ring construction and multi-signal score fusion"),
        }
    }

    /// Fuse detector output into rings and ranked suspicious accounts.
    pub fn compute(input: &ScoringInput<'_>) -> ScoringOutput {
        let (fraud_rings, account_to_ring) = Self::build_rings(input);
        let mut board = ScoreBoard::new(account_to_ring, input.flow_metrics);

        for ring in &fraud_rings {
            let len = ring.member_accounts.len();
            let boost = Self::cycle_boost(len);
            for account in &ring.member_accounts {
                board.boost(account, PatternTag::CycleLength(len), boost);
            }
        }

        board.boost_all(&input.smurfing.fan_in, PatternTag::FanIn, BOOST_FAN_IN);
        board.boost_all(&input.smurfing.fan_out, PatternTag::FanOut, BOOST_FAN_OUT);
        board.boost_all(input.shells, PatternTag::ShellAccount, BOOST_SHELL);
        board.boost_all(input.velocity, PatternTag::HighVelocity, BOOST_VELOCITY);
        board.boost_all(input.anomalies, PatternTag::AmountAnomaly, BOOST_ANOMALY);

        for entry in &mut board.entries {
            let rank = input.centrality.get(&entry.account_id).unwrap_or(0.0);
            entry.suspicion_score = clamp_add(entry.suspicion_score, Self::centrality_boost(rank));
        }

        let mut suspicious_accounts = board.entries;
        for entry in &mut suspicious_accounts {
            entry.suspicion_score = round1(entry.suspicion_score);
        }
        // Stable: equal scores keep insertion order.
        suspicious_accounts.sort_by(|a, b| b.suspicion_score.total_cmp(&a.suspicion_score));

        info!(
            rings = fraud_rings.len(),
            suspicious = suspicious_accounts.len(),
            "Scoring complete"
        );

        ScoringOutput {
            suspicious_accounts,
            fraud_rings,
        }
    }

    /// Build one ring per cycle whose members all have flow metrics, and
    /// record the first ring of every member.
    fn build_rings(input: &ScoringInput<'_>) -> (Vec<FraudRing>, HashMap<AccountId, String>) {
        let mut rings = Vec::new();
        let mut account_to_ring: HashMap<AccountId, String> = HashMap::new();

        for cycle in input.cycles {
            if !cycle
                .members()
                .iter()
                .all(|account| input.flow_metrics.contains_key(account))
            {
                warn!(cycle = ?cycle.members(), "Skipping cycle with unknown accounts");
                continue;
            }

            let ring_id = format!("RING_{:03}", rings.len() + 1);
            let volume = FlowAggregator::volume(input.flow_metrics, cycle.members());

            for account in cycle.members() {
                account_to_ring
                    .entry(account.clone())
                    .or_insert_with(|| ring_id.clone());
            }

            rings.push(FraudRing {
                ring_id,
                member_accounts: cycle.members().to_vec(),
                pattern_type: RING_PATTERN_CYCLE.to_string(),
                risk_score: Self::ring_risk(cycle.len(), volume),
            });
        }

        (rings, account_to_ring)
    }

    /// `clamp(50 + 5·members + min(volume / 10000, 45), 0, 100)`, one decimal.
    #[must_use]
    pub fn ring_risk(member_count: usize, volume: f64) -> f64 {
        let volume_risk = (volume / VOLUME_SCALE).min(MAX_VOLUME_RISK);
        let risk = BASE_CYCLE_RISK + member_count as f64 * RISK_PER_MEMBER + volume_risk;
        round1(risk.clamp(0.0, MAX_SCORE))
    }

    /// `min(50, 20 + 4·length)`.
    #[must_use]
    pub fn cycle_boost(length: usize) -> f64 {
        (BOOST_CYCLE_BASE + length as f64 * BOOST_CYCLE_PER_HOP).min(MAX_CYCLE_BOOST)
    }

    /// `min(20, rank·500)`.
    #[must_use]
    pub fn centrality_boost(rank: f64) -> f64 {
        (rank * PAGERANK_SCALE).min(MAX_PAGERANK_BOOST)
    }
}

impl AnalysisKernel for ScoringEngine {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

/// Insertion-ordered accumulator of suspicious account entries.
struct ScoreBoard<'a> {
    entries: Vec<SuspiciousAccount>,
    positions: HashMap<AccountId, usize>,
    account_to_ring: HashMap<AccountId, String>,
    flow_metrics: &'a FlowMap,
}

impl<'a> ScoreBoard<'a> {
    fn new(account_to_ring: HashMap<AccountId, String>, flow_metrics: &'a FlowMap) -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
            account_to_ring,
            flow_metrics,
        }
    }

    fn entry(&mut self, account: &str) -> &mut SuspiciousAccount {
        let position = match self.positions.get(account).copied() {
            Some(position) => position,
            None => {
                let ring_id = self.account_to_ring.get(account).cloned().unwrap_or_default();
                self.entries
                    .push(SuspiciousAccount::new(account.to_string(), ring_id));
                self.positions
                    .insert(account.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[position]
    }

    /// Add `amount` to the account's score, recording `tag` once.
    fn boost(&mut self, account: &str, tag: PatternTag, amount: f64) {
        let entry = self.entry(account);
        if !entry.detected_patterns.contains(&tag) {
            entry.detected_patterns.push(tag);
        }
        entry.suspicion_score = clamp_add(entry.suspicion_score, amount);
    }

    /// Boost every listed account that has flow metrics.
    fn boost_all<'b>(
        &mut self,
        accounts: impl IntoIterator<Item = &'b AccountId>,
        tag: PatternTag,
        amount: f64,
    ) {
        for account in accounts {
            if !self.flow_metrics.contains_key(account) {
                warn!(account = %account, pattern = %tag, "Skipping account without flow metrics");
                continue;
            }
            self.boost(account, tag, amount);
        }
    }
}

fn clamp_add(score: f64, amount: f64) -> f64 {
    (score + amount).min(MAX_SCORE)
}

/// One decimal, exact halves to even (65.25 -> 65.2, 65.75 -> 65.8).
fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use fraudnet_detect::types::SmurfingResult;
    use fraudnet_graph::types::{CentralityResult, Cycle, FlowMetrics};
    use std::collections::BTreeSet;

    fn cycle(members: &[&str]) -> Cycle {
        Cycle(members.iter().map(|m| m.to_string()).collect())
    }

    fn ids(accounts: &[&str]) -> Vec<AccountId> {
        accounts.iter().map(|a| a.to_string()).collect()
    }

    fn flows(accounts: &[&str], volume_each: f64) -> FlowMap {
        accounts
            .iter()
            .map(|a| {
                (
                    a.to_string(),
                    FlowMetrics {
                        incoming_total: volume_each / 2.0,
                        outgoing_total: volume_each / 2.0,
                        net_flow: 0.0,
                        transaction_count: 2,
                    },
                )
            })
            .collect()
    }

    struct Fixture {
        cycles: Vec<Cycle>,
        smurfing: SmurfingResult,
        shells: Vec<AccountId>,
        velocity: Vec<AccountId>,
        anomalies: Vec<AccountId>,
        centrality: CentralityResult,
        flow_metrics: FlowMap,
    }

    impl Fixture {
        fn new(flow_metrics: FlowMap) -> Self {
            Self {
                cycles: Vec::new(),
                smurfing: SmurfingResult::default(),
                shells: Vec::new(),
                velocity: Vec::new(),
                anomalies: Vec::new(),
                centrality: CentralityResult::default(),
                flow_metrics,
            }
        }

        fn run(&self) -> ScoringOutput {
            ScoringEngine::compute(&ScoringInput {
                cycles: &self.cycles,
                smurfing: &self.smurfing,
                shells: &self.shells,
                velocity: &self.velocity,
                anomalies: &self.anomalies,
                centrality: &self.centrality,
                flow_metrics: &self.flow_metrics,
            })
        }
    }

    fn find<'a>(output: &'a ScoringOutput, account: &str) -> &'a SuspiciousAccount {
        output
            .suspicious_accounts
            .iter()
            .find(|e| e.account_id == account)
            .expect("account present")
    }

    #[test]
    fn test_scoring_metadata() {
        let kernel = ScoringEngine::new();
        assert_eq!(kernel.metadata().id, "scoring/fusion");
        assert_eq!(kernel.metadata().domain, Domain::Scoring);
    }

    #[test]
    fn test_ring_risk_zero_volume() {
        assert_eq!(ScoringEngine::ring_risk(3, 0.0), 65.0);
        // Volume term capped at 45, total capped at 100.
        assert_eq!(ScoringEngine::ring_risk(5, 1e9), 100.0);
        assert_eq!(ScoringEngine::ring_risk(3, 123_456.0), 77.3);
    }

    #[test]
    fn test_ring_risk_half_rounds_to_even() {
        // 50 + 15 + 0.25
        assert_eq!(ScoringEngine::ring_risk(3, 2_500.0), 65.2);
        // 50 + 15 + 0.75
        assert_eq!(ScoringEngine::ring_risk(3, 7_500.0), 65.8);
    }

    #[test]
    fn test_suspicion_score_half_rounds_to_even() {
        let mut fx = Fixture::new(flows(&["A"], 10.0));
        fx.anomalies = ids(&["A"]);
        // 10 + 0.0005 * 500 = 10.25
        fx.centrality.scores.insert("A".to_string(), 0.000_5);
        let out = fx.run();

        assert_eq!(find(&out, "A").suspicion_score, 10.2);
    }

    #[test]
    fn test_cycle_boost_scaling() {
        assert_eq!(ScoringEngine::cycle_boost(3), 32.0);
        assert_eq!(ScoringEngine::cycle_boost(5), 40.0);
        assert_eq!(ScoringEngine::cycle_boost(8), 50.0);
        assert_eq!(ScoringEngine::cycle_boost(12), 50.0);
    }

    #[test]
    fn test_single_ring() {
        let mut fx = Fixture::new(flows(&["A", "B", "C"], 0.0));
        fx.cycles = vec![cycle(&["A", "B", "C"])];
        let out = fx.run();

        assert_eq!(out.fraud_rings.len(), 1);
        let ring = &out.fraud_rings[0];
        assert_eq!(ring.ring_id, "RING_001");
        assert_eq!(ring.pattern_type, "cycle");
        assert_eq!(ring.risk_score, 65.0);

        assert_eq!(out.suspicious_accounts.len(), 3);
        for entry in &out.suspicious_accounts {
            assert_eq!(entry.ring_id, "RING_001");
            assert_eq!(entry.suspicion_score, 32.0);
            assert_eq!(entry.detected_patterns, vec![PatternTag::CycleLength(3)]);
        }
    }

    #[test]
    fn test_same_length_rings_double_boost_single_tag() {
        let mut fx = Fixture::new(flows(&["A", "B", "C", "D", "E"], 0.0));
        fx.cycles = vec![cycle(&["A", "B", "C"]), cycle(&["A", "D", "E"])];
        let out = fx.run();

        let a = find(&out, "A");
        assert_eq!(a.detected_patterns, vec![PatternTag::CycleLength(3)]);
        assert_eq!(a.suspicion_score, 64.0);
        // First ring wins.
        assert_eq!(a.ring_id, "RING_001");
        assert_eq!(find(&out, "D").ring_id, "RING_002");
        assert_eq!(out.suspicious_accounts[0].account_id, "A");
    }

    #[test]
    fn test_cycle_with_unknown_member_skipped() {
        let mut fx = Fixture::new(flows(&["A", "B"], 0.0));
        fx.cycles = vec![cycle(&["A", "B", "GHOST"]), cycle(&["B", "A"])];
        let out = fx.run();

        assert_eq!(out.fraud_rings.len(), 1);
        assert_eq!(out.fraud_rings[0].ring_id, "RING_001");
        assert_eq!(out.fraud_rings[0].member_accounts, ids(&["B", "A"]));
    }

    #[test]
    fn test_pattern_order_and_clamp() {
        let mut fx = Fixture::new(flows(&["A", "B", "C"], 0.0));
        fx.cycles = vec![cycle(&["A", "B", "C"])];
        fx.smurfing.fan_in = BTreeSet::from(["A".to_string()]);
        fx.smurfing.fan_out = BTreeSet::from(["A".to_string()]);
        fx.shells = ids(&["A"]);
        fx.velocity = ids(&["A"]);
        fx.anomalies = ids(&["A"]);
        let out = fx.run();

        let a = find(&out, "A");
        assert_eq!(a.suspicion_score, 100.0);
        assert_eq!(
            a.detected_patterns,
            vec![
                PatternTag::CycleLength(3),
                PatternTag::FanIn,
                PatternTag::FanOut,
                PatternTag::ShellAccount,
                PatternTag::HighVelocity,
                PatternTag::AmountAnomaly,
            ]
        );
    }

    #[test]
    fn test_fan_in_and_fan_out_both_apply() {
        let mut fx = Fixture::new(flows(&["HUB"], 10.0));
        fx.smurfing.fan_in = BTreeSet::from(["HUB".to_string()]);
        fx.smurfing.fan_out = BTreeSet::from(["HUB".to_string()]);
        let out = fx.run();

        assert_eq!(find(&out, "HUB").suspicion_score, 45.0);
        assert_eq!(find(&out, "HUB").ring_id, "");
    }

    #[test]
    fn test_unknown_accounts_skipped() {
        let mut fx = Fixture::new(flows(&["A"], 10.0));
        fx.shells = ids(&["A", "MISSING"]);
        fx.velocity = ids(&["MISSING"]);
        let out = fx.run();

        assert_eq!(out.suspicious_accounts.len(), 1);
        assert_eq!(out.suspicious_accounts[0].account_id, "A");
    }

    #[test]
    fn test_centrality_amplifies_only() {
        let mut fx = Fixture::new(flows(&["A", "B"], 10.0));
        fx.anomalies = ids(&["A"]);
        fx.centrality.scores.insert("A".to_string(), 0.01);
        fx.centrality.scores.insert("B".to_string(), 0.9);
        let out = fx.run();

        assert_eq!(out.suspicious_accounts.len(), 1);
        // 10 + min(20, 0.01 * 500)
        assert_eq!(find(&out, "A").suspicion_score, 15.0);
        assert_eq!(ScoringEngine::centrality_boost(0.9), 20.0);
    }

    #[test]
    fn test_sorted_descending_stable() {
        let mut fx = Fixture::new(flows(&["A", "B", "C"], 10.0));
        fx.shells = ids(&["B", "C"]);
        fx.velocity = ids(&["A"]);
        let out = fx.run();

        let order: Vec<&str> = out
            .suspicious_accounts
            .iter()
            .map(|e| e.account_id.as_str())
            .collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_scores_rounded() {
        let mut fx = Fixture::new(flows(&["A"], 10.0));
        fx.anomalies = ids(&["A"]);
        fx.centrality.scores.insert("A".to_string(), 0.012_345);
        let out = fx.run();

        // 10 + 6.1725
        assert_eq!(find(&out, "A").suspicion_score, 16.2);
    }

    #[test]
    fn test_no_signals_empty_output() {
        let fx = Fixture::new(flows(&["A", "B"], 10.0));
        let out = fx.run();
        assert!(out.suspicious_accounts.is_empty());
        assert!(out.fraud_rings.is_empty());
    }
}

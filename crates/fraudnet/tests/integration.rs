//! End-to-end tests over the full analysis pipeline.

use chrono::{DateTime, Duration, TimeZone, Utc};
use fraudnet::prelude::*;
use std::collections::HashSet;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap()
}

fn tx(from: &str, to: &str, amount: f64, minutes: i64) -> Transaction {
    Transaction::new(from, to, amount, t0() + Duration::minutes(minutes))
}

/// A batch exercising every detector at once:
/// - R1 -> R2 -> R3 -> R1 cycle
/// - ten mules paying into HUB within an hour
/// - P -> SH1 -> SH2 -> Q pass-through chain
/// - V sending four transfers in ten minutes
/// - BIG sending one outsized transfer
fn mixed_batch() -> Vec<Transaction> {
    let mut txs = vec![
        tx("R1", "R2", 5000.0, 0),
        tx("R2", "R3", 5000.0, 60),
        tx("R3", "R1", 5000.0, 120),
    ];
    txs.extend((0..10).map(|i| tx(&format!("M{}", i), "HUB", 900.0, i * 5)));
    txs.extend([
        tx("P", "SH1", 2000.0, 300),
        tx("SH1", "SH2", 2000.0, 360),
        tx("SH2", "Q", 2000.0, 420),
    ]);
    txs.extend((0..4).map(|i| tx("V", &format!("W{}", i), 100.0, 600 + i * 3)));
    txs.push(tx("BIG", "X", 1_000_000.0, 900));
    txs
}

fn flagged(report: &AnalysisReport) -> HashSet<&str> {
    report
        .suspicious_accounts
        .iter()
        .map(|entry| entry.account_id.as_str())
        .collect()
}

#[test]
fn test_mixed_batch_attribution() {
    let report = FraudAnalyzer::new().analyze(&mixed_batch());

    let expected: HashSet<&str> = ["R1", "R2", "R3", "HUB", "SH1", "SH2", "V", "BIG"]
        .into_iter()
        .collect();
    assert_eq!(flagged(&report), expected);

    let r1 = report.account("R1").expect("R1 flagged");
    assert_eq!(
        r1.detected_patterns,
        vec![PatternTag::CycleLength(3), PatternTag::ShellAccount]
    );
    assert_eq!(r1.ring_id, "RING_001");

    let hub = report.account("HUB").expect("HUB flagged");
    assert_eq!(hub.detected_patterns, vec![PatternTag::FanIn]);
    assert_eq!(hub.ring_id, "");

    assert_eq!(
        report.account("V").expect("V flagged").detected_patterns,
        vec![PatternTag::HighVelocity]
    );
    assert_eq!(
        report.account("BIG").expect("BIG flagged").detected_patterns,
        vec![PatternTag::AmountAnomaly]
    );

    // 50 + 3*5 + 30000 / 10000
    let ring = report.ring("RING_001").expect("ring");
    assert_eq!(ring.risk_score, 68.0);
    assert_eq!(ring.pattern_type, "cycle");
    assert_eq!(report.fraud_rings.len(), 1);
}

#[test]
fn test_report_invariants() {
    let report = FraudAnalyzer::new().analyze(&mixed_batch());

    let mut seen = HashSet::new();
    for entry in &report.suspicious_accounts {
        assert!((0.0..=100.0).contains(&entry.suspicion_score));
        assert!(seen.insert(entry.account_id.clone()), "duplicate entry");
        assert!(!entry.detected_patterns.is_empty());

        let unique: HashSet<_> = entry.detected_patterns.iter().collect();
        assert_eq!(unique.len(), entry.detected_patterns.len());
    }

    for pair in report.suspicious_accounts.windows(2) {
        assert!(pair[0].suspicion_score >= pair[1].suspicion_score);
    }

    assert_eq!(report.summary.total_accounts_analyzed, 25);
    assert_eq!(
        report.summary.suspicious_accounts_flagged,
        report.suspicious_accounts.len()
    );
    assert_eq!(report.summary.fraud_rings_detected, report.fraud_rings.len());
}

#[test]
fn test_dense_graph_scores_clamped() {
    // Complete directed graph on six accounts: hundreds of overlapping cycles.
    let accounts = ["A", "B", "C", "D", "E", "F"];
    let mut txs = Vec::new();
    let mut minute = 0;
    for from in accounts {
        for to in accounts {
            if from != to {
                txs.push(tx(from, to, 250_000.0, minute));
                minute += 1;
            }
        }
    }

    let report = FraudAnalyzer::new().analyze(&txs);

    // 40 triangles, 90 four-cycles, 144 five-cycles.
    assert_eq!(report.fraud_rings.len(), 274);
    assert_eq!(report.fraud_rings[0].ring_id, "RING_001");
    assert_eq!(report.fraud_rings[273].ring_id, "RING_274");
    for ring in &report.fraud_rings {
        assert!((0.0..=100.0).contains(&ring.risk_score));
        assert!((3..=5).contains(&ring.member_accounts.len()));
    }
    for entry in &report.suspicious_accounts {
        assert_eq!(entry.suspicion_score, 100.0);
    }
}

#[test]
fn test_back_and_forth_is_not_a_ring() {
    let txs = vec![tx("A", "B", 500.0, 0), tx("B", "A", 500.0, 10)];
    let report = FraudAnalyzer::new().analyze(&txs);
    assert!(report.fraud_rings.is_empty());
}

#[test]
fn test_single_transfer_flow_metrics() {
    let report = FraudAnalyzer::new().analyze(&[tx("A", "B", 100.0, 0)]);

    let a = report.flow_metrics["A"];
    assert_eq!(a.incoming_total, 0.0);
    assert_eq!(a.outgoing_total, 100.0);
    assert_eq!(a.net_flow, -100.0);
    assert_eq!(a.transaction_count, 1);

    let b = report.flow_metrics["B"];
    assert_eq!(b.incoming_total, 100.0);
    assert_eq!(b.net_flow, 100.0);
    assert_eq!(b.transaction_count, 1);

    assert!(report.suspicious_accounts.is_empty());
    assert_eq!(report.graph_edges.len(), 1);
}

#[test]
fn test_velocity_spread_over_200_hours() {
    let burst: Vec<Transaction> = (0..4)
        .map(|i| tx("S", &format!("T{}", i), 100.0, i * 3))
        .collect();
    let spread: Vec<Transaction> = (0..4)
        .map(|i| tx("S", &format!("T{}", i), 100.0, i * 4000))
        .collect();

    let analyzer = FraudAnalyzer::new();
    assert!(analyzer.analyze(&burst).account("S").is_some());
    assert!(analyzer.analyze(&spread).account("S").is_none());
}

#[test]
fn test_idempotent() {
    let analyzer = FraudAnalyzer::new();
    let batch = mixed_batch();

    let first = analyzer.analyze(&batch);
    let second = analyzer.analyze(&batch);

    assert_eq!(first.suspicious_accounts, second.suspicious_accounts);
    assert_eq!(first.fraud_rings, second.fraud_rings);
    assert_eq!(first.graph_edges, second.graph_edges);
    assert_eq!(first.flow_metrics, second.flow_metrics);
}

#[test]
fn test_empty_batch() {
    let report = FraudAnalyzer::new().analyze(&[]);

    assert!(report.suspicious_accounts.is_empty());
    assert!(report.fraud_rings.is_empty());
    assert!(report.graph_edges.is_empty());
    assert!(report.flow_metrics.is_empty());
    assert_eq!(report.summary.total_accounts_analyzed, 0);
}

#[test]
fn test_custom_thresholds() {
    let config = DetectionConfig::builder()
        .fan_threshold(3)
        .build()
        .expect("valid config");
    let txs = vec![
        tx("A", "HUB", 10.0, 0),
        tx("B", "HUB", 10.0, 1),
        tx("C", "HUB", 10.0, 2),
    ];

    let report = FraudAnalyzer::with_config(config).analyze(&txs);
    let hub = report.account("HUB").expect("HUB flagged");
    assert!(hub.detected_patterns.contains(&PatternTag::FanIn));

    assert!(FraudAnalyzer::new().analyze(&txs).account("HUB").is_none());
}

#[test]
fn test_report_json_shape() {
    let report = FraudAnalyzer::new().analyze(&mixed_batch());
    let json = serde_json::to_value(&report).expect("serialize report");

    let entry = &json["suspicious_accounts"][0];
    assert!(entry["account_id"].is_string());
    assert!(entry["suspicion_score"].is_number());
    assert!(entry["detected_patterns"][0].is_string());
    assert!(entry["ring_id"].is_string());

    let ring = &json["fraud_rings"][0];
    assert_eq!(ring["ring_id"], "RING_001");
    assert_eq!(ring["pattern_type"], "cycle");
    assert_eq!(ring["member_accounts"].as_array().map(Vec::len), Some(3));

    assert!(json["graph_edges"][0]["source"].is_string());
    assert!(json["flow_metrics"]["HUB"]["incoming_total"].is_number());
    assert_eq!(json["summary"]["fraud_rings_detected"], 1);
    assert!(json["summary"]["processing_time_seconds"].is_number());

    let parsed: AnalysisReport = serde_json::from_value(json).expect("deserialize report");
    assert_eq!(parsed.suspicious_accounts, report.suspicious_accounts);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_execute_parallel_matches_sequential() {
    let sequential = FraudAnalyzer::new()
        .execute(AnalysisRequest::new(mixed_batch()))
        .await
        .expect("sequential execute");

    let config = DetectionConfig::builder()
        .parallel(true)
        .build()
        .expect("valid config");
    let parallel = FraudAnalyzer::with_config(config)
        .execute(AnalysisRequest::new(mixed_batch()))
        .await
        .expect("parallel execute");

    assert_eq!(parallel.suspicious_accounts, sequential.suspicious_accounts);
    assert_eq!(parallel.fraud_rings, sequential.fraud_rings);
    assert_eq!(parallel.flow_metrics, sequential.flow_metrics);
    assert_eq!(parallel.summary.total_accounts_analyzed, 25);
}

#[tokio::test]
async fn test_execute_rejects_empty_account_id() {
    let result = FraudAnalyzer::new()
        .execute(AnalysisRequest::new(vec![tx("", "B", 1.0, 0)]))
        .await;

    let err = result.expect_err("empty sender must be rejected");
    assert!(matches!(err, FraudError::ValidationError(_)));
}

#[test]
fn test_analysis_under_domain_logging() {
    let logging = LogConfig::default()
        .with_level(LogLevel::Warn)
        .with_domain_level(Domain::PatternDetection, LogLevel::Debug)
        .with_domain_level(Domain::Pipeline, LogLevel::Info);
    assert_eq!(
        logging.filter_directives(),
        "warn,fraudnet_detect=debug,fraudnet=info"
    );
    logging.init().expect("install subscriber");

    let report = FraudAnalyzer::new().analyze(&mixed_batch());
    assert_eq!(report.fraud_rings.len(), 1);
}

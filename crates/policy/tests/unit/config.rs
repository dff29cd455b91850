//! # Configuration Tests
//!
//! Tests for configuration structures, deserialization, defaults, and the
//! derived values (catalog, depth tiers, bandwidth ceiling).

use rstest::rstest;
use sandbox_prefetch::config::*;

#[test]
fn test_config_default() {
    let config = SandboxConfig::default();
    assert_eq!(config.line_bytes, 64);
    assert_eq!(config.filter.bits, 8192);
    assert_eq!(config.filter.hashes, 3);
}

#[test]
fn test_eval_config_defaults() {
    let eval = EvalConfig::default();
    assert_eq!(eval.period, 256);
    assert_eq!(eval.stream_window, 4);
    assert_eq!(eval.max_offset, 16);
    assert_eq!(eval.active_slots, 16);
    assert_eq!(eval.evict_per_round, 4);
    assert_eq!(eval.cutoff_low, 256);
    assert_eq!(eval.cutoff_med, 512);
    assert_eq!(eval.cutoff_high, 768);
}

#[test]
fn test_issue_config_defaults() {
    let issue = IssueConfig::default();
    assert_eq!(issue.min_prefetches, 2);
    assert_eq!(issue.max_prefetches, 8);
}

#[test]
fn test_empty_json_yields_defaults() {
    let config: SandboxConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config.line_bytes, 64);
    assert_eq!(config.filter.bits, 8192);
    assert_eq!(config.eval.period, 256);
    assert_eq!(config.issue.max_prefetches, 8);
}

#[test]
fn test_partial_json_overrides() {
    let json = r#"{
        "line_bytes": 128,
        "filter": { "bits": 4096 },
        "eval": { "period": 128, "cutoff_high": 400 },
        "issue": { "min_prefetches": 1 }
    }"#;

    let config: SandboxConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.line_bytes, 128);
    assert_eq!(config.filter.bits, 4096);
    assert_eq!(config.filter.hashes, 3);
    assert_eq!(config.eval.period, 128);
    assert_eq!(config.eval.cutoff_high, 400);
    assert_eq!(config.eval.cutoff_low, 256);
    assert_eq!(config.issue.min_prefetches, 1);
    assert_eq!(config.issue.max_prefetches, 8);
}

// ──────────────────────────────────────────────────────────
// Offset catalog
// ──────────────────────────────────────────────────────────

/// The catalog alternates sign with ascending magnitude and excludes zero.
#[test]
fn test_catalog_sequence() {
    let catalog = EvalConfig::default().catalog();

    assert_eq!(catalog.len(), 32);
    assert_eq!(&catalog[..6], &[1, -1, 2, -2, 3, -3]);
    assert_eq!(&catalog[30..], &[16, -16]);
    assert!(catalog.iter().all(|&offset| offset != 0));

    let mut deduped = catalog.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), 32, "catalog offsets must be distinct");
}

// ──────────────────────────────────────────────────────────
// Depth tiers
// ──────────────────────────────────────────────────────────

/// Cutoff comparisons are strict: a score exactly at a cutoff stays in the
/// lower tier.
#[rstest]
#[case(0, 0)]
#[case(100, 0)]
#[case(256, 0)]
#[case(257, 1)]
#[case(512, 1)]
#[case(513, 2)]
#[case(768, 2)]
#[case(769, 3)]
#[case(1024, 3)]
fn test_depth_tiers(#[case] score: u32, #[case] expected: u8) {
    let eval = EvalConfig::default();
    assert_eq!(eval.depth_for_score(score), expected);
}

// ──────────────────────────────────────────────────────────
// Bandwidth ceiling
// ──────────────────────────────────────────────────────────

/// `clamp(2, 8, 2048 / max(1, traffic))` at the reference parameters.
#[rstest]
#[case(0, 8)]
#[case(1, 8)]
#[case(256, 8)]
#[case(512, 4)]
#[case(1024, 2)]
#[case(2048, 2)]
#[case(u32::MAX, 2)]
fn test_bandwidth_ceiling(#[case] traffic: u32, #[case] expected: u32) {
    let config = SandboxConfig::default();
    assert_eq!(config.bandwidth_ceiling(traffic), expected);
}

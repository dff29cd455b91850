//! Issue Throttle Tests.
//!
//! Verifies the per-access bandwidth ceiling: its per-rollover recomputation,
//! the hard cap on requests emitted per access, the issuance priority order
//! under the cap, and the fill flags on every delivered request.

use crate::common::mocks::sink::{MockIssuePort, RecordingSink};
use crate::common::{LINE, default_policy, read_access, run_ascending};
use sandbox_prefetch::{AccessEvent, AccessKind, CachePrefetcher};

// ══════════════════════════════════════════════════════════
// 1. Ceiling recomputation
// ══════════════════════════════════════════════════════════

/// A full-read period recomputes the ceiling from its traffic:
/// 8 * 256 / 256 = 8 at the reference parameters.
#[test]
fn full_read_period_keeps_ceiling_at_cap() {
    let mut policy = default_policy();
    run_ascending(&mut policy, 0, 256);
    assert_eq!(policy.allowed_max_prefetches(), 8);
}

/// A period of unclassified traffic counts as zero reads and writes; the
/// division-by-zero guard applies and the clamp holds the ceiling at the cap.
#[test]
fn unclassified_traffic_clamps_at_cap() {
    let mut policy = default_policy();
    let mut sink = RecordingSink::new();

    for i in 0..256_u64 {
        let event = AccessEvent {
            addr: i * LINE,
            pc: 0,
            cache_hit: false,
            kind: AccessKind::Other,
            metadata: 0,
        };
        let _ = policy.on_access(event, &mut sink);
    }

    assert_eq!(policy.stats().periods, 1);
    assert_eq!(policy.stats().reads, 0);
    assert_eq!(policy.stats().writes, 0);
    assert_eq!(policy.allowed_max_prefetches(), 8);
}

// ══════════════════════════════════════════════════════════
// 2. Per-access cap and priority order
// ══════════════════════════════════════════════════════════

/// Warms the policy until +1, +2, and +3 hold depth 3 (9 authorized requests
/// per access against a ceiling of 8).
fn warmed_policy() -> sandbox_prefetch::SandboxPrefetcher {
    let mut policy = default_policy();
    // Five periods evaluate +1, -1, +2, -2, +3 in slate order.
    run_ascending(&mut policy, 0, 5 * 256);

    for offset in [1_i64, 2, 3] {
        assert_eq!(
            policy
                .pool()
                .candidate_by_offset(offset)
                .unwrap()
                .authorized_depth,
            3
        );
    }
    policy
}

/// The issuer stops at the ceiling mid-candidate and skips the rest: shorter
/// strides are serviced first, and +3 only gets 2 of its 3 requests.
#[test]
fn ceiling_caps_requests_per_access() {
    let mut policy = warmed_policy();
    assert_eq!(policy.allowed_max_prefetches(), 8);

    let addr = 5 * 256 * LINE;
    let mut sink = RecordingSink::new();
    let _ = policy.on_access(read_access(addr), &mut sink);

    let expected: Vec<u64> = vec![
        // +1, depth 3
        addr + LINE,
        addr + 2 * LINE,
        addr + 3 * LINE,
        // +2, depth 3
        addr + 2 * LINE,
        addr + 4 * LINE,
        addr + 6 * LINE,
        // +3, cut off at the ceiling after 2 of 3
        addr + 3 * LINE,
        addr + 6 * LINE,
    ];
    assert_eq!(sink.targets(), expected);
}

/// Requests beyond the ceiling are counted as throttled, not silently lost.
#[test]
fn throttled_requests_are_accounted() {
    let mut policy = warmed_policy();
    let before = policy.stats().prefetches_throttled;

    let mut sink = RecordingSink::new();
    let _ = policy.on_access(read_access(5 * 256 * LINE), &mut sink);

    assert_eq!(sink.requests.len(), 8);
    assert_eq!(policy.stats().prefetches_throttled, before + 1);
}

// ══════════════════════════════════════════════════════════
// 3. Fill flags
// ══════════════════════════════════════════════════════════

/// Every request fills the requesting level and never the last-level cache.
#[test]
fn requests_fill_this_level_only() {
    let mut policy = default_policy();
    // One period: only +1 is proven, issuing 3 requests per access.
    run_ascending(&mut policy, 0, 256);

    let mut port = MockIssuePort::new();
    let _ = port
        .expect_issue()
        .withf(|_target, &fill_this_level, &fill_lower_level| fill_this_level && !fill_lower_level)
        .times(3)
        .returning(|_, _, _| ());

    let _ = policy.on_access(read_access(256 * LINE), &mut port);
}

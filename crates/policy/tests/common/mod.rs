//! Shared test infrastructure: drivers and mocks.


use sandbox_prefetch::{
    AccessEvent, AccessKind, CachePrefetcher, SandboxConfig, SandboxPrefetcher,
};
use tracing_subscriber::EnvFilter;

use self::mocks::sink::RecordingSink;

/// Cache line size of the reference configuration.
pub const LINE: u64 = 64;

/// Initializes test logging; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds a policy with the reference configuration.
pub fn default_policy() -> SandboxPrefetcher {
    init_tracing();
    SandboxPrefetcher::new(SandboxConfig::default()).expect("reference configuration is valid")
}

/// Builds a demand-read access event with zeroed metadata.
pub fn read_access(addr: u64) -> AccessEvent {
    AccessEvent {
        addr,
        pc: 0,
        cache_hit: false,
        kind: AccessKind::Read,
        metadata: 0,
    }
}

/// Drives `count` demand reads of an ascending stride-1 line stream starting
/// at `start`, discarding issued prefetches.
pub fn run_ascending(policy: &mut SandboxPrefetcher, start: u64, count: u64) {
    let mut sink = RecordingSink::new();
    for i in 0..count {
        let _ = policy.on_access(read_access(start + i * LINE), &mut sink);
    }
}

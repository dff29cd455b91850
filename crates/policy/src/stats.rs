//! Policy statistics collection.
//!
//! This module tracks cumulative metrics for the sandbox policy. It provides:
//! 1. **Traffic:** Accesses observed, split into reads and writes.
//! 2. **Evaluation:** Stride-probe hits, completed periods, completed rounds.
//! 3. **Issue:** Prefetches issued and prefetches suppressed by the ceiling.

/// Cumulative policy statistics.
///
/// Counters never reset during a run; [`initialize`](crate::CachePrefetcher::initialize)
/// returns them to zero along with the rest of the policy state.
#[derive(Clone, Debug, Default)]
pub struct PolicyStats {
    /// Total access events observed.
    pub accesses: u64,
    /// Access events classified as demand reads.
    pub reads: u64,
    /// Access events classified as demand writes.
    pub writes: u64,

    /// Stride probes performed across all evaluation periods.
    pub probes: u64,
    /// Positive stride-probe results across all evaluation periods.
    pub probe_hits: u64,
    /// Evaluation periods completed.
    pub periods: u64,
    /// Rotation rounds completed.
    pub rounds: u64,

    /// Prefetch requests delivered to the host.
    pub prefetches_issued: u64,
    /// Authorized requests suppressed by the bandwidth ceiling.
    pub prefetches_throttled: u64,
}

impl PolicyStats {
    /// Average prefetch requests issued per observed access.
    pub fn prefetches_per_access(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.prefetches_issued as f64 / self.accesses as f64
        }
    }

    /// Fraction of stride probes that hit the membership filter.
    pub fn probe_hit_rate(&self) -> f64 {
        if self.probes == 0 {
            0.0
        } else {
            self.probe_hits as f64 / self.probes as f64
        }
    }
}

//! Host Interface.
//!
//! The policy is an in-process decision module: the host simulator drives it
//! through [`CachePrefetcher`] and supplies the primitive that actually
//! delivers prefetch requests through [`PrefetchIssue`]. Keeping both sides as
//! plain traits decouples the core from any particular host ABI — the host
//! holds a `dyn CachePrefetcher` (or the concrete type) and hands a
//! `&mut dyn PrefetchIssue` into every access call.

use crate::common::AccessKind;

/// One cache access observed by the host.
#[derive(Clone, Copy, Debug)]
pub struct AccessEvent {
    /// Accessed address.
    pub addr: u64,
    /// Program counter of the triggering instruction (unused by the core).
    pub pc: u64,
    /// Whether the access hit in the host's cache (unused by the core).
    pub cache_hit: bool,
    /// Read/write classification feeding the bandwidth estimator.
    pub kind: AccessKind,
    /// Opaque host metadata, passed through unchanged.
    pub metadata: u32,
}

/// One cache fill reported by the host.
#[derive(Clone, Copy, Debug)]
pub struct FillEvent {
    /// Filled address.
    pub addr: u64,
    /// Cache set the line landed in.
    pub set: usize,
    /// Cache way the line landed in.
    pub way: usize,
    /// Whether the fill was triggered by a prefetch.
    pub was_prefetch: bool,
    /// Address of the evicted line, if any.
    pub evicted_addr: u64,
    /// Opaque host metadata, passed through unchanged.
    pub metadata: u32,
}

/// Outbound prefetch-issue primitive provided by the host.
pub trait PrefetchIssue {
    /// Delivers one speculative fetch request.
    ///
    /// # Arguments
    ///
    /// * `target` - Address to prefetch.
    /// * `fill_this_level` - Install the line at the requesting cache level.
    /// * `fill_lower_level` - Install the line in the lower (larger) level.
    fn issue(&mut self, target: u64, fill_this_level: bool, fill_lower_level: bool);
}

/// Inbound contract implemented by a prefetching policy.
///
/// The host invokes the hooks single-threaded and in strict call order, once
/// per access event and once per fill event; no call suspends or blocks.
pub trait CachePrefetcher: Send + Sync {
    /// Resets the policy to its freshly-constructed state.
    fn initialize(&mut self);

    /// Observes one access, updates evaluation state, and issues prefetches.
    ///
    /// # Arguments
    ///
    /// * `event` - The access observed by the host.
    /// * `issue` - The host's prefetch-issue primitive; invoked once per
    ///   emitted request.
    ///
    /// # Returns
    ///
    /// The event's metadata, unchanged.
    fn on_access(&mut self, event: AccessEvent, issue: &mut dyn PrefetchIssue) -> u32;

    /// Observes one fill.
    ///
    /// # Returns
    ///
    /// The event's metadata, unchanged.
    fn on_fill(&mut self, event: FillEvent) -> u32;
}

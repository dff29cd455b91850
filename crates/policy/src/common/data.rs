//! Access Classification.
//!
//! This module defines the classification of cache accesses as seen by the
//! policy. The classification is used for the following:
//! 1. **Bandwidth Estimation:** Counting reads and writes per evaluation
//!    period to derive the prefetch-issue ceiling.
//! 2. **Statistics Tracking:** Categorizing observed traffic.

/// Classification of a cache access event.
///
/// Only the read/write distinction feeds the bandwidth estimator; anything
/// else the host reports (translations, evictions, prefetch fills) is
/// classified as [`Other`](Self::Other) and counts toward neither.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    /// Demand load access.
    Read,

    /// Demand store access.
    Write,

    /// Any access the host does not classify as a demand read or write.
    Other,
}

//! Error definitions.
//!
//! The policy has exactly one failure surface: constructing a membership
//! filter with a zero bit count. Every steady-state operation (access
//! handling, filter probes, candidate rotation) is total over its valid input
//! range and cannot fail at runtime.

use thiserror::Error;

/// Configuration errors raised at construction time.
///
/// A zero-sized filter cannot answer membership queries, so construction is
/// refused rather than degrading to a filter that reports every probe as a
/// hit.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The membership filter was configured with `bit_count == 0`.
    #[error("membership filter bit count must be nonzero")]
    ZeroFilterBits,
}

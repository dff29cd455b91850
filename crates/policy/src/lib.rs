//! Sandbox stride-prefetching policy library.
//!
//! This crate implements a bandwidth-aware sandbox prefetcher as an in-process
//! decision module for cache simulators, with the following:
//! 1. **Membership Filter:** A constant-space Bloom filter approximating
//!    "was this address previously predicted?".
//! 2. **Candidate Pool:** A fixed catalog of stride offsets (±1..±16 lines),
//!    tracked in an arena with an active evaluation slate and an issuance
//!    priority ordering.
//! 3. **Evaluator:** A rotating state machine that scores one candidate per
//!    256-access period and retires the worst performers every round.
//! 4. **Issuer:** Per-access emission of bounded lookahead prefetches under a
//!    traffic-derived bandwidth ceiling.
//! 5. **Host Interface:** Plain traits decoupling the policy from any
//!    particular simulator ABI, plus cumulative statistics.

/// Common types (access classification, configuration errors).
pub mod common;
/// Policy configuration (defaults, filter/evaluation/issue parameters).
pub mod config;
/// Probabilistic membership filter backing the evaluation sandbox.
pub mod filter;
/// Host-facing traits and event types.
pub mod host;
/// Candidate arena, active slate, and issuance ordering.
pub mod pool;
/// The sandbox prefetcher itself (evaluator state machine and issuer).
pub mod sandbox;
/// Cumulative policy statistics.
pub mod stats;

/// Access classification consumed by the bandwidth estimator.
pub use crate::common::AccessKind;
/// The single construction-time error kind.
pub use crate::common::ConfigError;
/// Root configuration type; use `SandboxConfig::default()` or deserialize from JSON.
pub use crate::config::SandboxConfig;
/// Inbound host contract (`initialize` / `on_access` / `on_fill`).
pub use crate::host::CachePrefetcher;
/// Outbound prefetch-issue primitive provided by the host.
pub use crate::host::PrefetchIssue;
/// Host event types.
pub use crate::host::{AccessEvent, FillEvent};
/// Main policy type; construct with `SandboxPrefetcher::new`.
pub use crate::sandbox::SandboxPrefetcher;

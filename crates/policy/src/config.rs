//! Configuration system for the sandbox prefetching policy.
//!
//! This module defines all configuration structures used to parameterize the
//! policy. It provides:
//! 1. **Defaults:** Baseline constants matching the reference configuration
//!    (8192-bit filter, 256-access periods, ±16-line catalog).
//! 2. **Structures:** Hierarchical config for the membership filter, the
//!    evaluation state machine, and the issue throttle.
//! 3. **Derived Values:** The offset catalog, the score-to-depth tier mapping,
//!    and the bandwidth-ceiling formula.
//!
//! Configuration is supplied via JSON from the host or use
//! `SandboxConfig::default()` for the reference parameters.

use serde::Deserialize;

/// Default configuration constants for the policy.
///
/// These values define the reference configuration when not explicitly
/// overridden by the host.
mod defaults {
    /// Membership filter size in bits (8192 = 1 KiB of state).
    ///
    /// Sized so the expected population of one evaluation period (≤ 256
    /// insertions) keeps the false-positive rate low.
    pub const FILTER_BITS: usize = 8192;

    /// Number of independent hash functions per filter key.
    pub const FILTER_HASHES: usize = 3;

    /// Cache line size in bytes, multiplying all offset and lag arithmetic.
    pub const LINE_BYTES: u64 = 64;

    /// Length of one evaluation period in accesses.
    pub const EVAL_PERIOD: u32 = 256;

    /// Number of stride lags probed per access (lags `0..STREAM_WINDOW`).
    ///
    /// Probing the current address against lags 0..4 of the offset under test
    /// reconstructs detection of a stride stream: the access is consistent
    /// with having been predicted up to three steps ago.
    pub const STREAM_WINDOW: u32 = 4;

    /// Largest stride magnitude in the candidate catalog (±1..±16 lines).
    pub const MAX_OFFSET: i64 = 16;

    /// Number of candidates under rotation at any time.
    pub const ACTIVE_SLOTS: usize = 16;

    /// Number of worst-performing candidates retired each round.
    pub const EVICT_PER_ROUND: usize = 4;

    /// Score above which a candidate earns depth 1.
    pub const CUTOFF_LOW: u32 = 256;

    /// Score above which a candidate earns depth 2.
    pub const CUTOFF_MED: u32 = 512;

    /// Score above which a candidate earns depth 3.
    pub const CUTOFF_HIGH: u32 = 768;

    /// Floor of the per-access prefetch ceiling (guarantees forward progress).
    pub const MIN_PREFETCHES: u32 = 2;

    /// Cap of the per-access prefetch ceiling (~8 prefetches per access).
    pub const MAX_PREFETCHES: u32 = 8;
}

/// Root configuration structure containing all policy settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use sandbox_prefetch::config::SandboxConfig;
///
/// let config = SandboxConfig::default();
/// assert_eq!(config.line_bytes, 64);
/// assert_eq!(config.filter.bits, 8192);
/// ```
///
/// Deserializing from JSON, with omitted fields falling back to defaults:
///
/// ```
/// use sandbox_prefetch::config::SandboxConfig;
///
/// let json = r#"{
///     "line_bytes": 128,
///     "filter": { "bits": 16384, "hashes": 4 },
///     "eval": { "period": 512 },
///     "issue": { "max_prefetches": 4 }
/// }"#;
///
/// let config: SandboxConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.line_bytes, 128);
/// assert_eq!(config.filter.hashes, 4);
/// assert_eq!(config.eval.period, 512);
/// assert_eq!(config.eval.active_slots, 16);
/// assert_eq!(config.issue.max_prefetches, 4);
/// assert_eq!(config.issue.min_prefetches, 2);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxConfig {
    /// Cache line size in bytes
    #[serde(default = "SandboxConfig::default_line_bytes")]
    pub line_bytes: u64,

    /// Membership filter sizing
    #[serde(default)]
    pub filter: FilterConfig,

    /// Evaluation state machine parameters
    #[serde(default)]
    pub eval: EvalConfig,

    /// Issue throttle parameters
    #[serde(default)]
    pub issue: IssueConfig,
}

impl SandboxConfig {
    /// Returns the default cache line size in bytes.
    fn default_line_bytes() -> u64 {
        defaults::LINE_BYTES
    }

    /// Computes the per-access prefetch ceiling for one period's traffic.
    ///
    /// The ceiling targets roughly `max_prefetches` requests per access,
    /// scaled down when the period's read/write traffic implies less slack,
    /// and floored at `min_prefetches` to guarantee forward progress:
    /// `clamp(min, max, max * period / max(1, traffic))`.
    ///
    /// # Arguments
    ///
    /// * `traffic` - Demand reads plus writes observed in the period.
    ///
    /// # Returns
    ///
    /// The maximum number of prefetch requests the issuer may emit per access.
    pub fn bandwidth_ceiling(&self, traffic: u32) -> u32 {
        let budget = (self.issue.max_prefetches * self.eval.period) / traffic.max(1);
        budget
            .max(self.issue.min_prefetches)
            .min(self.issue.max_prefetches)
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            line_bytes: defaults::LINE_BYTES,
            filter: FilterConfig::default(),
            eval: EvalConfig::default(),
            issue: IssueConfig::default(),
        }
    }
}

/// Membership filter sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Filter size in bits
    #[serde(default = "FilterConfig::default_bits")]
    pub bits: usize,

    /// Number of hash functions
    #[serde(default = "FilterConfig::default_hashes")]
    pub hashes: usize,
}

impl FilterConfig {
    /// Returns the default filter size in bits.
    fn default_bits() -> usize {
        defaults::FILTER_BITS
    }

    /// Returns the default number of hash functions.
    fn default_hashes() -> usize {
        defaults::FILTER_HASHES
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            bits: defaults::FILTER_BITS,
            hashes: defaults::FILTER_HASHES,
        }
    }
}

/// Evaluation state machine parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    /// Evaluation period length in accesses
    #[serde(default = "EvalConfig::default_period")]
    pub period: u32,

    /// Stride lags probed per access
    #[serde(default = "EvalConfig::default_stream_window")]
    pub stream_window: u32,

    /// Largest catalog stride magnitude in cache lines
    #[serde(default = "EvalConfig::default_max_offset")]
    pub max_offset: i64,

    /// Candidates under rotation at any time
    #[serde(default = "EvalConfig::default_active_slots")]
    pub active_slots: usize,

    /// Candidates retired per round
    #[serde(default = "EvalConfig::default_evict_per_round")]
    pub evict_per_round: usize,

    /// Score cutoff for authorized depth 1
    #[serde(default = "EvalConfig::default_cutoff_low")]
    pub cutoff_low: u32,

    /// Score cutoff for authorized depth 2
    #[serde(default = "EvalConfig::default_cutoff_med")]
    pub cutoff_med: u32,

    /// Score cutoff for authorized depth 3
    #[serde(default = "EvalConfig::default_cutoff_high")]
    pub cutoff_high: u32,
}

impl EvalConfig {
    /// Returns the default evaluation period length.
    fn default_period() -> u32 {
        defaults::EVAL_PERIOD
    }

    /// Returns the default number of stride lags probed per access.
    fn default_stream_window() -> u32 {
        defaults::STREAM_WINDOW
    }

    /// Returns the default largest catalog stride magnitude.
    fn default_max_offset() -> i64 {
        defaults::MAX_OFFSET
    }

    /// Returns the default number of active evaluation slots.
    fn default_active_slots() -> usize {
        defaults::ACTIVE_SLOTS
    }

    /// Returns the default number of candidates retired per round.
    fn default_evict_per_round() -> usize {
        defaults::EVICT_PER_ROUND
    }

    /// Returns the default depth-1 score cutoff.
    fn default_cutoff_low() -> u32 {
        defaults::CUTOFF_LOW
    }

    /// Returns the default depth-2 score cutoff.
    fn default_cutoff_med() -> u32 {
        defaults::CUTOFF_MED
    }

    /// Returns the default depth-3 score cutoff.
    fn default_cutoff_high() -> u32 {
        defaults::CUTOFF_HIGH
    }

    /// Generates the candidate offset catalog.
    ///
    /// Offsets alternate sign with ascending magnitude:
    /// `+1, -1, +2, -2, ..., +max_offset, -max_offset`. Catalog order doubles
    /// as the initial activation order and as the tie-break when selecting
    /// dormant candidates for rotation.
    pub fn catalog(&self) -> Vec<i64> {
        let mut offsets = Vec::with_capacity(2 * self.max_offset.unsigned_abs() as usize);
        for magnitude in 1..=self.max_offset {
            offsets.push(magnitude);
            offsets.push(-magnitude);
        }
        offsets
    }

    /// Maps an evaluation score to an authorized prefetch depth.
    ///
    /// Comparisons are strict: a score exactly at a cutoff stays in the lower
    /// tier.
    ///
    /// # Arguments
    ///
    /// * `score` - Probe hits accumulated over one evaluation period.
    ///
    /// # Returns
    ///
    /// The number of lookahead prefetches (0-3) the candidate may issue per
    /// access.
    pub fn depth_for_score(&self, score: u32) -> u8 {
        if score > self.cutoff_high {
            3
        } else if score > self.cutoff_med {
            2
        } else if score > self.cutoff_low {
            1
        } else {
            0
        }
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            period: defaults::EVAL_PERIOD,
            stream_window: defaults::STREAM_WINDOW,
            max_offset: defaults::MAX_OFFSET,
            active_slots: defaults::ACTIVE_SLOTS,
            evict_per_round: defaults::EVICT_PER_ROUND,
            cutoff_low: defaults::CUTOFF_LOW,
            cutoff_med: defaults::CUTOFF_MED,
            cutoff_high: defaults::CUTOFF_HIGH,
        }
    }
}

/// Issue throttle parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueConfig {
    /// Floor of the per-access prefetch ceiling
    #[serde(default = "IssueConfig::default_min_prefetches")]
    pub min_prefetches: u32,

    /// Cap of the per-access prefetch ceiling
    #[serde(default = "IssueConfig::default_max_prefetches")]
    pub max_prefetches: u32,
}

impl IssueConfig {
    /// Returns the default ceiling floor.
    fn default_min_prefetches() -> u32 {
        defaults::MIN_PREFETCHES
    }

    /// Returns the default ceiling cap.
    fn default_max_prefetches() -> u32 {
        defaults::MAX_PREFETCHES
    }
}

impl Default for IssueConfig {
    fn default() -> Self {
        Self {
            min_prefetches: defaults::MIN_PREFETCHES,
            max_prefetches: defaults::MAX_PREFETCHES,
        }
    }
}

//! Sandbox Prefetcher.
//!
//! The policy cannot know a priori which stride offset matches the running
//! program's access pattern, so it continuously samples candidates from a
//! bounded catalog inside a "sandbox": while a candidate is under evaluation,
//! the address it *would have* prefetched is recorded in the membership filter
//! instead of being fetched, and each later access is probed against the
//! record to score the candidate's accuracy. The machine works in three
//! nested cadences:
//! 1. **Per access:** probe the filter at lags `0..4` of the offset under
//!    test, record the synthetic prefetch, then let proven candidates issue
//!    real requests under the bandwidth ceiling.
//! 2. **Per period (256 accesses):** finalize the evaluated candidate's score
//!    and authorized depth, recompute the ceiling from observed traffic, and
//!    advance to the next active slot.
//! 3. **Per round (16 periods):** retire the 4 worst-scoring active
//!    candidates and rotate in the 4 dormant candidates that have waited
//!    longest, so every offset eventually gets a turn.
//!
//! Per-access cost is O(1) probes plus an O(16) walk of the active slate,
//! independent of catalog size.

use tracing::{debug, trace};

use crate::common::{AccessKind, ConfigError};
use crate::config::SandboxConfig;
use crate::filter::BloomFilter;
use crate::host::{AccessEvent, CachePrefetcher, FillEvent, PrefetchIssue};
use crate::pool::CandidatePool;
use crate::stats::PolicyStats;

/// Sandbox prefetcher state.
///
/// Owns the membership filter and the candidate pool exclusively; the host
/// drives it single-threaded through [`CachePrefetcher`].
#[derive(Debug)]
pub struct SandboxPrefetcher {
    config: SandboxConfig,
    /// Sandbox for the candidate currently under evaluation.
    filter: BloomFilter,
    pool: CandidatePool,

    /// Active slot under evaluation.
    candidate_idx: usize,
    /// Offset of the candidate under evaluation, in cache lines.
    eval_offset: i64,
    /// Accesses observed in the current period.
    eval_accesses: u32,
    /// Probe hits accumulated in the current period.
    eval_hits: u32,
    /// Demand reads observed in the current period.
    reads: u32,
    /// Demand writes observed in the current period.
    writes: u32,
    /// Completed rotation rounds.
    eval_round: u64,

    /// Per-access issue ceiling, recomputed at every period rollover.
    allowed_max_prefetches: u32,

    stats: PolicyStats,
}

impl SandboxPrefetcher {
    /// Creates a new sandbox prefetcher.
    ///
    /// # Arguments
    ///
    /// * `config` - Policy parameters; `SandboxConfig::default()` gives the
    ///   reference configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroFilterBits`] if the filter is configured
    /// with a zero bit count.
    pub fn new(config: SandboxConfig) -> Result<Self, ConfigError> {
        let filter = BloomFilter::new(config.filter.bits, config.filter.hashes)?;
        let pool = CandidatePool::new(&config.eval.catalog(), config.eval.active_slots);

        let mut policy = Self {
            allowed_max_prefetches: config.issue.max_prefetches,
            eval_offset: 0,
            config,
            filter,
            pool,
            candidate_idx: 0,
            eval_accesses: 0,
            eval_hits: 0,
            reads: 0,
            writes: 0,
            eval_round: 0,
            stats: PolicyStats::default(),
        };
        policy.eval_offset = policy.current_offset();

        debug!(
            filter_bits = policy.config.filter.bits,
            candidates = policy.pool.len(),
            active = policy.pool.active_slots().len(),
            "sandbox prefetcher constructed"
        );
        Ok(policy)
    }

    /// Returns the policy configuration.
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Returns the candidate pool (active slate, issue order, candidates).
    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    /// Returns cumulative statistics.
    pub fn stats(&self) -> &PolicyStats {
        &self.stats
    }

    /// Returns the offset currently under evaluation, in cache lines.
    pub fn eval_offset(&self) -> i64 {
        self.eval_offset
    }

    /// Returns the number of accesses observed in the current period.
    pub fn eval_accesses(&self) -> u32 {
        self.eval_accesses
    }

    /// Returns the number of completed rotation rounds.
    pub fn eval_round(&self) -> u64 {
        self.eval_round
    }

    /// Returns the current per-access issue ceiling.
    pub fn allowed_max_prefetches(&self) -> u32 {
        self.allowed_max_prefetches
    }

    /// Offset of the candidate in the slot currently under evaluation.
    fn current_offset(&self) -> i64 {
        self.pool
            .active_slots()
            .get(self.candidate_idx)
            .map_or(0, |&id| self.pool.get(id).offset)
    }

    /// Finalizes the current evaluation period and advances the rotation.
    fn next_candidate(&mut self) {
        // The filter only ever reflects one candidate's hypothesis.
        self.filter.clear();

        let evaluated = self.pool.active_slots().get(self.candidate_idx).copied();
        if let Some(id) = evaluated {
            let score = self.eval_hits;
            let depth = self.config.eval.depth_for_score(score);
            let round = self.eval_round;

            let candidate = self.pool.get_mut(id);
            candidate.score = score;
            candidate.authorized_depth = depth;
            candidate.last_considered_round = round;
            trace!(
                offset = candidate.offset,
                score, depth, "evaluation period complete"
            );
        }

        self.allowed_max_prefetches = self.config.bandwidth_ceiling(self.reads + self.writes);

        self.stats.periods += 1;
        self.eval_accesses = 0;
        self.eval_hits = 0;
        self.reads = 0;
        self.writes = 0;

        self.candidate_idx += 1;
        if self.candidate_idx >= self.pool.active_slots().len() {
            self.cycle_candidates();
            self.candidate_idx = 0;
        }
        self.eval_offset = self.current_offset();
    }

    /// Begins a new round: retires the worst performers, rotates in the
    /// longest-waiting dormant candidates, and rebuilds the issue ordering.
    fn cycle_candidates(&mut self) {
        self.eval_round += 1;
        self.pool.cycle(self.config.eval.evict_per_round);
        self.stats.rounds += 1;
        debug!(round = self.eval_round, "candidate rotation complete");
    }

    /// Walks the proven candidates in issuance priority order and emits
    /// bounded prefetch requests up to the bandwidth ceiling.
    fn issue_prefetches(&mut self, addr: u64, issue: &mut dyn PrefetchIssue) {
        let line = self.config.line_bytes as i64;

        let authorized: u32 = self
            .pool
            .issue_order()
            .iter()
            .map(|&id| u32::from(self.pool.get(id).authorized_depth))
            .sum();
        if authorized == 0 {
            return;
        }

        let mut issued = 0_u32;
        'slots: for &id in self.pool.issue_order() {
            let candidate = self.pool.get(id);
            if candidate.authorized_depth == 0 {
                continue;
            }

            let step = candidate.offset.wrapping_mul(line);
            for j in 1..=i64::from(candidate.authorized_depth) {
                if issued >= self.allowed_max_prefetches {
                    break 'slots;
                }

                let target = addr.wrapping_add(j.wrapping_mul(step) as u64);
                // Fill this level, never the last-level cache.
                issue.issue(target, true, false);
                issued += 1;
            }
        }

        self.stats.prefetches_issued += u64::from(issued);
        self.stats.prefetches_throttled += u64::from(authorized - issued);
    }
}

impl CachePrefetcher for SandboxPrefetcher {
    /// Resets the policy to its freshly-constructed state.
    ///
    /// Clears the filter, re-activates the first 16 catalog candidates,
    /// zeroes all counters and statistics, and restores the initial issue
    /// ceiling.
    fn initialize(&mut self) {
        self.filter.clear();
        self.pool.reset(self.config.eval.active_slots);

        self.candidate_idx = 0;
        self.eval_accesses = 0;
        self.eval_hits = 0;
        self.reads = 0;
        self.writes = 0;
        self.eval_round = 0;
        self.allowed_max_prefetches = self.config.issue.max_prefetches;
        self.stats = PolicyStats::default();
        self.eval_offset = self.current_offset();

        debug!("sandbox prefetcher initialized");
    }

    /// Drives one iteration of the evaluator and the issuer.
    fn on_access(&mut self, event: AccessEvent, issue: &mut dyn PrefetchIssue) -> u32 {
        let step = self.eval_offset.wrapping_mul(self.config.line_bytes as i64);

        // A stride-d stream is detected by checking that the current address
        // is consistent with having been predicted 0..4 steps ago.
        for lag in 0..self.config.eval.stream_window {
            let probe = event.addr.wrapping_sub(i64::from(lag).wrapping_mul(step) as u64);
            if self.filter.possibly_contains(probe) {
                self.eval_hits += 1;
                self.stats.probe_hits += 1;
            }
        }
        self.stats.probes += u64::from(self.config.eval.stream_window);

        // Record the prefetch this candidate would have issued.
        self.filter.insert(event.addr.wrapping_add(step as u64));

        self.eval_accesses += 1;
        self.stats.accesses += 1;
        match event.kind {
            AccessKind::Read => {
                self.reads += 1;
                self.stats.reads += 1;
            }
            AccessKind::Write => {
                self.writes += 1;
                self.stats.writes += 1;
            }
            AccessKind::Other => {}
        }

        if self.eval_accesses >= self.config.eval.period {
            self.next_candidate();
        }

        self.issue_prefetches(event.addr, issue);

        event.metadata
    }

    /// No core state is touched; exists to satisfy the host contract.
    fn on_fill(&mut self, event: FillEvent) -> u32 {
        event.metadata
    }
}

//! Candidate Pool.
//!
//! The pool owns one [`Candidate`] per catalog offset, created at
//! initialization and never destroyed; only their mutable fields change over a
//! run. Entries live in an arena addressed by stable [`CandidateId`] handles,
//! with two derived index collections:
//! 1. **Active slate:** the 16 candidates currently under rotation, in
//!    evaluation order. The remaining candidates are dormant, retaining their
//!    last-known score and round until rotated back in.
//! 2. **Issue order:** the active candidates sorted ascending by offset
//!    magnitude (ties prefer the positive offset), recomputed whenever the
//!    active set changes. Short strides are serviced first because they are
//!    statistically more likely to be correct.

/// Stable handle into the candidate arena.
pub type CandidateId = usize;

/// One tracked stride offset.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// Cache-line stride distance this candidate predicts (nonzero, ±1..±16).
    pub offset: i64,
    /// Probe hits accumulated during the candidate's last evaluation period.
    pub score: u32,
    /// Lookahead prefetches (0-3) this candidate may issue per access.
    pub authorized_depth: u8,
    /// Round counter value when the candidate was last under evaluation.
    pub last_considered_round: u64,
    /// Whether the candidate occupies one of the evaluation slots.
    pub is_active: bool,
}

/// Candidate arena plus the active slate and issuance ordering.
#[derive(Clone, Debug)]
pub struct CandidatePool {
    entries: Vec<Candidate>,
    active: Vec<CandidateId>,
    issue_order: Vec<CandidateId>,
}

impl CandidatePool {
    /// Creates a pool over the given offset catalog.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Offset per candidate, in activation order.
    /// * `active_slots` - Number of candidates activated up front (clamped to
    ///   the catalog length).
    pub fn new(catalog: &[i64], active_slots: usize) -> Self {
        let entries = catalog
            .iter()
            .map(|&offset| Candidate {
                offset,
                score: 0,
                authorized_depth: 0,
                last_considered_round: 0,
                is_active: false,
            })
            .collect();

        let mut pool = Self {
            entries,
            active: Vec::new(),
            issue_order: Vec::new(),
        };
        pool.reset(active_slots);
        pool
    }

    /// Restores the freshly-constructed state.
    ///
    /// Zeroes every candidate's mutable fields and re-activates the first
    /// `active_slots` catalog entries in catalog order.
    pub fn reset(&mut self, active_slots: usize) {
        for entry in &mut self.entries {
            entry.score = 0;
            entry.authorized_depth = 0;
            entry.last_considered_round = 0;
            entry.is_active = false;
        }

        self.active = (0..active_slots.min(self.entries.len())).collect();
        for &id in &self.active {
            self.entries[id].is_active = true;
        }
        self.recompute_issue_order();
    }

    /// Returns the number of candidates in the arena.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the arena holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the candidate behind a handle.
    pub fn get(&self, id: CandidateId) -> &Candidate {
        &self.entries[id]
    }

    /// Returns the candidate behind a handle, mutably.
    pub fn get_mut(&mut self, id: CandidateId) -> &mut Candidate {
        &mut self.entries[id]
    }

    /// Returns the active slate in evaluation order.
    pub fn active_slots(&self) -> &[CandidateId] {
        &self.active
    }

    /// Returns the active candidates in issuance priority order.
    pub fn issue_order(&self) -> &[CandidateId] {
        &self.issue_order
    }

    /// Looks up a candidate by its offset.
    pub fn candidate_by_offset(&self, offset: i64) -> Option<&Candidate> {
        self.entries.iter().find(|entry| entry.offset == offset)
    }

    /// Retires the worst performers and rotates dormant candidates in.
    ///
    /// Ranks the active slate by descending score (stable: equal scores keep
    /// slate order, so later slots fall into the evicted tail) and replaces
    /// the bottom `evict_count` with the dormant candidates that have waited
    /// longest since their last evaluation, ties broken by catalog order.
    /// Newly activated candidates start with score and authorized depth zero,
    /// so they cannot issue prefetches until evaluated at least once.
    pub fn cycle(&mut self, evict_count: usize) {
        let entries = &self.entries;
        self.active
            .sort_by(|&a, &b| entries[b].score.cmp(&entries[a].score));

        let mut dormant: Vec<CandidateId> = (0..self.entries.len())
            .filter(|&id| !self.entries[id].is_active)
            .collect();
        dormant.sort_by_key(|&id| (self.entries[id].last_considered_round, id));

        let evict = evict_count.min(self.active.len()).min(dormant.len());
        let tail_start = self.active.len() - evict;

        for (i, &incoming) in dormant.iter().take(evict).enumerate() {
            let slot = tail_start + i;
            let outgoing = self.active[slot];
            self.entries[outgoing].is_active = false;

            let entry = &mut self.entries[incoming];
            entry.is_active = true;
            entry.score = 0;
            entry.authorized_depth = 0;
            self.active[slot] = incoming;
        }

        self.recompute_issue_order();
    }

    /// Rebuilds the issuance ordering from the current active slate.
    fn recompute_issue_order(&mut self) {
        self.issue_order = self.active.clone();
        let entries = &self.entries;
        self.issue_order.sort_by_key(|&id| {
            let offset = entries[id].offset;
            (offset.unsigned_abs(), u8::from(offset < 0))
        });
    }
}

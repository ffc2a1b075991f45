//! Matching run statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

use super::strategy::Strategy;

/// Statistics collected during a matching run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    /// Source entities examined.
    pub sources_seen: u32,

    /// Source entities that received a target.
    pub matched: u32,

    /// Source entities no strategy could place.
    pub unmatched: u32,

    /// Repeated source names skipped because they were already mapped.
    pub duplicates_skipped: u32,

    /// Accepted matches per strategy, indexed by `Strategy::index`.
    pub by_strategy: [u32; 5],
}

impl MatchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Count an accepted match.
    pub fn record_match(&mut self, strategy: Strategy) {
        self.matched += 1;
        self.by_strategy[strategy.index()] += 1;
    }

    /// Matches produced by one strategy.
    #[must_use]
    pub fn count_for(&self, strategy: Strategy) -> u32 {
        self.by_strategy[strategy.index()]
    }

    /// Fraction of examined sources that were matched.
    #[must_use]
    pub fn match_rate(&self) -> f64 {
        if self.sources_seen == 0 {
            0.0
        } else {
            self.matched as f64 / self.sources_seen as f64
        }
    }
}

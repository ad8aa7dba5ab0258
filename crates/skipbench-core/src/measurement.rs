//! Per-run measurements returned by the engine.

use serde::Serialize;

/// Operation counters of a single engine run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BenchCounters {
    pub successful_adds: u32,
    pub failed_adds: u32,
    pub successful_removes: u32,
    pub failed_removes: u32,
    pub successful_contains: u32,
    pub failed_contains: u32,
}

impl BenchCounters {
    /// Total operations attempted during the run.
    pub fn total(&self) -> u64 {
        [
            self.successful_adds,
            self.failed_adds,
            self.successful_removes,
            self.failed_removes,
            self.successful_contains,
            self.failed_contains,
        ]
        .into_iter()
        .map(u64::from)
        .sum()
    }
}

/// Result of one engine invocation.
///
/// Plain data copied out of the engine's result block; the block itself is
/// released as soon as the copy is made.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchResult {
    /// Time the engine reports for the run, in seconds.
    pub elapsed_secs: f64,
    pub counters: BenchCounters,
}

impl BenchResult {
    pub fn new(elapsed_secs: f64, counters: BenchCounters) -> Self {
        Self {
            elapsed_secs,
            counters,
        }
    }

    /// Shorthand for [`BenchCounters::total`].
    pub fn total_operations(&self) -> u64 {
        self.counters.total()
    }
}

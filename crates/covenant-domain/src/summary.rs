//! Run summary - the counters a pipeline run finishes with

use std::time::Duration;

/// Final accounting for one pipeline run
///
/// Created by the orchestrator, finalized at run end, never mutated after.
/// A non-100% success rate is expected and normal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Documents found under the prefix with a recognized extension
    pub candidates: usize,

    /// Candidates skipped because their location was already ingested
    pub skipped: usize,

    /// Documents submitted to the extraction worker pool
    pub attempted: usize,

    /// Documents that extracted, validated, and were accepted by the sink
    pub succeeded: usize,

    /// Documents whose extraction or validation failed
    pub failed: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// A summary with zero counts (the empty-candidate terminal state)
    pub fn empty(candidates: usize, skipped: usize, elapsed: Duration) -> Self {
        Self {
            candidates,
            skipped,
            attempted: 0,
            succeeded: 0,
            failed: 0,
            elapsed,
        }
    }

    /// Fraction of attempted documents that succeeded, in [0, 1]
    ///
    /// Returns 1.0 for a run that attempted nothing.
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            1.0
        } else {
            self.succeeded as f64 / self.attempted as f64
        }
    }
}

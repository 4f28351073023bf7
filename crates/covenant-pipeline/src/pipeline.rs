//! Pipeline orchestrator
//!
//! Wires enumerator, dedup filter, worker pool, and batch sink into one
//! run. The drain loop over the completion channel is the sole mutator of
//! the batch buffer, so append-and-flush-if-full is naturally atomic.

use crate::config::PipelineConfig;
use crate::dedup;
use crate::error::PipelineError;
use crate::sink::BatchSink;
use crate::source;
use crate::types::Outcome;
use crate::worker::WorkerPool;
use covenant_domain::traits::{ExtractionService, ObjectStore, RecordStore};
use covenant_domain::RunSummary;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The extraction-and-ingestion pipeline
///
/// Collaborators are explicit constructor arguments; there is no process
/// level client state, so every piece can be substituted in tests.
pub struct Pipeline<O, E, S>
where
    O: ObjectStore,
    E: ExtractionService + 'static,
    S: RecordStore,
{
    objects: O,
    records: S,
    pool: WorkerPool<E>,
    config: PipelineConfig,
}

impl<O, E, S> Pipeline<O, E, S>
where
    O: ObjectStore,
    E: ExtractionService + 'static,
    S: RecordStore,
{
    /// Create a pipeline, validating the configuration up front
    pub fn new(
        objects: O,
        service: E,
        records: S,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        let pool = WorkerPool::new(service, config.concurrency, config.extraction_timeout());

        Ok(Self {
            objects,
            records,
            pool,
            config,
        })
    }

    /// Run the pipeline over every document under `prefix`
    ///
    /// Per-document failures never abort the run; only enumeration errors
    /// do. On Ctrl-C the run stops draining, flushes the accumulated
    /// partial batch, and returns the summary so far.
    pub async fn run(&self, prefix: &str) -> Result<RunSummary, PipelineError> {
        let started = Instant::now();
        info!(
            "Starting run over prefix '{}' (concurrency {}, batch size {})",
            prefix, self.config.concurrency, self.config.batch_size
        );

        let candidates = source::list_candidates(&self.objects, prefix).await?;
        let total_candidates = candidates.len();

        let pending =
            dedup::filter_candidates(&self.records, candidates, self.config.reprocess_all).await;
        let skipped = total_candidates - pending.len();

        if pending.is_empty() {
            info!("Nothing to process");
            return Ok(RunSummary::empty(total_candidates, skipped, started.elapsed()));
        }

        let attempted = pending.len();
        let mut completions = self.pool.spawn(pending);
        let mut sink = BatchSink::new(&self.records, self.config.batch_size);

        let mut succeeded = 0;
        let mut failed = 0;
        let mut completed = 0;

        loop {
            tokio::select! {
                outcome = completions.recv() => {
                    match outcome {
                        Some(Outcome::Success(record)) => {
                            succeeded += 1;
                            sink.accept(record).await;
                        }
                        Some(Outcome::Failure { location, reason }) => {
                            failed += 1;
                            debug!("Recorded failure for {}: {}", location, reason);
                        }
                        None => break,
                    }
                    completed += 1;
                    debug!("Progress: {}/{}", completed, attempted);
                }
                _ = tokio::signal::ctrl_c() => {
                    warn!(
                        "Shutdown signal received after {}/{} documents, flushing partial batch",
                        completed, attempted
                    );
                    break;
                }
            }
        }

        sink.flush().await;
        let stats = sink.stats();

        let summary = RunSummary {
            candidates: total_candidates,
            skipped,
            attempted,
            succeeded,
            failed,
            elapsed: started.elapsed(),
        };

        info!(
            "Run complete: {}/{} succeeded, {} failed, {} records written in {} flushes ({:?})",
            summary.succeeded,
            summary.attempted,
            summary.failed,
            stats.written,
            stats.flushes,
            summary.elapsed
        );
        if stats.row_failures > 0 || stats.write_failures > 0 {
            warn!(
                "{} rows rejected, {} records lost to failed inserts",
                stats.row_failures, stats.write_failures
            );
        }

        Ok(summary)
    }
}

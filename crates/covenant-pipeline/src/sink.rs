//! Batch sink
//!
//! Accumulates validated records and flushes fixed-size batches to the
//! structured store. Row-level errors and failed insert calls are counted
//! and logged, never fatal; failed rows are not resubmitted.

use covenant_domain::traits::RecordStore;
use covenant_domain::Record;
use tracing::{info, warn};

/// Counters accumulated across all flushes of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Number of insert calls attempted (including failed ones)
    pub flushes: usize,

    /// Records the store accepted
    pub written: usize,

    /// Rows the store rejected individually
    pub row_failures: usize,

    /// Records lost to insert calls that failed entirely
    pub write_failures: usize,
}

/// Accumulates records and flushes them in batches
pub struct BatchSink<'a, S>
where
    S: RecordStore,
{
    store: &'a S,
    batch_size: usize,
    buffer: Vec<Record>,
    schema_checked: bool,
    stats: SinkStats,
}

impl<'a, S> BatchSink<'a, S>
where
    S: RecordStore,
{
    /// Create a sink flushing to `store` every `batch_size` records
    pub fn new(store: &'a S, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
            buffer: Vec::new(),
            schema_checked: false,
            stats: SinkStats::default(),
        }
    }

    /// Accept one record, flushing automatically when the batch fills
    pub async fn accept(&mut self, record: Record) {
        self.buffer.push(record);
        if self.buffer.len() >= self.batch_size {
            self.flush().await;
        }
    }

    /// Flush the current batch, if any
    ///
    /// Called explicitly at run end for the final partial batch. The
    /// buffer clears whether or not the insert succeeds; failed rows are
    /// never resubmitted.
    pub async fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        // Create-if-absent is a one-time precondition; a failure here just
        // means the insert will report the real problem
        if !self.schema_checked {
            if let Err(e) = self.store.ensure_schema().await {
                warn!("Could not ensure target schema: {}", e);
            }
            self.schema_checked = true;
        }

        let batch = std::mem::take(&mut self.buffer);
        let size = batch.len();
        self.stats.flushes += 1;

        match self.store.insert_records(&batch).await {
            Ok(row_errors) => {
                for error in &row_errors {
                    warn!("Row {} rejected by store: {}", error.index, error.message);
                }
                self.stats.written += size - row_errors.len();
                self.stats.row_failures += row_errors.len();
                info!(
                    "Flushed batch of {} records ({} rejected)",
                    size,
                    row_errors.len()
                );
            }
            Err(e) => {
                warn!("Batch insert failed, {} records lost: {}", size, e);
                self.stats.write_failures += size;
            }
        }
    }

    /// Records accumulated but not yet flushed
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> SinkStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_domain::ContractFields;
    use covenant_store::MemoryRecordStore;

    fn record(location: &str) -> Record {
        Record::new(ContractFields::default(), location)
    }

    #[tokio::test]
    async fn test_flushes_automatically_at_batch_size() {
        let store = MemoryRecordStore::new();
        let mut sink = BatchSink::new(&store, 2);

        sink.accept(record("a.pdf")).await;
        assert_eq!(sink.pending(), 1);
        assert!(store.batch_sizes().is_empty());

        sink.accept(record("b.pdf")).await;
        assert_eq!(sink.pending(), 0);
        assert_eq!(store.batch_sizes(), vec![2]);
    }

    #[tokio::test]
    async fn test_final_partial_flush() {
        let store = MemoryRecordStore::new();
        let mut sink = BatchSink::new(&store, 10);

        sink.accept(record("a.pdf")).await;
        sink.accept(record("b.pdf")).await;
        sink.flush().await;

        assert_eq!(store.batch_sizes(), vec![2]);
        assert_eq!(sink.stats().written, 2);
    }

    #[tokio::test]
    async fn test_flush_on_empty_buffer_is_noop() {
        let store = MemoryRecordStore::new();
        let mut sink = BatchSink::new(&store, 10);

        sink.flush().await;
        sink.flush().await;

        assert!(store.batch_sizes().is_empty());
        assert_eq!(store.schema_calls(), 0);
        assert_eq!(sink.stats().flushes, 0);
    }

    #[tokio::test]
    async fn test_schema_checked_once_before_first_flush() {
        let store = MemoryRecordStore::new();
        let mut sink = BatchSink::new(&store, 1);

        sink.accept(record("a.pdf")).await;
        sink.accept(record("b.pdf")).await;
        sink.accept(record("c.pdf")).await;

        assert_eq!(store.schema_calls(), 1);
        assert_eq!(store.batch_sizes(), vec![1, 1, 1]);
    }

    #[tokio::test]
    async fn test_row_errors_counted_not_fatal() {
        let store = MemoryRecordStore::new();
        store.reject_location("bad.pdf");
        let mut sink = BatchSink::new(&store, 2);

        sink.accept(record("good.pdf")).await;
        sink.accept(record("bad.pdf")).await;
        sink.accept(record("also-good.pdf")).await;
        sink.flush().await;

        let stats = sink.stats();
        assert_eq!(stats.written, 2);
        assert_eq!(stats.row_failures, 1);
        assert_eq!(stats.write_failures, 0);
        assert_eq!(store.records().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_insert_counts_batch_and_continues() {
        let store = MemoryRecordStore::new();
        store.fail_insert();
        let mut sink = BatchSink::new(&store, 2);

        sink.accept(record("a.pdf")).await;
        sink.accept(record("b.pdf")).await;

        let stats = sink.stats();
        assert_eq!(stats.write_failures, 2);
        assert_eq!(stats.written, 0);
        // Buffer cleared; failed rows are not resubmitted
        assert_eq!(sink.pending(), 0);
    }
}

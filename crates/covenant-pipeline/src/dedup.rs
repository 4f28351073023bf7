//! Dedup filter
//!
//! Removes candidates whose location already has a row in the structured
//! store. The existence query runs once per pipeline run, not per item.

use covenant_domain::traits::RecordStore;
use covenant_domain::DocumentRef;
use std::collections::HashSet;
use tracing::{info, warn};

/// Drop candidates that have already been ingested
///
/// With `reprocess_all` set, every candidate passes through; the run will
/// append new records with fresh ids for previously ingested documents
/// rather than replacing them. If the existence query fails (e.g. the
/// target table does not exist yet), the already-ingested set is treated
/// as empty so a first run bootstraps cleanly.
pub async fn filter_candidates<S>(
    store: &S,
    candidates: Vec<DocumentRef>,
    reprocess_all: bool,
) -> Vec<DocumentRef>
where
    S: RecordStore,
{
    if reprocess_all {
        warn!(
            "Reprocessing all {} candidates; previously ingested documents will gain duplicate records",
            candidates.len()
        );
        return candidates;
    }

    let ingested: HashSet<String> = match store.ingested_locations().await {
        Ok(locations) => locations.into_iter().collect(),
        Err(e) => {
            warn!("Could not query ingested locations (treating as none): {}", e);
            HashSet::new()
        }
    };

    let total = candidates.len();
    let remaining: Vec<DocumentRef> = candidates
        .into_iter()
        .filter(|c| !ingested.contains(&c.location))
        .collect();

    info!(
        "Skipped {} already ingested documents, {} to process",
        total - remaining.len(),
        remaining.len()
    );

    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_store::MemoryRecordStore;

    fn docs(names: &[&str]) -> Vec<DocumentRef> {
        names.iter().map(|name| DocumentRef::new(*name)).collect()
    }

    #[tokio::test]
    async fn test_filters_ingested_locations() {
        let store = MemoryRecordStore::new();
        store.seed_location("a.pdf");

        let remaining = filter_candidates(&store, docs(&["a.pdf", "b.html"]), false).await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].location, "b.html");
    }

    #[tokio::test]
    async fn test_force_mode_bypasses_filter() {
        let store = MemoryRecordStore::new();
        store.seed_location("a.pdf");

        let remaining = filter_candidates(&store, docs(&["a.pdf", "b.html"]), true).await;
        assert_eq!(remaining.len(), 2);
    }

    #[tokio::test]
    async fn test_query_failure_degrades_to_empty_set() {
        let store = MemoryRecordStore::new();
        store.seed_location("a.pdf");
        store.fail_query();

        // First-run bootstrap: a missing table must not abort the run
        let remaining = filter_candidates(&store, docs(&["a.pdf", "b.html"]), false).await;
        assert_eq!(remaining.len(), 2);
    }

    #[tokio::test]
    async fn test_nothing_ingested_passes_everything() {
        let store = MemoryRecordStore::new();
        let remaining = filter_candidates(&store, docs(&["a.pdf", "b.html"]), false).await;
        assert_eq!(remaining.len(), 2);
    }
}

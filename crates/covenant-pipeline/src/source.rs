//! Source enumeration
//!
//! Lists candidate documents under a prefix and keeps those with a
//! recognized extension. No caching: re-invocation re-lists the store.

use crate::error::PipelineError;
use covenant_domain::traits::ObjectStore;
use covenant_domain::{ContentKind, DocumentRef};
use tracing::info;

/// List candidate documents under `prefix`
///
/// Listing errors are fatal and surface to the caller unmodified; with no
/// documents there is nothing to run.
pub async fn list_candidates<O>(store: &O, prefix: &str) -> Result<Vec<DocumentRef>, PipelineError>
where
    O: ObjectStore,
{
    let objects = store
        .list_objects(prefix)
        .await
        .map_err(|e| PipelineError::Enumeration(e.to_string()))?;

    let total = objects.len();
    let candidates: Vec<DocumentRef> = objects
        .into_iter()
        .filter(|o| ContentKind::from_location(&o.name).is_recognized())
        .map(|o| DocumentRef::new(o.name))
        .collect();

    info!(
        "Found {} candidate documents under '{}' ({} objects listed)",
        candidates.len(),
        prefix,
        total
    );

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_store::MemoryObjectStore;

    #[tokio::test]
    async fn test_keeps_recognized_extensions_only() {
        let store = MemoryObjectStore::with_names(&[
            "2020/a.pdf",
            "2020/b.HTML",
            "2020/c.htm",
            "2020/d.txt",
            "2020/e.docx",
            "2020/f",
        ]);

        let candidates = list_candidates(&store, "2020/").await.unwrap();
        let locations: Vec<&str> = candidates.iter().map(|c| c.location.as_str()).collect();

        assert_eq!(
            locations,
            vec!["2020/a.pdf", "2020/b.HTML", "2020/c.htm", "2020/d.txt"]
        );
    }

    #[tokio::test]
    async fn test_kind_derived_from_name() {
        let store = MemoryObjectStore::with_names(&["x.pdf", "y.html"]);
        let candidates = list_candidates(&store, "").await.unwrap();

        assert_eq!(candidates[0].kind, ContentKind::Pdf);
        assert_eq!(candidates[1].kind, ContentKind::Html);
    }

    #[tokio::test]
    async fn test_listing_is_idempotent() {
        let store = MemoryObjectStore::with_names(&["a.pdf", "b.txt"]);

        let first = list_candidates(&store, "").await.unwrap();
        let second = list_candidates(&store, "").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_listing_error_is_fatal() {
        let store = MemoryObjectStore::new();
        store.fail_listing();

        let result = list_candidates(&store, "").await;
        assert!(matches!(result, Err(PipelineError::Enumeration(_))));
    }

    #[tokio::test]
    async fn test_empty_store_yields_empty_set() {
        let store = MemoryObjectStore::new();
        let candidates = list_candidates(&store, "2020/").await.unwrap();
        assert!(candidates.is_empty());
    }
}

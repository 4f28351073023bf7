//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its three
//! remote collaborators. Infrastructure implementations live in other
//! crates; tests substitute in-memory doubles. All three are network-bound
//! in production, so the interfaces are async.

use crate::{DocumentRef, Record};
use async_trait::async_trait;

/// One object listed from the document store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Opaque object name or URI
    pub name: String,

    /// Object size in bytes
    pub size: u64,
}

/// A row-level problem reported by a bulk insert
///
/// Row errors are values, not failures: a flush that reports some is still
/// a successful call and the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// Index of the offending record within the submitted batch
    pub index: usize,

    /// Store-provided description of the problem
    pub message: String,
}

/// Trait for listing documents in the object store
///
/// Implemented by the infrastructure layer (covenant-store)
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Error type for listing operations
    type Error: std::fmt::Display + Send;

    /// List all objects under the given prefix
    ///
    /// Read-only; the pipeline never opens objects directly. Connectivity
    /// and auth errors surface to the caller unmodified.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectEntry>, Self::Error>;
}

/// Trait for the external extraction service
///
/// Implemented by the infrastructure layer (covenant-llm)
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Error type for extraction calls
    type Error: std::fmt::Display + Send;

    /// Run one extraction: instruction text plus a document reference
    ///
    /// Synchronous from the pipeline's point of view - one document per
    /// call, no batching. The service fetches the document itself using
    /// `document.location` and the MIME tag from `document.kind`.
    async fn generate(
        &self,
        instruction: &str,
        document: &DocumentRef,
    ) -> Result<String, Self::Error>;
}

/// Trait for the structured store that receives validated records
///
/// Implemented by the infrastructure layer (covenant-store)
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Error type for store operations
    type Error: std::fmt::Display + Send;

    /// Create the target table if it does not exist
    ///
    /// Idempotent: "already exists" is success, not an error.
    async fn ensure_schema(&self) -> Result<(), Self::Error>;

    /// Distinct source locations already present in the store
    async fn ingested_locations(&self) -> Result<Vec<String>, Self::Error>;

    /// Bulk-insert a batch of records
    ///
    /// Returns row-level errors for rows the store rejected; an empty
    /// vector means every row was written.
    async fn insert_records(&self, records: &[Record]) -> Result<Vec<RowError>, Self::Error>;
}

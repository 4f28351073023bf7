//! Covenant Store Layer
//!
//! Infrastructure implementations of the two store traits from
//! `covenant-domain`:
//!
//! - `GcsClient`: lists candidate documents from a GCS bucket
//! - `BigQueryClient`: the structured store receiving validated records
//! - `MemoryObjectStore` / `MemoryRecordStore`: deterministic in-memory
//!   doubles for tests and local development
//!
//! Both remote clients authenticate with a caller-supplied bearer token;
//! minting tokens is an operator concern.

#![warn(missing_docs)]

pub mod bigquery;
pub mod gcs;
pub mod memory;

use thiserror::Error;

pub use bigquery::BigQueryClient;
pub use gcs::GcsClient;
pub use memory::{MemoryObjectStore, MemoryRecordStore};

/// Errors that can occur talking to a store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Authentication or authorization failure
    #[error("Auth error: {0}")]
    Auth(String),

    /// Response the client could not interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Query rejected by the store (missing table, bad SQL, ...)
    #[error("Query error: {0}")]
    Query(String),

    /// Generic error
    #[error("Store error: {0}")]
    Other(String),
}

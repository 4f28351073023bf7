//! Covenant Domain Layer
//!
//! This crate contains the core domain model for Covenant: the types that
//! flow through the extraction pipeline and the trait interfaces behind
//! which every external collaborator lives.
//!
//! ## Key Concepts
//!
//! - **DocumentRef**: one unit of work - a document sitting in the object
//!   store, identified by an opaque location
//! - **ContractFields**: the structured schema the extraction service
//!   produces; every field is optional, absence is a valid outcome
//! - **Record**: validated fields plus ingestion metadata (fresh id and
//!   source location), the only thing the structured store ever receives
//! - **RunSummary**: the counters a pipeline run finishes with
//!
//! ## Architecture
//!
//! - Value types and pure logic only
//! - Trait definitions for all external interactions (object store,
//!   extraction service, structured store)
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod record;
pub mod summary;
pub mod traits;

// Re-exports for convenience
pub use document::{ContentKind, DocumentRef};
pub use record::{ContractFields, Record, RecordId};
pub use summary::RunSummary;

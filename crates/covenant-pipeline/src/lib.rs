//! Covenant Pipeline
//!
//! The concurrent extraction-and-ingestion pipeline: enumerate documents in
//! the object store, skip those already ingested, extract structured fields
//! from the rest under bounded concurrency, and batch-insert validated
//! records into the structured store.
//!
//! # Architecture
//!
//! ```text
//! ObjectStore → Enumerator → Dedup → Worker Pool → Batch Sink → RecordStore
//!                                         │
//!                                 ExtractionService
//! ```
//!
//! Data flows strictly left to right. Extraction outcomes arrive on a
//! completion channel in completion order; the orchestrator's drain loop is
//! the only mutator of the batch buffer.
//!
//! # Example Usage
//!
//! ```no_run
//! use covenant_pipeline::{Pipeline, PipelineConfig};
//! use covenant_llm::MockService;
//! use covenant_store::{MemoryObjectStore, MemoryRecordStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let objects = MemoryObjectStore::with_names(&["2020/a.pdf"]);
//! let service = MockService::new("{}");
//! let records = MemoryRecordStore::new();
//!
//! let pipeline = Pipeline::new(objects, service, records, PipelineConfig::default())?;
//! let summary = pipeline.run("2020/").await?;
//!
//! println!("Succeeded: {}/{}", summary.succeeded, summary.attempted);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod dedup;
mod error;
mod parser;
mod pipeline;
mod prompt;
mod sink;
mod source;
mod types;
mod worker;


pub use config::PipelineConfig;
pub use dedup::filter_candidates;
pub use error::PipelineError;
pub use parser::parse_response;
pub use pipeline::Pipeline;
pub use prompt::instruction;
pub use sink::{BatchSink, SinkStats};
pub use source::list_candidates;
pub use types::Outcome;
pub use worker::WorkerPool;

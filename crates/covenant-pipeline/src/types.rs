//! Pipeline-internal types

use covenant_domain::Record;

/// Result of one document's trip through the worker pool
///
/// Failures are values, not panics or aborts: the pool emits exactly one
/// outcome per submitted document regardless of how many fail.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Extraction and validation succeeded
    Success(Record),

    /// Extraction, parsing, or validation failed for this document
    Failure {
        /// Location of the document that failed
        location: String,
        /// What went wrong
        reason: String,
    },
}

//! Bounded-concurrency extraction worker pool
//!
//! One spawned task per document, at most `concurrency` extraction calls
//! in flight at once. Outcomes arrive on the completion channel in
//! completion order; a slow document never blocks faster ones, and one
//! failed document never aborts the pool.

use crate::error::PipelineError;
use crate::parser;
use crate::prompt;
use crate::types::Outcome;
use covenant_domain::traits::ExtractionService;
use covenant_domain::{DocumentRef, Record};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Worker pool driving extraction calls under a concurrency bound
pub struct WorkerPool<E> {
    service: Arc<E>,
    concurrency: usize,
    extraction_timeout: Duration,
}

impl<E> WorkerPool<E>
where
    E: ExtractionService + 'static,
{
    /// Create a pool around an extraction service
    pub fn new(service: E, concurrency: usize, extraction_timeout: Duration) -> Self {
        Self {
            service: Arc::new(service),
            concurrency: concurrency.max(1),
            extraction_timeout,
        }
    }

    /// Submit all documents; exactly one outcome per document arrives on
    /// the returned channel, in completion order
    ///
    /// No retries: a failed attempt is terminal for that document in this
    /// run. Dropping the receiver abandons in-flight work.
    pub fn spawn(&self, documents: Vec<DocumentRef>) -> mpsc::Receiver<Outcome> {
        let (tx, rx) = mpsc::channel(documents.len().max(1));
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        for document in documents {
            let service = Arc::clone(&self.service);
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();
            let extraction_timeout = self.extraction_timeout;

            tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };

                let outcome = extract_one(service.as_ref(), &document, extraction_timeout).await;
                // Receiver may be gone if the run was cancelled
                let _ = tx.send(outcome).await;
            });
        }

        rx
    }
}

/// Run one document through extraction and validation
async fn extract_one<E>(service: &E, document: &DocumentRef, limit: Duration) -> Outcome
where
    E: ExtractionService,
{
    match try_extract(service, document, limit).await {
        Ok(record) => {
            debug!("Extracted {} -> record {}", document.location, record.id);
            Outcome::Success(record)
        }
        Err(e) => {
            warn!("Extraction failed for {}: {}", document.location, e);
            Outcome::Failure {
                location: document.location.clone(),
                reason: e.to_string(),
            }
        }
    }
}

async fn try_extract<E>(
    service: &E,
    document: &DocumentRef,
    limit: Duration,
) -> Result<Record, PipelineError>
where
    E: ExtractionService,
{
    let instruction = prompt::instruction();

    let response = timeout(limit, service.generate(&instruction, document))
        .await
        .map_err(|_| PipelineError::Timeout)?
        .map_err(|e| PipelineError::Extraction(e.to_string()))?;

    let fields = parser::parse_response(&response)?;
    Ok(Record::new(fields, document.location.clone()))
}

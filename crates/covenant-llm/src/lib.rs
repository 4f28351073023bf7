//! Covenant Extraction Service Layer
//!
//! Pluggable clients for the external extraction service: a black box that
//! maps a document reference plus an instruction to structured text.
//!
//! # Providers
//!
//! - `MockService`: deterministic mock for testing
//! - `GeminiClient`: Gemini generateContent API integration
//!
//! # Examples
//!
//! ```
//! use covenant_llm::MockService;
//! use covenant_domain::DocumentRef;
//! use covenant_domain::traits::ExtractionService;
//!
//! # async fn example() {
//! let service = MockService::new("{}");
//! let doc = DocumentRef::new("gs://bucket/a.pdf");
//! let result = service.generate("extract", &doc).await.unwrap();
//! assert_eq!(result, "{}");
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;

use async_trait::async_trait;
use covenant_domain::traits::ExtractionService;
use covenant_domain::DocumentRef;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gemini::GeminiClient;

/// Errors that can occur during extraction service calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Extraction service error: {0}")]
    Other(String),
}

/// Mock extraction service for deterministic testing
///
/// Returns pre-configured responses keyed by document location without
/// making any network calls. The prompt is fixed in this system, so the
/// location is the interesting dimension.
///
/// # Examples
///
/// ```
/// use covenant_llm::MockService;
/// use covenant_domain::DocumentRef;
/// use covenant_domain::traits::ExtractionService;
///
/// # async fn example() {
/// let mut service = MockService::new("{}");
/// service.add_response("gs://b/a.pdf", r#"{"company_name": "Acme"}"#);
/// service.add_error("gs://b/broken.pdf");
///
/// let ok = service.generate("i", &DocumentRef::new("gs://b/a.pdf")).await;
/// assert!(ok.is_ok());
/// let err = service.generate("i", &DocumentRef::new("gs://b/broken.pdf")).await;
/// assert!(err.is_err());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockService {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

/// Sentinel stored in the response map to trigger an error
const ERROR_SENTINEL: &str = "\u{0}ERROR";

impl MockService {
    /// Create a new MockService with a fixed response for all documents
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific response for a given document location
    pub fn add_response(&mut self, location: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(location.into(), response.into());
    }

    /// Configure the service to fail for a specific document location
    pub fn add_error(&mut self, location: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(location.into(), ERROR_SENTINEL.to_string());
    }

    /// Locations this service has been asked to extract, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of times generate was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new("{}")
    }
}

#[async_trait]
impl ExtractionService for MockService {
    type Error = LlmError;

    async fn generate(
        &self,
        _instruction: &str,
        document: &DocumentRef,
    ) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(document.location.clone());

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(&document.location) {
            if response == ERROR_SENTINEL {
                return Err(LlmError::Other("Mock error".to_string()));
            }
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_response() {
        let service = MockService::new("fixed");
        let doc = DocumentRef::new("gs://b/x.txt");
        assert_eq!(service.generate("i", &doc).await.unwrap(), "fixed");
    }

    #[tokio::test]
    async fn test_mock_per_location_responses() {
        let mut service = MockService::default();
        service.add_response("gs://b/a.pdf", "response-a");
        service.add_response("gs://b/b.html", "response-b");

        let a = DocumentRef::new("gs://b/a.pdf");
        let b = DocumentRef::new("gs://b/b.html");
        let other = DocumentRef::new("gs://b/c.txt");

        assert_eq!(service.generate("i", &a).await.unwrap(), "response-a");
        assert_eq!(service.generate("i", &b).await.unwrap(), "response-b");
        assert_eq!(service.generate("i", &other).await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_mock_error_injection() {
        let mut service = MockService::default();
        service.add_error("gs://b/bad.pdf");

        let doc = DocumentRef::new("gs://b/bad.pdf");
        let result = service.generate("i", &doc).await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let service = MockService::default();

        assert_eq!(service.call_count(), 0);
        service
            .generate("i", &DocumentRef::new("gs://b/1.txt"))
            .await
            .unwrap();
        service
            .generate("i", &DocumentRef::new("gs://b/2.txt"))
            .await
            .unwrap();

        assert_eq!(service.call_count(), 2);
        assert_eq!(service.calls(), vec!["gs://b/1.txt", "gs://b/2.txt"]);
    }

    #[tokio::test]
    async fn test_mock_clone_shares_state() {
        let service1 = MockService::new("t");
        let service2 = service1.clone();

        service1
            .generate("i", &DocumentRef::new("gs://b/1.txt"))
            .await
            .unwrap();

        // Both share the same call log through Arc
        assert_eq!(service1.call_count(), 1);
        assert_eq!(service2.call_count(), 1);
    }
}

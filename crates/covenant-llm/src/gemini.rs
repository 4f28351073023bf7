//! Gemini Client Implementation
//!
//! Integration with the Gemini generateContent API. The service fetches
//! each document itself from the object store, so requests carry a file
//! reference (URI plus MIME tag), not the document bytes.
//!
//! # Features
//!
//! - Async HTTP communication with the generateContent endpoint
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use covenant_llm::GeminiClient;
//!
//! let client = GeminiClient::new("https://generativelanguage.googleapis.com", "gemini-2.0-flash")
//!     .with_api_key("key");
//! ```

use crate::LlmError;
use async_trait::async_trait;
use covenant_domain::traits::ExtractionService;
use covenant_domain::DocumentRef;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default generateContent endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default timeout for extraction requests (120 seconds; PDFs are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// System instruction sent with every extraction request
const SYSTEM_INSTRUCTION: &str =
    "You are a contract analysis expert who extracts key entities from contract documents.";

/// Gemini generateContent client
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    FileData {
        #[serde(rename = "fileUri")]
        file_uri: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL
    /// - `model`: model to use (e.g. "gemini-2.0-flash")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create a client against the default endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the API key sent with each request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Run one extraction against the generateContent API
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unavailable, the request is
    /// rate-limited, communication fails after retries, or the response
    /// carries no candidate text.
    pub async fn generate(
        &self,
        instruction: &str,
        document: &DocumentRef,
    ) -> Result<String, LlmError> {
        let mut url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );
        if let Some(key) = &self.api_key {
            url.push_str(&format!("?key={}", key));
        }

        let request_body = GenerateRequest {
            system_instruction: Content {
                parts: vec![Part::Text(SYSTEM_INSTRUCTION.to_string())],
            },
            contents: vec![Content {
                parts: vec![
                    Part::Text(instruction.to_string()),
                    Part::FileData {
                        file_uri: document.location.clone(),
                        mime_type: document.kind.mime_type().to_string(),
                    },
                ],
            }],
        };

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return match response.json::<GenerateResponse>().await {
                            Ok(body) => extract_text(body),
                            Err(e) => Err(LlmError::InvalidResponse(format!(
                                "Failed to parse response: {}",
                                e
                            ))),
                        };
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

fn extract_text(body: GenerateResponse) -> Result<String, LlmError> {
    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("Response carried no candidates".to_string()))?;

    let text: String = candidate
        .content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(LlmError::InvalidResponse(
            "Candidate carried no text".to_string(),
        ));
    }

    Ok(text)
}

#[async_trait]
impl ExtractionService for GeminiClient {
    type Error = LlmError;

    async fn generate(
        &self,
        instruction: &str,
        document: &DocumentRef,
    ) -> Result<String, Self::Error> {
        GeminiClient::generate(self, instruction, document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GeminiClient::new("http://localhost:9000", "gemini-2.0-flash");
        assert_eq!(client.endpoint, "http://localhost:9000");
        assert_eq!(client.model, "gemini-2.0-flash");
        assert_eq!(client.max_retries, DEFAULT_MAX_RETRIES);
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_client_default_endpoint() {
        let client = GeminiClient::default_endpoint(DEFAULT_MODEL);
        assert_eq!(client.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_client_builders() {
        let client = GeminiClient::default_endpoint("gemini-2.0-flash")
            .with_api_key("k")
            .with_max_retries(5);
        assert_eq!(client.api_key.as_deref(), Some("k"));
        assert_eq!(client.max_retries, 5);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = GenerateResponse {
            candidates: vec![Candidate {
                content: CandidateContent {
                    parts: vec![
                        CandidatePart {
                            text: "{\"a\":".to_string(),
                        },
                        CandidatePart {
                            text: " 1}".to_string(),
                        },
                    ],
                },
            }],
        };
        assert_eq!(extract_text(body).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_text_no_candidates() {
        let body = GenerateResponse { candidates: vec![] };
        assert!(matches!(
            extract_text(body),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_error_handling_unreachable_endpoint() {
        // Closed port triggers a communication error after retries
        let client = GeminiClient::new("http://127.0.0.1:1", "gemini-2.0-flash")
            .with_max_retries(1);

        let doc = DocumentRef::new("gs://b/a.pdf");
        let result = client.generate("extract", &doc).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}

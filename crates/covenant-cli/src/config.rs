//! Environment-based runtime configuration.
//!
//! The pipeline is identity-driven: which project, which bucket, which
//! dataset/table. All of that comes from `COVENANT_*` environment
//! variables so the binary itself carries no deployment knowledge.

use crate::error::{CliError, Result};

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cloud project owning the dataset
    pub project: String,

    /// Object store bucket holding the documents
    pub bucket: String,

    /// Default object prefix to enumerate
    pub prefix: String,

    /// Structured store dataset
    pub dataset: String,

    /// Structured store table
    pub table: String,

    /// Extraction model name
    pub model: String,

    /// API key for the extraction service
    pub api_key: Option<String>,

    /// Bearer token for the object and structured stores
    pub access_token: Option<String>,

    /// Object store endpoint override (emulators, tests)
    pub gcs_endpoint: Option<String>,

    /// Structured store endpoint override
    pub bq_endpoint: Option<String>,

    /// Extraction service endpoint override
    pub llm_endpoint: Option<String>,
}

impl Config {
    /// Resolve configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration through an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| CliError::Config(format!("{} is not set", name)))
        };

        Ok(Self {
            project: required("COVENANT_PROJECT")?,
            bucket: required("COVENANT_BUCKET")?,
            prefix: lookup("COVENANT_PREFIX").unwrap_or_default(),
            dataset: lookup("COVENANT_DATASET").unwrap_or_else(|| "contracts_dataset".to_string()),
            table: lookup("COVENANT_TABLE").unwrap_or_else(|| "contracts".to_string()),
            model: lookup("COVENANT_MODEL").unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            api_key: lookup("COVENANT_API_KEY"),
            access_token: lookup("COVENANT_ACCESS_TOKEN"),
            gcs_endpoint: lookup("COVENANT_GCS_ENDPOINT"),
            bq_endpoint: lookup("COVENANT_BQ_ENDPOINT"),
            llm_endpoint: lookup("COVENANT_LLM_ENDPOINT"),
        })
    }
}

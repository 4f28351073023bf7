//! BigQuery structured store client
//!
//! Implements `RecordStore` over the BigQuery REST API: table creation
//! (`tables.insert`), the distinct-location existence query
//! (`jobs.query`), and batched streaming inserts (`tabledata.insertAll`).

use crate::StoreError;
use async_trait::async_trait;
use covenant_domain::traits::{RecordStore, RowError};
use covenant_domain::Record;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Default BigQuery REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Default timeout for store requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// BigQuery client for one dataset/table
pub struct BigQueryClient {
    endpoint: String,
    project: String,
    dataset: String,
    table: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    job_reference: Option<JobReference>,
    #[serde(default)]
    rows: Vec<QueryRow>,
    page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
}

#[derive(Deserialize)]
struct QueryRow {
    #[serde(default)]
    f: Vec<QueryCell>,
}

#[derive(Deserialize)]
struct QueryCell {
    v: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertAllResponse {
    #[serde(default)]
    insert_errors: Vec<InsertError>,
}

#[derive(Deserialize)]
struct InsertError {
    index: usize,
    #[serde(default)]
    errors: Vec<InsertErrorDetail>,
}

#[derive(Deserialize)]
struct InsertErrorDetail {
    #[serde(default)]
    message: String,
}

impl BigQueryClient {
    /// Create a new client for `project.dataset.table`
    pub fn new(
        endpoint: impl Into<String>,
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            project: project.into(),
            dataset: dataset.into(),
            table: table.into(),
            access_token: None,
            client,
        }
    }

    /// Create a client against the public BigQuery endpoint
    pub fn for_table(
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self::new(DEFAULT_ENDPOINT, project, dataset, table)
    }

    /// Set the bearer token sent with each request
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// The table definition for validated contract records
    ///
    /// Only the generated id and the source location are required; every
    /// extracted field is nullable, and the two list fields are repeated.
    fn table_definition(&self) -> Value {
        json!({
            "tableReference": {
                "projectId": self.project,
                "datasetId": self.dataset,
                "tableId": self.table,
            },
            "schema": { "fields": [
                { "name": "contract_id",         "type": "STRING", "mode": "REQUIRED" },
                { "name": "file_path",           "type": "STRING", "mode": "REQUIRED" },
                { "name": "company_name",        "type": "STRING", "mode": "NULLABLE" },
                { "name": "form_type",           "type": "STRING", "mode": "NULLABLE" },
                { "name": "filing_date",         "type": "STRING", "mode": "NULLABLE" },
                { "name": "state_of_incorp",     "type": "STRING", "mode": "NULLABLE" },
                { "name": "contract_category",   "type": "STRING", "mode": "NULLABLE" },
                { "name": "contract_type",       "type": "STRING", "mode": "NULLABLE" },
                { "name": "governing_law_state", "type": "STRING", "mode": "NULLABLE" },
                { "name": "contract_summary",    "type": "STRING", "mode": "NULLABLE" },
                { "name": "numeric_value",       "type": "FLOAT",  "mode": "NULLABLE" },
                { "name": "parties",             "type": "STRING", "mode": "REPEATED" },
                { "name": "clauses",             "type": "STRING", "mode": "REPEATED" },
            ]},
        })
    }

    fn distinct_locations_query(&self) -> String {
        format!(
            "SELECT DISTINCT file_path FROM `{}.{}.{}`",
            self.project, self.dataset, self.table
        )
    }
}

/// Pull the single-column string values out of one query result page
fn page_locations(rows: Vec<QueryRow>) -> Vec<String> {
    rows.into_iter()
        .filter_map(|row| row.f.into_iter().next())
        .filter_map(|cell| match cell.v {
            Some(Value::String(s)) => Some(s),
            _ => None,
        })
        .collect()
}

/// Serialize a record into the row shape insertAll expects
///
/// Absent scalars are omitted rather than sent as nulls; empty strings are
/// dropped from the repeated fields.
fn to_row(record: &Record) -> Value {
    let mut row = serde_json::Map::new();
    row.insert("contract_id".into(), json!(record.id.to_string()));
    row.insert("file_path".into(), json!(record.source_location));

    let f = &record.fields;
    let scalars = [
        ("company_name", &f.company_name),
        ("form_type", &f.form_type),
        ("filing_date", &f.filing_date),
        ("state_of_incorp", &f.state_of_incorp),
        ("contract_category", &f.contract_category),
        ("contract_type", &f.contract_type),
        ("governing_law_state", &f.governing_law_state),
        ("contract_summary", &f.contract_summary),
    ];
    for (name, value) in scalars {
        if let Some(v) = value {
            row.insert(name.into(), json!(v));
        }
    }
    if let Some(v) = f.numeric_value {
        row.insert("numeric_value".into(), json!(v));
    }

    let parties: Vec<&String> = f.parties.iter().filter(|p| !p.is_empty()).collect();
    let clauses: Vec<&String> = f.clauses.iter().filter(|c| !c.is_empty()).collect();
    row.insert("parties".into(), json!(parties));
    row.insert("clauses".into(), json!(clauses));

    Value::Object(row)
}

#[async_trait]
impl RecordStore for BigQueryClient {
    type Error = StoreError;

    /// Create the table if absent; HTTP 409 (already exists) is success
    async fn ensure_schema(&self) -> Result<(), Self::Error> {
        let url = format!(
            "{}/projects/{}/datasets/{}/tables",
            self.endpoint, self.project, self.dataset
        );

        let response = self
            .authorized(self.client.post(&url))
            .json(&self.table_definition())
            .send()
            .await
            .map_err(|e| StoreError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::CONFLICT {
            return Ok(());
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(StoreError::Auth(format!("Table creation denied ({})", status)));
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(StoreError::Communication(format!(
            "HTTP {}: {}",
            status, error_text
        )))
    }

    /// Distinct source locations already present in the table
    ///
    /// Follows `pageToken` across result pages and polls `getQueryResults`
    /// while the job is still running, so a large table never yields a
    /// truncated location set.
    async fn ingested_locations(&self) -> Result<Vec<String>, Self::Error> {
        let url = format!("{}/projects/{}/queries", self.endpoint, self.project);

        let response = self
            .authorized(self.client.post(&url))
            .json(&json!({ "query": self.distinct_locations_query(), "useLegacySql": false }))
            .send()
            .await
            .map_err(|e| StoreError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            // Covers the missing-table case on a first run; the caller
            // treats any query failure as "nothing previously ingested"
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StoreError::Query(format!("HTTP {}: {}", status, error_text)));
        }

        let mut page = response
            .json::<QueryResponse>()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse query result: {}", e)))?;

        let mut locations = page_locations(std::mem::take(&mut page.rows));

        // An incomplete job carries no rows yet; a complete one may still
        // paginate. Both continue through getQueryResults.
        while !page.job_complete || page.page_token.is_some() {
            let job_id = page
                .job_reference
                .as_ref()
                .map(|job| job.job_id.clone())
                .ok_or_else(|| {
                    StoreError::InvalidResponse("Query response missing job reference".to_string())
                })?;

            let url = format!("{}/projects/{}/queries/{}", self.endpoint, self.project, job_id);
            let mut request = self.client.get(&url);
            if let Some(token) = &page.page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = self
                .authorized(request)
                .send()
                .await
                .map_err(|e| StoreError::Communication(format!("Request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(StoreError::Query(format!("HTTP {}: {}", status, error_text)));
            }

            page = response
                .json::<QueryResponse>()
                .await
                .map_err(|e| {
                    StoreError::InvalidResponse(format!("Failed to parse query result: {}", e))
                })?;

            locations.extend(page_locations(std::mem::take(&mut page.rows)));
        }

        Ok(locations)
    }

    /// Stream one batch of records into the table
    async fn insert_records(&self, records: &[Record]) -> Result<Vec<RowError>, Self::Error> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/projects/{}/datasets/{}/tables/{}/insertAll",
            self.endpoint, self.project, self.dataset, self.table
        );

        let rows: Vec<Value> = records
            .iter()
            .map(|record| json!({ "json": to_row(record) }))
            .collect();

        let response = self
            .authorized(self.client.post(&url))
            .json(&json!({ "rows": rows }))
            .send()
            .await
            .map_err(|e| StoreError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StoreError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response
            .json::<InsertAllResponse>()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse insert result: {}", e)))?;

        let row_errors = body
            .insert_errors
            .into_iter()
            .map(|e| RowError {
                index: e.index,
                message: e
                    .errors
                    .into_iter()
                    .map(|d| d.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            })
            .collect();

        Ok(row_errors)
    }
}

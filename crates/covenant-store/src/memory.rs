//! In-memory store doubles
//!
//! Deterministic implementations of both store traits for tests and local
//! development. No network calls; state is shared through `Arc` so clones
//! observe the same store, and failure injection covers the error paths
//! the pipeline must absorb.

use crate::StoreError;
use async_trait::async_trait;
use covenant_domain::traits::{ObjectEntry, ObjectStore, RecordStore, RowError};
use covenant_domain::Record;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// In-memory object store double
///
/// # Examples
///
/// ```
/// use covenant_store::MemoryObjectStore;
/// use covenant_domain::traits::ObjectStore;
///
/// # async fn example() {
/// let store = MemoryObjectStore::with_names(&["2020/a.pdf", "2020/b.html"]);
/// let entries = store.list_objects("2020/").await.unwrap();
/// assert_eq!(entries.len(), 2);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<Mutex<Vec<ObjectEntry>>>,
    fail_listing: Arc<Mutex<bool>>,
}

impl MemoryObjectStore {
    /// Create an empty object store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given object names
    pub fn with_names(names: &[&str]) -> Self {
        let store = Self::new();
        for name in names {
            store.add_object(*name, 0);
        }
        store
    }

    /// Add one object
    pub fn add_object(&self, name: impl Into<String>, size: u64) {
        self.objects.lock().unwrap().push(ObjectEntry {
            name: name.into(),
            size,
        });
    }

    /// Make subsequent listing calls fail
    pub fn fail_listing(&self) {
        *self.fail_listing.lock().unwrap() = true;
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    type Error = StoreError;

    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectEntry>, Self::Error> {
        if *self.fail_listing.lock().unwrap() {
            return Err(StoreError::Communication(
                "object store unreachable".to_string(),
            ));
        }

        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.name.starts_with(prefix) || prefix.is_empty())
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
struct RecordStoreState {
    rows: Vec<Record>,
    /// Size of every insert_records call, in call order
    batch_sizes: Vec<usize>,
    /// Locations treated as already ingested without a backing row
    seeded_locations: Vec<String>,
    schema_calls: usize,
    fail_query: bool,
    fail_insert: bool,
    reject_locations: HashSet<String>,
}

/// In-memory record store double
///
/// Records every flush so tests can assert batch sizing and atomicity;
/// supports seeding already-ingested locations and injecting both query
/// failures (dedup degradation) and row-level insert errors.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    state: Arc<Mutex<RecordStoreState>>,
}

impl MemoryRecordStore {
    /// Create an empty record store
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a location as already ingested
    pub fn seed_location(&self, location: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .seeded_locations
            .push(location.into());
    }

    /// Make subsequent existence queries fail
    pub fn fail_query(&self) {
        self.state.lock().unwrap().fail_query = true;
    }

    /// Make subsequent insert calls fail entirely
    pub fn fail_insert(&self) {
        self.state.lock().unwrap().fail_insert = true;
    }

    /// Report a row-level error for any record from this location
    pub fn reject_location(&self, location: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .reject_locations
            .insert(location.into());
    }

    /// Records written so far (rejected rows excluded)
    pub fn records(&self) -> Vec<Record> {
        self.state.lock().unwrap().rows.clone()
    }

    /// Size of each insert call, in call order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.state.lock().unwrap().batch_sizes.clone()
    }

    /// How many times ensure_schema was invoked
    pub fn schema_calls(&self) -> usize {
        self.state.lock().unwrap().schema_calls
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    type Error = StoreError;

    async fn ensure_schema(&self) -> Result<(), Self::Error> {
        self.state.lock().unwrap().schema_calls += 1;
        Ok(())
    }

    async fn ingested_locations(&self) -> Result<Vec<String>, Self::Error> {
        let state = self.state.lock().unwrap();
        if state.fail_query {
            return Err(StoreError::Query("table does not exist".to_string()));
        }

        let mut locations: Vec<String> = state.seeded_locations.clone();
        locations.extend(state.rows.iter().map(|r| r.source_location.clone()));
        locations.sort();
        locations.dedup();
        Ok(locations)
    }

    async fn insert_records(&self, records: &[Record]) -> Result<Vec<RowError>, Self::Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_insert {
            return Err(StoreError::Communication(
                "record store unreachable".to_string(),
            ));
        }

        state.batch_sizes.push(records.len());

        let mut row_errors = Vec::new();
        for (index, record) in records.iter().enumerate() {
            if state.reject_locations.contains(&record.source_location) {
                row_errors.push(RowError {
                    index,
                    message: format!("row rejected: {}", record.source_location),
                });
            } else {
                state.rows.push(record.clone());
            }
        }

        Ok(row_errors)
    }
}

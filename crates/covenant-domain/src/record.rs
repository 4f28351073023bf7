//! Record module - the validated output for one document

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an ingested record, based on UUIDv4
///
/// A fresh id is generated per successful extraction. It is NOT derived
/// from document content: re-extracting the same document yields a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(uuid::Uuid);

impl RecordId {
    /// Generate a new random RecordId
    ///
    /// # Examples
    ///
    /// ```
    /// use covenant_domain::RecordId;
    ///
    /// let a = RecordId::new();
    /// let b = RecordId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Create a RecordId from a raw UUID value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_uuid(value: uuid::Uuid) -> Self {
        Self(value)
    }

    /// Parse a RecordId from its string form
    ///
    /// # Examples
    ///
    /// ```
    /// use covenant_domain::RecordId;
    ///
    /// let id = RecordId::new();
    /// let parsed = RecordId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid UUID string: {}", e))
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The structured schema produced by extraction
///
/// Every field is optional: a successful extraction with nothing found is
/// a valid outcome, not an error. `parties` and `clauses` are ordered
/// lists and default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractFields {
    /// Company name
    pub company_name: Option<String>,

    /// SEC form type (10-K, 10-Q, 8-K, ...)
    pub form_type: Option<String>,

    /// Filing date, YYYY-MM-DD
    pub filing_date: Option<String>,

    /// Company's state of incorporation
    pub state_of_incorp: Option<String>,

    /// Contract category (Security, Employment, Lease, ...)
    pub contract_category: Option<String>,

    /// Contract type (Restatement, Amendment, Termination, ...)
    pub contract_type: Option<String>,

    /// Governing law state (DE, CA, ...)
    pub governing_law_state: Option<String>,

    /// Overall summary of the contract's purpose
    pub contract_summary: Option<String>,

    /// Dollar value of the contract, when stated
    pub numeric_value: Option<f64>,

    /// Party names involved, in document order
    #[serde(default)]
    pub parties: Vec<String>,

    /// Clause types identified, in document order
    #[serde(default)]
    pub clauses: Vec<String>,
}

/// The validated structured output for one document
///
/// Created exactly once, by the worker pool, immediately after successful
/// validation; immutable thereafter. Owned by the batch sink until flushed.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Freshly generated unique identifier
    pub id: RecordId,

    /// Location of the source document (= DocumentRef.location)
    pub source_location: String,

    /// The extracted, validated fields
    pub fields: ContractFields,
}

impl Record {
    /// Create a record from validated fields, generating a fresh id
    pub fn new(fields: ContractFields, source_location: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            source_location: source_location.into(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_display_and_parse() {
        let id = RecordId::new();
        let id_str = id.to_string();

        // UUID strings are 36 characters (8-4-4-4-12 with hyphens)
        assert_eq!(id_str.len(), 36);

        let parsed = RecordId::from_string(&id_str).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_record_id_invalid_string() {
        assert!(RecordId::from_string("not-a-valid-uuid").is_err());
        assert!(RecordId::from_string("").is_err());
    }

    #[test]
    fn test_fresh_ids_per_record() {
        let a = Record::new(ContractFields::default(), "gs://b/a.pdf");
        let b = Record::new(ContractFields::default(), "gs://b/a.pdf");
        // Same source, distinct identity
        assert_ne!(a.id, b.id);
        assert_eq!(a.source_location, b.source_location);
    }

    #[test]
    fn test_empty_fields_are_valid() {
        let fields = ContractFields::default();
        assert!(fields.company_name.is_none());
        assert!(fields.parties.is_empty());

        let record = Record::new(fields, "gs://b/empty.txt");
        assert_eq!(record.source_location, "gs://b/empty.txt");
    }
}

//! Parse extraction service output into ContractFields

use crate::error::PipelineError;
use covenant_domain::ContractFields;
use serde_json::{Map, Value};

/// Parse a raw extraction response into validated fields
///
/// Field-by-field: a missing or null field is a valid absence, a field of
/// the wrong type is an error naming the offending field. An empty object
/// is a valid (if useless) extraction.
pub fn parse_response(response: &str) -> Result<ContractFields, PipelineError> {
    // The service sometimes wraps JSON in markdown code blocks despite
    // being told not to
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)?;

    let obj = json
        .as_object()
        .ok_or_else(|| PipelineError::InvalidFormat("Expected JSON object".to_string()))?;

    Ok(ContractFields {
        company_name: string_field(obj, "company_name")?,
        form_type: string_field(obj, "form_type")?,
        filing_date: string_field(obj, "filing_date")?,
        state_of_incorp: string_field(obj, "state_of_incorp")?,
        contract_category: string_field(obj, "contract_category")?,
        contract_type: string_field(obj, "contract_type")?,
        governing_law_state: string_field(obj, "governing_law_state")?,
        contract_summary: string_field(obj, "contract_summary")?,
        numeric_value: number_field(obj, "numeric_value")?,
        parties: list_field(obj, "parties")?,
        clauses: list_field(obj, "clauses")?,
    })
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, PipelineError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(PipelineError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and last line (```)
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Optional string field; empty strings normalize to absent
fn string_field(obj: &Map<String, Value>, name: &str) -> Result<Option<String>, PipelineError> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Some(_) => Err(PipelineError::InvalidFormat(format!(
            "Invalid type for '{}'",
            name
        ))),
    }
}

/// Optional numeric field
fn number_field(obj: &Map<String, Value>, name: &str) -> Result<Option<f64>, PipelineError> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(_) => Err(PipelineError::InvalidFormat(format!(
            "Invalid type for '{}'",
            name
        ))),
    }
}

/// String list field; absent means empty, empty entries are dropped
fn list_field(obj: &Map<String, Value>, name: &str) -> Result<Vec<String>, PipelineError> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) if !s.trim().is_empty() => {
                        values.push(s.trim().to_string());
                    }
                    Value::String(_) | Value::Null => {}
                    _ => {
                        return Err(PipelineError::InvalidFormat(format!(
                            "Invalid entry in '{}'",
                            name
                        )))
                    }
                }
            }
            Ok(values)
        }
        Some(_) => Err(PipelineError::InvalidFormat(format!(
            "Invalid type for '{}'",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_object() {
        let response = r#"{
            "company_name": "Acme Corp",
            "form_type": "10-K",
            "filing_date": "2020-03-15",
            "state_of_incorp": "Delaware",
            "contract_category": "Employment",
            "contract_type": "Amendment",
            "governing_law_state": "DE",
            "contract_summary": "Employment agreement amendment",
            "numeric_value": 250000.0,
            "parties": ["Acme Corp", "Jane Smith"],
            "clauses": ["Change of Control"]
        }"#;

        let fields = parse_response(response).unwrap();
        assert_eq!(fields.company_name.as_deref(), Some("Acme Corp"));
        assert_eq!(fields.form_type.as_deref(), Some("10-K"));
        assert_eq!(fields.numeric_value, Some(250000.0));
        assert_eq!(fields.parties, vec!["Acme Corp", "Jane Smith"]);
        assert_eq!(fields.clauses, vec!["Change of Control"]);
    }

    #[test]
    fn test_parse_with_markdown_wrapper() {
        let response = "```json\n{\"company_name\": \"Acme Corp\"}\n```";
        let fields = parse_response(response).unwrap();
        assert_eq!(fields.company_name.as_deref(), Some("Acme Corp"));
    }

    #[test]
    fn test_parse_with_bare_fence() {
        let response = "```\n{\"form_type\": \"8-K\"}\n```";
        let fields = parse_response(response).unwrap();
        assert_eq!(fields.form_type.as_deref(), Some("8-K"));
    }

    #[test]
    fn test_parse_empty_object_is_valid() {
        let fields = parse_response("{}").unwrap();
        assert_eq!(fields, ContractFields::default());
    }

    #[test]
    fn test_parse_nulls_are_valid() {
        let response = r#"{"company_name": null, "numeric_value": null, "parties": null}"#;
        let fields = parse_response(response).unwrap();
        assert!(fields.company_name.is_none());
        assert!(fields.numeric_value.is_none());
        assert!(fields.parties.is_empty());
    }

    #[test]
    fn test_parse_empty_strings_normalize_to_none() {
        let response = r#"{"company_name": "", "form_type": "  "}"#;
        let fields = parse_response(response).unwrap();
        assert!(fields.company_name.is_none());
        assert!(fields.form_type.is_none());
    }

    #[test]
    fn test_parse_integer_numeric_value() {
        let response = r#"{"numeric_value": 500000}"#;
        let fields = parse_response(response).unwrap();
        assert_eq!(fields.numeric_value, Some(500000.0));
    }

    #[test]
    fn test_parse_lists_drop_empty_entries() {
        let response = r#"{"parties": ["Acme", "", null, "Beta"]}"#;
        let fields = parse_response(response).unwrap();
        assert_eq!(fields.parties, vec!["Acme", "Beta"]);
    }

    #[test]
    fn test_parse_wrong_type_names_field() {
        let response = r#"{"company_name": 42}"#;
        let err = parse_response(response).unwrap_err();
        assert!(err.to_string().contains("company_name"));

        let response = r#"{"numeric_value": "a lot"}"#;
        let err = parse_response(response).unwrap_err();
        assert!(err.to_string().contains("numeric_value"));

        let response = r#"{"clauses": [1, 2]}"#;
        let err = parse_response(response).unwrap_err();
        assert!(err.to_string().contains("clauses"));
    }

    #[test]
    fn test_parse_not_json() {
        let err = parse_response("This is not JSON").unwrap_err();
        assert!(matches!(err, PipelineError::JsonParse(_)));
        assert!(err.to_string().starts_with("JSON parse error"));
    }

    #[test]
    fn test_parse_array_top_level() {
        assert!(parse_response(r#"["not", "an", "object"]"#).is_err());
    }

    #[test]
    fn test_extract_json_plain() {
        let json = r#"{"key": "value"}"#;
        assert_eq!(extract_json(json).unwrap(), json);
    }

    #[test]
    fn test_extract_json_from_markdown() {
        let response = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json(response).unwrap().trim(), r#"{"key": "value"}"#);
    }
}

//! Fixed extraction instruction
//!
//! The instruction is the same for every document: a schema description
//! plus extraction rules. The document itself travels by reference, not
//! inline, so there is nothing to template per item.

/// Build the extraction instruction sent with every document
pub fn instruction() -> String {
    format!("{}\n\n{}\n\n{}", ANALYST_ROLE, SCHEMA_DESCRIPTION, EXTRACTION_RULES)
}

const ANALYST_ROLE: &str =
    "You are an expert SEC filing and contract analyst. Extract information from this document.";

const SCHEMA_DESCRIPTION: &str = r#"Return a JSON object with exactly these fields:

{
  "company_name": "Company name - most queried field",
  "form_type": "SEC form type like 10-K, 10-Q, 20-F, 40-F, 6-K, 8-K, DEF 14A, S-4",
  "filing_date": "Filing date in YYYY-MM-DD format",
  "state_of_incorp": "Company's state of incorporation",
  "contract_category": "One of: 'Security', 'Employment', 'Lease', 'Purchase/M&A', 'Service/Supply', 'Shareholder/Governance', 'Other'",
  "contract_type": "Contract type: 'Restatement', 'Amendment', 'Joinder', 'Termination', etc.",
  "governing_law_state": "Governing law state like 'DE', 'CA'",
  "contract_summary": "Overall summary of the contract's purpose and key details",
  "numeric_value": 0.0,
  "parties": ["list of party names involved"],
  "clauses": ["list of clause types like 'Change of Control', 'Auto-Renewal'"]
}"#;

const EXTRACTION_RULES: &str = r#"CRITICAL INSTRUCTIONS:
- Extract ALL available information, even if some fields are null
- For dates, use YYYY-MM-DD format only
- For numeric_value, extract any dollar amounts mentioned
- For parties, include all company/individual names involved
- For clauses, identify key clause types like termination, renewal, change of control, etc.
- If this is an SEC filing containing multiple contracts, focus on the most significant one
- Use null for fields not found or not applicable

Return ONLY valid JSON, no markdown, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_names_every_field() {
        let text = instruction();
        for field in [
            "company_name",
            "form_type",
            "filing_date",
            "state_of_incorp",
            "contract_category",
            "contract_type",
            "governing_law_state",
            "contract_summary",
            "numeric_value",
            "parties",
            "clauses",
        ] {
            assert!(text.contains(field), "instruction missing '{}'", field);
        }
    }

    #[test]
    fn test_instruction_demands_raw_json() {
        let text = instruction();
        assert!(text.contains("ONLY valid JSON"));
        assert!(text.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_instruction_is_stable() {
        // Same instruction for every document, every call
        assert_eq!(instruction(), instruction());
    }
}

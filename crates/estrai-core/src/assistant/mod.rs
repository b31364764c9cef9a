//! Text-to-JSON assistant used for fields the local rules leave empty.
//!
//! The assistant receives a bounded snippet of the document, the document
//! kind and the list of wanted keys, and answers with a JSON object. Its
//! answer is untrusted: only requested keys are read, each coerced to the
//! field's type, and the result is merged below local values.

pub mod mock;
pub mod openai;

use std::future::Future;
use std::pin::Pin;

use serde_json::{Map, Value};

use crate::error::AssistantError;
use crate::extract::rules::amounts::amount_from_json;
use crate::models::kind::{DocumentKind, Field};
use crate::models::record::{ExtractionResult, LegalFormKind, Shareholder, ShareholderKind};

pub use mock::{MockAssistant, MockReply};
pub use openai::OpenAiAssistant;

const SYSTEM_PROMPT: &str = "Estrai in JSON i campi richiesti dal testo (visure, bilanci e \
dichiarazioni fiscali italiane). Non inventare: se un dato non compare nel testo lascia il \
valore predefinito.";

const STATEMENT_HINT: &str = "ATTENZIONE: 'revenue' = Conto Economico voce \"A) 1) Ricavi delle \
vendite e delle prestazioni\". Se sulla riga compaiono piu' esercizi (es. 2024 e 2023) restituisci \
SOLO l'importo dell'esercizio piu' recente. NON usare il 'Totale valore della produzione'.";

/// Trait implemented by text-to-JSON assistants.
///
/// Uses a boxed future so the trait stays object-safe.
pub trait Assistant: Send + Sync {
    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Send the request and return the raw message content.
    fn complete<'a>(
        &'a self,
        request: &'a AssistantRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, AssistantError>> + Send + 'a>>;
}

/// One request to the assistant.
#[derive(Debug, Clone)]
pub struct AssistantRequest {
    pub kind: DocumentKind,
    pub fields: Vec<Field>,
    /// Leading part of the document text.
    pub snippet: String,
}

impl AssistantRequest {
    /// Build a request, keeping at most `max_chars` characters of `text`.
    pub fn new(text: &str, kind: DocumentKind, fields: Vec<Field>, max_chars: usize) -> Self {
        let snippet = match text.char_indices().nth(max_chars) {
            Some((cut, _)) => text[..cut].to_string(),
            None => text.to_string(),
        };
        Self {
            kind,
            fields,
            snippet,
        }
    }

    /// JSON object with every requested key set to its default.
    pub fn template(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.key().to_string(), f.default_value()))
            .collect();
        Value::Object(map)
    }

    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn user_prompt(&self) -> String {
        let hint = match self.kind {
            DocumentKind::FinancialStatement => STATEMENT_HINT,
            _ => "",
        };
        format!(
            "Testo ({}):\n{}\n\"\"\"{}\"\"\"\n\nRitorna SOLO questi campi in JSON esatto: {}",
            self.kind, hint, self.snippet, self.template()
        )
    }

    /// Read the assistant's answer into a partial result.
    ///
    /// Keys that were not requested are ignored; missing or mistyped values
    /// become the field default.
    pub fn parse_reply(&self, content: &str) -> Result<ExtractionResult, AssistantError> {
        let value: Value = serde_json::from_str(content.trim())
            .map_err(|e| AssistantError::MalformedReply(e.to_string()))?;
        let Value::Object(object) = value else {
            return Err(AssistantError::MalformedReply(
                "expected a JSON object".to_string(),
            ));
        };

        let mut result = ExtractionResult::default();
        for field in &self.fields {
            let Some(value) = object.get(field.key()) else {
                continue;
            };
            match field {
                Field::CompanyName => result.company_name = text_from_json(value),
                Field::TaxId => result.tax_id = text_from_json(value),
                Field::LegalFormKind => {
                    result.legal_form_kind = LegalFormKind::from_label(&text_from_json(value))
                }
                Field::ActivityCodes => {
                    result.activity_codes = list_from_json(value)
                        .iter()
                        .map(text_from_json)
                        .filter(|s| !s.is_empty())
                        .collect()
                }
                Field::Shareholders => {
                    result.shareholders = list_from_json(value)
                        .iter()
                        .filter_map(shareholder_from_json)
                        .collect()
                }
                Field::TotalAssets => result.total_assets = amount_from_json(value),
                Field::Revenue => result.revenue = amount_from_json(value),
                Field::EmployeeUnits => result.employee_units = amount_from_json(value),
            }
        }

        Ok(result)
    }
}

fn text_from_json(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn list_from_json(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn shareholder_from_json(value: &Value) -> Option<Shareholder> {
    let name = text_from_json(value.get("name")?);
    let tax_id = value.get("taxId").map(text_from_json).unwrap_or_default();
    if name.is_empty() && tax_id.is_empty() {
        return None;
    }
    Some(Shareholder {
        kind: ShareholderKind::from_tax_id(&tax_id),
        ownership_percent: value
            .get("ownershipPercent")
            .map(amount_from_json)
            .unwrap_or_default(),
        name,
        tax_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn request(fields: Vec<Field>) -> AssistantRequest {
        AssistantRequest::new("testo", DocumentKind::Generic, fields, 100)
    }

    #[test]
    fn test_snippet_truncated_by_characters() {
        let req = AssistantRequest::new("àèìòù", DocumentKind::Generic, vec![], 3);
        assert_eq!(req.snippet, "àèì");
        let req = AssistantRequest::new("abc", DocumentKind::Generic, vec![], 3);
        assert_eq!(req.snippet, "abc");
    }

    #[test]
    fn test_template_has_defaults() {
        let req = request(vec![Field::CompanyName, Field::Revenue, Field::ActivityCodes]);
        assert_eq!(
            req.template(),
            serde_json::json!({"companyName": "", "revenue": 0, "activityCodes": []})
        );
    }

    #[test]
    fn test_statement_prompt_carries_hint() {
        let req = AssistantRequest::new(
            "CONTO ECONOMICO",
            DocumentKind::FinancialStatement,
            vec![Field::TotalAssets],
            100,
        );
        let prompt = req.user_prompt();
        assert!(prompt.contains("financial-statement"));
        assert!(prompt.contains("Totale valore della produzione"));
        assert!(prompt.contains(r#"{"totalAssets":0}"#));
        assert!(!request(vec![]).user_prompt().contains("ATTENZIONE"));
    }

    #[test]
    fn test_parse_reply_reads_only_requested_keys() {
        let req = request(vec![Field::TotalAssets, Field::CompanyName]);
        let result = req
            .parse_reply(
                r#"{"totalAssets": 433230.5, "companyName": "  ACME SRL ", "revenue": 12345}"#,
            )
            .unwrap();
        assert_eq!(result.total_assets, Decimal::new(4332305, 1));
        assert_eq!(result.company_name, "ACME SRL");
        assert_eq!(result.revenue, Decimal::ZERO);
    }

    #[test]
    fn test_parse_reply_coerces_types() {
        let req = request(vec![
            Field::Revenue,
            Field::TaxId,
            Field::Shareholders,
            Field::LegalFormKind,
        ]);
        let result = req
            .parse_reply(
                r#"{"revenue": "1.234.567,89", "taxId": 1234567897,
                    "legalFormKind": "S.p.A.",
                    "shareholders": [{"name": "BETA SRL", "taxId": "00743110157", "ownershipPercent": "40"}, 3]}"#,
            )
            .unwrap();
        assert_eq!(result.revenue, Decimal::new(123456789, 2));
        assert_eq!(result.tax_id, "1234567897");
        assert_eq!(result.legal_form_kind, LegalFormKind::Spa);
        assert_eq!(result.shareholders.len(), 1);
        assert_eq!(result.shareholders[0].kind, ShareholderKind::LegalEntity);
        assert_eq!(result.shareholders[0].ownership_percent, Decimal::from(40));
    }

    #[test]
    fn test_parse_reply_malformed() {
        let req = request(vec![Field::Revenue]);
        assert!(matches!(
            req.parse_reply("not json"),
            Err(AssistantError::MalformedReply(_))
        ));
        assert!(matches!(
            req.parse_reply("[1, 2]"),
            Err(AssistantError::MalformedReply(_))
        ));
    }
}

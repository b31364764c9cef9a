//! Rule-based field extractors for Italian business documents.

pub mod amounts;
pub mod forms;
pub mod patterns;
pub mod registry;
pub mod tax_id;

pub use amounts::{amount_from_json, format_italian_amount, is_plausible_amount, parse_italian_amount};
pub use forms::{extract_form_amount, FormLine};
pub use registry::{
    extract_activity_codes, extract_company_name, extract_employee_units, extract_legal_form,
    RegistryFields, ShareholderExtractor,
};
pub use tax_id::{validate_partita_iva, TaxIdExtractor, TaxIdPreference};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

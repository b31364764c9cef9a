//! Per-kind extraction pipeline: local rules, then the assistant for the
//! fields they left empty.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::assistant::{Assistant, AssistantRequest};
use crate::document::Document;
use crate::error::{EstraiError, Result};
use crate::models::config::EstraiConfig;
use crate::models::kind::{DocumentKind, Field};
use crate::models::record::ExtractionResult;
use crate::pdf::PdfExtractor;

use super::merge::{merge, Resolved};
use super::rules::{
    extract_company_name, extract_form_amount, FieldExtractor, FormLine, RegistryFields,
    TaxIdExtractor, TaxIdPreference,
};
use super::statement::{locate_revenue, locate_total_assets, DEFAULT_WINDOW_LINES};

/// Document field extractor.
pub struct Extractor {
    /// Rank unlabelled tax IDs by check digit.
    validate_tax_id: bool,
    /// Lines searched below a statement label.
    window_lines: usize,
    /// Characters of text sent to the assistant.
    max_snippet_chars: usize,
    /// Visible characters below which a document has no text layer.
    min_text_length: usize,
}

impl Extractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self {
            validate_tax_id: true,
            window_lines: DEFAULT_WINDOW_LINES,
            max_snippet_chars: 18_000,
            min_text_length: 1,
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &EstraiConfig) -> Self {
        Self::new()
            .with_tax_id_validation(config.extraction.validate_tax_id)
            .with_window_lines(config.extraction.window_lines)
            .with_max_snippet_chars(config.assistant.max_snippet_chars)
            .with_min_text_length(config.pdf.min_text_length)
    }

    /// Set tax ID check-digit ranking.
    pub fn with_tax_id_validation(mut self, validate: bool) -> Self {
        self.validate_tax_id = validate;
        self
    }

    /// Set the statement line window.
    pub fn with_window_lines(mut self, lines: usize) -> Self {
        self.window_lines = lines.max(1);
        self
    }

    /// Set the assistant snippet length.
    pub fn with_max_snippet_chars(mut self, chars: usize) -> Self {
        self.max_snippet_chars = chars;
        self
    }

    /// Set the minimum text length of a text-bearing document.
    pub fn with_min_text_length(mut self, chars: usize) -> Self {
        self.min_text_length = chars;
        self
    }

    fn tax_ids(&self, preference: TaxIdPreference) -> TaxIdExtractor {
        TaxIdExtractor::new()
            .with_validation(self.validate_tax_id)
            .with_preference(preference)
    }

    /// Run the local rules for `kind`.
    pub fn extract_local(&self, doc: &Document, kind: DocumentKind) -> ExtractionResult {
        match kind {
            DocumentKind::RegistryExtract => self.registry(doc),
            DocumentKind::FinancialStatement => self.financial_statement(doc),
            DocumentKind::TaxReturn => self.tax_return(doc),
            DocumentKind::VatReturn => self.vat_return(doc),
            DocumentKind::Generic => self.generic(doc),
        }
    }

    fn registry(&self, doc: &Document) -> ExtractionResult {
        let fields = RegistryFields::extract(doc, &self.tax_ids(TaxIdPreference::CodiceFiscale));
        ExtractionResult {
            company_name: fields.company_name.unwrap_or_default(),
            tax_id: fields.tax_id.unwrap_or_default(),
            legal_form_kind: fields.legal_form_kind,
            activity_codes: fields.activity_codes,
            shareholders: fields.shareholders,
            employee_units: fields.employee_units.unwrap_or_default(),
            ..Default::default()
        }
    }

    fn financial_statement(&self, doc: &Document) -> ExtractionResult {
        ExtractionResult {
            revenue: locate_revenue(doc, self.window_lines).unwrap_or_default(),
            total_assets: locate_total_assets(doc, self.window_lines).unwrap_or_default(),
            ..Default::default()
        }
    }

    fn tax_return(&self, doc: &Document) -> ExtractionResult {
        let revenue = extract_form_amount(doc, FormLine::RedditiRevenue)
            .or_else(|| extract_form_amount(doc, FormLine::RedditiSimplifiedRevenue));
        self.form(doc, TaxIdPreference::CodiceFiscale, revenue)
    }

    fn vat_return(&self, doc: &Document) -> ExtractionResult {
        let revenue = extract_form_amount(doc, FormLine::VatTurnover);
        self.form(doc, TaxIdPreference::PartitaIva, revenue)
    }

    fn form(
        &self,
        doc: &Document,
        preference: TaxIdPreference,
        revenue: Option<rust_decimal::Decimal>,
    ) -> ExtractionResult {
        ExtractionResult {
            company_name: extract_company_name(doc).unwrap_or_default(),
            tax_id: self
                .tax_ids(preference)
                .extract(doc.text())
                .map(|m| m.value)
                .unwrap_or_default(),
            revenue: revenue.unwrap_or_default(),
            ..Default::default()
        }
    }

    fn generic(&self, doc: &Document) -> ExtractionResult {
        let mut result = self.registry(doc);
        let statement = self.financial_statement(doc);
        result.total_assets = statement.total_assets;
        result.revenue = [
            Some(statement.revenue),
            extract_form_amount(doc, FormLine::RedditiRevenue),
            extract_form_amount(doc, FormLine::VatTurnover),
        ]
        .into_iter()
        .flatten()
        .find(Resolved::is_resolved)
        .unwrap_or_default();
        result
    }

    /// Fields to ask the assistant for, given the local result.
    pub fn requested_fields(&self, local: &ExtractionResult, kind: DocumentKind) -> Vec<Field> {
        kind.assistant_fields()
            .iter()
            .copied()
            .filter(|f| kind.always_requested().contains(f) || !is_field_resolved(local, *f))
            .collect()
    }

    /// Extract the fields of `kind`, asking `assistant` for what the local
    /// rules miss. Assistant failures are logged and never returned.
    pub async fn extract(
        &self,
        doc: &Document,
        kind: DocumentKind,
        assistant: Option<&dyn Assistant>,
    ) -> ExtractionResult {
        let local = self.extract_local(doc, kind);

        let Some(assistant) = assistant else {
            return local;
        };

        let fields = self.requested_fields(&local, kind);
        if fields.is_empty() {
            debug!(%kind, "All fields resolved locally, skipping assistant");
            return local;
        }

        debug!(%kind, assistant = assistant.name(), ?fields, "Requesting fields from assistant");
        let request = AssistantRequest::new(doc.text(), kind, fields, self.max_snippet_chars);

        let reply = match assistant.complete(&request).await {
            Ok(content) => request.parse_reply(&content),
            Err(e) => Err(e),
        };

        match reply {
            Ok(reply) => merge(local, Some(reply)),
            Err(e) => {
                warn!(%kind, assistant = assistant.name(), "Assistant failed, keeping local fields: {}", e);
                local
            }
        }
    }

    /// Process already-extracted text.
    ///
    /// Text without visible characters (or shorter than the configured
    /// minimum) is an unsupported document.
    pub async fn process_text(
        &self,
        text: &str,
        kind: DocumentKind,
        assistant: Option<&dyn Assistant>,
    ) -> Result<ExtractionResult> {
        let start = Instant::now();
        let doc = Document::from_text(text);

        if doc.is_blank() || doc.visible_len() < self.min_text_length {
            return Err(EstraiError::UnsupportedDocument);
        }

        let result = self.extract(&doc, kind, assistant).await;

        info!(
            %kind,
            lines = doc.lines().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Document processed"
        );
        Ok(result)
    }

    /// Process a PDF through its text layer.
    pub async fn process_pdf(
        &self,
        data: &[u8],
        kind: DocumentKind,
        assistant: Option<&dyn Assistant>,
    ) -> Result<ExtractionResult> {
        let content = PdfExtractor::read(data)?;
        if !content.has_text_layer(self.min_text_length) {
            return Err(EstraiError::UnsupportedDocument);
        }
        self.process_text(&content.text, kind, assistant).await
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_field_resolved(result: &ExtractionResult, field: Field) -> bool {
    match field {
        Field::CompanyName => result.company_name.is_resolved(),
        Field::TaxId => result.tax_id.is_resolved(),
        Field::LegalFormKind => result.legal_form_kind.is_resolved(),
        Field::ActivityCodes => result.activity_codes.is_resolved(),
        Field::Shareholders => result.shareholders.is_resolved(),
        Field::TotalAssets => result.total_assets.is_resolved(),
        Field::Revenue => result.revenue.is_resolved(),
        Field::EmployeeUnits => result.employee_units.is_resolved(),
    }
}

//! Extraction record returned for every processed document.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured fields extracted from one document.
///
/// Absent values are their zero/empty defaults: a revenue of `0` means
/// "not found" as much as "zero".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionResult {
    /// Company name (ragione sociale).
    pub company_name: String,

    /// Company tax ID (codice fiscale / partita IVA).
    pub tax_id: String,

    /// Legal form, derived from the registry extract or the name suffix.
    pub legal_form_kind: LegalFormKind,

    /// ATECO activity codes.
    pub activity_codes: Vec<String>,

    /// Shareholders listed on the registry extract.
    pub shareholders: Vec<Shareholder>,

    /// Total assets (totale attivo).
    #[serde(with = "rust_decimal::serde::float")]
    pub total_assets: Decimal,

    /// Sales and service revenue for the most recent fiscal year.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,

    /// Employee work units (ULA / addetti).
    #[serde(with = "rust_decimal::serde::float")]
    pub employee_units: Decimal,
}

/// A shareholder entry from a registry extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shareholder {
    /// Person or entity name.
    pub name: String,

    /// Personal (16 chars) or company (11 digits) tax code.
    pub tax_id: String,

    /// Natural person or legal entity.
    pub kind: ShareholderKind,

    /// Ownership share in percent, `0` when not stated.
    #[serde(with = "rust_decimal::serde::float")]
    pub ownership_percent: Decimal,
}

impl Shareholder {
    /// Identity used for deduplication.
    pub fn dedup_key(&self) -> (String, String) {
        (self.tax_id.clone(), self.name.to_lowercase())
    }
}

/// Shareholder kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShareholderKind {
    NaturalPerson,
    LegalEntity,
}

impl ShareholderKind {
    /// Infer the kind from the shape of a tax code.
    pub fn from_tax_id(tax_id: &str) -> Self {
        if tax_id.len() == 11 && tax_id.chars().all(|c| c.is_ascii_digit()) {
            ShareholderKind::LegalEntity
        } else {
            ShareholderKind::NaturalPerson
        }
    }
}

/// Italian company legal forms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalFormKind {
    /// Not determined.
    #[default]
    #[serde(rename = "")]
    Unknown,
    /// Società a responsabilità limitata.
    Srl,
    /// S.r.l. semplificata.
    Srls,
    /// Società per azioni.
    Spa,
    /// Società in accomandita per azioni.
    Sapa,
    /// Società in accomandita semplice.
    Sas,
    /// Società in nome collettivo.
    Snc,
    /// Società cooperativa.
    Cooperativa,
    /// Impresa individuale.
    DittaIndividuale,
    /// A form outside the list above.
    Other,
}

impl LegalFormKind {
    /// Parse a legal form from free text: a "Forma giuridica" value, a
    /// company name, or an assistant answer.
    pub fn from_label(s: &str) -> Self {
        let lower = s.trim().to_lowercase();
        if lower.is_empty() {
            return LegalFormKind::Unknown;
        }
        let compact: String = lower
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();
        let words: Vec<&str> = compact.split_whitespace().collect();
        let has_word = |w: &str| words.contains(&w);
        let joined = words.concat();

        if lower.contains("cooperativ") || has_word("scarl") || has_word("scrl") {
            LegalFormKind::Cooperativa
        } else if lower.contains("semplificata") || has_word("srls") {
            LegalFormKind::Srls
        } else if lower.contains("responsabilit") || has_word("srl") || joined.ends_with("srl")
        {
            LegalFormKind::Srl
        } else if lower.contains("accomandita per azioni") || has_word("sapa") {
            LegalFormKind::Sapa
        } else if lower.contains("per azioni") || has_word("spa") || joined.ends_with("spa") {
            LegalFormKind::Spa
        } else if lower.contains("accomandita semplice") || has_word("sas") {
            LegalFormKind::Sas
        } else if lower.contains("nome collettivo") || has_word("snc") {
            LegalFormKind::Snc
        } else if lower.contains("individuale") || lower.contains("ditta") {
            LegalFormKind::DittaIndividuale
        } else if lower.contains("societ") || lower.contains("consorzio") {
            LegalFormKind::Other
        } else {
            LegalFormKind::Unknown
        }
    }

    /// Serialized tag, empty when unknown.
    pub fn as_str(&self) -> &'static str {
        match self {
            LegalFormKind::Unknown => "",
            LegalFormKind::Srl => "srl",
            LegalFormKind::Srls => "srls",
            LegalFormKind::Spa => "spa",
            LegalFormKind::Sapa => "sapa",
            LegalFormKind::Sas => "sas",
            LegalFormKind::Snc => "snc",
            LegalFormKind::Cooperativa => "cooperativa",
            LegalFormKind::DittaIndividuale => "ditta_individuale",
            LegalFormKind::Other => "other",
        }
    }

    /// True when no legal form was determined.
    pub fn is_unknown(&self) -> bool {
        *self == LegalFormKind::Unknown
    }
}

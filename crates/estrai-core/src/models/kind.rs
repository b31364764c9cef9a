//! Document kinds and the fields each kind resolves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EstraiError;

/// Kind of business document, supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    /// Company registry extract (visura camerale).
    RegistryExtract,
    /// Annual financial statement (bilancio).
    FinancialStatement,
    /// Corporate income tax return (Modello Redditi).
    TaxReturn,
    /// Annual VAT return (dichiarazione IVA).
    VatReturn,
    /// Anything else.
    Generic,
}

impl DocumentKind {
    /// Canonical tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::RegistryExtract => "registry-extract",
            DocumentKind::FinancialStatement => "financial-statement",
            DocumentKind::TaxReturn => "tax-return",
            DocumentKind::VatReturn => "vat-return",
            DocumentKind::Generic => "generic",
        }
    }

    /// Fields the assistant may be asked for when local extraction leaves
    /// them empty.
    pub fn assistant_fields(&self) -> &'static [Field] {
        match self {
            DocumentKind::RegistryExtract => &[Field::CompanyName, Field::TaxId],
            DocumentKind::FinancialStatement => &[Field::TotalAssets, Field::Revenue],
            DocumentKind::TaxReturn | DocumentKind::VatReturn => {
                &[Field::CompanyName, Field::TaxId, Field::Revenue]
            }
            DocumentKind::Generic => &[
                Field::CompanyName,
                Field::TaxId,
                Field::TotalAssets,
                Field::Revenue,
            ],
        }
    }

    /// Fields requested from the assistant even when resolved locally.
    pub fn always_requested(&self) -> &'static [Field] {
        match self {
            DocumentKind::FinancialStatement => &[Field::TotalAssets],
            _ => &[],
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = EstraiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase().replace('_', "-");
        match tag.as_str() {
            "registry-extract" | "registry" | "visura" => Ok(DocumentKind::RegistryExtract),
            "financial-statement" | "statement" | "bilancio" => {
                Ok(DocumentKind::FinancialStatement)
            }
            "tax-return" | "redditi" | "dichiarazione-redditi" => Ok(DocumentKind::TaxReturn),
            "vat-return" | "iva" | "dichiarazione-iva" => Ok(DocumentKind::VatReturn),
            "generic" | "generico" => Ok(DocumentKind::Generic),
            "" => Err(EstraiError::Input("missing document kind".to_string())),
            _ => Err(EstraiError::Input(format!("unknown document kind: {}", s))),
        }
    }
}

/// An output field of [`ExtractionResult`](super::record::ExtractionResult).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CompanyName,
    TaxId,
    LegalFormKind,
    ActivityCodes,
    Shareholders,
    TotalAssets,
    Revenue,
    EmployeeUnits,
}

/// Shape of a field's value, used to build the assistant's JSON template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Number,
    List,
}

impl Field {
    /// JSON key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            Field::CompanyName => "companyName",
            Field::TaxId => "taxId",
            Field::LegalFormKind => "legalFormKind",
            Field::ActivityCodes => "activityCodes",
            Field::Shareholders => "shareholders",
            Field::TotalAssets => "totalAssets",
            Field::Revenue => "revenue",
            Field::EmployeeUnits => "employeeUnits",
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Field::CompanyName | Field::TaxId | Field::LegalFormKind => FieldType::Text,
            Field::TotalAssets | Field::Revenue | Field::EmployeeUnits => FieldType::Number,
            Field::ActivityCodes | Field::Shareholders => FieldType::List,
        }
    }

    /// Default JSON value for an unresolved field.
    pub fn default_value(&self) -> serde_json::Value {
        match self.field_type() {
            FieldType::Text => serde_json::Value::String(String::new()),
            FieldType::Number => serde_json::Value::from(0),
            FieldType::List => serde_json::Value::Array(Vec::new()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

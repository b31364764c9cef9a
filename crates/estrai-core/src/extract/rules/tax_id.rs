//! Company tax ID (codice fiscale / partita IVA) extraction and validation.

use tracing::debug;

use super::patterns::{CODICE_FISCALE_LABELLED, PARTITA_IVA_LABELLED, TAX_ID_STANDALONE};
use super::{ExtractionMatch, FieldExtractor};

/// Which label to look for first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxIdPreference {
    /// Codice fiscale, then partita IVA (registry extracts, tax returns).
    CodiceFiscale,
    /// Partita IVA, then codice fiscale (VAT returns).
    PartitaIva,
}

/// Company tax ID extractor.
pub struct TaxIdExtractor {
    validate: bool,
    preference: TaxIdPreference,
}

impl TaxIdExtractor {
    /// Create a new tax ID extractor.
    pub fn new() -> Self {
        Self {
            validate: true,
            preference: TaxIdPreference::CodiceFiscale,
        }
    }

    /// Set whether unlabelled candidates are ranked by check digit.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Set which label is tried first.
    pub fn with_preference(mut self, preference: TaxIdPreference) -> Self {
        self.preference = preference;
        self
    }
}

impl Default for TaxIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TaxIdExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        // Labelled matches come first in extract_all; among the rest the
        // highest confidence wins, ties resolved by document order.
        let all = self.extract_all(text);
        let labelled = all.iter().find(|m| m.confidence >= 0.95).cloned();
        let best = labelled.or_else(|| {
            all.into_iter().fold(None, |best: Option<Self::Output>, m| match best {
                Some(b) if b.confidence >= m.confidence => Some(b),
                _ => Some(m),
            })
        })?;

        debug!(
            tax_id = %best.value,
            source = %best.source,
            position = ?best.position,
            confidence = best.confidence,
            "Selected tax ID"
        );
        Some(best)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        let labelled = match self.preference {
            TaxIdPreference::CodiceFiscale => [&*CODICE_FISCALE_LABELLED, &*PARTITA_IVA_LABELLED],
            TaxIdPreference::PartitaIva => [&*PARTITA_IVA_LABELLED, &*CODICE_FISCALE_LABELLED],
        };

        for pattern in labelled {
            for caps in pattern.captures_iter(text) {
                let (Some(full), Some(id)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                if results.iter().any(|r| r.value == id.as_str()) {
                    continue;
                }
                results.push(
                    ExtractionMatch::new(id.as_str().to_string(), 0.95, full.as_str())
                        .with_position(full.start(), full.end()),
                );
            }
        }

        for caps in TAX_ID_STANDALONE.captures_iter(text) {
            let Some(id) = caps.get(1) else {
                continue;
            };
            if results.iter().any(|r| r.value == id.as_str()) {
                continue;
            }

            let confidence = if self.validate && validate_partita_iva(id.as_str()) {
                0.8
            } else {
                0.5
            };
            results.push(
                ExtractionMatch::new(id.as_str().to_string(), confidence, id.as_str())
                    .with_position(id.start(), id.end()),
            );
        }

        results
    }
}

/// Validate an Italian partita IVA using its check digit.
///
/// Digits in odd positions count as they are, digits in even positions are
/// doubled (minus 9 when above 9); the total including the check digit
/// must be a multiple of 10.
pub fn validate_partita_iva(id: &str) -> bool {
    let digits: Vec<u32> = id
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
        .unwrap_or_default();

    if digits.len() != 11 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_tax_id(text: &str) -> Option<String> {
        TaxIdExtractor::new().extract(text).map(|m| m.value)
    }

    #[test]
    fn test_validate_partita_iva_valid() {
        assert!(validate_partita_iva("00743110157"));
        assert!(validate_partita_iva("12345678903"));
        assert!(validate_partita_iva("01234567897"));
    }

    #[test]
    fn test_validate_partita_iva_invalid() {
        assert!(!validate_partita_iva("12345678901"));
        assert!(!validate_partita_iva("1234567890"));
        assert!(!validate_partita_iva("123456789012"));
        assert!(!validate_partita_iva("1234567890A"));
    }

    #[test]
    fn test_extract_labelled_without_check_digit() {
        let text = "Denominazione: ACME SRL\nCodice fiscale e n.iscr. al Registro Imprese: 12345678901";
        assert_eq!(extract_tax_id(text), Some("12345678901".to_string()));
    }

    #[test]
    fn test_extract_partita_iva_label() {
        let text = "Partita IVA 00743110157";
        assert_eq!(extract_tax_id(text), Some("00743110157".to_string()));
    }

    #[test]
    fn test_standalone_prefers_valid_check_digit() {
        let text = "Protocollo 12345678901 del 2024\nImpresa 12345678903";
        assert_eq!(extract_tax_id(text), Some("12345678903".to_string()));

        let unvalidated = TaxIdExtractor::new().with_validation(false);
        assert_eq!(
            unvalidated.extract(text).map(|m| m.value),
            Some("12345678901".to_string())
        );
    }

    #[test]
    fn test_preference_order() {
        let text = "Codice fiscale: 00743110157\nPartita IVA: 12345678903";
        let vat_first = TaxIdExtractor::new().with_preference(TaxIdPreference::PartitaIva);
        assert_eq!(
            vat_first.extract(text).map(|m| m.value),
            Some("12345678903".to_string())
        );
        assert_eq!(extract_tax_id(text), Some("00743110157".to_string()));
    }

    #[test]
    fn test_match_keeps_source_and_position() {
        let text = "Sede: Milano\nPartita IVA: 00743110157\n";
        let found = TaxIdExtractor::new().extract(text).unwrap();
        assert_eq!(found.value, "00743110157");
        assert_eq!(found.source, "Partita IVA: 00743110157");
        assert_eq!(found.position, Some((13, 37)));

        let standalone = TaxIdExtractor::new().extract("Impresa 12345678903").unwrap();
        assert_eq!(standalone.source, "12345678903");
        assert_eq!(standalone.position, Some((8, 19)));
    }
}

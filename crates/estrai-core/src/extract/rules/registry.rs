//! Registry extract (visura camerale) fields.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::debug;

use crate::document::Document;
use crate::models::record::{LegalFormKind, Shareholder, ShareholderKind};

use super::amounts::parse_italian_amount;
use super::patterns::{
    ATECO_CODE, ATECO_CONTEXT, COMPANY_FORM_HINT, COMPANY_NAME_LABEL, EMPLOYEES_LABEL,
    HOLDER_LABELS, LEGAL_FORM_LABEL, PERCENTAGE, PERSONAL_TAX_CODE, SECTION_BREAK,
    SHAREHOLDERS_HEADING, TAX_ID_STANDALONE,
};
use super::tax_id::TaxIdExtractor;
use super::{ExtractionMatch, FieldExtractor};

/// Fields found on a registry extract.
#[derive(Debug, Clone, Default)]
pub struct RegistryFields {
    pub company_name: Option<String>,
    pub tax_id: Option<String>,
    pub legal_form_kind: LegalFormKind,
    pub activity_codes: Vec<String>,
    pub shareholders: Vec<Shareholder>,
    pub employee_units: Option<Decimal>,
}

impl RegistryFields {
    /// Run every registry rule over the document.
    pub fn extract(doc: &Document, tax_ids: &TaxIdExtractor) -> Self {
        let company_name = extract_company_name(doc);
        let legal_form_kind = extract_legal_form(doc, company_name.as_deref().unwrap_or(""));

        Self {
            tax_id: tax_ids.extract(doc.text()).map(|m| m.value),
            legal_form_kind,
            activity_codes: extract_activity_codes(doc),
            shareholders: ShareholderExtractor::new()
                .extract_all(doc.text())
                .into_iter()
                .map(|m| {
                    debug!(tax_id = %m.value.tax_id, source = %m.source, "Found shareholder");
                    m.value
                })
                .collect(),
            employee_units: extract_employee_units(doc),
            company_name,
        }
    }
}

/// Company name: the `Denominazione:` value, otherwise the first line
/// naming a company form.
pub fn extract_company_name(doc: &Document) -> Option<String> {
    let labelled = COMPANY_NAME_LABEL
        .captures(doc.text())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    let name = labelled.or_else(|| {
        doc.content_lines()
            .find(|l| COMPANY_FORM_HINT.is_match(l))
            .map(str::to_string)
    })?;

    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Legal form from `Forma giuridica:`, falling back to the name suffix.
pub fn extract_legal_form(doc: &Document, company_name: &str) -> LegalFormKind {
    let labelled = LEGAL_FORM_LABEL
        .captures(doc.text())
        .and_then(|caps| caps.get(1))
        .map(|m| LegalFormKind::from_label(m.as_str()))
        .unwrap_or_default();

    if labelled.is_unknown() {
        LegalFormKind::from_label(company_name)
    } else {
        labelled
    }
}

/// ATECO activity codes, in order of appearance, without duplicates.
pub fn extract_activity_codes(doc: &Document) -> Vec<String> {
    let lines: Vec<&str> = doc.content_lines().collect();
    let mut seen = HashSet::new();
    let mut codes = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !ATECO_CONTEXT.is_match(line) {
            continue;
        }

        let mut found = ateco_codes_in(line);
        // "Codice ATECO:" with the code on the following line
        if found.is_empty() {
            if let Some(next) = lines.get(i + 1) {
                found = ateco_codes_in(next);
            }
        }

        for code in found {
            if seen.insert(code.clone()) {
                codes.push(code);
            }
        }
    }

    codes
}

fn ateco_codes_in(line: &str) -> Vec<String> {
    ATECO_CODE
        .find_iter(line)
        .filter(|m| {
            // Skip fragments of dates and longer dotted numbers.
            let before = line[..m.start()].chars().next_back();
            let mut after = line[m.end()..].chars();
            let dotted_after = after.next() == Some('.')
                && after.next().is_some_and(|c| c.is_ascii_digit());
            before != Some('.') && !dotted_after
        })
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Number of employees (addetti).
pub fn extract_employee_units(doc: &Document) -> Option<Decimal> {
    EMPLOYEES_LABEL
        .captures(doc.text())
        .and_then(|caps| caps.get(1))
        .map(|m| parse_italian_amount(m.as_str()))
        .filter(|v| !v.is_zero())
}

/// Shareholder extractor over the shareholders block of a registry extract.
pub struct ShareholderExtractor;

impl ShareholderExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShareholderExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ShareholderExtractor {
    type Output = ExtractionMatch<Shareholder>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let Some(start) = lines.iter().position(|l| SHAREHOLDERS_HEADING.is_match(l)) else {
            return Vec::new();
        };
        let end = lines[start + 1..]
            .iter()
            .position(|l| SECTION_BREAK.is_match(l))
            .map(|p| start + 1 + p)
            .unwrap_or(lines.len());
        let block = &lines[start + 1..end];

        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for (i, line) in block.iter().enumerate() {
            let codes = holder_codes(line);
            let mut prefix_start = 0;

            for (code_start, code_end, code) in codes {
                let mut name = clean_holder_name(&line[prefix_start..code_start]);
                if name.is_empty() && prefix_start == 0 && i > 0 {
                    let previous = block[i - 1];
                    if holder_codes(previous).is_empty() && !PERCENTAGE.is_match(previous) {
                        name = clean_holder_name(previous);
                    }
                }

                let percent = PERCENTAGE
                    .captures(&line[code_end..])
                    .or_else(|| {
                        block[i + 1..]
                            .iter()
                            .take(2)
                            .take_while(|l| holder_codes(l).is_empty())
                            .find_map(|l| PERCENTAGE.captures(l))
                    })
                    .and_then(|caps| caps.get(1))
                    .map(|m| parse_italian_amount(m.as_str()))
                    .unwrap_or(Decimal::ZERO);

                let shareholder = Shareholder {
                    kind: ShareholderKind::from_tax_id(&code),
                    name,
                    tax_id: code,
                    ownership_percent: percent,
                };

                if seen.insert(shareholder.dedup_key()) {
                    results.push(
                        ExtractionMatch::new(shareholder, 0.8, *line)
                            .with_position(code_start, code_end),
                    );
                }
                prefix_start = code_end;
            }
        }

        results
    }
}

/// Personal tax codes and 11-digit company codes on a line, in order.
fn holder_codes(line: &str) -> Vec<(usize, usize, String)> {
    let mut codes: Vec<(usize, usize, String)> = PERSONAL_TAX_CODE
        .find_iter(line)
        .map(|m| (m.start(), m.end(), m.as_str().to_uppercase()))
        .chain(
            TAX_ID_STANDALONE
                .find_iter(line)
                .map(|m| (m.start(), m.end(), m.as_str().to_string())),
        )
        .collect();
    codes.sort_by_key(|c| c.0);
    codes
}

fn clean_holder_name(raw: &str) -> String {
    let without_labels = HOLDER_LABELS.replace_all(raw, " ");
    let name = without_labels
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ':' | ',' | ';' | '(' | ')'));
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const VISURA: &str = r#"
VISURA ORDINARIA SOCIETA' DI CAPITALE
Denominazione: ACME   SRL
Forma giuridica: societa' a responsabilita' limitata
Codice fiscale e n.iscr. al Registro Imprese: 01234567897
Codice ATECO: 62.01.00 - produzione di software
Codice ATECO secondario: 62.02
Data inizio attivita' 01.02.2010
Numero addetti al 31/12/2023: 12
Elenco dei soci
ROSSI MARIO
Codice fiscale: RSSMRA80A01H501U
Quota: 60%
BETA S.R.L. - C.F. 00743110157 - quota 40 %
ROSSI MARIO
Codice fiscale: RSSMRA80A01H501U
Amministratori
BIANCHI LUCA Codice fiscale: BNCLCU75C12F205X
"#;

    #[test]
    fn test_company_name_labelled() {
        let doc = Document::from_text(VISURA);
        assert_eq!(extract_company_name(&doc), Some("ACME SRL".to_string()));
    }

    #[test]
    fn test_company_name_from_form_hint() {
        let doc = Document::from_text("Visura\n  GAMMA   S.P.A.  \nSede in Milano");
        assert_eq!(extract_company_name(&doc), Some("GAMMA S.P.A.".to_string()));
        assert_eq!(extract_company_name(&Document::from_text("nessun nome")), None);
    }

    #[test]
    fn test_legal_form() {
        let doc = Document::from_text(VISURA);
        assert_eq!(extract_legal_form(&doc, "ACME SRL"), LegalFormKind::Srl);

        let doc = Document::from_text("Denominazione: BETA S.p.A.");
        assert_eq!(extract_legal_form(&doc, "BETA S.p.A."), LegalFormKind::Spa);
    }

    #[test]
    fn test_activity_codes() {
        let doc = Document::from_text(VISURA);
        assert_eq!(extract_activity_codes(&doc), vec!["62.01.00", "62.02"]);
    }

    #[test]
    fn test_activity_code_on_next_line() {
        let doc = Document::from_text("Codice ATECO:\n47.11.10\n");
        assert_eq!(extract_activity_codes(&doc), vec!["47.11.10"]);
    }

    #[test]
    fn test_employee_units() {
        let doc = Document::from_text(VISURA);
        assert_eq!(extract_employee_units(&doc), Some(Decimal::from(12)));
        assert_eq!(extract_employee_units(&Document::from_text("Addetti: 0")), None);
    }

    #[test]
    fn test_shareholders() {
        let holders: Vec<Shareholder> = ShareholderExtractor::new()
            .extract_all(VISURA)
            .into_iter()
            .map(|m| m.value)
            .collect();

        assert_eq!(holders.len(), 2);
        assert_eq!(holders[0].name, "ROSSI MARIO");
        assert_eq!(holders[0].tax_id, "RSSMRA80A01H501U");
        assert_eq!(holders[0].kind, ShareholderKind::NaturalPerson);
        assert_eq!(holders[0].ownership_percent, Decimal::from(60));

        assert_eq!(holders[1].name, "BETA S.R.L.");
        assert_eq!(holders[1].tax_id, "00743110157");
        assert_eq!(holders[1].kind, ShareholderKind::LegalEntity);
        assert_eq!(holders[1].ownership_percent, Decimal::from_str("40").unwrap());
    }

    #[test]
    fn test_shareholder_match_points_at_code() {
        let found = ShareholderExtractor::new().extract_all(VISURA);
        let beta = &found[1];
        assert_eq!(beta.source, "BETA S.R.L. - C.F. 00743110157 - quota 40 %");
        assert_eq!(beta.position, Some((19, 30)));
    }

    #[test]
    fn test_no_shareholder_section() {
        assert!(ShareholderExtractor::new().extract_all("Denominazione: X SRL").is_empty());
    }

    #[test]
    fn test_registry_fields() {
        let doc = Document::from_text(VISURA);
        let fields = RegistryFields::extract(&doc, &TaxIdExtractor::new());
        assert_eq!(fields.company_name.as_deref(), Some("ACME SRL"));
        assert_eq!(fields.tax_id.as_deref(), Some("01234567897"));
        assert_eq!(fields.legal_form_kind, LegalFormKind::Srl);
        assert_eq!(fields.shareholders.len(), 2);
    }
}

//! Fixed form-line codes on tax and VAT returns.

use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::document::Document;

use super::amounts::{is_plausible_amount, parse_italian_amount};
use super::patterns::{AMOUNT_CANDIDATE, IVA_TURNOVER, REDDITI_REVENUE, REDDITI_SIMPLIFIED_REVENUE};

/// A numbered line on a tax form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormLine {
    /// Modello Redditi SC, RF2: revenue.
    RedditiRevenue,
    /// Modello Redditi, RG2: revenue under the simplified regime.
    RedditiSimplifiedRevenue,
    /// Dichiarazione IVA, VE50: volume d'affari.
    VatTurnover,
}

impl FormLine {
    /// Printed code of the line.
    pub fn code(&self) -> &'static str {
        match self {
            FormLine::RedditiRevenue => "RF2",
            FormLine::RedditiSimplifiedRevenue => "RG2",
            FormLine::VatTurnover => "VE50",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            FormLine::RedditiRevenue => &REDDITI_REVENUE,
            FormLine::RedditiSimplifiedRevenue => &REDDITI_SIMPLIFIED_REVENUE,
            FormLine::VatTurnover => &IVA_TURNOVER,
        }
    }
}

/// Amount printed on a form line: the first plausible figure after the code
/// on the same line.
pub fn extract_form_amount(doc: &Document, line: FormLine) -> Option<Decimal> {
    let value = doc.lines().iter().find_map(|text| {
        let code = line.pattern().find(text)?;
        AMOUNT_CANDIDATE
            .find_iter(&text[code.end()..])
            .map(|m| m.as_str())
            .filter(|token| is_plausible_amount(token))
            .map(parse_italian_amount)
            .find(|value| !value.is_zero())
    })?;

    debug!(form_line = line.code(), %value, "Form line amount");
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_redditi_revenue() {
        let doc = Document::from_text(
            "QUADRO RF\nRF1 Ricavi ... 12\nRF2 Ricavi di cui all'art. 85, comma 1   433.230,00\nRF20 altro 999.999",
        );
        assert_eq!(
            extract_form_amount(&doc, FormLine::RedditiRevenue),
            Some(Decimal::new(43323000, 2))
        );
    }

    #[test]
    fn test_vat_turnover() {
        let doc = Document::from_text("VE50 Volume d'affari 1.250.000\nVE51 ...");
        assert_eq!(
            extract_form_amount(&doc, FormLine::VatTurnover),
            Some(Decimal::from(1_250_000))
        );
    }

    #[test]
    fn test_missing_form_line() {
        let doc = Document::from_text("RF20 altro 999.999");
        assert_eq!(extract_form_amount(&doc, FormLine::RedditiRevenue), None);
        assert_eq!(FormLine::RedditiRevenue.code(), "RF2");
    }
}

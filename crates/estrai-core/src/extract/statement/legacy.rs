//! Position-agnostic revenue patterns, tried when no column layout is found.

use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::document::Document;
use crate::extract::rules::amounts::{is_plausible_amount, parse_italian_amount};
use crate::extract::rules::patterns::{
    LEGACY_NEXT_LINE, LEGACY_PRODUCTION_BLOCK, LEGACY_SINGLE_COLUMN, LEGACY_TWO_COLUMNS,
};

/// Revenue from the legacy cascade, broadest pattern last.
///
/// 1. two figures after the label: the first;
/// 2. the "A) Valore della produzione ... 1) R..." block: the first figure,
///    or the second when the first is not plausible;
/// 3. a single figure after the label;
/// 4. a figure on the line after the label.
pub fn legacy_revenue(doc: &Document) -> Option<Decimal> {
    // (name, pattern, capture groups tried in order)
    let steps: [(&str, &Regex, &[usize]); 4] = [
        ("two_columns", &LEGACY_TWO_COLUMNS, &[1]),
        ("production_block", &LEGACY_PRODUCTION_BLOCK, &[1, 2]),
        ("single_column", &LEGACY_SINGLE_COLUMN, &[1]),
        ("next_line", &LEGACY_NEXT_LINE, &[1]),
    ];

    steps.iter().find_map(|(name, pattern, groups)| {
        let value = first_plausible_group(doc.text(), pattern, groups)?;
        debug!(step = name, %value, "Legacy pattern matched");
        Some(value)
    })
}

fn first_plausible_group(text: &str, pattern: &Regex, groups: &[usize]) -> Option<Decimal> {
    let caps = pattern.captures(text)?;
    groups
        .iter()
        .filter_map(|&g| caps.get(g))
        .map(|m| m.as_str())
        .find(|token| is_plausible_amount(token))
        .map(parse_italian_amount)
        .filter(|value| !value.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_columns_takes_first() {
        let doc = Document::from_text("1) Sales and service revenue   433.230   397.471");
        assert_eq!(legacy_revenue(&doc), Some(Decimal::from(433_230)));
    }

    #[test]
    fn test_production_block_falls_back_to_second_group() {
        let doc = Document::from_text(
            "A) Valore della produzione\n1) Ricavi e proventi 5 1.200.000\nTotale",
        );
        assert_eq!(legacy_revenue(&doc), Some(Decimal::from(1_200_000)));
    }

    #[test]
    fn test_single_column() {
        let doc = Document::from_text("Conto economico\n 1) Ricavi delle vendite e delle prestazioni 98.765,43");
        assert_eq!(legacy_revenue(&doc), Some(Decimal::new(9876543, 2)));
    }

    #[test]
    fn test_next_line() {
        let doc = Document::from_text("1) Ricavi delle vendite e delle prestazioni\n   250.000\n");
        assert_eq!(legacy_revenue(&doc), Some(Decimal::from(250_000)));
    }

    #[test]
    fn test_nothing_found() {
        let doc = Document::from_text("1) Ricavi delle vendite e delle prestazioni 12");
        assert_eq!(legacy_revenue(&doc), None);
    }
}

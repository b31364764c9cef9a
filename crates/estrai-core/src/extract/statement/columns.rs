//! Fiscal-year columns of a comparative statement header.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::document::{char_offset, Document};
use crate::extract::rules::patterns::HEADER_DATE;

/// One year column of a two-year comparative statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalColumn {
    pub year: i32,
    /// Character offset of the date token on its header line.
    pub offset: usize,
}

/// Year-end dates on a line, in order of appearance.
///
/// Tokens that look like dates but are not valid calendar dates are skipped.
pub fn header_dates(line: &str) -> Vec<FiscalColumn> {
    HEADER_DATE
        .captures_iter(line)
        .filter_map(|caps| {
            let full = caps.get(0)?;
            let day: u32 = caps.get(1)?.as_str().parse().ok()?;
            let month: u32 = caps.get(2)?.as_str().parse().ok()?;
            let year: i32 = caps.get(3)?.as_str().parse().ok()?;
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            Some(FiscalColumn {
                year: date.year(),
                offset: char_offset(line, full.start()),
            })
        })
        .collect()
}

/// Left and right columns of the first header line under `heading`.
///
/// A header line is one matching `heading` and carrying at least two dates;
/// only the first two dates count.
pub fn locate_columns(doc: &Document, heading: &Regex) -> Option<(FiscalColumn, FiscalColumn)> {
    doc.lines()
        .iter()
        .filter(|line| heading.is_match(line))
        .find_map(|line| {
            let dates = header_dates(line);
            let (a, b) = (*dates.first()?, *dates.get(1)?);
            Some(if a.offset <= b.offset { (a, b) } else { (b, a) })
        })
}

/// Character offset of the most recent year's column.
///
/// The greater year wins regardless of side; equal years resolve to the
/// left column.
pub fn locate_target_column(doc: &Document, heading: &Regex) -> Option<usize> {
    let (left, right) = locate_columns(doc, heading)?;
    let target = if left.year >= right.year { left } else { right };

    debug!(
        left_year = left.year,
        right_year = right.year,
        offset = target.offset,
        "Located target column"
    );
    Some(target.offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::rules::patterns::INCOME_STATEMENT_HEADING;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_most_recent_on_left() {
        let header = "Income statement    31-12-2024     31-12-2023";
        assert_eq!(header.find("31-12-2024"), Some(20));
        assert_eq!(header.find("31-12-2023"), Some(35));

        let doc = Document::from_text(header);
        assert_eq!(locate_target_column(&doc, &INCOME_STATEMENT_HEADING), Some(20));
    }

    #[test]
    fn test_most_recent_on_right() {
        let doc = Document::from_text("CONTO ECONOMICO 31.12.2022 31.12.2023");
        assert_eq!(locate_target_column(&doc, &INCOME_STATEMENT_HEADING), Some(27));
    }

    #[test]
    fn test_equal_years_resolve_left() {
        let doc = Document::from_text("CONTO ECONOMICO 30-06-2024 31-12-2024");
        assert_eq!(locate_target_column(&doc, &INCOME_STATEMENT_HEADING), Some(16));
    }

    #[test]
    fn test_needs_two_dates_on_heading_line() {
        let doc = Document::from_text("CONTO ECONOMICO 31-12-2024\n31-12-2024 31-12-2023");
        assert_eq!(locate_target_column(&doc, &INCOME_STATEMENT_HEADING), None);

        let doc = Document::from_text("Bilancio 31-12-2024 31-12-2023");
        assert_eq!(locate_target_column(&doc, &INCOME_STATEMENT_HEADING), None);
    }

    #[test]
    fn test_invalid_dates_skipped() {
        let dates = header_dates("CONTO ECONOMICO 45-13-2024 31-12-2024 31-12-2023");
        assert_eq!(
            dates,
            vec![
                FiscalColumn { year: 2024, offset: 27 },
                FiscalColumn { year: 2023, offset: 38 },
            ]
        );
    }

    #[test]
    fn test_offsets_count_characters() {
        let dates = header_dates("CONTO ECONOMICO ATTIVITÀ 31-12-2024 31-12-2023");
        assert_eq!(dates[0].offset, 25);
    }
}

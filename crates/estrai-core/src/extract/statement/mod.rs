//! Financial statement figures (revenue, total assets).
//!
//! A figure is located by a short pipeline of strategies tried in order:
//!
//! - **columnar**: when the statement header carries two year-end dates, pick
//!   the amount nearest to the most recent year's column;
//! - **line_window**: the first amount on the label line or the lines below it;
//! - **legacy**: a cascade of broad patterns over the whole text.
//!
//! A strategy answering zero counts as no answer.

pub mod candidates;
pub mod columns;
pub mod legacy;

use std::ops::Range;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::document::Document;
use crate::extract::rules::patterns::{
    BALANCE_SHEET_HEADING, CURRENT_ASSETS_LABEL, INCOME_STATEMENT_HEADING, REVENUE_LABEL,
    TOTAL_ASSETS_LABEL,
};

pub use candidates::{candidates_in, NumericCandidate};
pub use columns::{locate_target_column, FiscalColumn};
pub use legacy::legacy_revenue;

/// Lines examined from the label line on.
pub const DEFAULT_WINDOW_LINES: usize = 3;

/// A locating strategy: document and optional target column offset in,
/// figure out.
pub type Strategy = fn(&FigureLocator, &Document, Option<usize>) -> Option<Decimal>;

/// Locates one labelled figure of a comparative statement.
pub struct FigureLocator {
    name: &'static str,
    heading: &'static Regex,
    label: fn(&str) -> Option<Range<usize>>,
    fallback: fn(&Document) -> Option<Decimal>,
    window_lines: usize,
}

impl FigureLocator {
    /// "1) Ricavi delle vendite e delle prestazioni" in the income statement.
    pub fn revenue() -> Self {
        Self {
            name: "revenue",
            heading: &INCOME_STATEMENT_HEADING,
            label: |line| REVENUE_LABEL.find(line).map(|m| m.range()),
            fallback: legacy_revenue,
            window_lines: DEFAULT_WINDOW_LINES,
        }
    }

    /// "Totale attivo" in the balance sheet.
    pub fn total_assets() -> Self {
        Self {
            name: "total_assets",
            heading: &BALANCE_SHEET_HEADING,
            label: |line| {
                if CURRENT_ASSETS_LABEL.is_match(line) {
                    return None;
                }
                TOTAL_ASSETS_LABEL.find(line).map(|m| m.range())
            },
            fallback: |_| None,
            window_lines: DEFAULT_WINDOW_LINES,
        }
    }

    /// Set how many lines, label line included, are searched for amounts.
    pub fn with_window_lines(mut self, window_lines: usize) -> Self {
        self.window_lines = window_lines.max(1);
        self
    }

    /// Run the strategies in order and return the first nonzero answer.
    pub fn locate(&self, doc: &Document) -> Option<Decimal> {
        let strategies: [(&str, Strategy); 3] = [
            ("columnar", Self::columnar),
            ("line_window", Self::line_window),
            ("legacy", Self::legacy),
        ];

        let target = locate_target_column(doc, self.heading);

        strategies.iter().find_map(|(strategy, run)| {
            let value = run(self, doc, target).filter(|v| !v.is_zero())?;
            debug!(figure = self.name, strategy, %value, "Figure located");
            Some(value)
        })
    }

    /// Amount nearest to the target column, on the first window line that
    /// has one. Needs a target column.
    pub fn columnar(&self, doc: &Document, target: Option<usize>) -> Option<Decimal> {
        let target = target?;
        self.window(doc)?
            .iter()
            .find_map(|line| candidates::nearest_to(&candidates_in(line), target).map(|c| c.value))
    }

    /// First amount after the label, otherwise the first amount on the
    /// following window lines.
    pub fn line_window(&self, doc: &Document, _target: Option<usize>) -> Option<Decimal> {
        self.window(doc)?
            .iter()
            .find_map(|line| candidates::first_nonzero(&candidates_in(line)).map(|c| c.value))
    }

    /// Whole-text patterns that ignore layout.
    pub fn legacy(&self, doc: &Document, _target: Option<usize>) -> Option<Decimal> {
        (self.fallback)(doc)
    }

    /// Label line with the label blanked out, followed by the next lines.
    fn window(&self, doc: &Document) -> Option<Vec<String>> {
        let lines = doc.lines();
        let (index, span) = lines
            .iter()
            .enumerate()
            .find_map(|(i, line)| (self.label)(line).map(|span| (i, span)))?;

        let mut window = Vec::with_capacity(self.window_lines);
        window.push(candidates::blank_span(&lines[index], span.start, span.end));
        window.extend(
            lines[index + 1..]
                .iter()
                .take(self.window_lines - 1)
                .cloned(),
        );
        Some(window)
    }
}

/// Revenue of the most recent fiscal year, if any strategy finds it.
pub fn locate_revenue(doc: &Document, window_lines: usize) -> Option<Decimal> {
    FigureLocator::revenue()
        .with_window_lines(window_lines)
        .locate(doc)
}

/// Total assets of the most recent fiscal year.
pub fn locate_total_assets(doc: &Document, window_lines: usize) -> Option<Decimal> {
    FigureLocator::total_assets()
        .with_window_lines(window_lines)
        .locate(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REVENUE_LINE: &str = "1) Sales and service revenue   433.230   397.471";

    fn header(left: &str, right: &str) -> String {
        format!("{:<30}{}  {}", "Income statement", left, right)
    }

    #[test]
    fn test_column_aligned_with_first_amount() {
        let text = format!("{}\n{}", header("31-12-2024", "31-12-2023"), REVENUE_LINE);
        let doc = Document::from_text(&text);
        assert_eq!(locate_target_column(&doc, &INCOME_STATEMENT_HEADING), Some(30));
        assert_eq!(locate_revenue(&doc, 3), Some(Decimal::from(433_230)));
    }

    #[test]
    fn test_most_recent_year_on_right() {
        let text = format!("{}\n{}", header("31-12-2023", "31-12-2024"), REVENUE_LINE);
        let doc = Document::from_text(&text);
        assert_eq!(locate_revenue(&doc, 3), Some(Decimal::from(397_471)));
    }

    #[test]
    fn test_without_header() {
        let doc = Document::from_text(REVENUE_LINE);
        let locator = FigureLocator::revenue();
        assert_eq!(locator.columnar(&doc, None), None);
        assert_eq!(locator.legacy(&doc, None), Some(Decimal::from(433_230)));
        assert_eq!(locate_revenue(&doc, 3), Some(Decimal::from(433_230)));
    }

    #[test]
    fn test_amount_wrapped_to_next_line() {
        let text = format!(
            "{}\n1) Ricavi delle vendite e delle prestazioni\n{:>37}   397.471",
            header("31-12-2024", "31-12-2023"),
            "433.230"
        );
        let doc = Document::from_text(&text);
        assert_eq!(locate_revenue(&doc, 3), Some(Decimal::from(433_230)));
    }

    #[test]
    fn test_window_size_limits_search() {
        let doc = Document::from_text("1) Ricavi delle vendite e delle prestazioni\n-\n-\n1.000");
        assert_eq!(FigureLocator::revenue().line_window(&doc, None), None);
        assert_eq!(
            FigureLocator::revenue().with_window_lines(4).line_window(&doc, None),
            Some(Decimal::from(1000))
        );
    }

    #[test]
    fn test_total_assets_skips_current_assets() {
        let text = "STATO PATRIMONIALE 31-12-2024 31-12-2023\n\
                    Totale attivo circolante 500.000 400.000\n\
                    Totale attivo    1.500.000    1.400.000";
        let doc = Document::from_text(text);
        assert_eq!(locate_total_assets(&doc, 3), Some(Decimal::from(1_500_000)));
    }

    #[test]
    fn test_single_candidate_wins_regardless_of_column() {
        let text = format!(
            "{}\n{:<60}{}",
            header("31-12-2024", "31-12-2023"),
            "1) Ricavi delle vendite e delle prestazioni",
            "397.471"
        );
        let doc = Document::from_text(&text);
        let target = locate_target_column(&doc, &INCOME_STATEMENT_HEADING);
        assert_eq!(target, Some(30));
        assert_eq!(
            FigureLocator::revenue().columnar(&doc, target),
            Some(Decimal::from(397_471))
        );
        assert_eq!(locate_revenue(&doc, 3), Some(Decimal::from(397_471)));
    }

    #[test]
    fn test_compact_header_takes_nearest_amount() {
        // Header dates and amounts are not aligned: the 2024 date sits left
        // of both figures, so the nearer prior-year figure is chosen.
        let text = "CONTO ECONOMICO 31-12-2023 31-12-2024\n\
                    1) Ricavi delle vendite e delle prestazioni 397.471 433.230";
        let doc = Document::from_text(text);
        assert_eq!(locate_target_column(&doc, &INCOME_STATEMENT_HEADING), Some(27));
        assert_eq!(locate_revenue(&doc, 3), Some(Decimal::from(397_471)));
    }

    #[test]
    fn test_nothing_to_find() {
        let doc = Document::from_text("Nota integrativa\nnessun importo");
        assert_eq!(locate_revenue(&doc, 3), None);
        assert_eq!(locate_total_assets(&doc, 3), None);
    }
}

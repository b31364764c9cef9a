//! Numeric candidates on a statement line and their selection.

use rust_decimal::Decimal;

use crate::document::char_offset;
use crate::extract::rules::amounts::parse_italian_amount;
use crate::extract::rules::patterns::AMOUNT_CANDIDATE;

/// A figure found on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericCandidate {
    pub raw: String,
    pub value: Decimal,
    /// Character offset of the token's midpoint.
    pub position: usize,
}

/// Every amount-shaped token on a line, left to right.
pub fn candidates_in(line: &str) -> Vec<NumericCandidate> {
    AMOUNT_CANDIDATE
        .find_iter(line)
        .map(|m| {
            let start = char_offset(line, m.start());
            let len = m.as_str().chars().count();
            NumericCandidate {
                raw: m.as_str().to_string(),
                value: parse_italian_amount(m.as_str()),
                position: start + len / 2,
            }
        })
        .collect()
}

/// Replace the byte range `start..end` with as many spaces as it has characters.
///
/// Offsets of everything after the label stay unchanged.
pub fn blank_span(line: &str, start: usize, end: usize) -> String {
    let width = line[start..end].chars().count();
    format!("{}{}{}", &line[..start], " ".repeat(width), &line[end..])
}

/// The nonzero candidate whose midpoint is closest to `target`.
///
/// On equal distance the leftmost candidate wins.
pub fn nearest_to(candidates: &[NumericCandidate], target: usize) -> Option<&NumericCandidate> {
    candidates
        .iter()
        .filter(|c| !c.value.is_zero())
        .min_by_key(|c| c.position.abs_diff(target))
}

/// The first nonzero candidate.
pub fn first_nonzero(candidates: &[NumericCandidate]) -> Option<&NumericCandidate> {
    candidates.iter().find(|c| !c.value.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LINE: &str = "1) Sales and service revenue   433.230   397.471";

    #[test]
    fn test_candidates_positions() {
        let found = candidates_in(LINE);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].raw, "433.230");
        assert_eq!(found[0].value, Decimal::from(433_230));
        assert_eq!(found[0].position, 34);
        assert_eq!(found[1].position, 44);
    }

    #[test]
    fn test_small_tokens_are_not_candidates() {
        assert!(candidates_in("1) Ricavi 12 pag. 3").is_empty());
        let found = candidates_in("Totale 1 234 567,50 e 1234");
        assert_eq!(found[0].value, Decimal::new(123456750, 2));
        assert_eq!(found[1].value, Decimal::from(1234));
    }

    #[test]
    fn test_blank_span_keeps_offsets() {
        let line = "1) Ricavità 1.000";
        let start = 0;
        let end = line.find(" 1.000").unwrap();
        let blanked = blank_span(line, start, end);
        assert_eq!(blanked, format!("{}1.000", " ".repeat(12)));
        assert_eq!(candidates_in(&blanked)[0].position, candidates_in(line)[0].position);
    }

    #[test]
    fn test_nearest_skips_zero() {
        let found = candidates_in("0.000   1.500   2.500");
        assert_eq!(nearest_to(&found, 2).map(|c| c.raw.as_str()), Some("1.500"));
        assert_eq!(first_nonzero(&found).map(|c| c.raw.as_str()), Some("1.500"));
    }

    #[test]
    fn test_nearest_tie_goes_left() {
        let found = candidates_in("1.000 2.000");
        // midpoints 2 and 8
        assert_eq!(nearest_to(&found, 5).map(|c| c.raw.as_str()), Some("1.000"));
    }
}

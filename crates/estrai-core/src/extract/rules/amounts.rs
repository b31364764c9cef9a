//! Amount parsing for Italian-formatted figures.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

lazy_static! {
    static ref LEADING_NUMBER: Regex = Regex::new(r"^[+-]?(?:\d+(?:\.\d+)?|\.\d+)").unwrap();
}

/// Parse an Italian-formatted amount (e.g. "€ 1.234.567,89" or "433.230").
///
/// `.` is a thousands separator and `,` the decimal separator. Currency
/// symbols and whitespace are ignored. Anything unparsable yields zero.
pub fn parse_italian_amount(s: &str) -> Decimal {
    let cleaned: String = s
        .chars()
        .filter(|c| *c != '€' && *c != '.' && !c.is_whitespace())
        .collect();
    let normalized = cleaned.replacen(',', ".", 1);

    LEADING_NUMBER
        .find(&normalized)
        .and_then(|m| Decimal::from_str(m.as_str()).ok())
        .unwrap_or(Decimal::ZERO)
}

/// Read an amount from an untrusted JSON value.
///
/// Numbers are taken as they are; strings are parsed as Italian amounts.
pub fn amount_from_json(value: &serde_json::Value) -> Decimal {
    match value {
        serde_json::Value::Number(n) => {
            let repr = n.to_string();
            Decimal::from_str(&repr)
                .or_else(|_| Decimal::from_scientific(&repr))
                .unwrap_or(Decimal::ZERO)
        }
        serde_json::Value::String(s) => parse_italian_amount(s),
        _ => Decimal::ZERO,
    }
}

/// Whether a matched numeric token can be a monetary figure.
///
/// True if it carries a separator or at least three digits; this rules out
/// list markers like "1)" and stray page numbers.
pub fn is_plausible_amount(token: &str) -> bool {
    token.contains(['.', ',']) || token.chars().filter(|c| c.is_ascii_digit()).count() >= 3
}

/// Format an amount in Italian style (1.234.567,89).
pub fn format_italian_amount(amount: Decimal) -> String {
    let amount = amount.normalize();
    let s = amount.abs().to_string();
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (s.as_str(), None),
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    match decimal_part {
        Some(d) => format!("{},{}", formatted, d),
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_italian_amount() {
        assert_eq!(parse_italian_amount("1.234.567,89"), dec("1234567.89"));
        assert_eq!(parse_italian_amount("433.230"), dec("433230"));
        assert_eq!(parse_italian_amount("€ 12.500,00"), dec("12500.00"));
        assert_eq!(parse_italian_amount(" 433 230 "), dec("433230"));
        assert_eq!(parse_italian_amount("1234"), dec("1234"));
        assert_eq!(parse_italian_amount("-1.500"), dec("-1500"));
    }

    #[test]
    fn test_parse_italian_amount_garbage() {
        assert_eq!(parse_italian_amount(""), Decimal::ZERO);
        assert_eq!(parse_italian_amount("n.d."), Decimal::ZERO);
        assert_eq!(parse_italian_amount("EUR 100"), Decimal::ZERO);
        assert_eq!(parse_italian_amount(","), Decimal::ZERO);
        assert_eq!(
            parse_italian_amount("99999999999999999999999999999999999"),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_parse_takes_leading_number() {
        assert_eq!(parse_italian_amount("433.230abc"), dec("433230"));
        assert_eq!(parse_italian_amount("1,5,7"), dec("1.5"));
    }

    #[test]
    fn test_plausible_amount() {
        assert!(!is_plausible_amount("1"));
        assert!(!is_plausible_amount("5"));
        assert!(!is_plausible_amount("12"));
        assert!(is_plausible_amount("433.230"));
        assert!(is_plausible_amount("1234"));
        assert!(is_plausible_amount("3,5"));
        assert!(is_plausible_amount("100"));
    }

    #[test]
    fn test_format_italian_amount() {
        assert_eq!(format_italian_amount(dec("1234567.89")), "1.234.567,89");
        assert_eq!(format_italian_amount(dec("433230")), "433.230");
        assert_eq!(format_italian_amount(dec("12500.00")), "12.500");
        assert_eq!(format_italian_amount(dec("-1500")), "-1.500");
        assert_eq!(format_italian_amount(dec("999")), "999");
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        for s in ["1234567.89", "433230", "397471", "0.5", "1000000", "12.3", "-987654.321"] {
            let value = dec(s);
            assert_eq!(parse_italian_amount(&format_italian_amount(value)), value);
        }
    }

    #[test]
    fn test_amount_from_json() {
        assert_eq!(amount_from_json(&serde_json::json!(433230)), dec("433230"));
        assert_eq!(amount_from_json(&serde_json::json!(1234.5)), dec("1234.5"));
        assert_eq!(amount_from_json(&serde_json::json!("433.230")), dec("433230"));
        assert_eq!(amount_from_json(&serde_json::json!(null)), Decimal::ZERO);
        assert_eq!(amount_from_json(&serde_json::json!([1])), Decimal::ZERO);
    }
}

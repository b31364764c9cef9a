//! Field-by-field merge of local and assistant results.
//!
//! Every field is resolved by an ordered chain of sources; the first one
//! holding a non-empty, nonzero value wins. Local values come first, so an
//! assistant reply never overwrites what the rules found.

use std::mem;

use rust_decimal::Decimal;

use crate::models::record::{ExtractionResult, LegalFormKind};

/// Whether a value counts as found.
pub trait Resolved {
    fn is_resolved(&self) -> bool;
}

impl Resolved for String {
    fn is_resolved(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Resolved for Decimal {
    fn is_resolved(&self) -> bool {
        !self.is_zero()
    }
}

impl<T> Resolved for Vec<T> {
    fn is_resolved(&self) -> bool {
        !self.is_empty()
    }
}

impl Resolved for LegalFormKind {
    fn is_resolved(&self) -> bool {
        !self.is_unknown()
    }
}

/// An ordered sequence of candidate values for one field.
#[derive(Debug)]
pub struct Chain<T> {
    value: Option<T>,
}

impl<T: Resolved + Default> Chain<T> {
    /// Begin with the highest-priority value.
    pub fn start(value: T) -> Self {
        Self {
            value: value.is_resolved().then_some(value),
        }
    }

    /// Try the next source, if nothing has resolved yet.
    pub fn or_else(self, next: impl FnOnce() -> Option<T>) -> Self {
        if self.value.is_some() {
            return self;
        }
        Self {
            value: next().filter(Resolved::is_resolved),
        }
    }

    /// First resolved value, or the field default.
    pub fn resolve(self) -> T {
        self.value.unwrap_or_default()
    }
}

/// Merge an assistant reply into a local result, local values first.
pub fn merge(local: ExtractionResult, assistant: Option<ExtractionResult>) -> ExtractionResult {
    let mut reply = assistant.unwrap_or_default();

    fn chain<T: Resolved + Default>(local: T, reply: &mut T) -> T {
        Chain::start(local).or_else(|| Some(mem::take(reply))).resolve()
    }

    ExtractionResult {
        company_name: chain(local.company_name, &mut reply.company_name),
        tax_id: chain(local.tax_id, &mut reply.tax_id),
        legal_form_kind: chain(local.legal_form_kind, &mut reply.legal_form_kind),
        activity_codes: chain(local.activity_codes, &mut reply.activity_codes),
        shareholders: chain(local.shareholders, &mut reply.shareholders),
        total_assets: chain(local.total_assets, &mut reply.total_assets),
        revenue: chain(local.revenue, &mut reply.revenue),
        employee_units: chain(local.employee_units, &mut reply.employee_units),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chain_first_resolved_wins() {
        let value = Chain::start(String::new())
            .or_else(|| Some("  ".to_string()))
            .or_else(|| Some("ACME SRL".to_string()))
            .or_else(|| Some("OTHER".to_string()))
            .resolve();
        assert_eq!(value, "ACME SRL");
    }

    #[test]
    fn test_chain_later_sources_not_evaluated() {
        let value = Chain::start(Decimal::from(10))
            .or_else(|| panic!("should not be called"))
            .resolve();
        assert_eq!(value, Decimal::from(10));
    }

    #[test]
    fn test_chain_defaults_when_unresolved() {
        let value: Decimal = Chain::start(Decimal::ZERO).or_else(|| None).resolve();
        assert_eq!(value, Decimal::ZERO);
    }

    #[test]
    fn test_merge_never_overwrites_local() {
        let local = ExtractionResult {
            revenue: Decimal::from(433_230),
            company_name: "ACME SRL".to_string(),
            ..Default::default()
        };
        let reply = ExtractionResult {
            revenue: Decimal::from(999),
            company_name: "WRONG".to_string(),
            total_assets: Decimal::from(1_500_000),
            tax_id: "01234567897".to_string(),
            ..Default::default()
        };

        let merged = merge(local, Some(reply));
        assert_eq!(merged.revenue, Decimal::from(433_230));
        assert_eq!(merged.company_name, "ACME SRL");
        assert_eq!(merged.total_assets, Decimal::from(1_500_000));
        assert_eq!(merged.tax_id, "01234567897");
    }

    #[test]
    fn test_merge_without_reply() {
        let local = ExtractionResult {
            legal_form_kind: LegalFormKind::Spa,
            ..Default::default()
        };
        let merged = merge(local.clone(), None);
        assert_eq!(merged, local);
    }
}

//! Normalization of free-text fields coming out of the MF Central exports:
//! scheme names (the cross-folio join key), transaction types and broker strings.

pub mod broker;
pub mod classifier;
pub mod scheme;

pub use broker::{BROKER_PATTERNS, BrokerPattern, UNKNOWN_BROKER, extract_broker};
pub use classifier::{TRANSACTION_TYPE_TABLE, classify, classify_record};
pub use scheme::normalize;

use models::SchemeFolioKey;

/// Join key for a scheme/folio pair: normalized scheme name plus the folio as given.
pub fn scheme_folio_key(scheme_name: &str, folio_number: &str) -> SchemeFolioKey {
    SchemeFolioKey::new(normalize(scheme_name), folio_number.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_folio_key_normalizes_scheme_only() {
        let a = scheme_folio_key("Axis Small Cap Fund - Growth", " 91011/22 ");
        let b = scheme_folio_key("AXIS SMALL CAP FUND", "91011/22");
        assert_eq!(a, b);
        assert_eq!(a.folio, "91011/22");
        assert_ne!(a, scheme_folio_key("Axis Small Cap Fund", "91011/23"));
    }
}

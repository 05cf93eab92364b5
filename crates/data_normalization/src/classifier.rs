use models::{CanonicalType, RawTransactionRecord, Transaction};

use crate::broker::extract_broker;

/// Substring table checked in order against the lower-cased transaction type.
/// SIP markers come before `purchase` because "SIP Purchase" contains both.
pub const TRANSACTION_TYPE_TABLE: [(&str, CanonicalType); 12] = [
    ("systematic investment", CanonicalType::Sip),
    ("sip", CanonicalType::Sip),
    ("purchase", CanonicalType::Purchase),
    ("redemption", CanonicalType::Redemption),
    ("switch-in", CanonicalType::SwitchIn),
    ("switchin", CanonicalType::SwitchIn),
    ("switch in", CanonicalType::SwitchIn),
    ("switch-out", CanonicalType::SwitchOut),
    ("switchout", CanonicalType::SwitchOut),
    ("switch out", CanonicalType::SwitchOut),
    ("dividend", CanonicalType::Dividend),
    ("idcw", CanonicalType::Dividend),
];

/// Maps a free-text transaction type to its canonical kind; `Other` when nothing matches.
pub fn classify(raw_type: &str) -> CanonicalType {
    let lowered = raw_type.to_lowercase();
    TRANSACTION_TYPE_TABLE
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
        .map(|(_, kind)| *kind)
        .unwrap_or(CanonicalType::Other)
}

/// Classifies a parsed ledger row and resolves its broker.
pub fn classify_record(raw: RawTransactionRecord) -> Transaction {
    let canonical_type = classify(&raw.transaction_type);
    let broker_name = extract_broker(&raw.broker);
    Transaction {
        scheme_name: raw.scheme_name,
        folio_number: raw.folio_number,
        fund_type: raw.fund_type,
        investor_name: raw.investor_name,
        pan: raw.pan,
        trade_date: raw.trade_date,
        raw_transaction_type: raw.transaction_type,
        canonical_type,
        amount: raw.amount,
        units: raw.units,
        price: raw.price,
        raw_broker_string: raw.broker,
        broker_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_classify_table() {
        assert_eq!(classify("Purchase"), CanonicalType::Purchase);
        assert_eq!(classify("SIP Purchase"), CanonicalType::Sip);
        assert_eq!(classify("Systematic Investment Purchase"), CanonicalType::Sip);
        assert_eq!(classify("Redemption"), CanonicalType::Redemption);
        assert_eq!(classify("Switch-In"), CanonicalType::SwitchIn);
        assert_eq!(classify("Switchin"), CanonicalType::SwitchIn);
        assert_eq!(classify("Lateral Switch In"), CanonicalType::SwitchIn);
        assert_eq!(classify("Switch-Out"), CanonicalType::SwitchOut);
        assert_eq!(classify("Dividend Payout"), CanonicalType::Dividend);
        assert_eq!(classify("IDCW Reinvestment"), CanonicalType::Dividend);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("PURCHASE"), CanonicalType::Purchase);
        assert_eq!(classify("sip purchase - instalment 3"), CanonicalType::Sip);
        assert_eq!(classify("REDEMPTION"), CanonicalType::Redemption);
    }

    #[test]
    fn test_classify_falls_back_to_other() {
        assert_eq!(classify(""), CanonicalType::Other);
        assert_eq!(classify("Address Change"), CanonicalType::Other);
        assert_eq!(classify("Stamp Duty"), CanonicalType::Other);
    }

    #[test]
    fn test_classify_record() {
        let raw = RawTransactionRecord {
            scheme_name: "Axis Small Cap Fund - Regular Growth".to_string(),
            folio_number: "91011".to_string(),
            fund_type: "EQUITY".to_string(),
            investor_name: "A INVESTOR".to_string(),
            pan: "ABCDE1234F".to_string(),
            trade_date: NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
            transaction_type: "SIP Purchase".to_string(),
            amount: 5000.0,
            units: 48.1,
            price: 103.9,
            broker: "Your Broker/Dealer is : NEXTBILLION TECHNOLOGIES PRIVATE LIMITED".to_string(),
        };

        let txn = classify_record(raw);
        assert_eq!(txn.canonical_type, CanonicalType::Sip);
        assert_eq!(txn.raw_transaction_type, "SIP Purchase");
        assert_eq!(txn.broker_name, "NEXTBILLION TECHNOLOGIES PRIVATE LIMITED");
        assert!(txn.raw_broker_string.starts_with("Your Broker/Dealer"));
    }
}

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the consolidated portfolio statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawHoldingRecord {
    pub amc_name: String,
    pub scheme_name: String,
    pub scheme_code: String,
    pub fund_type: String,
    pub folio_number: String,
    pub investor_name: String,
    pub pan: String,
    pub units: f64,
    pub nav_date: Option<NaiveDate>,
    pub current_value: f64,
    pub cost_value: f64,
}

impl RawHoldingRecord {
    /// Zero units means the folio was fully redeemed.
    pub fn is_redeemed(&self) -> bool {
        self.units == 0.0
    }
}

/// One financial row of the transaction details statement, before classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawTransactionRecord {
    pub scheme_name: String,
    pub folio_number: String,
    pub fund_type: String,
    pub investor_name: String,
    pub pan: String,
    pub trade_date: NaiveDate,
    pub transaction_type: String,
    pub amount: f64,
    pub units: f64,
    pub price: f64,
    pub broker: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalType {
    Purchase,
    Sip,
    Redemption,
    SwitchIn,
    SwitchOut,
    Dividend,
    Other,
}

impl CanonicalType {
    /// Purchases and SIP installments are the money an investor put in.
    pub fn is_investment(&self) -> bool {
        matches!(self, CanonicalType::Purchase | CanonicalType::Sip)
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CanonicalType::Purchase => "purchase",
            CanonicalType::Sip => "sip",
            CanonicalType::Redemption => "redemption",
            CanonicalType::SwitchIn => "switch_in",
            CanonicalType::SwitchOut => "switch_out",
            CanonicalType::Dividend => "dividend",
            CanonicalType::Other => "other",
        };
        f.write_str(name)
    }
}

/// A classified ledger entry. Built once from a [`RawTransactionRecord`] and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub scheme_name: String,
    pub folio_number: String,
    pub fund_type: String,
    pub investor_name: String,
    pub pan: String,
    pub trade_date: NaiveDate,
    pub raw_transaction_type: String,
    pub canonical_type: CanonicalType,
    pub amount: f64,
    pub units: f64,
    pub price: f64,
    pub raw_broker_string: String,
    pub broker_name: String,
}

/// One row of the per-fund XIRR report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XirrRecord {
    pub scheme_name: String,
    pub folio_number: String,
    pub amc_name: String,
    pub fund_type: String,
    /// Annualized return in percent.
    pub xirr: f64,
    pub current_value: f64,
    pub cost_value: f64,
    pub appreciation: f64,
}

/// Composite join key: normalized scheme name plus folio number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct SchemeFolioKey {
    pub scheme: String,
    pub folio: String,
}

impl SchemeFolioKey {
    pub fn new(normalized_scheme: impl Into<String>, folio: impl Into<String>) -> Self {
        Self {
            scheme: normalized_scheme.into(),
            folio: folio.into(),
        }
    }
}

impl fmt::Display for SchemeFolioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.scheme, self.folio)
    }
}

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::records::SchemeFolioKey;

/// A fund position in a single folio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub scheme_name: String,
    pub amc: String,
    pub folio_number: String,
    pub scheme_code: String,
    pub units: f64,
    pub current_nav: f64,
    pub current_value: f64,
    pub cost_value: f64,
    pub gain_loss: f64,
    pub gain_loss_percent: f64,
    #[serde(rename = "type")]
    pub fund_type: String,
    pub xirr: f64,
    pub nav_date: Option<NaiveDate>,
    pub broker: String,
    pub is_direct: bool,
    pub is_aggregated: bool,
    /// Key into the XIRR report this holding was enriched from.
    #[serde(skip)]
    pub xirr_key: SchemeFolioKey,
}

/// The sum of every holding sharing one normalized scheme name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedHolding {
    #[serde(flatten)]
    pub holding: Holding,
    pub aggregated_folios: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SipFrequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl SipFrequency {
    /// Thresholds in days, lower bound inclusive: <20 weekly, <60 monthly, <120 quarterly.
    pub fn from_average_gap(avg_gap_days: f64) -> Self {
        if avg_gap_days < 20.0 {
            SipFrequency::Weekly
        } else if avg_gap_days < 60.0 {
            SipFrequency::Monthly
        } else if avg_gap_days < 120.0 {
            SipFrequency::Quarterly
        } else {
            SipFrequency::Yearly
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sip {
    pub scheme_name: String,
    pub folio_number: String,
    pub sip_amount: f64,
    pub frequency: SipFrequency,
    pub start_date: NaiveDate,
    pub last_installment_date: NaiveDate,
    pub next_installment_date: Option<NaiveDate>,
    pub total_installments: usize,
    pub total_invested: f64,
    pub is_active: bool,
    #[serde(rename = "broker")]
    pub broker_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokerSummary {
    #[serde(skip)]
    pub broker_name: String,
    pub total_invested: f64,
    pub scheme_count: usize,
    pub schemes: Vec<String>,
    pub transaction_count: usize,
    #[serde(rename = "first_transaction")]
    pub first_transaction_date: NaiveDate,
    #[serde(rename = "last_transaction")]
    pub last_transaction_date: NaiveDate,
}

/// Audit entry describing which folios were folded into one aggregated holding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationEntry {
    pub original_count: usize,
    pub folios: Vec<String>,
    pub scheme_name: String,
}

/// Percent of total current value per asset class, and per market-cap category
/// among equity funds. All zero when the portfolio has no value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AssetAllocation {
    pub equity: f64,
    pub debt: f64,
    pub hybrid: f64,
    pub gold: f64,
    pub other: f64,
    pub large_cap: f64,
    pub mid_cap: f64,
    pub small_cap: f64,
    pub flexi_cap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TypeTotals {
    pub count: usize,
    pub amount: f64,
}

/// Ledger activity per canonical transaction type, keyed by its snake_case name.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TransactionSummary {
    pub total: usize,
    pub by_type: BTreeMap<String, TypeTotals>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PortfolioCounts {
    pub num_funds: usize,
    pub num_aggregated_funds: usize,
    pub num_active_sips: usize,
    pub num_brokers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSnapshot {
    pub investor_name: String,
    pub pan: String,
    pub total_value: f64,
    pub total_invested: f64,
    pub total_gain: f64,
    pub total_gain_percent: f64,
    #[serde(rename = "xirr")]
    pub portfolio_xirr: f64,
    pub holdings: Vec<Holding>,
    pub aggregated_holdings: Vec<AggregatedHolding>,
    pub active_sips: Vec<Sip>,
    #[serde(rename = "broker_info")]
    pub broker_summaries: BTreeMap<String, BrokerSummary>,
    pub aggregation_map: BTreeMap<String, AggregationEntry>,
    pub asset_allocation: AssetAllocation,
    pub transaction_summary: TransactionSummary,
    #[serde(flatten)]
    pub counts: PortfolioCounts,
    pub last_updated: DateTime<Utc>,
    pub data_source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_boundaries_are_lower_inclusive() {
        assert_eq!(SipFrequency::from_average_gap(7.0), SipFrequency::Weekly);
        assert_eq!(SipFrequency::from_average_gap(19.9), SipFrequency::Weekly);
        assert_eq!(SipFrequency::from_average_gap(20.0), SipFrequency::Monthly);
        assert_eq!(SipFrequency::from_average_gap(59.9), SipFrequency::Monthly);
        assert_eq!(SipFrequency::from_average_gap(60.0), SipFrequency::Quarterly);
        assert_eq!(SipFrequency::from_average_gap(119.9), SipFrequency::Quarterly);
        assert_eq!(SipFrequency::from_average_gap(120.0), SipFrequency::Yearly);
        assert_eq!(SipFrequency::from_average_gap(365.0), SipFrequency::Yearly);
    }

    #[test]
    fn test_aggregated_holding_serializes_flat() {
        let holding = Holding {
            scheme_name: "Axis Bluechip Fund - Growth".to_string(),
            amc: "Axis Mutual Fund".to_string(),
            folio_number: "91011".to_string(),
            scheme_code: "AXBC".to_string(),
            units: 10.0,
            current_nav: 50.0,
            current_value: 500.0,
            cost_value: 400.0,
            gain_loss: 100.0,
            gain_loss_percent: 25.0,
            fund_type: "EQUITY".to_string(),
            xirr: 12.5,
            nav_date: NaiveDate::from_ymd_opt(2025, 11, 25),
            broker: "Unknown".to_string(),
            is_direct: false,
            is_aggregated: true,
            xirr_key: SchemeFolioKey::new("axis bluechip fund", "91011"),
        };
        let aggregated = AggregatedHolding {
            holding,
            aggregated_folios: vec!["91011".to_string(), "91012".to_string()],
        };

        let value = serde_json::to_value(&aggregated).unwrap();
        assert_eq!(value["type"], "EQUITY");
        assert_eq!(value["is_aggregated"], true);
        assert_eq!(value["nav_date"], "2025-11-25");
        assert_eq!(value["aggregated_folios"][1], "91012");
        assert!(value.get("xirr_key").is_none());
        assert!(value.get("holding").is_none());
    }
}

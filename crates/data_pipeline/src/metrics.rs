use std::collections::BTreeMap;

use models::{AssetAllocation, Holding, Transaction, TransactionSummary, TypeTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetClass {
    Equity,
    Debt,
    Hybrid,
    Gold,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CapCategory {
    Large,
    Mid,
    Small,
    Flexi,
}

/// Checked in order against the lower-cased fund type; each holding lands in one class.
/// Hybrid comes first so "Equity Hybrid" style types are not counted as equity.
const ASSET_CLASS_TABLE: [(&str, AssetClass); 5] = [
    ("hybrid", AssetClass::Hybrid),
    ("balanced", AssetClass::Hybrid),
    ("gold", AssetClass::Gold),
    ("debt", AssetClass::Debt),
    ("equity", AssetClass::Equity),
];

/// Checked in order against the lower-cased scheme name of equity holdings.
/// "Large & Mid Cap" resolves to mid cap.
const CAP_CATEGORY_TABLE: [(&str, CapCategory); 4] = [
    ("flexi", CapCategory::Flexi),
    ("small", CapCategory::Small),
    ("mid", CapCategory::Mid),
    ("large", CapCategory::Large),
];

fn asset_class(fund_type: &str) -> AssetClass {
    let lowered = fund_type.to_lowercase();
    ASSET_CLASS_TABLE
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
        .map(|(_, class)| *class)
        .unwrap_or(AssetClass::Other)
}

fn cap_category(scheme_name: &str) -> Option<CapCategory> {
    let lowered = scheme_name.to_lowercase();
    CAP_CATEGORY_TABLE
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
        .map(|(_, category)| *category)
}

/// Value share of each asset class and equity cap category, in percent.
pub fn asset_allocation(holdings: &[Holding]) -> AssetAllocation {
    let total: f64 = holdings.iter().map(|h| h.current_value).sum();
    if total == 0.0 {
        tracing::debug!("Portfolio value is zero; allocation left at 0.0");
        return AssetAllocation::default();
    }

    let mut alloc = AssetAllocation::default();
    for holding in holdings {
        let share = holding.current_value / total * 100.0;
        let class = asset_class(&holding.fund_type);
        match class {
            AssetClass::Equity => alloc.equity += share,
            AssetClass::Debt => alloc.debt += share,
            AssetClass::Hybrid => alloc.hybrid += share,
            AssetClass::Gold => alloc.gold += share,
            AssetClass::Other => alloc.other += share,
        }
        if class != AssetClass::Equity {
            continue;
        }
        match cap_category(&holding.scheme_name) {
            Some(CapCategory::Large) => alloc.large_cap += share,
            Some(CapCategory::Mid) => alloc.mid_cap += share,
            Some(CapCategory::Small) => alloc.small_cap += share,
            Some(CapCategory::Flexi) => alloc.flexi_cap += share,
            None => {}
        }
    }
    alloc
}

/// Count and absolute amount of ledger rows per canonical type.
pub fn summarize_transactions(transactions: &[Transaction]) -> TransactionSummary {
    let mut by_type: BTreeMap<String, TypeTotals> = BTreeMap::new();
    for tx in transactions {
        let totals = by_type.entry(tx.canonical_type.to_string()).or_default();
        totals.count += 1;
        totals.amount += tx.amount.abs();
    }
    TransactionSummary {
        total: transactions.len(),
        by_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use models::{CanonicalType, SchemeFolioKey};

    fn holding(scheme: &str, fund_type: &str, value: f64) -> Holding {
        Holding {
            scheme_name: scheme.to_string(),
            amc: String::new(),
            folio_number: "1".to_string(),
            scheme_code: String::new(),
            units: 1.0,
            current_nav: value,
            current_value: value,
            cost_value: value,
            gain_loss: 0.0,
            gain_loss_percent: 0.0,
            fund_type: fund_type.to_string(),
            xirr: 0.0,
            nav_date: None,
            broker: "Unknown".to_string(),
            is_direct: false,
            is_aggregated: false,
            xirr_key: SchemeFolioKey::default(),
        }
    }

    fn tx(kind: CanonicalType, amount: f64) -> Transaction {
        Transaction {
            scheme_name: "Fund".to_string(),
            folio_number: "1".to_string(),
            fund_type: String::new(),
            investor_name: String::new(),
            pan: String::new(),
            trade_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            raw_transaction_type: kind.to_string(),
            canonical_type: kind,
            amount,
            units: 0.0,
            price: 0.0,
            raw_broker_string: String::new(),
            broker_name: "Unknown".to_string(),
        }
    }

    #[test]
    fn test_allocation_by_class_and_cap() {
        let holdings = vec![
            holding("Axis Large Cap Fund", "EQUITY", 40.0),
            holding("Nippon India Small Cap Fund", "Equity", 10.0),
            holding("Parag Parikh Flexi Cap Fund", "EQUITY", 10.0),
            holding("HDFC Short Term Debt Fund", "DEBT", 20.0),
            holding("ICICI Balanced Advantage Fund", "Hybrid", 10.0),
            holding("SBI Gold Fund", "GOLD", 5.0),
            holding("Some FoF", "FOF", 5.0),
        ];
        let alloc = asset_allocation(&holdings);

        assert!((alloc.equity - 60.0).abs() < 1e-9);
        assert!((alloc.debt - 20.0).abs() < 1e-9);
        assert!((alloc.hybrid - 10.0).abs() < 1e-9);
        assert!((alloc.gold - 5.0).abs() < 1e-9);
        assert!((alloc.other - 5.0).abs() < 1e-9);
        assert!((alloc.large_cap - 40.0).abs() < 1e-9);
        assert!((alloc.small_cap - 10.0).abs() < 1e-9);
        assert!((alloc.flexi_cap - 10.0).abs() < 1e-9);
        assert_eq!(alloc.mid_cap, 0.0);

        let classes = alloc.equity + alloc.debt + alloc.hybrid + alloc.gold + alloc.other;
        assert!((classes - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocation_class_precedence() {
        assert_eq!(asset_class("Equity Hybrid"), AssetClass::Hybrid);
        assert_eq!(asset_class(""), AssetClass::Other);
        assert_eq!(cap_category("Mirae Large & Midcap Fund"), Some(CapCategory::Mid));
        assert_eq!(cap_category("Axis Bluechip Fund"), None);
    }

    #[test]
    fn test_allocation_zero_value_portfolio() {
        let holdings = vec![holding("Axis Large Cap Fund", "EQUITY", 0.0)];
        assert_eq!(asset_allocation(&holdings), AssetAllocation::default());
        assert_eq!(asset_allocation(&[]), AssetAllocation::default());
    }

    #[test]
    fn test_transaction_summary_by_type() {
        let txs = vec![
            tx(CanonicalType::Sip, 1000.0),
            tx(CanonicalType::Sip, 1000.0),
            tx(CanonicalType::Redemption, -500.0),
            tx(CanonicalType::Other, 0.2),
        ];
        let summary = summarize_transactions(&txs);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_type.len(), 3);
        assert_eq!(summary.by_type["sip"].count, 2);
        assert_eq!(summary.by_type["sip"].amount, 2000.0);
        assert_eq!(summary.by_type["redemption"].amount, 500.0);
        assert_eq!(summary.by_type["other"].count, 1);
        assert_eq!(summarize_transactions(&[]), TransactionSummary::default());
    }
}

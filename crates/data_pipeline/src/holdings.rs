use std::collections::{BTreeMap, HashMap, HashSet};

use data_normalization::{UNKNOWN_BROKER, scheme_folio_key};
use models::{AggregatedHolding, AggregationEntry, Holding, RawHoldingRecord};

use crate::brokers::HoldingBrokerIndex;
use crate::xirr::{XirrIndex, value_weighted_xirr};

/// Holdings built from one consolidated statement.
#[derive(Debug, Default)]
pub struct HoldingsBuild {
    pub holdings: Vec<Holding>,
    /// Zero-unit rows left out of `holdings`.
    pub redeemed: usize,
    /// Holdings with no row in the XIRR report; their `xirr` is 0.0.
    pub unmatched_xirr: usize,
}

/// Cross-scheme aggregation of a holdings list.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub holdings: Vec<AggregatedHolding>,
    pub map: BTreeMap<String, AggregationEntry>,
}

fn ratio(numerator: f64, denominator: f64, what: &str, scheme: &str) -> f64 {
    if denominator == 0.0 {
        tracing::debug!(scheme, "Zero denominator for {}; using 0.0", what);
        return 0.0;
    }
    numerator / denominator
}

fn gain_percent(gain: f64, cost_value: f64, scheme: &str) -> f64 {
    ratio(gain, cost_value, "gain_loss_percent", scheme) * 100.0
}

fn is_direct_plan(scheme_name: &str) -> bool {
    scheme_name
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == "direct")
}

/// Turns raw statement rows into enriched holdings.
///
/// Redeemed rows are dropped and counted. XIRR comes from `xirr`, keyed by
/// (normalized scheme, folio); the broker comes from the ledger.
pub fn build_holdings(
    records: &[RawHoldingRecord],
    xirr: &XirrIndex,
    brokers: &HoldingBrokerIndex,
) -> HoldingsBuild {
    let mut out = HoldingsBuild::default();

    for record in records {
        if record.is_redeemed() {
            out.redeemed += 1;
            continue;
        }

        // A miss is expected for very recent purchases
        let key = scheme_folio_key(&record.scheme_name, &record.folio_number);
        let rate = xirr.lookup(&key).unwrap_or_else(|| {
            out.unmatched_xirr += 1;
            tracing::debug!(holding = %key, "No XIRR row; using 0.0");
            0.0
        });

        let gain_loss = record.current_value - record.cost_value;
        out.holdings.push(Holding {
            scheme_name: record.scheme_name.clone(),
            amc: record.amc_name.clone(),
            folio_number: record.folio_number.clone(),
            scheme_code: record.scheme_code.clone(),
            units: record.units,
            current_nav: ratio(
                record.current_value,
                record.units,
                "current_nav",
                &record.scheme_name,
            ),
            current_value: record.current_value,
            cost_value: record.cost_value,
            gain_loss,
            gain_loss_percent: gain_percent(gain_loss, record.cost_value, &record.scheme_name),
            fund_type: record.fund_type.clone(),
            xirr: rate,
            nav_date: record.nav_date,
            broker: brokers.broker_for(&key).to_string(),
            is_direct: is_direct_plan(&record.scheme_name),
            is_aggregated: false,
            xirr_key: key,
        });
    }

    out
}

/// Merges holdings that share a normalized scheme name, across folios.
///
/// Groups keep the order in which their first member appears. Within a group,
/// values are summed in encounter order and XIRR is the value-weighted mean of
/// the members.
pub fn aggregate_holdings(holdings: &[Holding]) -> Aggregation {
    // Group by normalized scheme, keeping first-seen order
    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Holding>> = Vec::new();
    for holding in holdings {
        let scheme = holding.xirr_key.scheme.as_str();
        match order.get(scheme) {
            Some(&idx) => groups[idx].push(holding),
            None => {
                order.insert(scheme, groups.len());
                groups.push(vec![holding]);
            }
        }
    }

    let mut out = Aggregation::default();
    for members in groups {
        let Some(first) = members.first() else {
            continue;
        };

        let mut seen = HashSet::new();
        let folios: Vec<String> = members
            .iter()
            .filter(|h| seen.insert(h.folio_number.clone()))
            .map(|h| h.folio_number.clone())
            .collect();

        // Derived fields are recomputed from the sums, never averaged
        let units: f64 = members.iter().map(|h| h.units).sum();
        let current_value: f64 = members.iter().map(|h| h.current_value).sum();
        let cost_value: f64 = members.iter().map(|h| h.cost_value).sum();
        let gain_loss = current_value - cost_value;
        let xirr = value_weighted_xirr(members.iter().map(|h| (h.xirr, h.current_value)))
            .unwrap_or(0.0);
        let broker = members
            .iter()
            .map(|h| h.broker.as_str())
            .find(|b| *b != UNKNOWN_BROKER)
            .unwrap_or(UNKNOWN_BROKER);

        let holding = Holding {
            scheme_name: first.scheme_name.clone(),
            amc: first.amc.clone(),
            folio_number: first.folio_number.clone(),
            scheme_code: first.scheme_code.clone(),
            units,
            current_nav: ratio(current_value, units, "current_nav", &first.scheme_name),
            current_value,
            cost_value,
            gain_loss,
            gain_loss_percent: gain_percent(gain_loss, cost_value, &first.scheme_name),
            fund_type: first.fund_type.clone(),
            xirr,
            nav_date: members.iter().filter_map(|h| h.nav_date).max(),
            broker: broker.to_string(),
            is_direct: first.is_direct,
            is_aggregated: members.len() >= 2,
            xirr_key: first.xirr_key.clone(),
        };

        out.map.insert(
            first.xirr_key.scheme.clone(),
            AggregationEntry {
                original_count: members.len(),
                folios: folios.clone(),
                scheme_name: first.scheme_name.clone(),
            },
        );
        out.holdings.push(AggregatedHolding {
            holding,
            aggregated_folios: folios,
        });
    }

    out
}

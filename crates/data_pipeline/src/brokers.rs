use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use data_normalization::{UNKNOWN_BROKER, normalize, scheme_folio_key};
use models::{BrokerSummary, CanonicalType, SchemeFolioKey, Transaction};

/// Broker of record for each (scheme, folio), taken from the ledger.
///
/// The first known broker seen for a key wins; keys whose transactions only ever
/// carry `Unknown` are left out so lookups fall back to `Unknown`. Rows classified
/// as `Other` (stamp duty, nominee updates) never attribute a broker.
#[derive(Debug, Default)]
pub struct HoldingBrokerIndex {
    brokers: HashMap<SchemeFolioKey, String>,
}

impl HoldingBrokerIndex {
    pub fn build(transactions: &[Transaction]) -> Self {
        let mut brokers = HashMap::new();
        for tx in transactions {
            if tx.canonical_type == CanonicalType::Other || tx.broker_name == UNKNOWN_BROKER {
                continue;
            }
            brokers
                .entry(scheme_folio_key(&tx.scheme_name, &tx.folio_number))
                .or_insert_with(|| tx.broker_name.clone());
        }
        Self { brokers }
    }

    pub fn broker_for(&self, key: &SchemeFolioKey) -> &str {
        self.brokers
            .get(key)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_BROKER)
    }
}

/// Totals per broker over purchase and SIP transactions.
///
/// Amounts are summed as absolute values. `schemes` lists distinct schemes in the
/// order they first appear, deduplicated on the normalized name.
pub fn summarize_brokers(transactions: &[Transaction]) -> BTreeMap<String, BrokerSummary> {
    struct Acc {
        total: f64,
        transactions: usize,
        first: NaiveDate,
        last: NaiveDate,
        seen: HashSet<String>,
        schemes: Vec<String>,
    }

    let mut map: BTreeMap<String, Acc> = BTreeMap::new();
    for tx in transactions
        .iter()
        .filter(|tx| tx.canonical_type.is_investment())
    {
        let acc = map.entry(tx.broker_name.clone()).or_insert_with(|| Acc {
            total: 0.0,
            transactions: 0,
            first: tx.trade_date,
            last: tx.trade_date,
            seen: HashSet::new(),
            schemes: Vec::new(),
        });
        acc.total += tx.amount.abs();
        acc.transactions += 1;
        acc.first = acc.first.min(tx.trade_date);
        acc.last = acc.last.max(tx.trade_date);
        if acc.seen.insert(normalize(&tx.scheme_name)) {
            acc.schemes.push(tx.scheme_name.clone());
        }
    }

    map.into_iter()
        .map(|(broker, acc)| {
            let summary = BrokerSummary {
                broker_name: broker.clone(),
                total_invested: acc.total,
                scheme_count: acc.schemes.len(),
                schemes: acc.schemes,
                transaction_count: acc.transactions,
                first_transaction_date: acc.first,
                last_transaction_date: acc.last,
            };
            (broker, summary)
        })
        .collect()
}

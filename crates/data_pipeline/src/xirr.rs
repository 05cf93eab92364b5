use std::collections::HashMap;

use data_normalization::scheme_folio_key;
use models::{SchemeFolioKey, XirrRecord};

/// Lookup from (normalized scheme, folio) to the reported annualized XIRR.
/// Built once per compose call from that upload's XIRR report.
#[derive(Debug, Default)]
pub struct XirrIndex {
    rates: HashMap<SchemeFolioKey, f64>,
}

impl XirrIndex {
    /// Later rows win when the report lists the same key twice.
    pub fn build(records: &[XirrRecord]) -> Self {
        let mut rates = HashMap::with_capacity(records.len());
        for record in records {
            let key = scheme_folio_key(&record.scheme_name, &record.folio_number);
            if let Some(previous) = rates.insert(key, record.xirr) {
                tracing::debug!(
                    scheme = %record.scheme_name,
                    folio = %record.folio_number,
                    previous,
                    replacement = record.xirr,
                    "Duplicate XIRR row"
                );
            }
        }
        Self { rates }
    }

    pub fn lookup(&self, key: &SchemeFolioKey) -> Option<f64> {
        self.rates.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// `Σ(xirr_i × value_i) / Σ(value_i)` over pairs with a positive value.
///
/// Zero-value positions are left out of both sums. `None` when nothing carries weight.
pub fn value_weighted_xirr<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (weighted, total) = pairs
        .into_iter()
        .filter(|(_, value)| *value > 0.0)
        .fold((0.0, 0.0), |(weighted, total), (xirr, value)| {
            (weighted + xirr * value, total + value)
        });

    (total > 0.0).then(|| weighted / total)
}

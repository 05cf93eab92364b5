use std::collections::HashMap;

use chrono::{Days, Months, NaiveDate};
use data_normalization::scheme_folio_key;
use models::{CanonicalType, SchemeFolioKey, Sip, SipFrequency, Transaction};

/// Reference date and recency window deciding whether a SIP still runs.
#[derive(Debug, Clone, Copy)]
pub struct SipPolicy {
    pub today: NaiveDate,
    pub activity_window_days: i64,
}

impl SipPolicy {
    /// Active when the last installment is at most `activity_window_days` before `today`.
    pub fn is_active(&self, last_installment: NaiveDate) -> bool {
        (self.today - last_installment).num_days() <= self.activity_window_days
    }
}

/// One interval of `frequency` after `last`. `None` only past the end of the calendar.
pub fn next_installment(last: NaiveDate, frequency: SipFrequency) -> Option<NaiveDate> {
    match frequency {
        SipFrequency::Weekly => last.checked_add_days(Days::new(7)),
        SipFrequency::Monthly => last.checked_add_months(Months::new(1)),
        SipFrequency::Quarterly => last.checked_add_days(Days::new(90)),
        SipFrequency::Yearly => last.checked_add_months(Months::new(12)),
    }
}

/// Most frequent absolute amount; on a tie, the one that occurred most recently.
/// `installments` must be sorted by trade date.
fn mode_amount(installments: &[&Transaction]) -> f64 {
    // bits -> (count, position of latest occurrence)
    let mut tally: HashMap<u64, (usize, usize)> = HashMap::new();
    for (pos, tx) in installments.iter().enumerate() {
        let entry = tally.entry(tx.amount.abs().to_bits()).or_insert((0, pos));
        entry.0 += 1;
        entry.1 = pos;
    }

    tally
        .into_iter()
        .max_by_key(|(_, (count, latest))| (*count, *latest))
        .map(|(bits, _)| f64::from_bits(bits))
        .unwrap_or(0.0)
}

fn detect_one(
    key: &SchemeFolioKey,
    mut installments: Vec<&Transaction>,
    policy: &SipPolicy,
) -> Option<Sip> {
    installments.sort_by_key(|tx| tx.trade_date);
    let first = installments.first()?;
    let last = installments.last()?;

    let frequency = if installments.len() < 2 {
        SipFrequency::Monthly
    } else {
        let gaps: Vec<i64> = installments
            .windows(2)
            .map(|pair| (pair[1].trade_date - pair[0].trade_date).num_days())
            .collect();
        let avg_gap = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
        SipFrequency::from_average_gap(avg_gap)
    };

    Some(Sip {
        scheme_name: last.scheme_name.clone(),
        folio_number: key.folio.clone(),
        sip_amount: mode_amount(&installments),
        frequency,
        start_date: first.trade_date,
        last_installment_date: last.trade_date,
        next_installment_date: next_installment(last.trade_date, frequency),
        total_installments: installments.len(),
        total_invested: installments.iter().map(|tx| tx.amount.abs()).sum(),
        is_active: policy.is_active(last.trade_date),
        broker_name: last.broker_name.clone(),
    })
}

/// Detects one SIP per (normalized scheme, folio) that has SIP installments.
///
/// Every detected SIP is returned, active or not, in the order its first installment
/// appears in the ledger. Callers filter on `is_active`.
pub fn detect_sips(transactions: &[Transaction], policy: &SipPolicy) -> Vec<Sip> {
    let mut order: HashMap<SchemeFolioKey, usize> = HashMap::new();
    let mut groups: Vec<(SchemeFolioKey, Vec<&Transaction>)> = Vec::new();

    for tx in transactions
        .iter()
        .filter(|tx| tx.canonical_type == CanonicalType::Sip)
    {
        let key = scheme_folio_key(&tx.scheme_name, &tx.folio_number);
        match order.get(&key) {
            Some(&idx) => groups[idx].1.push(tx),
            None => {
                order.insert(key.clone(), groups.len());
                groups.push((key, vec![tx]));
            }
        }
    }

    let sips: Vec<Sip> = groups
        .into_iter()
        .filter_map(|(key, installments)| detect_one(&key, installments, policy))
        .collect();

    tracing::debug!(
        detected = sips.len(),
        active = sips.iter().filter(|s| s.is_active).count(),
        "SIP detection finished"
    );
    sips
}

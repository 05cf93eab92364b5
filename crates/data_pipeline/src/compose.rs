use chrono::{DateTime, NaiveDate, Utc};
use data_normalization::classify_record;
use mf_central::{Parsed, parse_consolidated, parse_transactions, parse_xirr_report};
use models::{
    CanonicalType, ImportReport, PortfolioCounts, PortfolioSnapshot, RawHoldingRecord,
    Settings, Sip, SourceError, SourceKind, SourceReport, Transaction,
};
use serde::Serialize;
use serde_json::Value;

use crate::brokers::{HoldingBrokerIndex, summarize_brokers};
use crate::holdings::{aggregate_holdings, build_holdings};
use crate::metrics::{asset_allocation, summarize_transactions};
use crate::sips::{SipPolicy, detect_sips};
use crate::xirr::{XirrIndex, value_weighted_xirr};

/// The three MF Central exports of one upload, as decoded JSON.
#[derive(Debug, Clone)]
pub struct RawSources {
    pub consolidated: Value,
    pub transactions: Value,
    pub xirr_report: Value,
}

/// Time inputs of a compose call.
#[derive(Debug, Clone, Copy)]
pub struct ComposeContext {
    /// Reference date for SIP activity.
    pub today: NaiveDate,
    /// Stamped into `last_updated`.
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Composition {
    pub snapshot: PortfolioSnapshot,
    pub report: ImportReport,
}

/// Unwraps an optional source: an empty or unreadable document becomes a warning
/// and an empty record list.
fn optional_source<T>(
    parsed: Result<Parsed<T>, SourceError>,
    kind: SourceKind,
    report: &mut ImportReport,
) -> Vec<T> {
    match parsed.and_then(Parsed::into_non_empty) {
        Ok(parsed) => {
            report.sources.push(parsed.report);
            parsed.records
        }
        Err(err) => {
            tracing::warn!(source = %kind, "Continuing without source: {}", err);
            report.warn(err.to_string());
            report.sources.push(SourceReport::new(kind));
            Vec::new()
        }
    }
}

/// Builds a portfolio snapshot from the three exports of one upload.
///
/// Fails only when the consolidated statement yields no current holding. Skipped
/// records, missing optional sources and guarded divisions are listed in the
/// returned [`ImportReport`].
pub fn compose(
    sources: &RawSources,
    ctx: &ComposeContext,
    settings: &Settings,
) -> Result<Composition, SourceError> {
    // The three exports are independent; parse them concurrently
    let maps = &settings.field_maps;
    let (holdings_parsed, (ledger_parsed, xirr_parsed)) = rayon::join(
        || parse_consolidated(&sources.consolidated, &maps.holdings),
        || {
            rayon::join(
                || parse_transactions(&sources.transactions, &maps.transactions),
                || parse_xirr_report(&sources.xirr_report, &maps.xirr_report),
            )
        },
    );

    // Holdings are mandatory, the ledger and XIRR report only warn when missing
    let holdings_parsed = holdings_parsed?.into_non_empty()?;
    let mut report = ImportReport::default();
    report.sources.push(holdings_parsed.report);

    let transactions: Vec<Transaction> =
        optional_source(ledger_parsed, SourceKind::TransactionLedger, &mut report)
            .into_iter()
            .map(classify_record)
            .collect();
    let xirr_records = optional_source(xirr_parsed, SourceKind::XirrReport, &mut report);

    // Join keys are rebuilt for every upload
    let xirr_index = XirrIndex::build(&xirr_records);
    let broker_index = HoldingBrokerIndex::build(&transactions);
    let build = build_holdings(&holdings_parsed.records, &xirr_index, &broker_index);
    report.redeemed_holdings = build.redeemed;
    report.unmatched_xirr = build.unmatched_xirr;
    if build.redeemed > 0 {
        tracing::debug!(count = build.redeemed, "Excluded redeemed holdings");
    }
    if build.holdings.is_empty() {
        return Err(SourceError::EmptySource {
            kind: SourceKind::ConsolidatedHoldings,
        });
    }
    let holdings = build.holdings;

    // Merge folios of the same scheme
    let aggregation = aggregate_holdings(&holdings);

    // SIPs are judged against the injected date, never the clock
    let policy = SipPolicy {
        today: ctx.today,
        activity_window_days: settings.sip_activity_window_days,
    };
    let all_sips = detect_sips(&transactions, &policy);
    report.all_sips_detected = all_sips.len();
    let active_sips: Vec<Sip> = if settings.include_inactive_sips {
        all_sips
    } else {
        all_sips.into_iter().filter(|sip| sip.is_active).collect()
    };

    let broker_summaries = summarize_brokers(&transactions);
    let asset_allocation = asset_allocation(&holdings);
    let transaction_summary = summarize_transactions(&transactions);

    // Portfolio totals; ratios over a zero base are reported as 0.0

    let total_value: f64 = holdings.iter().map(|h| h.current_value).sum();
    let total_invested: f64 = holdings.iter().map(|h| h.cost_value).sum();
    let total_gain = total_value - total_invested;
    let total_gain_percent = if total_invested == 0.0 {
        tracing::warn!("Total invested is zero; portfolio gain percent set to 0.0");
        report.warn("total_invested is zero; total_gain_percent reported as 0.0");
        0.0
    } else {
        total_gain / total_invested * 100.0
    };

    let portfolio_xirr = value_weighted_xirr(holdings.iter().map(|h| (h.xirr, h.current_value)))
        .unwrap_or_else(|| {
            tracing::warn!("No holding has a positive value; portfolio XIRR set to 0.0");
            report.warn("no holding has a positive current value; xirr reported as 0.0");
            0.0
        });

    let (investor_name, pan) = investor_identity(&holdings_parsed.records, &transactions);

    let counts = PortfolioCounts {
        num_funds: holdings.len(),
        num_aggregated_funds: aggregation.holdings.len(),
        num_active_sips: active_sips.len(),
        num_brokers: broker_summaries.len(),
    };

    tracing::info!(
        funds = counts.num_funds,
        aggregated_funds = counts.num_aggregated_funds,
        active_sips = counts.num_active_sips,
        brokers = counts.num_brokers,
        skipped = report.skipped_total(),
        total_value,
        xirr = portfolio_xirr,
        "Composed portfolio snapshot"
    );

    let snapshot = PortfolioSnapshot {
        investor_name,
        pan,
        total_value,
        total_invested,
        total_gain,
        total_gain_percent,
        portfolio_xirr,
        holdings,
        aggregated_holdings: aggregation.holdings,
        active_sips,
        broker_summaries,
        aggregation_map: aggregation.map,
        asset_allocation,
        transaction_summary,
        counts,
        last_updated: ctx.generated_at,
        data_source: settings.data_source.clone(),
    };

    Ok(Composition { snapshot, report })
}

/// First non-empty investor name (and its PAN) from the holdings, else from the
/// ledger's financial rows.
fn investor_identity(
    holdings: &[RawHoldingRecord],
    transactions: &[Transaction],
) -> (String, String) {
    let financial = transactions
        .iter()
        .filter(|t| t.canonical_type != CanonicalType::Other);
    holdings
        .iter()
        .map(|h| (&h.investor_name, &h.pan))
        .chain(financial.map(|t| (&t.investor_name, &t.pan)))
        .find(|(name, _)| !name.is_empty())
        .map(|(name, pan)| (name.clone(), pan.clone()))
        .unwrap_or_default()
}

use models::{HoldingFieldMap, RawHoldingRecord, SourceError, SourceKind};
use serde_json::Value;

use crate::fields::RecordView;
use crate::{Parsed, RowOutcome, parse_rows};

/// Parses the CONSOLIDATED PORTFOLIO STATEMENT export.
///
/// Zero-unit rows are kept here; redeemed folios are dropped when holdings are built.
pub fn parse_consolidated(
    doc: &Value,
    map: &HoldingFieldMap,
) -> Result<Parsed<RawHoldingRecord>, SourceError> {
    parse_rows(
        doc,
        map.records_key.as_deref(),
        SourceKind::ConsolidatedHoldings,
        |row| parse_holding_row(row, map).map(RowOutcome::Accept),
    )
}

fn parse_holding_row(row: &RecordView<'_>, map: &HoldingFieldMap) -> Result<RawHoldingRecord, SourceError> {
    Ok(RawHoldingRecord {
        amc_name: row.str_or_empty(&map.amc_name)?,
        scheme_name: row.required_str(&map.scheme_name)?,
        scheme_code: row.str_or_empty(&map.scheme_code)?,
        fund_type: row.str_or_empty(&map.fund_type)?,
        folio_number: row.required_str(&map.folio_number)?,
        investor_name: row.str_or_empty(&map.investor_name)?,
        pan: row.str_or_empty(&map.pan)?,
        units: row.non_negative_f64(&map.units)?,
        nav_date: row.optional_date(&map.nav_date)?,
        current_value: row.required_f64(&map.current_value)?,
        cost_value: row.required_f64(&map.cost_value)?,
    })
}

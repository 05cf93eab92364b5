use models::{RawTransactionRecord, SourceError, SourceKind, TransactionFieldMap};
use serde_json::Value;

use crate::fields::RecordView;
use crate::{Parsed, RowOutcome, parse_rows};

/// Parses the TRANSACTION DETAILS STATEMENT export.
///
/// Rows carrying neither an amount nor units are non-financial entries (address
/// changes, nominee updates) and are counted as ignored rather than skipped.
pub fn parse_transactions(
    doc: &Value,
    map: &TransactionFieldMap,
) -> Result<Parsed<RawTransactionRecord>, SourceError> {
    parse_rows(
        doc,
        map.records_key.as_deref(),
        SourceKind::TransactionLedger,
        |row| {
            if row.is_absent(&map.amount) && row.is_absent(&map.units) {
                return Ok(RowOutcome::Ignore);
            }
            parse_transaction_row(row, map).map(RowOutcome::Accept)
        },
    )
}

fn parse_transaction_row(
    row: &RecordView<'_>,
    map: &TransactionFieldMap,
) -> Result<RawTransactionRecord, SourceError> {
    Ok(RawTransactionRecord {
        scheme_name: row.required_str(&map.scheme_name)?,
        folio_number: row.required_str(&map.folio_number)?,
        fund_type: row.str_or_empty(&map.fund_type)?,
        investor_name: row.str_or_empty(&map.investor_name)?,
        pan: row.str_or_empty(&map.pan)?,
        trade_date: row.required_date(&map.trade_date)?,
        transaction_type: row.str_or_empty(&map.transaction_type)?,
        amount: row.f64_or_zero(&map.amount)?,
        units: row.f64_or_zero(&map.units)?,
        price: row.f64_or_zero(&map.price)?,
        broker: row.str_or_empty(&map.broker)?,
    })
}

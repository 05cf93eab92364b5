use models::{SourceError, SourceKind, XirrFieldMap, XirrRecord};
use serde_json::Value;

use crate::{Parsed, RowOutcome, parse_rows};

/// Parses the detailed report rows that carry the annualised XIRR per scheme and folio.
pub fn parse_xirr_report(
    doc: &Value,
    map: &XirrFieldMap,
) -> Result<Parsed<XirrRecord>, SourceError> {
    parse_rows(doc, map.records_key.as_deref(), SourceKind::XirrReport, |row| {
        Ok(RowOutcome::Accept(XirrRecord {
            scheme_name: row.required_str(&map.scheme_name)?,
            folio_number: row.required_str(&map.folio_number)?,
            amc_name: row.str_or_empty(&map.amc_name)?,
            fund_type: row.str_or_empty(&map.fund_type)?,
            xirr: row.required_f64(&map.xirr)?,
            current_value: row.f64_or_zero(&map.current_value)?,
            cost_value: row.f64_or_zero(&map.cost_value)?,
            appreciation: row.f64_or_zero(&map.appreciation)?,
        }))
    })
}

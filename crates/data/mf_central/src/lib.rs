//! Parsers for the three MF Central JSON exports:
//!
//! 1. the consolidated portfolio statement (`CurrentValuation*.json`),
//! 2. the transaction details statement (`AS*.json`),
//! 3. the detailed report carrying per-fund XIRR.
//!
//! Each parser walks the loosely-typed rows of one document through a field-mapping
//! table. A row that fails validation is skipped, logged and recorded in the
//! [`SourceReport`]; it never aborts the batch.

pub mod consolidated;
pub mod dates;
pub mod fields;
pub mod transactions;
pub mod xirr_report;

use models::{SourceError, SourceKind, SourceReport};
use serde_json::Value;

use crate::fields::{RecordView, record_rows};

pub use consolidated::parse_consolidated;
pub use dates::parse_date;
pub use transactions::parse_transactions;
pub use xirr_report::parse_xirr_report;

pub const PARSER_NAME: &str = "mf_central";

/// Records accepted from one document plus what happened to the rest.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub report: SourceReport,
}

impl<T> Parsed<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fails with `EmptySource` when no row survived validation.
    pub fn into_non_empty(self) -> Result<Self, SourceError> {
        if self.records.is_empty() {
            return Err(SourceError::EmptySource {
                kind: self.report.source,
            });
        }
        Ok(self)
    }
}

/// Outcome of one row: accepted, or deliberately left out.
pub(crate) enum RowOutcome<T> {
    Accept(T),
    Ignore,
}

/// Shared row loop: extracts the rows, runs `parse_row` on each and tallies the report.
pub(crate) fn parse_rows<T, F>(
    doc: &Value,
    records_key: Option<&str>,
    kind: SourceKind,
    mut parse_row: F,
) -> Result<Parsed<T>, SourceError>
where
    F: FnMut(&RecordView<'_>) -> Result<RowOutcome<T>, SourceError>,
{
    let rows = record_rows(doc, records_key, kind)?;
    let mut report = SourceReport::new(kind);
    report.total_records = rows.len();
    let mut records = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let outcome = RecordView::new(kind, idx, row).and_then(|view| parse_row(&view));
        match outcome {
            Ok(RowOutcome::Accept(record)) => records.push(record),
            Ok(RowOutcome::Ignore) => {
                tracing::debug!(
                    parser = PARSER_NAME,
                    source = %kind,
                    index = idx,
                    "Ignoring non-financial row"
                );
                report.ignored += 1;
            }
            Err(err) => {
                tracing::warn!(parser = PARSER_NAME, "Skipping row: {}", err);
                report.record_skip(err);
            }
        }
    }

    report.accepted = records.len();
    tracing::debug!(
        parser = PARSER_NAME,
        source = %kind,
        total = report.total_records,
        accepted = report.accepted,
        ignored = report.ignored,
        skipped = report.skipped.len(),
        "Parsed document"
    );

    Ok(Parsed { records, report })
}

use serde::Serialize;

use crate::error::{FieldProblem, SourceError, SourceKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub field: String,
    #[serde(flatten)]
    pub problem: FieldProblem,
}

/// Per-document parse statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub source: SourceKind,
    pub total_records: usize,
    pub accepted: usize,
    /// Rows deliberately left out (non-financial ledger entries), not errors.
    pub ignored: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl SourceReport {
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            total_records: 0,
            accepted: 0,
            ignored: 0,
            skipped: Vec::new(),
        }
    }

    /// Records a per-record failure. Errors that are not record-level are ignored.
    pub fn record_skip(&mut self, err: SourceError) {
        if let SourceError::MalformedSource {
            index,
            field,
            problem,
            ..
        } = err
        {
            self.skipped.push(SkippedRecord {
                index,
                field,
                problem,
            });
        }
    }
}

/// Data-quality summary returned next to every snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImportReport {
    pub sources: Vec<SourceReport>,
    /// Holdings excluded because their unit balance is zero.
    pub redeemed_holdings: usize,
    /// Holdings with no matching row in the XIRR report.
    pub unmatched_xirr: usize,
    /// SIPs detected before the activity filter was applied.
    pub all_sips_detected: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ImportReport {
    pub fn skipped_total(&self) -> usize {
        self.sources.iter().map(|s| s.skipped.len()).sum()
    }

    pub fn has_issues(&self) -> bool {
        self.skipped_total() > 0 || !self.warnings.is_empty()
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

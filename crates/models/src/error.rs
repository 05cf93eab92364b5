use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The three MF Central exports fused by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    ConsolidatedHoldings,
    TransactionLedger,
    XirrReport,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::ConsolidatedHoldings => "consolidated holdings",
            SourceKind::TransactionLedger => "transaction ledger",
            SourceKind::XirrReport => "XIRR report",
        };
        f.write_str(name)
    }
}

/// Why a single field of a record could not be used.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum FieldProblem {
    Missing,
    Mistyped { found: String },
    UnparseableDate { value: String },
    Negative { value: f64 },
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing => f.write_str("is missing"),
            FieldProblem::Mistyped { found } => write!(f, "has unexpected value {}", found),
            FieldProblem::UnparseableDate { value } => {
                write!(f, "holds an unparseable date '{}'", value)
            }
            FieldProblem::Negative { value } => write!(f, "must not be negative (got {})", value),
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("{kind}: record {index}: field '{field}' {problem}")]
    MalformedSource {
        kind: SourceKind,
        index: usize,
        field: String,
        problem: FieldProblem,
    },

    #[error("{kind}: document contains no usable records")]
    EmptySource { kind: SourceKind },

    #[error("{kind}: {reason}")]
    InvalidDocument { kind: SourceKind, reason: String },
}

impl SourceError {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceError::MalformedSource { kind, .. }
            | SourceError::EmptySource { kind }
            | SourceError::InvalidDocument { kind, .. } => *kind,
        }
    }
}

//! Shared types of the MF Central portfolio pipeline: parsed source records,
//! the composed portfolio snapshot, the import report and pipeline settings.

pub mod error;
pub mod portfolio;
pub mod records;
pub mod report;
pub mod settings;

pub use error::{FieldProblem, SourceError, SourceKind};
pub use portfolio::*;
pub use records::*;
pub use report::{ImportReport, SkippedRecord, SourceReport};
pub use settings::*;

//! Per-subject weighted grade averaging.
//!
//! Rows from the first sheet are validated one by one, folded into a
//! [`types::SubjectAggregate`] per subject, and finalized into averages.
//! Problems with individual rows are reported through a
//! [`diagnostics::DiagnosticSink`] and never abort the run.

pub mod aggregate;
pub mod diagnostics;
pub mod grade;
pub mod types;

pub use aggregate::{process, resolve_columns};
pub use diagnostics::{DiagnosticSink, SkipReason, TracingSink, Warning};
pub use types::{ColumnIndices, SubjectAggregate};

//! Non-fatal warnings raised while aggregating.

use std::fmt;
use tracing::warn;

/// Why a data row was left out of the aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The row has fewer cells than the required columns need.
    ShortRow { found: usize, expected: usize },
    /// The subject cell is blank after trimming.
    EmptySubject,
    /// The weight or result cell is not a number.
    NonNumeric {
        subject: String,
        weight: String,
        result: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ShortRow { found, expected } => write!(
                f,
                "insufficient columns for required data (found {found}, expected at least {expected})"
            ),
            SkipReason::EmptySubject => write!(f, "empty subject name"),
            SkipReason::NonNumeric {
                subject,
                weight,
                result,
            } => write!(
                f,
                "non-numeric grade/weight for subject '{subject}': Weight='{weight}', Result='{result}'"
            ),
        }
    }
}

/// A warning emitted during aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// `row` is the 1-based spreadsheet row number; the header is row 1.
    RowSkipped { row: usize, reason: SkipReason },
    /// The subject had no positive weight, so its average defaulted to 0.
    ZeroAverage {
        subject: String,
        total_weight: f64,
        grade_count: usize,
    },
}

/// Receives aggregation warnings.
pub trait DiagnosticSink {
    fn warn(&mut self, warning: Warning);
}

/// Collects warnings in memory.
impl DiagnosticSink for Vec<Warning> {
    fn warn(&mut self, warning: Warning) {
        self.push(warning);
    }
}

/// Forwards warnings to `tracing` and keeps a count of each kind.
#[derive(Debug, Default)]
pub struct TracingSink {
    pub skipped_rows: usize,
    pub zero_averages: usize,
}

impl DiagnosticSink for TracingSink {
    fn warn(&mut self, warning: Warning) {
        match warning {
            Warning::RowSkipped { row, reason } => {
                self.skipped_rows += 1;
                warn!(row, reason = %reason, "Skipping row");
            }
            Warning::ZeroAverage {
                subject,
                total_weight,
                grade_count,
            } => {
                self.zero_averages += 1;
                warn!(
                    subject = %subject,
                    total_weight,
                    grade_count,
                    "Subject has zero grades or zero total weight, average cannot be calculated"
                );
            }
        }
    }
}

use crate::error::{GradeError, Result};
use crate::grades::diagnostics::{DiagnosticSink, SkipReason, Warning};
use crate::grades::types::{
    ColumnIndices, RESULT_LABEL, SUBJECT_LABEL, SubjectAggregate, WEIGHT_LABEL,
};
use crate::parser::parse_numeric;
use std::collections::HashMap;
use tracing::debug;

/// Locates the subject, weight and result columns in the header row.
///
/// Cells are trimmed and compared exactly. When a label repeats, the last
/// occurrence wins.
pub fn resolve_columns<S: AsRef<str>>(header: &[S]) -> Result<ColumnIndices> {
    let mut subject = None;
    let mut weight = None;
    let mut result = None;

    for (idx, cell) in header.iter().enumerate() {
        match cell.as_ref().trim() {
            SUBJECT_LABEL => subject = Some(idx),
            WEIGHT_LABEL => weight = Some(idx),
            RESULT_LABEL => result = Some(idx),
            _ => {}
        }
    }

    match (subject, weight, result) {
        (Some(subject), Some(weight), Some(result)) => Ok(ColumnIndices {
            subject,
            weight,
            result,
        }),
        _ => {
            let missing = [
                (subject, SUBJECT_LABEL),
                (weight, WEIGHT_LABEL),
                (result, RESULT_LABEL),
            ]
            .into_iter()
            .filter(|(idx, _)| idx.is_none())
            .map(|(_, label)| label)
            .collect();
            Err(GradeError::ColumnsNotFound { missing })
        }
    }
}

/// Aggregates grade rows into per-subject weighted averages.
///
/// The first row is the header. Data rows that are too short, have a blank
/// subject, or carry a non-numeric weight or result are skipped and reported
/// to `sink`. Subjects without positive total weight get an average of 0 and
/// a [`Warning::ZeroAverage`].
///
/// # Errors
///
/// Fails when there are fewer than two rows, when a required column is
/// missing from the header, or when no data row is valid.
pub fn process<S, D>(rows: &[Vec<S>], sink: &mut D) -> Result<HashMap<String, SubjectAggregate>>
where
    S: AsRef<str>,
    D: DiagnosticSink + ?Sized,
{
    if rows.len() < 2 {
        return Err(GradeError::InsufficientData { rows: rows.len() });
    }

    let columns = resolve_columns(&rows[0])?;
    debug!(?columns, "Resolved grade columns");

    let mut subjects: HashMap<String, SubjectAggregate> = HashMap::new();
    let mut processed = 0usize;

    for (idx, row) in rows.iter().enumerate().skip(1) {
        let row_number = idx + 1;

        if row.len() < columns.min_row_len() {
            sink.warn(Warning::RowSkipped {
                row: row_number,
                reason: SkipReason::ShortRow {
                    found: row.len(),
                    expected: columns.min_row_len(),
                },
            });
            continue;
        }

        let subject = row[columns.subject].as_ref().trim();
        if subject.is_empty() {
            sink.warn(Warning::RowSkipped {
                row: row_number,
                reason: SkipReason::EmptySubject,
            });
            continue;
        }

        let weight_raw = row[columns.weight].as_ref();
        let result_raw = row[columns.result].as_ref();

        let (weight, result) = match (parse_numeric(weight_raw), parse_numeric(result_raw)) {
            (Ok(weight), Ok(result)) => (weight, result),
            _ => {
                sink.warn(Warning::RowSkipped {
                    row: row_number,
                    reason: SkipReason::NonNumeric {
                        subject: subject.to_string(),
                        weight: weight_raw.to_string(),
                        result: result_raw.to_string(),
                    },
                });
                continue;
            }
        };

        subjects
            .entry(subject.to_string())
            .or_default()
            .add(weight, result);
        processed += 1;
    }

    if processed == 0 {
        return Err(GradeError::NoValidData);
    }

    // Map order is random; finalize by subject name so warnings repeat.
    let mut finalized: Vec<_> = subjects.iter_mut().collect();
    finalized.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (subject, data) in finalized {
        if !data.finalize() {
            sink.warn(Warning::ZeroAverage {
                subject: subject.clone(),
                total_weight: data.total_weight,
                grade_count: data.grade_count,
            });
        }
    }

    debug!(
        rows = rows.len() - 1,
        processed,
        subjects = subjects.len(),
        "Aggregation finished"
    );

    Ok(subjects)
}
